//! Display-width aware text fitting for fixed columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `width` columns (marking the cut with `…`) or pad with spaces.
pub fn fit_width(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let w = s.width();
    if w <= width {
        return format!("{}{}", s, " ".repeat(width - w));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width - 1 {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Like `fit_width` but right-aligned.
pub fn fit_width_right(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        return fit_width(s, width);
    }
    format!("{}{}", " ".repeat(width - w), s)
}
