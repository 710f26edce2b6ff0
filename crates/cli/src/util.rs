use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marks a cell cut short to fit its column.
const ELLIPSIS: &str = "..";

/// Terminal columns taken by `s`; CJK and emoji count double.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into exactly `width` terminal columns. Short text is padded with
/// spaces; long text is cut at a char boundary and ends in `..` when the
/// column has room for it.
pub(crate) fn fit_cell(s: &str, width: usize) -> String {
    let text_width = display_width(s);
    if text_width <= width {
        return format!("{}{}", s, " ".repeat(width - text_width));
    }

    let marker = if width > ELLIPSIS.len() { ELLIPSIS } else { "" };
    let budget = width - marker.len();
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str(marker);
    out.push_str(&" ".repeat(budget - used));
    out
}

/// Flatten cell text for a single table line: newlines and tabs become spaces.
pub(crate) fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect()
}

/// Render an aligned plain-text table. Columns are as wide as their widest
/// cell, capped at `max_width`.
pub(crate) fn render_table(headers: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    let headers: Vec<String> = headers.iter().map(|h| single_line(h)).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| single_line(v)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(value));
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(max_width);
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| fit_cell(cells.get(i).map(String::as_str).unwrap_or(""), w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&headers));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
