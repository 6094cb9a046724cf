//! Server-supplied text is rendered as plain text, never as markup.

/// Escape `& < > " '` so a value can be dropped into an HTML text node or
/// attribute without being interpreted.
pub fn plain_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
