/// Escape the characters that are significant in HTML markup.
///
/// Covers `&`, `<`, `>`, `"` and `'`, so the result is safe both as element
/// text and inside single- or double-quoted attribute values. Unlike
/// whitelist sanitization, nothing is dropped: `<b>` is displayed verbatim.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trim surrounding whitespace, then escape for display.
pub fn sanitize(input: &str) -> String {
    escape_html(input.trim())
}
