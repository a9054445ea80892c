//! HTML entity escaping.

/// Escape text for safe inclusion in HTML content and quoted attributes.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with entities. Characters are mapped in a
/// single pass, so the `&` of an entity produced here is never escaped again.
///
/// # Examples
///
/// ```
/// use scribe_renderer::escape_html;
///
/// assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
/// assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
