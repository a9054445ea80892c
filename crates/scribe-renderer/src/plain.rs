//! Plain-text extraction for excerpts and search indexing.
//!
//! Runs directly on the raw markdown and shares nothing with the HTML path.
//! The output is never interpreted as markup, so it is not escaped.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static SYNTAX_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#>*_\-\[\]()!~]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const ELLIPSIS: char = '…';

/// Strip markdown syntax and collapse whitespace.
///
/// Fenced code blocks and inline code spans are removed with their content.
/// Images keep their alt text and links keep their label.
///
/// # Examples
///
/// ```
/// use scribe_renderer::to_plain_text;
///
/// assert_eq!(
///     to_plain_text("# Hello\n\n**Bold** [link](https://x)"),
///     "Hello Bold link"
/// );
/// ```
pub fn to_plain_text(markdown: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(markdown, " ");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = IMAGE_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = SYNTAX_CHARS_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_owned()
}

/// Plain text cut to at most `max_chars` characters on a word boundary.
///
/// When the text is longer than `max_chars`, it is cut at the last whitespace
/// that fits (or mid-word when a single word is too long) and `…` is appended.
///
/// # Examples
///
/// ```
/// use scribe_renderer::excerpt;
///
/// assert_eq!(excerpt("Short post", 50), "Short post");
/// assert_eq!(excerpt("The quick brown fox", 12), "The quick…");
/// ```
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    truncate_words(&to_plain_text(markdown), max_chars)
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_owned();
    };

    let head = &text[..cut];
    let end = if text[cut..].starts_with(char::is_whitespace) {
        cut
    } else {
        head.rfind(char::is_whitespace).unwrap_or(cut)
    };

    let mut out = head[..end].trim_end().to_owned();
    out.push(ELLIPSIS);
    out
}
