//! Safe markdown rendering for untrusted, user-authored content.
//!
//! This crate turns markdown into HTML that can be injected directly into a
//! page, and into normalized plain text for excerpts and search. It implements
//! a small, documented subset of markdown:
//!
//! - headings (`#` to `######`)
//! - quotes (`>`, one `<blockquote>` per line)
//! - ordered and unordered lists
//! - fenced code blocks (triple backticks, optional language tag)
//! - bold, italic, strikethrough and inline code
//! - links and images restricted to `http(s)://` and `ipfs://`
//!
//! # Architecture
//!
//! Rendering runs in two phases. Fenced regions are first extracted into typed
//! code items and the remaining lines are classified and grouped into blocks.
//! Each block is then rendered, with inline formatting applied to escaped text.
//! Raw user text only reaches the output through [`escape_html`] or through
//! the [`UrlPolicy`] allowlist.
//!
//! Every entry point is total: malformed or unsafe constructs degrade to
//! literal text, a dropped element, or a `"#"` link target.
//!
//! # Example
//!
//! ```
//! use scribe_renderer::{normalize_url, render_to_html, to_plain_text};
//!
//! let markdown = "# Hello\n\n**Bold** [site](https://example.com)";
//! let html = render_to_html(markdown);
//! assert!(html.starts_with("<h1>Hello</h1>"));
//!
//! assert_eq!(to_plain_text(markdown), "Hello Bold site");
//! assert_eq!(normalize_url("javascript:alert(1)"), "#");
//! ```

mod block;
mod escape;
mod fence;
mod html;
mod inline;
mod plain;
mod renderer;
mod url;

pub use escape::escape_html;
pub use plain::{excerpt, to_plain_text};
pub use renderer::{MarkdownRenderer, render_to_html};
pub use url::{DEFAULT_IPFS_GATEWAY, REJECTED_URL, SafeUrl, UrlPolicy, normalize_url};

/// Render a single run of inline markdown with default options.
///
/// # Examples
///
/// ```
/// use scribe_renderer::render_inline;
///
/// assert_eq!(render_inline("**a** `*b*`"), "<strong>a</strong> <code>*b*</code>");
/// ```
pub fn render_inline(text: &str) -> String {
    inline::render_inline(text, &inline::InlineOptions::default())
}
