//! Configurable renderer and default entry points.

use crate::block::scan;
use crate::fence::extract_code_blocks;
use crate::html::render_blocks;
use crate::inline::{InlineOptions, render_inline};
use crate::plain;
use crate::url::{SafeUrl, UrlPolicy};

/// Markdown renderer for untrusted content.
///
/// Rendering is a pure function of the input and the renderer's options, so a
/// single renderer can be shared across threads.
///
/// # Example
///
/// ```
/// use scribe_renderer::{MarkdownRenderer, UrlPolicy};
///
/// let renderer = MarkdownRenderer::new()
///     .with_url_policy(UrlPolicy::new().with_gateway("https://gw.example/ipfs/"))
///     .with_external_links(false);
///
/// let html = renderer.render("![logo](ipfs://QmLogo)");
/// assert_eq!(html, r#"<p><img src="https://gw.example/ipfs/QmLogo" alt="logo"></p>"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: InlineOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with the default URL policy and external links enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL policy used for link and image targets.
    #[must_use]
    pub fn with_url_policy(mut self, policy: UrlPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    /// Enable or disable `target="_blank"` on rendered links.
    ///
    /// Enabled by default. Links always carry `rel="noopener noreferrer nofollow"`.
    #[must_use]
    pub fn with_external_links(mut self, enabled: bool) -> Self {
        self.options.external_links = enabled;
        self
    }

    /// URL policy used by this renderer.
    #[must_use]
    pub fn url_policy(&self) -> &UrlPolicy {
        &self.options.policy
    }

    /// Render markdown to HTML that is safe to inject into a page.
    pub fn render(&self, markdown: &str) -> String {
        let lines = extract_code_blocks(markdown);
        let blocks = scan(lines);
        render_blocks(&blocks, &self.options)
    }

    /// Render a single run of inline markdown (no block structure).
    pub fn render_inline(&self, text: &str) -> String {
        render_inline(text, &self.options)
    }

    /// Normalize a URL with this renderer's policy.
    pub fn normalize_url(&self, url: &str) -> SafeUrl {
        self.options.policy.normalize(url)
    }

    /// Plain text for indexing. Independent of renderer options.
    pub fn plain_text(&self, markdown: &str) -> String {
        plain::to_plain_text(markdown)
    }

    /// Plain-text excerpt of at most `max_chars` characters plus an ellipsis.
    pub fn excerpt(&self, markdown: &str, max_chars: usize) -> String {
        plain::excerpt(markdown, max_chars)
    }
}

/// Render markdown to safe HTML with default options.
///
/// # Examples
///
/// ```
/// use scribe_renderer::render_to_html;
///
/// assert_eq!(render_to_html("# Title"), "<h1>Title</h1>");
/// assert_eq!(
///     render_to_html("<script>alert(1)</script>"),
///     "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
/// );
/// ```
pub fn render_to_html(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}
