//! Fenced code block extraction.
//!
//! Runs before block scanning so that fenced content is never classified as
//! markdown. Each fenced region becomes a single [`Line::Code`] item carrying
//! its raw content, in place of the lines it spanned.

use std::fmt::Write;

use crate::escape::escape_html;

const FENCE: &str = "```";

/// A fenced code region with its content kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeBlock {
    /// Language tag from the opening fence, if any.
    pub(crate) lang: Option<String>,
    /// Lines between the fences, joined with `\n`.
    pub(crate) content: String,
}

impl CodeBlock {
    /// Render as `<pre><code data-lang="...">`, escaping language and content.
    pub(crate) fn write_html(&self, out: &mut String) {
        write!(
            out,
            r#"<pre><code data-lang="{}">{}</code></pre>"#,
            escape_html(self.lang.as_deref().unwrap_or_default()),
            escape_html(&self.content)
        )
        .unwrap();
    }
}

/// One unit of the line sequence handed to the block scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// An ordinary input line (trailing `\r` removed).
    Text(&'a str),
    /// A complete fenced region.
    Code(CodeBlock),
}

/// Split input into lines, folding each fenced region into one [`Line::Code`].
///
/// A fence opens on a line whose left-trimmed text starts with three backticks
/// and closes at the next such line. An opening fence without a closing fence
/// forms no region; its lines stay ordinary text.
pub(crate) fn extract_code_blocks(input: &str) -> Vec<Line<'_>> {
    let lines: Vec<&str> = input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let Some(lang) = fence_info(line) else {
            out.push(Line::Text(line));
            i += 1;
            continue;
        };

        let close = lines[i + 1..]
            .iter()
            .position(|l| fence_info(l).is_some())
            .map(|offset| i + 1 + offset);

        match close {
            Some(close) => {
                out.push(Line::Code(CodeBlock {
                    lang: (!lang.is_empty()).then(|| lang.to_owned()),
                    content: lines[i + 1..close].join("\n"),
                }));
                i = close + 1;
            }
            None => {
                tracing::debug!(line = i + 1, "Unterminated code fence left as text");
                out.push(Line::Text(line));
                i += 1;
            }
        }
    }
    out
}

/// Return the trimmed info string if `line` is a fence line.
fn fence_info(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(FENCE).map(str::trim)
}
