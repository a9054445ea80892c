//! HTML output for scanned blocks.
//!
//! Produces one fragment per block, joined with newlines:
//! - `<h1>`..`<h6>` for headings
//! - `<blockquote>` for each quote line
//! - `<ul>`/`<ol>` with one `<li>` per item
//! - `<pre><code data-lang="...">` for fenced code
//! - `<p>` for paragraphs

use std::fmt::Write;

use crate::block::Block;
use crate::inline::{InlineOptions, render_inline};

/// Render blocks to an HTML string.
pub(crate) fn render_blocks(blocks: &[Block<'_>], options: &InlineOptions) -> String {
    let mut out = String::with_capacity(blocks.len() * 64);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_block(block, options, &mut out);
    }
    out
}

fn render_block(block: &Block<'_>, options: &InlineOptions, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            write!(out, "<h{level}>{}</h{level}>", render_inline(text, options)).unwrap();
        }
        Block::Quote(text) => {
            write!(
                out,
                "<blockquote>{}</blockquote>",
                render_inline(text, options)
            )
            .unwrap();
        }
        Block::List { kind, items } => {
            let tag = kind.tag();
            write!(out, "<{tag}>").unwrap();
            for item in items {
                write!(out, "<li>{}</li>", render_inline(item, options)).unwrap();
            }
            write!(out, "</{tag}>").unwrap();
        }
        Block::Code(code) => code.write_html(out),
        Block::Paragraph(text) => {
            write!(out, "<p>{}</p>", render_inline(text, options)).unwrap();
        }
    }
}
