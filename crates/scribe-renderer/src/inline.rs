//! Inline formatting for a single block of text.
//!
//! Text is escaped first, then passed through a fixed sequence of passes:
//!
//! 1. code spans
//! 2. images
//! 3. links
//! 4. bold (`**`)
//! 5. italic (`*`)
//! 6. strikethrough (`~~`)
//!
//! The order matters. Code spans are frozen before any marker pass runs, so
//! `` `**x**` `` stays literal. Each pass works on a list of [`Inline`] nodes
//! rather than a flat string: escaped user text and generator markup never
//! mix, and the delimiter passes only pair markers that sit at the same
//! nesting level, so the emitted tags are always well formed.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_html;
use crate::url::UrlPolicy;

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());

/// Options shared by every inline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineOptions {
    pub(crate) policy: UrlPolicy,
    /// Open links in a new browsing context (`target="_blank"`).
    pub(crate) external_links: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            policy: UrlPolicy::default(),
            external_links: true,
        }
    }
}

/// A node in the inline tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inline {
    /// Escaped user text, still open to later passes.
    Text(String),
    /// Generator markup with escaped payload. Later passes skip it.
    Html(String),
    /// A wrapping element whose children are still open to later passes.
    Element {
        open: String,
        close: &'static str,
        children: Vec<Inline>,
    },
}

/// Escape `text` and apply every inline pass in order.
pub(crate) fn render_inline(text: &str, options: &InlineOptions) -> String {
    let nodes = vec![Inline::Text(escape_html(text))];
    let nodes = code_spans(nodes);
    let nodes = images(nodes, &options.policy);
    let nodes = links(nodes, options);
    let nodes = bold(nodes);
    let nodes = italic(nodes);
    let nodes = strikethrough(nodes);

    let mut out = String::with_capacity(text.len() + 16);
    write_html(&nodes, &mut out);
    out
}

/// `` `x` `` → `<code>x</code>`.
fn code_spans(nodes: Vec<Inline>) -> Vec<Inline> {
    split_text(nodes, &CODE_SPAN_RE, &mut |caps| {
        vec![Inline::Html(format!("<code>{}</code>", &caps[1]))]
    })
}

/// `![alt](url)` → `<img>`, dropped entirely when the URL is not allowed.
fn images(nodes: Vec<Inline>, policy: &UrlPolicy) -> Vec<Inline> {
    split_text(nodes, &IMAGE_RE, &mut |caps| {
        let url = policy.normalize(&caps[2]);
        if !url.is_allowed() {
            tracing::debug!(url = %&caps[2], "Dropped image with disallowed URL");
            return Vec::new();
        }
        vec![Inline::Html(format!(
            r#"<img src="{}" alt="{}">"#,
            url.as_str(),
            &caps[1]
        ))]
    })
}

/// `[label](url)` → `<a>`, or the bare label when the URL is not allowed.
///
/// The label may span code spans and images frozen by earlier passes, so
/// `` [`cfg`](url) `` and `[![logo](img)](url)` both become anchors. The URL
/// itself must sit in plain text.
fn links(nodes: Vec<Inline>, options: &InlineOptions) -> Vec<Inline> {
    let mut pending: VecDeque<Inline> = nodes.into();
    let mut out = Vec::with_capacity(pending.len());

    while let Some(node) = pending.pop_front() {
        let text = match node {
            Inline::Text(text) => text,
            Inline::Element {
                open,
                close,
                children,
            } => {
                out.push(Inline::Element {
                    open,
                    close,
                    children: links(children, options),
                });
                continue;
            }
            html @ Inline::Html(_) => {
                out.push(html);
                continue;
            }
        };

        let Some(found) = find_link(&text, pending.make_contiguous()) else {
            push_text(&mut out, &text);
            continue;
        };

        push_text(&mut out, &text[..found.open]);
        let mut label = Vec::new();
        let rest = match found.close {
            LinkClose::SameNode { label_end, end } => {
                push_text(&mut label, &text[found.open + 1..label_end]);
                text[end..].to_owned()
            }
            LinkClose::Following {
                atoms,
                label_tail,
                rest,
            } => {
                push_text(&mut label, &text[found.open + 1..]);
                for atom in pending.drain(..atoms) {
                    push_node(&mut label, atom);
                }
                // The closing text node is carried by `label_tail` and `rest`
                pending.pop_front();
                push_text(&mut label, &label_tail);
                rest
            }
        };
        if !rest.is_empty() {
            pending.push_front(Inline::Text(rest));
        }

        for node in link_nodes(label, &found.url, options) {
            push_node(&mut out, node);
        }
    }
    out
}

/// Where a link found by [`find_link`] starts and ends.
struct LinkMatch {
    /// Offset of `[` in the opening text node.
    open: usize,
    close: LinkClose,
    url: String,
}

enum LinkClose {
    /// `](url)` is in the opening text node.
    SameNode { label_end: usize, end: usize },
    /// `](url)` is in the text node after `atoms` frozen nodes. That node is
    /// split into the end of the label and the text after `)`.
    Following {
        atoms: usize,
        label_tail: String,
        rest: String,
    },
}

/// Find the first `[label](url)` starting in `head`.
///
/// The label ends at the first `]` and must not be empty. It may run into the
/// nodes of `following`, as long as they are frozen markup and the closing
/// `](url)` lies in a text node.
fn find_link(head: &str, following: &[Inline]) -> Option<LinkMatch> {
    head.match_indices('[').find_map(|(open, _)| {
        let after = &head[open + 1..];
        if let Some(label_end) = after.find(']') {
            let label_end = open + 1 + label_end;
            if label_end == open + 1 {
                return None;
            }
            let (url, end) = destination(head, label_end)?;
            return Some(LinkMatch {
                open,
                close: LinkClose::SameNode { label_end, end },
                url,
            });
        }

        for (atoms, node) in following.iter().enumerate() {
            match node {
                Inline::Html(_) => {}
                Inline::Element { .. } => return None,
                Inline::Text(text) => {
                    let label_end = text.find(']')?;
                    if after.is_empty() && atoms == 0 && label_end == 0 {
                        return None;
                    }
                    let (url, end) = destination(text, label_end)?;
                    return Some(LinkMatch {
                        open,
                        close: LinkClose::Following {
                            atoms,
                            label_tail: text[..label_end].to_owned(),
                            rest: text[end..].to_owned(),
                        },
                        url,
                    });
                }
            }
        }
        None
    })
}

/// Parse `(url)` right after the `]` at `label_end`.
///
/// Returns the raw URL and the offset just past `)`.
fn destination(text: &str, label_end: usize) -> Option<(String, usize)> {
    let inner = text[label_end + 1..].strip_prefix('(')?;
    let len = inner.find(')')?;
    Some((inner[..len].to_owned(), label_end + 2 + len + 1))
}

/// Wrap `label` in an anchor, or return it bare when `url` is not allowed.
fn link_nodes(label: Vec<Inline>, url: &str, options: &InlineOptions) -> Vec<Inline> {
    let safe = options.policy.normalize(url);
    if !safe.is_allowed() {
        tracing::debug!(url, "Link with disallowed URL rendered as text");
        return label;
    }
    let target = if options.external_links {
        r#" target="_blank""#
    } else {
        ""
    };
    vec![Inline::Element {
        open: format!(
            r#"<a href="{}" rel="noopener noreferrer nofollow"{target}>"#,
            safe.as_str()
        ),
        close: "</a>",
        children: label,
    }]
}

fn bold(nodes: Vec<Inline>) -> Vec<Inline> {
    wrap_delimited(nodes, "**", "<strong>", "</strong>")
}

fn italic(nodes: Vec<Inline>) -> Vec<Inline> {
    wrap_delimited(nodes, "*", "<em>", "</em>")
}

fn strikethrough(nodes: Vec<Inline>) -> Vec<Inline> {
    wrap_delimited(nodes, "~~", "<s>", "</s>")
}

/// Replace every regex match inside text nodes with the nodes `replace` yields.
fn split_text(
    nodes: Vec<Inline>,
    re: &Regex,
    replace: &mut dyn FnMut(&Captures<'_>) -> Vec<Inline>,
) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => {
                let mut last = 0;
                for caps in re.captures_iter(&text) {
                    let Some(whole) = caps.get(0) else { continue };
                    push_text(&mut out, &text[last..whole.start()]);
                    for replacement in replace(&caps) {
                        push_node(&mut out, replacement);
                    }
                    last = whole.end();
                }
                push_text(&mut out, &text[last..]);
            }
            Inline::Element {
                open,
                close,
                children,
            } => out.push(Inline::Element {
                open,
                close,
                children: split_text(children, re, replace),
            }),
            html @ Inline::Html(_) => out.push(html),
        }
    }
    out
}

/// A node list split around delimiter markers.
enum Piece {
    Node(Inline),
    Marker,
}

/// Wrap content between paired `marker`s in `open`/`close`.
///
/// A marker pairs with the next marker at the same nesting level. When nothing
/// sits between the two, the first marker stays literal and the second is
/// tried as an opener. A trailing unpaired marker stays literal.
fn wrap_delimited(
    nodes: Vec<Inline>,
    marker: &str,
    open: &'static str,
    close: &'static str,
) -> Vec<Inline> {
    let mut pieces = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => {
                for (i, part) in text.split(marker).enumerate() {
                    if i > 0 {
                        pieces.push(Piece::Marker);
                    }
                    if !part.is_empty() {
                        pieces.push(Piece::Node(Inline::Text(part.to_owned())));
                    }
                }
            }
            Inline::Element {
                open: el_open,
                close: el_close,
                children,
            } => pieces.push(Piece::Node(Inline::Element {
                open: el_open,
                close: el_close,
                children: wrap_delimited(children, marker, open, close),
            })),
            html @ Inline::Html(_) => pieces.push(Piece::Node(html)),
        }
    }

    let markers: Vec<usize> = pieces
        .iter()
        .enumerate()
        .filter_map(|(i, p)| matches!(p, Piece::Marker).then_some(i))
        .collect();
    let mut openers = Vec::new();
    let mut closers = Vec::new();
    let mut k = 0;
    while k + 1 < markers.len() {
        let (start, end) = (markers[k], markers[k + 1]);
        if end > start + 1 {
            openers.push(start);
            closers.push(end);
            k += 2;
        } else {
            k += 1;
        }
    }

    let mut out = Vec::with_capacity(pieces.len());
    let mut inner: Option<Vec<Inline>> = None;
    for (i, piece) in pieces.into_iter().enumerate() {
        match piece {
            Piece::Marker if openers.binary_search(&i).is_ok() => inner = Some(Vec::new()),
            Piece::Marker if closers.binary_search(&i).is_ok() => {
                let children = inner.take().unwrap_or_default();
                out.push(Inline::Element {
                    open: open.to_owned(),
                    close,
                    children,
                });
            }
            Piece::Marker => push_text(inner.as_mut().unwrap_or(&mut out), marker),
            Piece::Node(node) => push_node(inner.as_mut().unwrap_or(&mut out), node),
        }
    }
    out
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        push_node(out, Inline::Text(text.to_owned()));
    }
}

/// Push a node, merging adjacent text.
fn push_node(out: &mut Vec<Inline>, node: Inline) {
    if let Inline::Text(text) = &node
        && let Some(Inline::Text(last)) = out.last_mut()
    {
        last.push_str(text);
        return;
    }
    out.push(node);
}

fn write_html(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) | Inline::Html(text) => out.push_str(text),
            Inline::Element {
                open,
                close,
                children,
            } => {
                out.push_str(open);
                write_html(children, out);
                out.push_str(close);
            }
        }
    }
}
