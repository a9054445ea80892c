//! Line classification and block grouping.
//!
//! Every line is classified once into a [`LineKind`]. A small state machine
//! (`None`, `InParagraph`, `InList`) then folds the classified lines into
//! [`Block`]s: list items of the same kind are grouped, paragraph lines are
//! joined, everything else maps one line to one block.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{CodeBlock, Line};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static UNORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s+(.*)$").unwrap());

/// Ordered (`1.`) or unordered (`-`, `*`) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// Classification of a single line. Text payloads are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    Code(CodeBlock),
    Heading { level: u8, text: &'a str },
    Quote(&'a str),
    ListItem { kind: ListKind, text: &'a str },
    Text(&'a str),
}

impl<'a> LineKind<'a> {
    /// The text to append if this line continues a paragraph.
    ///
    /// `None` for every line that starts (or separates) a block, which makes
    /// this the only paragraph boundary rule.
    fn paragraph_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => Some(*text),
            _ => None,
        }
    }
}

/// Classify one line of the extracted sequence.
pub(crate) fn classify(line: Line<'_>) -> LineKind<'_> {
    let text = match line {
        Line::Code(block) => return LineKind::Code(block),
        Line::Text(text) => text.trim(),
    };

    if text.is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = HEADING_RE.captures(text) {
        let level = u8::try_from(caps[1].len()).unwrap_or(6);
        let body = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::Heading {
            level,
            text: body.trim(),
        };
    }
    if let Some(rest) = text.strip_prefix('>') {
        return LineKind::Quote(rest.trim());
    }
    if let Some(caps) = UNORDERED_RE.captures(text) {
        return LineKind::ListItem {
            kind: ListKind::Unordered,
            text: caps.get(1).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = ORDERED_RE.captures(text) {
        return LineKind::ListItem {
            kind: ListKind::Ordered,
            text: caps.get(1).map_or("", |m| m.as_str()),
        };
    }
    LineKind::Text(text)
}

/// A structural unit ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Quote(&'a str),
    List { kind: ListKind, items: Vec<&'a str> },
    Code(CodeBlock),
    Paragraph(String),
}

enum ScanState<'a> {
    None,
    InParagraph(Vec<&'a str>),
    InList(ListKind, Vec<&'a str>),
}

impl<'a> ScanState<'a> {
    /// Emit the block being accumulated, if any.
    fn finish(self, blocks: &mut Vec<Block<'a>>) {
        match self {
            Self::None => {}
            Self::InParagraph(lines) => blocks.push(Block::Paragraph(lines.join(" "))),
            Self::InList(kind, items) => blocks.push(Block::List { kind, items }),
        }
    }
}

/// Fold the line sequence into blocks.
pub(crate) fn scan<'a>(lines: Vec<Line<'a>>) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut state = ScanState::None;

    for kind in lines.into_iter().map(classify) {
        state = match (state, kind) {
            (ScanState::InParagraph(mut parts), kind) if kind.paragraph_text().is_some() => {
                parts.extend(kind.paragraph_text());
                ScanState::InParagraph(parts)
            }
            (ScanState::InList(current, mut items), LineKind::ListItem { kind, text })
                if kind == current =>
            {
                items.push(text);
                ScanState::InList(current, items)
            }
            (state, kind) => {
                state.finish(&mut blocks);
                start(kind, &mut blocks)
            }
        };
    }
    state.finish(&mut blocks);

    blocks
}

/// Handle a line that does not continue the current block.
fn start<'a>(kind: LineKind<'a>, blocks: &mut Vec<Block<'a>>) -> ScanState<'a> {
    match kind {
        LineKind::Blank => ScanState::None,
        LineKind::Code(code) => {
            blocks.push(Block::Code(code));
            ScanState::None
        }
        LineKind::Heading { level, text } => {
            blocks.push(Block::Heading { level, text });
            ScanState::None
        }
        LineKind::Quote(text) => {
            blocks.push(Block::Quote(text));
            ScanState::None
        }
        LineKind::ListItem { kind, text } => ScanState::InList(kind, vec![text]),
        LineKind::Text(text) => ScanState::InParagraph(vec![text]),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fence::extract_code_blocks;

    fn kind(line: &str) -> LineKind<'_> {
        classify(Line::Text(line))
    }

    fn blocks(input: &str) -> Vec<Block<'_>> {
        scan(extract_code_blocks(input))
    }

    #[test]
    fn test_classify_blank() {
        assert_eq!(kind(""), LineKind::Blank);
        assert_eq!(kind("   \t"), LineKind::Blank);
    }

    #[test]
    fn test_classify_headings() {
        assert_eq!(
            kind("# Title"),
            LineKind::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            kind("###### Six"),
            LineKind::Heading {
                level: 6,
                text: "Six"
            }
        );
    }

    #[test]
    fn test_classify_seven_hashes_is_text() {
        assert_eq!(kind("####### Seven"), LineKind::Text("####### Seven"));
    }

    #[test]
    fn test_classify_hash_without_space_is_text() {
        assert_eq!(kind("#hashtag"), LineKind::Text("#hashtag"));
    }

    #[test]
    fn test_classify_quote() {
        assert_eq!(kind("> quoted"), LineKind::Quote("quoted"));
        assert_eq!(kind(">tight"), LineKind::Quote("tight"));
    }

    #[test]
    fn test_classify_list_items() {
        assert_eq!(
            kind("- dash"),
            LineKind::ListItem {
                kind: ListKind::Unordered,
                text: "dash"
            }
        );
        assert_eq!(
            kind("* star"),
            LineKind::ListItem {
                kind: ListKind::Unordered,
                text: "star"
            }
        );
        assert_eq!(
            kind("42. answer"),
            LineKind::ListItem {
                kind: ListKind::Ordered,
                text: "answer"
            }
        );
    }

    #[test]
    fn test_classify_non_ascii_digits_are_text() {
        assert_eq!(kind("١. item"), LineKind::Text("١. item"));
        assert_eq!(kind("٣٤. item"), LineKind::Text("٣٤. item"));
    }

    #[test]
    fn test_classify_emphasis_is_not_list() {
        assert_eq!(kind("**bold** start"), LineKind::Text("**bold** start"));
        assert_eq!(kind("*em*"), LineKind::Text("*em*"));
        assert_eq!(kind("---"), LineKind::Text("---"));
    }

    #[test]
    fn test_classify_trims_indentation() {
        assert_eq!(kind("   text  "), LineKind::Text("text"));
        assert_eq!(
            kind("  - item"),
            LineKind::ListItem {
                kind: ListKind::Unordered,
                text: "item"
            }
        );
    }

    #[test]
    fn test_scan_groups_list_items() {
        assert_eq!(
            blocks("- a\n- b\n- c"),
            vec![Block::List {
                kind: ListKind::Unordered,
                items: vec!["a", "b", "c"]
            }]
        );
    }

    #[test]
    fn test_scan_splits_list_on_kind_change() {
        assert_eq!(
            blocks("- a\n1. b"),
            vec![
                Block::List {
                    kind: ListKind::Unordered,
                    items: vec!["a"]
                },
                Block::List {
                    kind: ListKind::Ordered,
                    items: vec!["b"]
                },
            ]
        );
    }

    #[test]
    fn test_scan_blank_line_ends_list() {
        assert_eq!(blocks("- a\n\n- b").len(), 2);
    }

    #[test]
    fn test_scan_joins_paragraph_lines() {
        assert_eq!(
            blocks("first line\n  second line\nthird"),
            vec![Block::Paragraph("first line second line third".to_owned())]
        );
    }

    #[test]
    fn test_scan_paragraph_ends_at_block_start() {
        assert_eq!(
            blocks("text\n# Head\nmore\n- item"),
            vec![
                Block::Paragraph("text".to_owned()),
                Block::Heading {
                    level: 1,
                    text: "Head"
                },
                Block::Paragraph("more".to_owned()),
                Block::List {
                    kind: ListKind::Unordered,
                    items: vec!["item"]
                },
            ]
        );
    }

    #[test]
    fn test_scan_quotes_not_merged() {
        assert_eq!(
            blocks("> one\n> two"),
            vec![Block::Quote("one"), Block::Quote("two")]
        );
    }

    #[test]
    fn test_scan_list_then_paragraph() {
        assert_eq!(
            blocks("- a\nplain"),
            vec![
                Block::List {
                    kind: ListKind::Unordered,
                    items: vec!["a"]
                },
                Block::Paragraph("plain".to_owned()),
            ]
        );
    }

    #[test]
    fn test_scan_code_block_breaks_paragraph() {
        assert_eq!(
            blocks("para\n```\ncode\n```\nafter"),
            vec![
                Block::Paragraph("para".to_owned()),
                Block::Code(CodeBlock {
                    lang: None,
                    content: "code".to_owned()
                }),
                Block::Paragraph("after".to_owned()),
            ]
        );
    }

    #[test]
    fn test_scan_empty_input() {
        assert!(blocks("").is_empty());
        assert!(blocks("\n\n  \n").is_empty());
    }
}
