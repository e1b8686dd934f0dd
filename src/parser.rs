use serde::Deserialize;

use crate::ast::*;
use crate::footnote;
use crate::line;
use crate::table;

pub const MAX_DIAGNOSTICS: usize = 4096;

/// Default recursion ceiling for nested block and inline parses.
pub const DEFAULT_MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Nested parses at this depth or deeper are kept as literal text.
    pub max_depth: usize,
    /// Pull `[^id]: ...` definitions out of the document into a trailing footnotes node.
    pub footnotes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            footnotes: true,
        }
    }
}

/// Parse a document into its top-level blocks.
pub fn parse(source: &str) -> Vec<Block> {
    parse_with_options(source, &ParseOptions::default()).blocks
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Document {
    let mut parser = Parser::new(options);
    let blocks = parser.parse_document(source);
    Document {
        blocks,
        diagnostics: parser.diagnostics,
    }
}

/// Parse a single run of text into inline nodes.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    Parser::new(&ParseOptions::default()).parse_inline(text, 0)
}

/// Per-call parse state. Nothing here outlives one `parse_with_options` call.
pub(crate) struct Parser<'o> {
    options: &'o ParseOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> Parser<'o> {
    pub(crate) fn new(options: &'o ParseOptions) -> Self {
        Parser {
            options,
            diagnostics: Vec::new(),
        }
    }

    // === Diagnostics ===

    pub(crate) fn warn(&mut self, kind: DiagnosticKind, depth: usize) {
        match kind {
            DiagnosticKind::RecursionLimit => {
                log::warn!("{} (depth {})", kind.message(), depth)
            }
            _ => log::debug!("{} (depth {})", kind.message(), depth),
        }
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            return;
        }
        self.diagnostics.push(Diagnostic { kind, depth });
    }

    // === Recursion guard ===

    /// Block-parse `source` one level below `depth`.
    pub(crate) fn nested_blocks(&mut self, source: &str, depth: usize) -> Vec<Block> {
        let depth = depth + 1;
        if depth >= self.options.max_depth {
            self.warn(DiagnosticKind::RecursionLimit, depth);
            if source.is_empty() {
                return Vec::new();
            }
            return vec![Block::Text {
                text: source.to_string(),
            }];
        }
        let lines: Vec<&str> = source.split('\n').collect();
        self.parse_lines(&lines, depth)
    }

    /// Inline-parse `text` one level below `depth`.
    pub(crate) fn nested_inline(&mut self, text: &str, depth: usize) -> Vec<Inline> {
        let depth = depth + 1;
        if depth >= self.options.max_depth {
            self.warn(DiagnosticKind::RecursionLimit, depth);
            if text.is_empty() {
                return Vec::new();
            }
            return vec![Inline::text(text)];
        }
        self.parse_inline(text, depth)
    }

    // === Block parsing ===

    fn parse_document(&mut self, source: &str) -> Vec<Block> {
        let source = source.replace('\r', "");
        let lines: Vec<&str> = source.split('\n').collect();

        if !self.options.footnotes {
            return self.parse_lines(&lines, 0);
        }

        let scan = footnote::prescan(&lines);
        for _ in 0..scan.duplicates {
            self.warn(DiagnosticKind::DuplicateFootnote, 0);
        }

        let residual = scan.residual(&lines);
        let mut blocks = self.parse_lines(&residual, 0);

        if !scan.definitions.is_empty() {
            let mut children = Vec::with_capacity(scan.definitions.len());
            for definition in &scan.definitions {
                children.push(Footnote {
                    id: definition.id.clone(),
                    children: self.nested_blocks(&definition.content, 0),
                });
            }
            blocks.push(Block::Footnotes { children });
        }

        blocks
    }

    pub(crate) fn parse_lines(&mut self, lines: &[&str], depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let current = lines[i];

            if line::is_blank(current) {
                i += 1;
                continue;
            }

            if let Some(heading) = line::heading(current) {
                blocks.push(Block::Heading {
                    level: heading.level,
                    children: self.parse_inline(heading.content, depth),
                });
                i += 1;
                continue;
            }

            if line::is_hr(current) {
                blocks.push(Block::Hr);
                i += 1;
                continue;
            }

            if let Some(fence) = line::fence(current) {
                let (block, next) = self.parse_code_block(lines, i, fence, depth);
                blocks.push(block);
                i = next;
                continue;
            }

            if table::starts_table(lines, i) {
                if let Some((block, next)) = self.parse_table(lines, i, depth) {
                    blocks.push(block);
                    i = next;
                    continue;
                }
            }

            if let Some(marker) = line::list_marker(current) {
                let (block, next) = self.parse_list(lines, i, marker, depth);
                blocks.push(block);
                i = next;
                continue;
            }

            if line::blockquote_content(current).is_some() {
                let (block, next) = self.parse_blockquote(lines, i, depth);
                blocks.push(block);
                i = next;
                continue;
            }

            let (block, next) = self.parse_paragraph(lines, i, depth);
            blocks.push(block);
            i = next;
        }

        blocks
    }

    fn parse_code_block(
        &mut self,
        lines: &[&str],
        start: usize,
        fence: line::FenceLine<'_>,
        depth: usize,
    ) -> (Block, usize) {
        let mut i = start + 1;
        let body_start = i;
        while i < lines.len() && line::fence(lines[i]).is_none() {
            i += 1;
        }
        let text = lines[body_start..i].join("\n");

        if i < lines.len() {
            // closing fence
            i += 1;
        } else {
            self.warn(DiagnosticKind::UnclosedCodeFence, depth);
        }

        let block = Block::CodeBlock {
            lang: fence.info.map(str::to_string),
            text,
        };
        (block, i)
    }

    fn parse_blockquote(&mut self, lines: &[&str], start: usize, depth: usize) -> (Block, usize) {
        let mut i = start;
        let mut body = Vec::new();
        while let Some(content) = lines.get(i).and_then(|l| line::blockquote_content(l)) {
            body.push(content);
            i += 1;
        }
        let children = self.nested_blocks(&body.join("\n"), depth);
        (Block::Blockquote { children }, i)
    }

    fn parse_paragraph(&mut self, lines: &[&str], start: usize, depth: usize) -> (Block, usize) {
        let mut text = lines[start].to_string();
        let mut i = start + 1;
        while i < lines.len() && !line::is_blank(lines[i]) && !starts_block(lines, i) {
            text.push(' ');
            text.push_str(lines[i]);
            i += 1;
        }
        let children = self.parse_inline(text.trim(), depth);
        (Block::Paragraph { children }, i)
    }
}

/// Whether `lines[i]` opens a construct that interrupts a paragraph.
fn starts_block(lines: &[&str], i: usize) -> bool {
    let current = lines[i];
    line::heading(current).is_some()
        || line::is_hr(current)
        || line::fence(current).is_some()
        || line::blockquote_content(current).is_some()
        || table::starts_table(lines, i)
        || line::list_marker(current).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_text(block: &Block) -> String {
        assert_eq!("paragraph", block.name());
        block.plain_text()
    }

    #[test]
    fn parse_heading() {
        let blocks = parse("## Hello");
        assert_eq!(
            vec![Block::Heading {
                level: 2,
                children: vec![Inline::text("Hello")],
            }],
            blocks
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n").is_empty());
    }

    #[test]
    fn paragraph_lines_are_joined_with_spaces() {
        let blocks = parse("one\ntwo\n\nthree");
        assert_eq!(2, blocks.len());
        assert_eq!("one two", paragraph_text(&blocks[0]));
        assert_eq!("three", paragraph_text(&blocks[1]));
    }

    #[test]
    fn paragraph_stops_at_heading() {
        let blocks = parse("text\n# Title");
        assert_eq!(2, blocks.len());
        assert_eq!("heading", blocks[1].name());
    }

    #[test]
    fn carriage_returns_are_dropped() {
        let blocks = parse("# A\r\n\r\nb\r\n");
        assert_eq!(2, blocks.len());
        assert_eq!("b", paragraph_text(&blocks[1]));
    }

    #[test]
    fn hr_wins_over_list_marker() {
        assert_eq!(vec![Block::Hr], parse("* * *"));
        assert_eq!(vec![Block::Hr], parse("- - -"));
    }

    #[test]
    fn fenced_code_is_not_inline_parsed() {
        let blocks = parse("```rust\nlet x = *y*;\n\n```\nafter");
        assert_eq!(
            Block::CodeBlock {
                lang: Some("rust".into()),
                text: "let x = *y*;\n".into(),
            },
            blocks[0]
        );
        assert_eq!("after", paragraph_text(&blocks[1]));
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let doc = parse_with_options("```\na\nb", &ParseOptions::default());
        assert_eq!(
            vec![Block::CodeBlock {
                lang: None,
                text: "a\nb".into(),
            }],
            doc.blocks
        );
        assert_eq!(DiagnosticKind::UnclosedCodeFence, doc.diagnostics[0].kind);
    }

    #[test]
    fn blockquote_is_block_parsed() {
        let blocks = parse("> # Title\n> body\n>more");
        let Block::Blockquote { children } = &blocks[0] else {
            panic!("expected blockquote, got {:?}", blocks[0]);
        };
        assert_eq!(2, children.len());
        assert_eq!("heading", children[0].name());
        assert_eq!("body more", paragraph_text(&children[1]));
    }

    #[test]
    fn recursion_limit_degrades_to_text() {
        let options = ParseOptions {
            max_depth: 3,
            ..ParseOptions::default()
        };
        let doc = parse_with_options(">>>> deep", &options);

        let Block::Blockquote { children } = &doc.blocks[0] else {
            panic!("expected blockquote");
        };
        let Block::Blockquote { children } = &children[0] else {
            panic!("expected nested blockquote");
        };
        let Block::Blockquote { children } = &children[0] else {
            panic!("expected third blockquote");
        };
        assert_eq!(
            vec![Block::Text {
                text: "> deep".into()
            }],
            *children
        );
        assert_eq!(DiagnosticKind::RecursionLimit, doc.diagnostics[0].kind);
        assert_eq!(3, doc.diagnostics[0].depth);
    }

    #[test]
    fn footnotes_can_be_disabled() {
        let options = ParseOptions {
            footnotes: false,
            ..ParseOptions::default()
        };
        let doc = parse_with_options("a[^1]\n\n[^1]: note", &options);
        assert_eq!(2, doc.blocks.len());
        assert!(doc.blocks.iter().all(|b| b.name() == "paragraph"));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(8, options.max_depth);
        assert!(options.footnotes);
    }
}
