use serde::Serialize;

use crate::highlight::{Highlighter, Row};

/// A parsed Markdown document.
///
/// `blocks` is the top-level tree in document order, with at most one trailing
/// [`Block::Footnotes`]. `diagnostics` records the degradations that happened while
/// parsing; the tree is complete either way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Something the parser degraded on. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Nesting depth of the parse that reported it; 0 is the document itself.
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    RecursionLimit,
    UnclosedCodeFence,
    DuplicateFootnote,
}

impl DiagnosticKind {
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::RecursionLimit => "recursion_limit",
            DiagnosticKind::UnclosedCodeFence => "unclosed_code_fence",
            DiagnosticKind::DuplicateFootnote => "duplicate_footnote",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::RecursionLimit => "nesting too deep, kept as literal text",
            DiagnosticKind::UnclosedCodeFence => "code fence never closed, ran to end of input",
            DiagnosticKind::DuplicateFootnote => "footnote defined more than once, last definition kept",
        }
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Heading {
        level: u8,
        children: Vec<Inline>,
    },
    Paragraph {
        children: Vec<Inline>,
    },
    Hr,
    CodeBlock {
        lang: Option<String>,
        text: String,
    },
    Blockquote {
        children: Vec<Block>,
    },
    Table(Table),
    #[serde(rename = "ul")]
    BulletList {
        children: Vec<ListItem>,
    },
    #[serde(rename = "ol")]
    OrderedList {
        children: Vec<ListItem>,
    },
    Footnotes {
        children: Vec<Footnote>,
    },
    /// Literal text left in place of a subtree the recursion limit refused to parse.
    Text {
        text: String,
    },
}

/// Inline nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
    },
    InlineCode {
        text: String,
    },
    Image(Image),
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Inline>,
    },
    Strikethrough {
        children: Vec<Inline>,
    },
    Bold {
        children: Vec<Inline>,
    },
    Italic {
        children: Vec<Inline>,
    },
    #[serde(rename = "bolditalic")]
    BoldItalic {
        children: Vec<Inline>,
    },
    FootnoteRef {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub alt: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Target of a link that wrapped nothing but this image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<TableCell>,
    pub align: Vec<Alignment>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "tableRow")]
pub struct TableRow {
    pub children: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "tableCell")]
pub struct TableCell {
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "listItem")]
pub struct ListItem {
    /// `Some` only for task items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footnote {
    pub id: String,
    pub children: Vec<Block>,
}

impl Block {
    pub fn name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::Hr => "hr",
            Block::CodeBlock { .. } => "codeBlock",
            Block::Blockquote { .. } => "blockquote",
            Block::Table(_) => "table",
            Block::BulletList { .. } => "ul",
            Block::OrderedList { .. } => "ol",
            Block::Footnotes { .. } => "footnotes",
            Block::Text { .. } => "text",
        }
    }

    /// Inline children of headings and paragraphs.
    pub fn inlines(&self) -> &[Inline] {
        match self {
            Block::Heading { children, .. } | Block::Paragraph { children } => children,
            _ => &[],
        }
    }

    /// Items of a bullet or ordered list.
    pub fn items(&self) -> &[ListItem] {
        match self {
            Block::BulletList { children } | Block::OrderedList { children } => children,
            _ => &[],
        }
    }

    /// Concatenated literal text of this block and everything below it.
    ///
    /// Sibling blocks are separated by a newline; table cells by a tab.
    pub fn plain_text(&self) -> String {
        let mut output = String::new();
        self.write_plain_text(&mut output);
        output
    }

    fn write_plain_text(&self, output: &mut String) {
        match self {
            Block::Heading { children, .. } | Block::Paragraph { children } => {
                for inline in children {
                    inline.write_plain_text(output);
                }
            }
            Block::Hr => {}
            Block::CodeBlock { text, .. } | Block::Text { text } => output.push_str(text),
            Block::Blockquote { children } => write_blocks(children, output),
            Block::Table(table) => {
                let rows = std::iter::once(&table.header).chain(table.rows.iter().map(|r| &r.children));
                for (i, cells) in rows.enumerate() {
                    if i > 0 {
                        output.push('\n');
                    }
                    for (j, cell) in cells.iter().enumerate() {
                        if j > 0 {
                            output.push('\t');
                        }
                        write_blocks(&cell.children, output);
                    }
                }
            }
            Block::BulletList { children } | Block::OrderedList { children } => {
                for (i, item) in children.iter().enumerate() {
                    if i > 0 {
                        output.push('\n');
                    }
                    write_blocks(&item.children, output);
                }
            }
            Block::Footnotes { children } => {
                for (i, footnote) in children.iter().enumerate() {
                    if i > 0 {
                        output.push('\n');
                    }
                    write_blocks(&footnote.children, output);
                }
            }
        }
    }

    /// Run a code block through `highlighter`. Returns `None` for every other block.
    pub fn highlight_with(&self, highlighter: &dyn Highlighter) -> Option<Vec<Row>> {
        match self {
            Block::CodeBlock { lang, text } => Some(highlighter.highlight(text, lang.as_deref())),
            _ => None,
        }
    }
}

fn write_blocks(blocks: &[Block], output: &mut String) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        block.write_plain_text(output);
    }
}

impl Inline {
    pub fn name(&self) -> &'static str {
        match self {
            Inline::Text { .. } => "text",
            Inline::InlineCode { .. } => "inlineCode",
            Inline::Image(_) => "image",
            Inline::Link { .. } => "link",
            Inline::Strikethrough { .. } => "strikethrough",
            Inline::Bold { .. } => "bold",
            Inline::Italic { .. } => "italic",
            Inline::BoldItalic { .. } => "bolditalic",
            Inline::FootnoteRef { .. } => "footnoteRef",
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// Child spans of links and emphasis nodes.
    pub fn children(&self) -> &[Inline] {
        match self {
            Inline::Link { children, .. }
            | Inline::Strikethrough { children }
            | Inline::Bold { children }
            | Inline::Italic { children }
            | Inline::BoldItalic { children } => children,
            _ => &[],
        }
    }

    /// Literal text of this span. Images contribute their alt text, footnote
    /// references nothing.
    pub fn plain_text(&self) -> String {
        let mut output = String::new();
        self.write_plain_text(&mut output);
        output
    }

    fn write_plain_text(&self, output: &mut String) {
        match self {
            Inline::Text { text } | Inline::InlineCode { text } => output.push_str(text),
            Inline::Image(image) => output.push_str(&image.alt),
            Inline::FootnoteRef { .. } => {}
            _ => {
                for child in self.children() {
                    child.write_plain_text(output);
                }
            }
        }
    }
}
