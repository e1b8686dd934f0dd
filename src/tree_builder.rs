use serde::Serialize;

use crate::ast::{Block, Diagnostic, Document};

#[derive(Serialize)]
#[serde(tag = "type", rename = "root")]
struct Root<'a> {
    children: &'a [Block],
    diagnostics: Vec<DiagnosticEntry>,
}

#[derive(Serialize)]
struct DiagnosticEntry {
    kind: &'static str,
    depth: usize,
    message: &'static str,
}

impl From<&Diagnostic> for DiagnosticEntry {
    fn from(diagnostic: &Diagnostic) -> Self {
        DiagnosticEntry {
            kind: diagnostic.kind.name(),
            depth: diagnostic.depth,
            message: diagnostic.kind.message(),
        }
    }
}

/// Serialize a parsed document as a nested JSON tree rooted at `{"type":"root"}`.
pub fn serialize_tree(doc: &Document) -> serde_json::Result<String> {
    let root = Root {
        children: &doc.blocks,
        diagnostics: doc.diagnostics.iter().map(DiagnosticEntry::from).collect(),
    };
    serde_json::to_string(&root)
}

/// Serialize bare blocks as a JSON array.
pub fn serialize_blocks(blocks: &[Block]) -> serde_json::Result<String> {
    serde_json::to_string(blocks)
}
