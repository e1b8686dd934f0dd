pub mod ast;
pub mod footnote;
pub mod highlight;
pub mod inline;
pub mod line;
pub mod list;
pub mod parser;
pub mod scanner;
pub mod table;
pub mod tree_builder;

pub use ast::{Block, Diagnostic, DiagnosticKind, Document, Inline};
pub use parser::{ParseOptions, parse, parse_inline, parse_with_options};
pub use tree_builder::{serialize_blocks, serialize_tree};
