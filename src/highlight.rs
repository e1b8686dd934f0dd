use serde::Serialize;

/// One colored piece of a highlighted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub color: String,
    pub token_type: String,
    pub text: String,
}

/// The spans of one source line, in order.
pub type Row = Vec<Span>;

pub trait Highlighter {
    /// Split `code` into rows of colored spans. `language` is the fence info string.
    fn highlight(&self, code: &str, language: Option<&str>) -> Vec<Row>;
}
