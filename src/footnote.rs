use std::collections::BTreeSet;

use crate::line;

/// Continuation lines lose at most this many leading whitespace characters.
const CONTINUATION_INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub id: String,
    /// Raw Markdown body, continuation lines joined with `\n`.
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct FootnoteScan {
    /// In order of first appearance of each id.
    pub definitions: Vec<Definition>,
    /// Indices of every line that belongs to a definition.
    pub consumed: BTreeSet<usize>,
    /// Number of definitions that redefined an id seen earlier.
    pub duplicates: usize,
}

impl FootnoteScan {
    /// The lines left for the block parser.
    pub fn residual<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed.contains(i))
            .map(|(_, l)| *l)
            .collect()
    }

    fn define(&mut self, id: &str, content: String) {
        match self.definitions.iter_mut().find(|d| d.id == id) {
            Some(existing) => {
                existing.content = content;
                self.duplicates += 1;
            }
            None => self.definitions.push(Definition {
                id: id.to_string(),
                content,
            }),
        }
    }
}

pub fn prescan(lines: &[&str]) -> FootnoteScan {
    let mut scan = FootnoteScan::default();
    let mut i = 0;

    while i < lines.len() {
        let Some(def) = line::footnote_def(lines[i]) else {
            i += 1;
            continue;
        };

        let mut content = def.content.to_string();
        scan.consumed.insert(i);
        i += 1;

        while i < lines.len() {
            let next = lines[i];
            if line::footnote_def(next).is_some() {
                break;
            }
            if !line::is_blank(next) && !next.starts_with(char::is_whitespace) {
                break;
            }
            content.push('\n');
            content.push_str(line::strip_indent(next, CONTINUATION_INDENT));
            scan.consumed.insert(i);
            i += 1;
        }

        scan.define(def.id, content);
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_definition() {
        let lines = ["text[^1]", "", "[^1]: note"];
        let scan = prescan(&lines);
        assert_eq!(
            vec![Definition {
                id: "1".into(),
                content: "note".into()
            }],
            scan.definitions
        );
        assert_eq!(vec!["text[^1]", ""], scan.residual(&lines));
    }

    #[test]
    fn indented_and_blank_lines_continue_a_definition() {
        let lines = ["[^a]: first", "      indented", "", "    second para", "after"];
        let scan = prescan(&lines);
        assert_eq!("first\n  indented\n\nsecond para", scan.definitions[0].content);
        assert_eq!(vec!["after"], scan.residual(&lines));
    }

    #[test]
    fn next_definition_ends_the_previous_one() {
        let lines = ["[^a]: one", "  [^b]: two", "body"];
        let scan = prescan(&lines);
        let ids: Vec<_> = scan.definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(vec!["a", "b"], ids);
        assert_eq!("two", scan.definitions[1].content);
        assert_eq!(vec!["body"], scan.residual(&lines));
    }

    #[test]
    fn redefinition_keeps_first_position() {
        let lines = ["[^x]: old", "[^y]: why", "[^x]: new"];
        let scan = prescan(&lines);
        assert_eq!("x", scan.definitions[0].id);
        assert_eq!("new", scan.definitions[0].content);
        assert_eq!(1, scan.duplicates);
    }

    #[test]
    fn definitions_anywhere_in_the_source() {
        let lines = ["# Title", "[^n]: early", "para[^n]"];
        let scan = prescan(&lines);
        assert_eq!(1, scan.definitions.len());
        assert_eq!(vec!["# Title", "para[^n]"], scan.residual(&lines));
    }
}
