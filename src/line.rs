/// Width of a tab when measuring indentation.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine<'a> {
    pub level: u8,
    /// Text after the marker, trimmed.
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceLine<'a> {
    /// Trimmed info string; `None` when empty.
    pub info: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker<'a> {
    /// Leading whitespace in columns, tabs counted as [`TAB_WIDTH`].
    pub indent: usize,
    pub kind: ListKind,
    /// Everything after the marker and the whitespace that follows it.
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootnoteDef<'a> {
    pub id: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMarker<'a> {
    pub checked: bool,
    pub content: &'a str,
}

pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Leading indentation in columns. Only spaces and tabs count.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .map_while(|ch| match ch {
            ' ' => Some(1),
            '\t' => Some(TAB_WIDTH),
            _ => None,
        })
        .sum()
}

pub fn heading(line: &str) -> Option<HeadingLine<'_>> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(HeadingLine {
        level: hashes as u8,
        content: rest.trim(),
    })
}

/// Three or more of the same `-`, `*` or `_`, optionally separated by whitespace.
pub fn is_hr(line: &str) -> bool {
    let mut marks = line.chars().filter(|ch| !ch.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    let mut count = 1;
    for ch in marks {
        if ch != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

pub fn fence(line: &str) -> Option<FenceLine<'_>> {
    let info = line.strip_prefix("```")?.trim();
    Some(FenceLine {
        info: (!info.is_empty()).then_some(info),
    })
}

/// `-`, `*`, `+` or `N.` followed by at least one whitespace character.
pub fn list_marker(line: &str) -> Option<ListMarker<'_>> {
    let body = line.trim_start();
    let leading = &line[..line.len() - body.len()];

    let (kind, marker_len) = match body.as_bytes().first()? {
        b'-' | b'*' | b'+' => (ListKind::Bullet, 1),
        b'0'..=b'9' => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            if body.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            (ListKind::Ordered, digits + 1)
        }
        _ => return None,
    };

    let rest = &body[marker_len..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(ListMarker {
        indent: indent_width(leading),
        kind,
        content: rest.trim_start(),
    })
}

/// Text after a `>` prefix (leading whitespace and one optional space removed).
pub fn blockquote_content(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(char::is_whitespace).unwrap_or(rest))
}

/// `[^id]: content`, optionally indented.
pub fn footnote_def(line: &str) -> Option<FootnoteDef<'_>> {
    let rest = line.trim_start().strip_prefix("[^")?;
    let close = rest.find(']')?;
    if close == 0 {
        return None;
    }
    let id = &rest[..close];
    let content = rest[close + 1..].strip_prefix(':')?;
    Some(FootnoteDef {
        id,
        content: content.trim_start(),
    })
}

/// `[ ]`, `[x]` or `[X]` at the start of a list item's content.
pub fn task_marker(content: &str) -> Option<TaskMarker<'_>> {
    let rest = content.trim_start().strip_prefix('[')?;
    let checked = match rest.as_bytes().first()? {
        b' ' => false,
        b'x' | b'X' => true,
        _ => return None,
    };
    let rest = rest[1..].strip_prefix(']')?;
    Some(TaskMarker {
        checked,
        content: rest.trim(),
    })
}

/// Strip at most `max` leading whitespace characters.
pub fn strip_indent(line: &str, max: usize) -> &str {
    let mut rest = line;
    for _ in 0..max {
        match rest.strip_prefix(char::is_whitespace) {
            Some(stripped) => rest = stripped,
            None => break,
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank("  a"));
    }

    #[test]
    fn tabs_count_as_four_columns() {
        assert_eq!(0, indent_width("- a"));
        assert_eq!(2, indent_width("  - a"));
        assert_eq!(4, indent_width("\t- a"));
        assert_eq!(6, indent_width("\t  - a"));
    }

    #[test]
    fn headings() {
        assert_eq!(
            Some(HeadingLine {
                level: 2,
                content: "Hello"
            }),
            heading("## Hello  ")
        );
        assert_eq!(None, heading("#Hello"));
        assert_eq!(None, heading("####### seven"));
        assert_eq!(None, heading(" # indented"));
        assert_eq!(Some(HeadingLine { level: 1, content: "" }), heading("# "));
    }

    #[test]
    fn horizontal_rules() {
        assert!(is_hr("---"));
        assert!(is_hr("* * *"));
        assert!(is_hr("  ___  "));
        assert!(is_hr("-----"));
        assert!(!is_hr("--"));
        assert!(!is_hr("-*-"));
        assert!(!is_hr("--- a"));
    }

    #[test]
    fn fences() {
        assert_eq!(Some(FenceLine { info: Some("rust") }), fence("``` rust "));
        assert_eq!(Some(FenceLine { info: None }), fence("```"));
        assert_eq!(None, fence("  ```"));
        assert_eq!(None, fence("``"));
    }

    #[test]
    fn list_markers() {
        let marker = list_marker("  - item").unwrap();
        assert_eq!(2, marker.indent);
        assert_eq!(ListKind::Bullet, marker.kind);
        assert_eq!("item", marker.content);

        let marker = list_marker("12. twelve").unwrap();
        assert_eq!(ListKind::Ordered, marker.kind);
        assert_eq!("twelve", marker.content);

        assert!(list_marker("-item").is_none());
        assert!(list_marker("1.item").is_none());
        assert!(list_marker("1) item").is_none());
        assert!(list_marker("-").is_none());
        assert_eq!("", list_marker("- ").unwrap().content);
    }

    #[test]
    fn blockquotes() {
        assert_eq!(Some("quoted"), blockquote_content("> quoted"));
        assert_eq!(Some("quoted"), blockquote_content(">quoted"));
        assert_eq!(Some(" two"), blockquote_content(">  two"));
        assert_eq!(Some("> nested"), blockquote_content("  > > nested"));
        assert_eq!(None, blockquote_content("not > quoted"));
    }

    #[test]
    fn footnote_definitions() {
        assert_eq!(
            Some(FootnoteDef {
                id: "note",
                content: "text"
            }),
            footnote_def("[^note]:   text")
        );
        assert_eq!(Some(FootnoteDef { id: "1", content: "" }), footnote_def("  [^1]:"));
        assert_eq!(None, footnote_def("[^]: empty"));
        assert_eq!(None, footnote_def("[^1] no colon"));
        assert_eq!(None, footnote_def("[1]: link"));
    }

    #[test]
    fn task_markers() {
        assert_eq!(
            Some(TaskMarker {
                checked: true,
                content: "done"
            }),
            task_marker("[x] done")
        );
        assert_eq!(Some(false), task_marker("[ ]todo").map(|t| t.checked));
        assert_eq!(Some(true), task_marker("[X]").map(|t| t.checked));
        assert_eq!(None, task_marker("[y] nope"));
    }

    #[test]
    fn strip_at_most_four() {
        assert_eq!("a", strip_indent("    a", 4));
        assert_eq!("  a", strip_indent("      a", 4));
        assert_eq!("a", strip_indent("\ta", 4));
    }
}
