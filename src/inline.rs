use crate::ast::{Image, Inline};
use crate::parser::Parser;
use crate::scanner::{self, Pairs};

/// Bytes that may start an inline construct. Everything else is plain text.
const SPECIALS: &[u8] = b"`![]\\~*_";

impl Parser<'_> {
    pub(crate) fn parse_inline(&mut self, text: &str, depth: usize) -> Vec<Inline> {
        let bytes = text.as_bytes();
        let pairs = Pairs::new(text);
        let mut nodes = Vec::new();
        let mut p = 0;

        while p < bytes.len() {
            let parsed = match bytes[p] {
                b'`' => code_span(text, p),
                b'!' if bytes.get(p + 1) == Some(&b'[') => image(text, p, &pairs),
                b'[' => self.link(text, p, &pairs, depth),
                b'~' if bytes.get(p + 1) == Some(&b'~') => self.strikethrough(text, p, depth),
                b'*' | b'_' => self.emphasis(text, p, depth),
                _ => {
                    let end = plain_end(text, p);
                    if end > p {
                        nodes.push(Inline::text(&text[p..end]));
                        p = end;
                        continue;
                    }
                    None
                }
            };

            match parsed {
                Some((node, next)) => {
                    nodes.push(node);
                    p = next;
                }
                None => {
                    // every special is ASCII, so one byte is one char
                    nodes.push(Inline::text(&text[p..p + 1]));
                    p += 1;
                }
            }
        }

        merge_text(nodes)
    }

    fn link(
        &mut self,
        text: &str,
        p: usize,
        pairs: &Pairs,
        depth: usize,
    ) -> Option<(Inline, usize)> {
        let close = pairs.bracket(p)?;
        let label = &text[p + 1..close];

        if let Some((url, title, next)) = destination(text, close + 1, pairs) {
            let mut children = self.nested_inline(label, depth);
            if children.len() == 1 && matches!(children[0], Inline::Image(_)) {
                if let Some(Inline::Image(image)) = children.pop() {
                    return Some((Inline::Image(wrap_image(image, url, title)), next));
                }
            }
            let link = Inline::Link {
                url: url.to_string(),
                title: title.map(str::to_string),
                children,
            };
            return Some((link, next));
        }

        let id = label.strip_prefix('^')?;
        if id.is_empty() || id.contains(']') {
            return None;
        }
        Some((Inline::FootnoteRef { id: id.to_string() }, close + 1))
    }

    fn strikethrough(&mut self, text: &str, p: usize, depth: usize) -> Option<(Inline, usize)> {
        let start = p + 2;
        let end = start + text[start..].find("~~")?;
        let children = self.nested_inline(&text[start..end], depth);
        Some((Inline::Strikethrough { children }, end + 2))
    }

    /// `***`, `**` or `*` (or the `_` equivalents), longest delimiter tried first.
    fn emphasis(&mut self, text: &str, p: usize, depth: usize) -> Option<(Inline, usize)> {
        let marker = text.as_bytes()[p];
        let run = scanner::run_length(text, p, marker);

        for width in (1..=3).rev() {
            if run < width {
                continue;
            }
            let delimiter = &text[p..p + width];
            let start = p + width;
            let Some(offset) = text[start..].find(delimiter) else {
                continue;
            };
            let end = start + offset;
            let children = self.nested_inline(&text[start..end], depth);
            let node = match width {
                3 => Inline::BoldItalic { children },
                2 => Inline::Bold { children },
                _ => Inline::Italic { children },
            };
            return Some((node, end + width));
        }

        None
    }
}

fn code_span(text: &str, p: usize) -> Option<(Inline, usize)> {
    let run = scanner::run_length(text, p, b'`');
    let start = p + run;
    let end = scanner::find_backtick_run(text, start, run)?;
    let code = Inline::InlineCode {
        text: text[start..end].to_string(),
    };
    Some((code, end + run))
}

fn image(text: &str, p: usize, pairs: &Pairs) -> Option<(Inline, usize)> {
    let open = p + 1;
    let close = pairs.bracket(open)?;
    let (url, title, next) = destination(text, close + 1, pairs)?;
    let image = Image {
        alt: text[open + 1..close].to_string(),
        url: url.to_string(),
        title: title.map(str::to_string),
        href: None,
    };
    Some((Inline::Image(image), next))
}

/// `(url "title")` after optional whitespace. Returns url, title and the index past `)`.
fn destination<'a>(
    text: &'a str,
    from: usize,
    pairs: &Pairs,
) -> Option<(&'a str, Option<&'a str>, usize)> {
    let rest = &text[from..];
    let open = from + (rest.len() - rest.trim_start().len());
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let close = pairs.paren(open)?;
    let (url, title) = scanner::split_destination(&text[open + 1..close]);
    Some((url, title, close + 1))
}

/// A link around a lone image becomes the image itself, carrying the link target.
fn wrap_image(mut image: Image, url: &str, title: Option<&str>) -> Image {
    image.href = Some(url.to_string());
    let has_title = image.title.as_deref().is_some_and(|t| !t.is_empty());
    if !has_title {
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            image.title = Some(title.to_string());
        }
    }
    image
}

fn plain_end(text: &str, p: usize) -> usize {
    text.as_bytes()[p..]
        .iter()
        .position(|b| SPECIALS.contains(b))
        .map_or(text.len(), |offset| p + offset)
}

fn merge_text(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut merged: Vec<Inline> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Inline::Text { text }, Some(Inline::Text { text: last })) = (&node, merged.last_mut()) {
            last.push_str(text);
            continue;
        }
        merged.push(node);
    }
    merged
}
