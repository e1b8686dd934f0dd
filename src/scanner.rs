/// Closing positions for every `[` and `(` of one text, computed in a single pass.
pub struct Pairs {
    brackets: Vec<Option<usize>>,
    parens: Vec<Option<usize>>,
}

impl Pairs {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        if !bytes.contains(&b'[') {
            return Pairs {
                brackets: Vec::new(),
                parens: Vec::new(),
            };
        }
        Pairs {
            brackets: match_pairs(bytes, b'[', b']'),
            parens: match_pairs(bytes, b'(', b')'),
        }
    }

    /// Index of the `]` closing the `[` at `open`.
    pub fn bracket(&self, open: usize) -> Option<usize> {
        self.brackets.get(open).copied().flatten()
    }

    /// Index of the `)` closing the `(` at `open`.
    pub fn paren(&self, open: usize) -> Option<usize> {
        self.parens.get(open).copied().flatten()
    }
}

/// For each `open_byte`, the first later position where the nesting depth counted from it
/// returns to zero. Backslash-escaped characters are skipped.
fn match_pairs(bytes: &[u8], open_byte: u8, close_byte: u8) -> Vec<Option<usize>> {
    let n = bytes.len();

    // running depth after each byte
    let mut level = vec![0isize; n];
    let mut depth: isize = 0;
    let mut i = 0;
    while i < n {
        let b = bytes[i];
        if b == open_byte {
            depth += 1;
        } else if b == close_byte {
            depth -= 1;
        } else if b == b'\\' && i + 1 < n {
            level[i] = depth;
            i += 1;
        }
        level[i] = depth;
        i += 1;
    }

    // a match is the nearest later position one level below the opener's
    let offset = n as isize + 1;
    let mut nearest = vec![usize::MAX; 2 * n + 3];
    let mut pairs = vec![None; n];
    for p in (0..n).rev() {
        if bytes[p] == open_byte {
            let close = nearest[(level[p] - 1 + offset) as usize];
            if close != usize::MAX {
                pairs[p] = Some(close);
            }
        }
        nearest[(level[p] + offset) as usize] = p;
    }
    pairs
}

/// Length of the run of `byte` starting at `start`.
pub fn run_length(text: &str, start: usize, byte: u8) -> usize {
    text.as_bytes()[start.min(text.len())..]
        .iter()
        .take_while(|&&b| b == byte)
        .count()
}

/// Start of the next run of exactly `len` backticks at or after `from`.
pub fn find_backtick_run(text: &str, from: usize, len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(text, i, b'`');
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Split the inside of a link destination into url and optional title.
///
/// A title is a `"..."` or `'...'` group at the very end, preceded by whitespace.
pub fn split_destination(inside: &str) -> (&str, Option<&str>) {
    let inside = inside.trim();
    let Some(quote) = inside.chars().last().filter(|&ch| ch == '"' || ch == '\'') else {
        return (inside, None);
    };
    let body = &inside[..inside.len() - 1];
    let Some(open) = body.rfind(quote) else {
        return (inside, None);
    };
    if !body[..open].ends_with(char::is_whitespace) {
        return (inside, None);
    }
    (body[..open].trim(), Some(&body[open + 1..]))
}
