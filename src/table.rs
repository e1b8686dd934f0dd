use crate::ast::{Alignment, Block, Table, TableCell, TableRow};
use crate::line;
use crate::parser::Parser;
use crate::scanner;

/// `lines[i]` contains a pipe and the line after it is a valid alignment row.
pub fn starts_table(lines: &[&str], i: usize) -> bool {
    lines[i].contains('|')
        && lines
            .get(i + 1)
            .is_some_and(|next| alignment_row(next).is_some())
}

/// Alignments of a separator row such as `| :--- | :---: | ---: |`.
///
/// Returns `None` unless every cell is dashes with optional colons at either end.
pub fn alignment_row(line: &str) -> Option<Vec<Alignment>> {
    let cells = split_row(line);
    if cells.is_empty() {
        return None;
    }
    cells.iter().map(|cell| cell_alignment(cell.trim())).collect()
}

fn cell_alignment(cell: &str) -> Option<Alignment> {
    let left = cell.starts_with(':');
    let right = cell.len() > 1 && cell.ends_with(':');
    let dashes = &cell[left as usize..cell.len() - right as usize];
    if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
        return None;
    }
    Some(match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    })
}

/// Split a row on `|`, leaving pipes inside code spans alone and unescaping `\|`.
///
/// Outer pipes produce empty edge cells; those are dropped when the row starts with `|`.
pub fn split_row(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'|') => {
                current.push_str(&line[segment_start..i]);
                current.push('|');
                i += 2;
                segment_start = i;
            }
            b'`' => {
                let run = scanner::run_length(line, i, b'`');
                // an unclosed run is literal and does not hide the pipes after it
                let end = scanner::find_backtick_run(line, i + run, run)
                    .map_or(i + run, |close| close + run);
                let span = &line[i..end];
                current.push_str(&line[segment_start..i]);
                current.push_str(&span.replace("\\|", "|"));
                i = end;
                segment_start = i;
            }
            b'|' => {
                current.push_str(&line[segment_start..i]);
                cells.push(std::mem::take(&mut current));
                i += 1;
                segment_start = i;
            }
            _ => i += 1,
        }
    }
    current.push_str(&line[segment_start..]);
    cells.push(current);

    if line.trim_start().starts_with('|') {
        if cells.first().is_some_and(|c| c.trim().is_empty()) {
            cells.remove(0);
        }
        if cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }
    }
    cells
}

impl Parser<'_> {
    /// Parse the table starting at `start`. `None` if the alignment row is invalid.
    pub(crate) fn parse_table(
        &mut self,
        lines: &[&str],
        start: usize,
        depth: usize,
    ) -> Option<(Block, usize)> {
        let align = alignment_row(lines.get(start + 1)?)?;
        let header_cols: Vec<String> = split_row(lines[start])
            .iter()
            .map(|c| c.trim().to_string())
            .collect();

        let mut i = start + 2;
        let mut raw_rows: Vec<String> = Vec::new();
        while i < lines.len() && !line::is_blank(lines[i]) {
            if lines[i].contains('|') {
                raw_rows.push(lines[i].to_string());
            } else {
                // a pipeless line continues the previous row's last cell
                let Some(last) = raw_rows.last_mut() else {
                    break;
                };
                last.push('\n');
                last.push_str(lines[i]);
            }
            i += 1;
        }

        let header = header_cols
            .iter()
            .map(|col| self.cell(col, depth))
            .collect();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in &raw_rows {
            let cols: Vec<String> = split_row(raw).iter().map(|c| c.trim().to_string()).collect();
            let width = cols.len().max(header_cols.len());
            let children = (0..width)
                .map(|idx| self.cell(cols.get(idx).map_or("", String::as_str), depth))
                .collect();
            rows.push(TableRow { children });
        }

        let table = Table {
            header,
            align,
            rows,
        };
        Some((Block::Table(table), i))
    }

    fn cell(&mut self, content: &str, depth: usize) -> TableCell {
        TableCell {
            children: self.nested_blocks(content, depth),
        }
    }
}
