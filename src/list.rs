use crate::ast::{Block, ListItem};
use crate::line::{self, ListKind, ListMarker};
use crate::parser::Parser;

/// One open list and the indentation of its markers.
struct Frame {
    indent: usize,
    kind: ListKind,
    items: Vec<ListItem>,
}

impl Frame {
    fn new(indent: usize, kind: ListKind) -> Self {
        Frame {
            indent,
            kind,
            items: Vec::new(),
        }
    }

    fn into_block(self) -> Block {
        match self.kind {
            ListKind::Bullet => Block::BulletList {
                children: self.items,
            },
            ListKind::Ordered => Block::OrderedList {
                children: self.items,
            },
        }
    }
}

/// The root list plus the lists nested under its items, innermost last.
///
/// A nested list is attached to the last item of its parent when it is closed;
/// nothing can be added to that parent item while the nested list is open.
struct ListStack {
    root: Frame,
    nested: Vec<Frame>,
}

impl ListStack {
    fn top(&mut self) -> &mut Frame {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    fn top_indent(&self) -> usize {
        self.nested.last().unwrap_or(&self.root).indent
    }

    fn close_innermost(&mut self) {
        let Some(frame) = self.nested.pop() else {
            return;
        };
        if let Some(parent) = self.top().items.last_mut() {
            parent.children.push(frame.into_block());
        }
    }

    fn finish(mut self) -> Block {
        while !self.nested.is_empty() {
            self.close_innermost();
        }
        self.root.into_block()
    }
}

impl Parser<'_> {
    /// Parse the list whose first marker line is `lines[start]`.
    ///
    /// Returns the list and the index of the first line that does not belong to it.
    pub(crate) fn parse_list(
        &mut self,
        lines: &[&str],
        start: usize,
        first: ListMarker<'_>,
        depth: usize,
    ) -> (Block, usize) {
        let mut stack = ListStack {
            root: Frame::new(first.indent, first.kind),
            nested: Vec::new(),
        };
        let mut i = start;

        while i < lines.len() {
            let current = lines[i];

            if line::is_blank(current) {
                let mut next = i + 1;
                while next < lines.len() && line::is_blank(lines[next]) {
                    next += 1;
                }
                i = next;
                if i < lines.len() && line::list_marker(lines[i]).is_some() {
                    continue;
                }
                break;
            }

            let Some(marker) = line::list_marker(current) else {
                // continuation of the current item when indented past its marker
                let top = stack.top();
                let Some(item) = top.items.last_mut() else {
                    break;
                };
                if line::indent_width(current) <= top.indent {
                    break;
                }
                item.children.extend(self.nested_blocks(current.trim(), depth));
                i += 1;
                continue;
            };

            if marker.indent < stack.root.indent {
                break;
            }
            while !stack.nested.is_empty() && marker.indent < stack.top_indent() {
                stack.close_innermost();
            }

            let top = stack.top();
            if marker.indent > top.indent && !top.items.is_empty() {
                stack.nested.push(Frame::new(marker.indent, marker.kind));
            } else if marker.indent == top.indent && marker.kind != top.kind {
                break;
            }

            let item = self.list_item(marker.content, depth);
            stack.top().items.push(item);
            i += 1;
        }

        (stack.finish(), i)
    }

    fn list_item(&mut self, content: &str, depth: usize) -> ListItem {
        let (checked, text) = match line::task_marker(content) {
            Some(task) => (Some(task.checked), task.content),
            None => (None, content.trim()),
        };
        ListItem {
            checked,
            children: vec![Block::Paragraph {
                children: self.parse_inline(text, depth),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Block, Inline, ListItem};
    use crate::parse;

    fn item(text: &str) -> ListItem {
        ListItem {
            checked: None,
            children: vec![Block::Paragraph {
                children: vec![Inline::text(text)],
            }],
        }
    }

    #[test]
    fn flat_list() {
        assert_eq!(
            vec![Block::BulletList {
                children: vec![item("a"), item("b")]
            }],
            parse("- a\n* b")
        );
    }

    #[test]
    fn nested_list_hangs_off_previous_item() {
        let blocks = parse("- a\n  - b\n- c");
        let mut a = item("a");
        a.children.push(Block::BulletList {
            children: vec![item("b")],
        });
        assert_eq!(
            vec![Block::BulletList {
                children: vec![a, item("c")]
            }],
            blocks
        );
    }

    #[test]
    fn tab_indent_nests() {
        let blocks = parse("1. a\n\t- b\n\t\t- c");
        let items = blocks[0].items();
        assert_eq!("ol", blocks[0].name());
        let nested = &items[0].children[1];
        assert_eq!("ul", nested.name());
        assert_eq!("ul", nested.items()[0].children[1].name());
    }

    #[test]
    fn type_switch_at_same_indent_starts_new_list() {
        let blocks = parse("- a\n1. b");
        assert_eq!(2, blocks.len());
        assert_eq!("ul", blocks[0].name());
        assert_eq!("ol", blocks[1].name());
    }

    #[test]
    fn loose_list_absorbs_blank_lines() {
        let blocks = parse("- a\n\n\n- b\n\nafter");
        assert_eq!(2, blocks.len());
        assert_eq!(2, blocks[0].items().len());
        assert_eq!("paragraph", blocks[1].name());
    }

    #[test]
    fn continuation_lines_are_block_parsed() {
        let blocks = parse("- a\n  more\n  ```\n- b");
        let items = blocks[0].items();
        assert_eq!(2, items.len());
        assert_eq!(3, items[0].children.len());
        assert_eq!("more", items[0].children[1].plain_text());
        assert_eq!("codeBlock", items[0].children[2].name());
    }

    #[test]
    fn unindented_line_ends_list() {
        let blocks = parse("- a\nplain");
        assert_eq!(2, blocks.len());
        assert_eq!("paragraph", blocks[1].name());
    }

    #[test]
    fn shallower_marker_than_first_item_ends_list() {
        let blocks = parse("  - a\n- b");
        assert_eq!(2, blocks.len());
        assert_eq!(1, blocks[0].items().len());
        assert_eq!(1, blocks[1].items().len());
    }

    #[test]
    fn task_items() {
        let blocks = parse("- [x] done\n- [ ] todo\n- plain");
        let checked: Vec<_> = blocks[0].items().iter().map(|i| i.checked).collect();
        assert_eq!(vec![Some(true), Some(false), None], checked);
        assert_eq!("done", blocks[0].items()[0].children[0].plain_text());
    }

    #[test]
    fn dedent_between_levels_opens_sibling_nesting() {
        let blocks = parse("- a\n    - b\n  - c");
        let items = blocks[0].items();
        assert_eq!(1, items.len());
        // `c` closes the list under `a` and opens a second one
        assert_eq!(3, items[0].children.len());
        assert_eq!("b", items[0].children[1].items()[0].children[0].plain_text());
        assert_eq!("c", items[0].children[2].items()[0].children[0].plain_text());
    }
}
