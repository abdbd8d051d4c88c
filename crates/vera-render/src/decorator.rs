// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Code-block copy affordances.  Every code block in a rendered segment gets
//! a 1-based index in document order; [`copy_payloads`] returns the literal
//! fence contents in the same order, so index `n` on screen always copies
//! payload `n - 1`.

use crate::tree::{self, Block, Document};

/// Assign copy indices to all code blocks, pre-order.
pub fn decorate(doc: &mut Document) {
    let mut next = 1usize;
    tree::for_each_block_mut(doc, &mut |block| {
        if let Block::CodeBlock(code) = block {
            code.copy_index = Some(next);
            next += 1;
        }
    });
}

/// The clipboard payloads for a decorated document, ordered by copy index.
/// Payloads are the raw fence contents, never the highlighted form.
pub fn copy_payloads(doc: &Document) -> Vec<String> {
    let mut out = Vec::new();
    collect(&doc.blocks, &mut out);
    out
}

fn collect(blocks: &[Block], out: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::CodeBlock(code) => out.push(code.source.clone()),
            Block::BlockQuote(children) => collect(children, out),
            Block::List(list) => {
                for item in &list.items {
                    collect(item, out);
                }
            }
            Block::Admonition(adm) => collect(&adm.blocks, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::parse::parse_document;

    #[test]
    fn indices_and_payloads_line_up() {
        let mut doc = parse_document("```\nfirst\n```\n\n> quoted\n>\n> ```\n> second\n> ```");
        decorate(&mut doc);
        let payloads = copy_payloads(&doc);
        assert_eq!(payloads, vec!["first".to_string(), "second".to_string()]);

        let mut indices = Vec::new();
        tree::for_each_block_mut(&mut doc, &mut |b| {
            if let Block::CodeBlock(c) = b {
                indices.push(c.copy_index);
            }
        });
        assert_eq!(indices, vec![Some(1), Some(2)]);
    }

    #[test]
    fn document_without_code_has_no_payloads() {
        let doc = parse_document("plain prose only");
        assert!(copy_payloads(&doc).is_empty());
    }

    #[test]
    fn nested_list_code_is_found_in_order() {
        let mut doc =
            parse_document("1. a\n\n   ```\n   one\n   ```\n\n2. b\n\n   ```\n   two\n   ```");
        decorate(&mut doc);
        assert_eq!(copy_payloads(&doc), vec!["one".to_string(), "two".to_string()]);
    }
}
