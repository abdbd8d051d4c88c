// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Stage 2: math extraction.  Dollar-delimited TeX spans are lifted out of
//! text nodes; everything else passes through untouched.
//!
//! `$…$` is inline math and must hug its content (no space after the opening
//! or before the closing dollar), which keeps prices like `$20 and $30`
//! literal.  `$$…$$` is display math and may span line breaks within a
//! paragraph; a paragraph that is nothing but one display span becomes a
//! [`Block::MathBlock`].  Unterminated delimiters always stay literal text.
//!
//! Typesetting happens later, in the decoration stage; here the spans only
//! carry their raw source.

use crate::pipeline::{PipelineConfig, Stage};
use crate::tree::{self, Block, Document, Inline, MathSpan};

pub struct MathStage;

impl Stage for MathStage {
    fn name(&self) -> &'static str {
        "math"
    }

    fn apply(&self, mut doc: Document, _cfg: &PipelineConfig) -> Document {
        tree::for_each_inline_run_mut(&mut doc, &mut extract_in_run);
        tree::for_each_block_mut(&mut doc, &mut promote_display_paragraph);
        doc
    }
}

/// A paragraph holding exactly one display span stands alone as block math.
fn promote_display_paragraph(block: &mut Block) {
    let Block::Paragraph(inlines) = block else { return };
    let mut span = None;
    for inline in inlines.iter() {
        match inline {
            Inline::Text(t) if t.trim().is_empty() => {}
            Inline::Math(m) if m.display && span.is_none() => span = Some(m.clone()),
            _ => return,
        }
    }
    if let Some(span) = span {
        *block = Block::MathBlock(span);
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    // Coalesce with a preceding text node so later stages see clean runs.
    if let Some(Inline::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}

fn extract_in_run(items: &mut Vec<Inline>) {
    let src = std::mem::take(items);
    let mut out: Vec<Inline> = Vec::new();
    let mut i = 0;

    while i < src.len() {
        let Inline::Text(text) = &src[i] else {
            out.push(src[i].clone());
            i += 1;
            continue;
        };

        let mut rest: &str = text;
        loop {
            match find_opener(rest) {
                None => {
                    push_text(&mut out, rest);
                    break;
                }
                Some(Opener::Inline(pos)) => {
                    let after = &rest[pos + 1..];
                    match find_inline_close(after) {
                        Some(close) => {
                            push_text(&mut out, &rest[..pos]);
                            out.push(Inline::Math(MathSpan::new(&after[..close], false)));
                            rest = &after[close + 1..];
                        }
                        None => {
                            // Unterminated: the dollar stays literal.
                            push_text(&mut out, &rest[..pos + 1]);
                            rest = after;
                        }
                    }
                }
                Some(Opener::Display(pos)) => {
                    let after = &rest[pos + 2..];
                    if let Some(close) = after.find("$$") {
                        push_text(&mut out, &rest[..pos]);
                        out.push(Inline::Math(MathSpan::new(&after[..close], true)));
                        rest = &after[close + 2..];
                        continue;
                    }
                    // The closing `$$` may sit on a later line of the same
                    // paragraph, i.e. in a later text node of this run.
                    match find_cross_node_close(&src, i + 1) {
                        Some((j, offset, middle)) => {
                            push_text(&mut out, &rest[..pos]);
                            let mut source = after.to_string();
                            source.push_str(&middle);
                            out.push(Inline::Math(MathSpan::new(source, true)));
                            // Continue scanning the tail of the closing node.
                            rest = match &src[j] {
                                Inline::Text(closing) => &closing[offset + 2..],
                                _ => "",
                            };
                            i = j;
                        }
                        None => {
                            push_text(&mut out, &rest[..pos + 2]);
                            rest = after;
                        }
                    }
                }
            }
        }
        i += 1;
    }

    *items = out;
}

enum Opener {
    /// Byte offset of a `$` with content hugging it on the right.
    Inline(usize),
    /// Byte offset of a `$$`.
    Display(usize),
}

fn find_opener(text: &str) -> Option<Opener> {
    let mut from = 0;
    while let Some(rel) = text[from..].find('$') {
        let pos = from + rel;
        let after = &text[pos + 1..];
        if after.starts_with('$') {
            return Some(Opener::Display(pos));
        }
        match after.chars().next() {
            Some(c) if !c.is_whitespace() => return Some(Opener::Inline(pos)),
            _ => from = pos + 1,
        }
    }
    None
}

/// Closing `$` for inline math: content must hug it on the left.
fn find_inline_close(after: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = after[from..].find('$') {
        let pos = from + rel;
        let hugged = after[..pos]
            .chars()
            .last()
            .is_some_and(|c| !c.is_whitespace());
        if pos > 0 && hugged {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Look for a closing `$$` in later text nodes of the run, crossing only
/// text and line-break items.  Returns the closing node index, the byte
/// offset of `$$` within it, and the accumulated source in between.
fn find_cross_node_close(src: &[Inline], from: usize) -> Option<(usize, usize, String)> {
    let mut middle = String::new();
    for (j, item) in src.iter().enumerate().skip(from) {
        match item {
            Inline::HardBreak => middle.push('\n'),
            Inline::Text(t) => match t.find("$$") {
                Some(offset) => {
                    middle.push_str(&t[..offset]);
                    return Some((j, offset, middle));
                }
                None => middle.push_str(t),
            },
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::parse::parse_document;

    fn run(text: &str) -> Document {
        MathStage.apply(parse_document(text), &PipelineConfig::default())
    }

    fn first_paragraph(doc: &Document) -> &[Inline] {
        match &doc.blocks[0] {
            Block::Paragraph(inlines) => inlines,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn inline_math_is_extracted() {
        let doc = run(r"the energy $E=mc^2$ of rest mass");
        let inlines = first_paragraph(&doc);
        let math = inlines
            .iter()
            .find_map(|i| match i {
                Inline::Math(m) => Some(m),
                _ => None,
            })
            .expect("inline math span");
        assert_eq!(math.source, "E=mc^2");
        assert!(!math.display);
        assert!(math.typeset.is_none(), "typesetting belongs to decoration");
    }

    #[test]
    fn prices_are_not_math() {
        let doc = run("between $20 and $30 total");
        let inlines = first_paragraph(&doc);
        assert!(
            !inlines.iter().any(|i| matches!(i, Inline::Math(_))),
            "space-padded dollars must stay literal"
        );
    }

    #[test]
    fn unterminated_dollar_stays_literal() {
        let doc = run("a lone $x remains text");
        let inlines = first_paragraph(&doc);
        assert!(!inlines.iter().any(|i| matches!(i, Inline::Math(_))));
        assert_eq!(crate::tree::inline_text(inlines), "a lone $x remains text");
    }

    #[test]
    fn display_math_inside_a_sentence_stays_inline_position() {
        let doc = run(r"thus $$\int f$$ holds");
        let inlines = first_paragraph(&doc);
        let math = inlines
            .iter()
            .find_map(|i| match i {
                Inline::Math(m) => Some(m),
                _ => None,
            })
            .expect("display span");
        assert!(math.display);
        assert_eq!(math.source, r"\int f");
    }

    #[test]
    fn lone_display_paragraph_becomes_math_block() {
        let doc = run("$$E=mc^2$$");
        match &doc.blocks[0] {
            Block::MathBlock(span) => {
                assert!(span.display);
                assert_eq!(span.source, "E=mc^2");
            }
            other => panic!("expected math block, got {other:?}"),
        }
    }

    #[test]
    fn display_math_spans_line_breaks() {
        let doc = run("$$\nE = mc^2\n$$");
        match &doc.blocks[0] {
            Block::MathBlock(span) => assert_eq!(span.source, "\nE = mc^2\n"),
            other => panic!("expected math block, got {other:?}"),
        }
    }

    #[test]
    fn code_spans_are_never_scanned() {
        let doc = run("price `$5 to $9` quoted");
        let inlines = first_paragraph(&doc);
        assert!(inlines
            .iter()
            .any(|i| matches!(i, Inline::Code(c) if c == "$5 to $9")));
        assert!(!inlines.iter().any(|i| matches!(i, Inline::Math(_))));
    }

    #[test]
    fn two_inline_spans_in_one_text_node() {
        let doc = run("$a$ and $b$");
        let inlines = first_paragraph(&doc);
        let sources: Vec<_> = inlines
            .iter()
            .filter_map(|i| match i {
                Inline::Math(m) => Some(m.source.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sources, vec!["a", "b"]);
    }
}
