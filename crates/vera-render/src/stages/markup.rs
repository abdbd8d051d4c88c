// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Stage 3: raw-markup splice.  The verbatim HTML fragments carried out of
//! the parse are tokenized into tags and text so the safety stage can filter
//! them and the view can style the survivors.
//!
//! The tokenizer is deliberately forgiving: comments are dropped, anything
//! that does not scan as a tag degrades to literal text, and nothing here
//! validates nesting.  Element and attribute names are lowercased.

use crate::pipeline::{PipelineConfig, Stage};
use crate::tree::{self, Block, Document, Inline, MarkupTag, MarkupToken};

pub struct MarkupStage;

impl Stage for MarkupStage {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn apply(&self, mut doc: Document, _cfg: &PipelineConfig) -> Document {
        tree::for_each_block_mut(&mut doc, &mut |block| {
            if let Block::Markup(frag) = block {
                frag.tokens = tokenize(&frag.raw);
            }
        });
        tree::for_each_inline_run_mut(&mut doc, &mut |run| {
            for inline in run {
                if let Inline::Markup(frag) = inline {
                    frag.tokens = tokenize(&frag.raw);
                }
            }
        });
        doc
    }
}

fn push_token_text(tokens: &mut Vec<MarkupToken>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(MarkupToken::Text(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(MarkupToken::Text(text.to_string()));
    }
}

/// Tokenize a raw fragment into tags and text.
pub fn tokenize(raw: &str) -> Vec<MarkupToken> {
    let mut tokens = Vec::new();
    let mut rest = raw;

    while let Some(lt) = rest.find('<') {
        push_token_text(&mut tokens, &rest[..lt]);
        let at_tag = &rest[lt..];

        if at_tag.starts_with("<!--") {
            match at_tag.find("-->") {
                Some(end) => {
                    rest = &at_tag[end + 3..];
                    continue;
                }
                None => {
                    // Unterminated comment swallows the remainder.
                    return tokens;
                }
            }
        }

        match parse_tag(at_tag) {
            Some((tag, consumed)) => {
                tokens.push(MarkupToken::Tag(tag));
                rest = &at_tag[consumed..];
            }
            None => {
                // Not a tag; the angle bracket is literal.
                push_token_text(&mut tokens, "<");
                rest = &at_tag[1..];
            }
        }
    }

    push_token_text(&mut tokens, rest);
    tokens
}

/// Scan one tag starting at `<`.  Returns the tag and the bytes consumed, or
/// `None` when the input does not scan as a tag.
fn parse_tag(s: &str) -> Option<(MarkupTag, usize)> {
    let bytes = s.as_bytes();
    let mut i = 1;

    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < s.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let name = s[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < s.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= s.len() {
            // Unterminated tag.
            return None;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                self_closing = true;
                i += 2;
                break;
            }
            _ => {
                let start = i;
                while i < s.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                if i == start {
                    return None;
                }
                let attr_name = s[start..i].to_ascii_lowercase();
                let mut value = None;
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                    if matches!(bytes.get(i), Some(b'"') | Some(b'\'')) {
                        let quote = bytes[i];
                        i += 1;
                        let vstart = i;
                        while i < s.len() && bytes[i] != quote {
                            i += 1;
                        }
                        if i >= s.len() {
                            return None;
                        }
                        value = Some(s[vstart..i].to_string());
                        i += 1;
                    } else {
                        let vstart = i;
                        while i < s.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = Some(s[vstart..i].to_string());
                    }
                }
                attrs.push((attr_name, value));
            }
        }
    }

    Some((MarkupTag { name, attrs, closing, self_closing }, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(tokens: &[MarkupToken], idx: usize) -> &MarkupTag {
        match &tokens[idx] {
            MarkupToken::Tag(t) => t,
            other => panic!("expected tag at {idx}, got {other:?}"),
        }
    }

    #[test]
    fn simple_element_with_text() {
        let tokens = tokenize("<b>bold</b>");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tag(&tokens, 0).name, "b");
        assert!(!tag(&tokens, 0).closing);
        assert!(matches!(&tokens[1], MarkupToken::Text(t) if t == "bold"));
        assert!(tag(&tokens, 2).closing);
    }

    #[test]
    fn names_and_attrs_are_lowercased() {
        let tokens = tokenize(r#"<DIV Class="Note">"#);
        let t = tag(&tokens, 0);
        assert_eq!(t.name, "div");
        assert_eq!(t.attrs, vec![("class".to_string(), Some("Note".to_string()))]);
    }

    #[test]
    fn quoted_values_keep_spaces_and_brackets() {
        let tokens = tokenize(r#"<a href="x?a=1&b=>2" title='two words'>"#);
        let t = tag(&tokens, 0);
        assert_eq!(t.attrs[0].1.as_deref(), Some("x?a=1&b=>2"));
        assert_eq!(t.attrs[1].1.as_deref(), Some("two words"));
    }

    #[test]
    fn unquoted_and_boolean_attrs() {
        let tokens = tokenize("<input type=text disabled>");
        let t = tag(&tokens, 0);
        assert_eq!(t.attrs[0], ("type".to_string(), Some("text".to_string())));
        assert_eq!(t.attrs[1], ("disabled".to_string(), None));
    }

    #[test]
    fn self_closing_tag() {
        let tokens = tokenize("<br/>");
        assert!(tag(&tokens, 0).self_closing);
    }

    #[test]
    fn comments_are_dropped() {
        let tokens = tokenize("a<!-- hidden -->b");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], MarkupToken::Text(t) if t == "ab"));
    }

    #[test]
    fn malformed_angle_bracket_degrades_to_text() {
        let tokens = tokenize("x < y and <3 hearts");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], MarkupToken::Text(t) if t == "x < y and <3 hearts"));
    }

    #[test]
    fn unterminated_tag_degrades_to_text() {
        let tokens = tokenize("<div class=");
        assert!(matches!(&tokens[0], MarkupToken::Text(t) if t.starts_with('<')));
    }

    #[test]
    fn stage_fills_tokens_on_block_and_inline_fragments() {
        use crate::tree::MarkupFragment;
        let doc = Document {
            blocks: vec![
                Block::Markup(MarkupFragment::raw("<div>x</div>")),
                Block::Paragraph(vec![Inline::Markup(MarkupFragment::raw("<b>"))]),
            ],
        };
        let doc = MarkupStage.apply(doc, &PipelineConfig::default());
        let Block::Markup(frag) = &doc.blocks[0] else { panic!("expected markup block") };
        assert_eq!(frag.tokens.len(), 3);
        let Block::Paragraph(inlines) = &doc.blocks[1] else { panic!("expected paragraph") };
        let Inline::Markup(frag) = &inlines[0] else { panic!("expected inline markup") };
        assert_eq!(frag.tokens.len(), 1);
    }
}
