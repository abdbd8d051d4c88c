// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! End-to-end flow over the public API: segmentation, detection, rendering
//! and copy payloads together, the way the session view drives them.

use vera_render::{
    copy_payloads, looks_like_json, render, render_reduced, split_reasoning, Block, Inline,
    PipelineConfig, SegmentKind,
};

#[test]
fn reasoning_response_splits_and_renders_per_segment() {
    let raw = "<think>Check units first.\n\n- joules\n- newtons</think>\
               The force is $F = ma$.\n\n```python\nf = m * a\n```";
    let segments = split_reasoning(raw);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind, SegmentKind::Answer);
    assert_eq!(segments[0].text, "");
    assert_eq!(segments[1].kind, SegmentKind::Reasoning);

    // Reasoning goes through the reduced pipeline: structure, no extras.
    let reasoning = render_reduced(&segments[1].text);
    assert!(reasoning.blocks.iter().any(|b| matches!(b, Block::List(_))));

    // The visible answer gets the full treatment.
    let answer = render(&segments[2].text, &PipelineConfig::default());
    let math = answer.blocks.iter().any(|b| match b {
        Block::Paragraph(inlines) => inlines.iter().any(|i| matches!(i, Inline::Math(_))),
        _ => false,
    });
    assert!(math, "inline math must be extracted in the answer");

    let code = answer
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::CodeBlock(c) => Some(c),
            _ => None,
        })
        .expect("code block");
    assert_eq!(code.copy_index, Some(1));
    assert_eq!(copy_payloads(&answer), vec!["f = m * a".to_string()]);
}

#[test]
fn json_answers_are_detected_before_rendering() {
    let raw = r#"{"result": {"force": 9.8, "unit": "N"}}"#;
    let segments = split_reasoning(raw);
    assert_eq!(segments.len(), 1);
    assert!(looks_like_json(&segments[0].text));

    // Prose that merely mentions braces is not data.
    assert!(!looks_like_json("the set {1, 2, 3} is finite"));
}

#[test]
fn hostile_markup_is_neutralized_by_default() {
    let raw = "hello <img src=x onerror=alert(1)> world\n\n<script>steal()</script>";
    let doc = render(raw, &PipelineConfig::default());

    let mut saw_onerror = false;
    let mut saw_script = false;
    for block in &doc.blocks {
        let frags: Vec<_> = match block {
            Block::Markup(f) => vec![f],
            Block::Paragraph(inlines) => inlines
                .iter()
                .filter_map(|i| match i {
                    Inline::Markup(f) => Some(f),
                    _ => None,
                })
                .collect(),
            _ => continue,
        };
        for frag in frags {
            for token in &frag.tokens {
                if let vera_render::tree::MarkupToken::Tag(tag) = token {
                    saw_script |= tag.name == "script";
                    saw_onerror |= tag.attrs.iter().any(|(name, _)| name.starts_with("on"));
                }
            }
        }
    }
    assert!(!saw_script, "script elements must be dropped");
    assert!(!saw_onerror, "event handler attributes must be stripped");
}

#[test]
fn malformed_input_never_loses_text() {
    // Unterminated sentinel, unterminated math, unterminated fence: the raw
    // characters all survive somewhere in the output.
    let raw = "<think>half open $x + ```nope";
    let segments = split_reasoning(raw);
    assert_eq!(segments.len(), 1, "unmatched sentinel stays literal");
    let doc = render(&segments[0].text, &PipelineConfig::default());
    assert!(!doc.blocks.is_empty());
}

#[test]
fn copy_indices_restart_per_segment() {
    let raw = "```\nalpha\n```<think>planning</think>```\nbeta\n```";
    let segments = split_reasoning(raw);
    let first = render(&segments[0].text, &PipelineConfig::default());
    let second = render(&segments[2].text, &PipelineConfig::default());
    let index_of = |doc: &vera_render::Document| {
        doc.blocks.iter().find_map(|b| match b {
            Block::CodeBlock(c) => c.copy_index,
            _ => None,
        })
    };
    assert_eq!(index_of(&first), Some(1));
    assert_eq!(index_of(&second), Some(1), "each segment numbers its own blocks");
}
