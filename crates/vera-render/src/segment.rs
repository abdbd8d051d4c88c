// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Response segmentation: split a raw model response into alternating
//! visible-answer and hidden-reasoning segments on the `<think>…</think>`
//! sentinel pair.
//!
//! The primary correctness property is the round trip: [`rejoin`] applied to
//! [`split_reasoning`]'s output reproduces the input byte for byte.  Segments
//! never overlap and never drop characters.

/// Opening sentinel emitted by reasoning models.
pub const THINK_OPEN: &str = "<think>";
/// Closing sentinel.
pub const THINK_CLOSE: &str = "</think>";

/// Whether a segment is shown directly or inside the collapsed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Answer,
    Reasoning,
}

/// One contiguous piece of the raw response, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn answer(text: &str) -> Self {
        Self { kind: SegmentKind::Answer, text: text.to_string() }
    }

    fn reasoning(text: &str) -> Self {
        Self { kind: SegmentKind::Reasoning, text: text.to_string() }
    }
}

/// Scanner state: outside or inside a sentinel pair.
enum ScanState {
    Scanning,
    InReasoning,
}

/// Split `raw` into alternating `Answer`/`Reasoning` segments.
///
/// Sentinels do not nest; scanning is first-match greedy, so the first
/// closing tag always terminates a reasoning block.  Only complete pairs
/// split: an opening tag with no matching closing tag stays literal inside
/// the surrounding answer text (the degenerate case of a response with no
/// sentinels at all is a single `Answer` segment).
///
/// The output strictly alternates kinds starting with `Answer`; empty answer
/// segments are emitted where needed to preserve the alternation (e.g. for a
/// response that opens with `<think>`).
pub fn split_reasoning(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut state = ScanState::Scanning;
    let mut pos = 0usize;

    loop {
        match state {
            ScanState::Scanning => {
                let open = raw[pos..].find(THINK_OPEN).map(|rel| pos + rel);
                match open {
                    // Enter reasoning only when the pair is complete.
                    Some(open) if raw[open + THINK_OPEN.len()..].contains(THINK_CLOSE) => {
                        segments.push(Segment::answer(&raw[pos..open]));
                        pos = open + THINK_OPEN.len();
                        state = ScanState::InReasoning;
                    }
                    _ => {
                        segments.push(Segment::answer(&raw[pos..]));
                        break;
                    }
                }
            }
            ScanState::InReasoning => match raw[pos..].find(THINK_CLOSE) {
                Some(rel) => {
                    segments.push(Segment::reasoning(&raw[pos..pos + rel]));
                    pos += rel + THINK_CLOSE.len();
                    state = ScanState::Scanning;
                }
                // Unreachable: Scanning probes for the closing tag before
                // entering this state.  Degrade without dropping characters.
                None => {
                    segments.push(Segment::answer(&raw[pos..]));
                    break;
                }
            },
        }
    }

    segments
}

/// Inverse of [`split_reasoning`]: concatenate the segments, re-inserting the
/// sentinel pair around every reasoning segment.
pub fn rejoin(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg.kind {
            SegmentKind::Answer => out.push_str(&seg.text),
            SegmentKind::Reasoning => {
                out.push_str(THINK_OPEN);
                out.push_str(&seg.text);
                out.push_str(THINK_CLOSE);
            }
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[Segment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn plain_text_is_a_single_answer_segment() {
        let segs = split_reasoning("just an answer");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Answer);
        assert_eq!(segs[0].text, "just an answer");
    }

    #[test]
    fn leading_think_block_yields_empty_answer_then_reasoning_then_answer() {
        let segs = split_reasoning("<think>step one</think>final answer");
        assert_eq!(
            segs,
            vec![
                Segment::answer(""),
                Segment::reasoning("step one"),
                Segment::answer("final answer"),
            ]
        );
    }

    #[test]
    fn multiple_think_blocks_alternate_starting_with_answer() {
        let segs = split_reasoning("a<think>r1</think>b<think>r2</think>c");
        assert_eq!(
            kinds(&segs),
            vec![
                SegmentKind::Answer,
                SegmentKind::Reasoning,
                SegmentKind::Answer,
                SegmentKind::Reasoning,
                SegmentKind::Answer,
            ]
        );
        assert_eq!(segs[1].text, "r1");
        assert_eq!(segs[3].text, "r2");
    }

    #[test]
    fn unmatched_opening_tag_stays_literal_in_answer() {
        let raw = "before <think>never closed";
        let segs = split_reasoning(raw);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Answer);
        assert_eq!(segs[0].text, raw);
    }

    #[test]
    fn unmatched_opening_after_a_complete_pair_stays_literal() {
        let raw = "a<think>r</think>b<think>tail";
        let segs = split_reasoning(raw);
        assert_eq!(
            segs,
            vec![
                Segment::answer("a"),
                Segment::reasoning("r"),
                Segment::answer("b<think>tail"),
            ]
        );
    }

    #[test]
    fn nested_opening_tag_is_literal_reasoning_text() {
        // First closing tag wins; the inner opener carries no meaning.
        let segs = split_reasoning("<think>outer <think>inner</think>rest");
        assert_eq!(segs[1].kind, SegmentKind::Reasoning);
        assert_eq!(segs[1].text, "outer <think>inner");
        assert_eq!(segs[2].text, "rest");
    }

    #[test]
    fn trailing_close_produces_trailing_empty_answer() {
        let segs = split_reasoning("x<think>r</think>");
        assert_eq!(
            segs,
            vec![Segment::answer("x"), Segment::reasoning("r"), Segment::answer("")]
        );
    }

    #[test]
    fn stray_closing_tag_is_literal_answer_text() {
        let raw = "no opener</think> here";
        let segs = split_reasoning(raw);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, raw);
    }

    #[test]
    fn round_trip_reproduces_input_exactly() {
        let cases = [
            "",
            "plain",
            "<think>r</think>",
            "<think>a</think>mid<think>b</think>",
            "pre <think>multi\nline\nreasoning</think> post",
            "unmatched <think>tail",
            "stray</think>close",
            "a<think>x<think>y</think>z",
            "unicode 思考 <think>思考过程</think> 回答",
        ];
        for raw in cases {
            assert_eq!(rejoin(&split_reasoning(raw)), raw, "round trip failed for {raw:?}");
        }
    }

    #[test]
    fn segments_strictly_alternate_for_any_input() {
        let cases = ["a<think>b</think>c<think>d</think>", "<think>x</think><think>y</think>"];
        for raw in cases {
            let segs = split_reasoning(raw);
            assert_eq!(segs[0].kind, SegmentKind::Answer, "must start with Answer");
            for pair in segs.windows(2) {
                assert_ne!(pair[0].kind, pair[1].kind, "adjacent segments must differ in {raw:?}");
            }
        }
    }
}
