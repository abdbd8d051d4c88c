// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Stage 4: safety filter.  Runs over the token streams produced by the
//! splice stage and removes everything not on the allow list.
//!
//! Three rules, applied in order: a small set of container elements is
//! dropped together with its content; unknown elements lose their tags but
//! keep their text; surviving tags keep only allow-listed attributes, with
//! event handlers and script-bearing URL schemes removed.  The filter never
//! fails — hostile input just comes out smaller.

use crate::pipeline::{PipelineConfig, Stage};
use crate::tree::{self, Block, Document, Inline, MarkupTag, MarkupToken};

pub struct SanitizeStage;

impl Stage for SanitizeStage {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    fn apply(&self, mut doc: Document, _cfg: &PipelineConfig) -> Document {
        tree::for_each_block_mut(&mut doc, &mut |block| {
            if let Block::Markup(frag) = block {
                frag.tokens = sanitize_tokens(std::mem::take(&mut frag.tokens));
            }
        });
        tree::for_each_inline_run_mut(&mut doc, &mut sanitize_run);
        doc
    }
}

/// Sanitize an inline run.  Inline tags arrive as one fragment per tag, so a
/// `<script>…</script>` pair brackets ordinary sibling nodes; the drop state
/// has to carry across the run to take the bracketed content with it.
fn sanitize_run(run: &mut Vec<Inline>) {
    let mut dropping: Option<(String, usize)> = None;
    let kept = std::mem::take(run)
        .into_iter()
        .filter_map(|inline| match inline {
            Inline::Markup(mut frag) => {
                frag.tokens = sanitize_with_state(std::mem::take(&mut frag.tokens), &mut dropping);
                Some(Inline::Markup(frag))
            }
            mut other => {
                if dropping.is_some() {
                    return None;
                }
                // Containers hold their own runs; a pair cannot straddle the
                // container boundary, so each nests a fresh state.
                match &mut other {
                    Inline::Emph(c) | Inline::Strong(c) | Inline::Strike(c)
                    | Inline::Link { content: c, .. } => sanitize_run(c),
                    _ => {}
                }
                Some(other)
            }
        })
        .collect();
    *run = kept;
}

/// Elements whose content is dropped along with the tags.
const DROP_WITH_CONTENT: &[&str] = &["embed", "iframe", "object", "script", "style"];

/// Elements allowed to survive; everything else is stripped to its text.
const ALLOWED: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "dd", "del", "details", "div", "dl",
    "dt", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "ins", "kbd",
    "li", "mark", "ol", "p", "pre", "s", "small", "span", "strong", "sub", "summary",
    "sup", "table", "tbody", "td", "th", "thead", "tr", "u", "ul",
];

const ALLOWED_ATTRS: &[&str] = &[
    "alt", "class", "colspan", "height", "href", "id", "rowspan", "src", "title", "width",
];

/// Scheme check on a lowercased copy with whitespace and control characters
/// removed, so `java\tscript:` does not slip through.
fn safe_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !(compact.starts_with("javascript:")
        || compact.starts_with("vbscript:")
        || compact.starts_with("data:"))
}

fn scrub_attrs(mut tag: MarkupTag) -> MarkupTag {
    tag.attrs.retain(|(name, value)| {
        if name.starts_with("on") || !ALLOWED_ATTRS.contains(&name.as_str()) {
            return false;
        }
        if matches!(name.as_str(), "href" | "src") {
            return value.as_deref().is_none_or(safe_url);
        }
        true
    });
    tag
}

pub fn sanitize_tokens(tokens: Vec<MarkupToken>) -> Vec<MarkupToken> {
    let mut dropping = None;
    sanitize_with_state(tokens, &mut dropping)
}

/// Core filter.  `dropping` holds the open dropped element and its nesting
/// depth; threading it through lets callers span one drop across several
/// fragments in an inline run.
fn sanitize_with_state(
    tokens: Vec<MarkupToken>,
    dropping: &mut Option<(String, usize)>,
) -> Vec<MarkupToken> {
    let mut out = Vec::new();

    for token in tokens {
        match token {
            MarkupToken::Tag(tag) => {
                if let Some((name, depth)) = dropping.as_mut() {
                    if tag.name == *name && !tag.self_closing {
                        if tag.closing {
                            if *depth == 0 {
                                *dropping = None;
                            } else {
                                *depth -= 1;
                            }
                        } else {
                            *depth += 1;
                        }
                    }
                    continue;
                }
                if DROP_WITH_CONTENT.contains(&tag.name.as_str()) {
                    if !tag.closing && !tag.self_closing {
                        *dropping = Some((tag.name.clone(), 0));
                    }
                    continue;
                }
                if !ALLOWED.contains(&tag.name.as_str()) {
                    continue;
                }
                out.push(MarkupToken::Tag(scrub_attrs(tag)));
            }
            MarkupToken::Text(text) => {
                if dropping.is_none() {
                    out.push(MarkupToken::Text(text));
                }
            }
        }
    }

    out
}
