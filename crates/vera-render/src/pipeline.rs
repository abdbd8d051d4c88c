// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The staged render pipeline.  A segment's text runs through the structural
//! parse and then a fixed chain of tree-to-tree stages:
//!
//! 1. parse        — markdown text to presentation tree
//! 2. math         — dollar-delimited TeX spans lifted out of text
//! 3. markup       — raw HTML fragments tokenized
//! 4. sanitize     — allow-list filter (skipped when unsafe HTML is allowed)
//! 5. decorate     — highlighting, slugs, typesetting, copy indices
//!
//! The stages themselves are total functions; every malformed construct
//! degrades to literal text inside its own stage.  Should one of them still
//! panic on hostile input, [`render`] catches the unwind and falls back to
//! showing the segment as plain text — one broken response must never take
//! the session view down with it.

use std::panic::{self, AssertUnwindSafe};

use tracing::{trace, warn};

use crate::stages::{parse_document, DecorateStage, MarkupStage, MathStage, SanitizeStage};
use crate::tree::{Block, Document, Inline};

/// Rendering options, owned by the caller and shared by all segments of a
/// message.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Skip the safety filter and splice raw markup untouched.  Off unless
    /// the operator opted in through configuration.
    pub allow_unsafe_html: bool,
}

/// One tree-to-tree transformation.
pub trait Stage {
    fn name(&self) -> &'static str;
    fn apply(&self, doc: Document, cfg: &PipelineConfig) -> Document;
}

fn stage_chain(cfg: &PipelineConfig) -> Vec<Box<dyn Stage>> {
    let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(MathStage), Box::new(MarkupStage)];
    if !cfg.allow_unsafe_html {
        stages.push(Box::new(SanitizeStage));
    }
    stages.push(Box::new(DecorateStage));
    stages
}

/// Render one answer segment through the full chain.
pub fn render(text: &str, cfg: &PipelineConfig) -> Document {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| render_inner(text, cfg)));
    match outcome {
        Ok(doc) => doc,
        Err(_) => {
            warn!("render pipeline panicked, degrading segment to literal text");
            literal_document(text)
        }
    }
}

/// Render a reasoning segment: structural parse only.  The collapsed region
/// shows structure but skips math, splicing and decoration.
pub fn render_reduced(text: &str) -> Document {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| parse_document(text)));
    match outcome {
        Ok(doc) => doc,
        Err(_) => {
            warn!("structural parse panicked, degrading segment to literal text");
            literal_document(text)
        }
    }
}

fn render_inner(text: &str, cfg: &PipelineConfig) -> Document {
    let mut doc = parse_document(text);
    for stage in stage_chain(cfg) {
        trace!(stage = stage.name(), "applying render stage");
        doc = stage.apply(doc, cfg);
    }
    doc
}

fn literal_document(text: &str) -> Document {
    Document {
        blocks: vec![Block::Paragraph(vec![Inline::Text(text.to_string())])],
    }
}
