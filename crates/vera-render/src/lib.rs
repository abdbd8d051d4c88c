// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The pure rendering core: response segmentation, JSON-literal detection,
//! the staged markdown→presentation-tree pipeline, and the code-copy
//! decorator.  Everything here is synchronous, reentrant, and free of UI
//! concerns; `vera-tui` maps the presentation tree onto the terminal.

pub mod decorator;
pub mod detect;
pub mod pipeline;
pub mod segment;
pub mod stages;
pub mod tree;

pub use decorator::{copy_payloads, decorate};
pub use detect::{looks_like_json, parse_json_literal};
pub use pipeline::{render, render_reduced, PipelineConfig, Stage};
pub use segment::{rejoin, split_reasoning, Segment, SegmentKind, THINK_CLOSE, THINK_OPEN};
pub use tree::{Block, Document, Inline};
