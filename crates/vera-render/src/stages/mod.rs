// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The pipeline stages, in execution order: structural parse, math
//! extraction, raw-markup splice, safety filtering, and decoration.

pub mod decorate;
pub mod markup;
pub mod math;
pub mod parse;
pub mod sanitize;
pub mod tex;

pub use decorate::DecorateStage;
pub use markup::MarkupStage;
pub use math::MathStage;
pub use parse::parse_document;
pub use sanitize::SanitizeStage;
