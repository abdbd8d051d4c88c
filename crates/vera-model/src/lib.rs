// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod client;
mod mock;
mod types;

pub use client::{BackendError, ChatBackend, HttpBackend};
pub use mock::{MockBackend, ScriptedMockBackend};
pub use types::*;

use vera_config::BackendConfig;

/// Construct a boxed [`ChatBackend`] from configuration.
pub fn from_config(cfg: &BackendConfig) -> anyhow::Result<Box<dyn ChatBackend>> {
    Ok(Box::new(HttpBackend::new(
        &cfg.base_url,
        std::time::Duration::from_secs(cfg.timeout_secs),
    )?))
}
