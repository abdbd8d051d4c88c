// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Thin clipboard wrapper.  The arboard context is created per copy because
//! holding it for the process lifetime keeps an X11 connection open that some
//! window managers treat as a selection owner.

use anyhow::{Context, Result};

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("opening system clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("writing to system clipboard")?;
    Ok(())
}
