// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod app;
mod backend;
mod clipboard;
mod keys;
mod layout;
mod sessions;
mod store;
mod view;
mod widgets;

pub use app::{App, AppOptions};
pub use store::{ChatStore, StoreState, SubmitError};
