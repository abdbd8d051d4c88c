// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Background backend task and request/event channel types.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use vera_model::ChatBackend;

use crate::sessions::SessionId;

/// Request sent from the TUI to the background backend task.
#[derive(Debug)]
pub struct BackendRequest {
    pub session: SessionId,
    pub query: String,
}

/// Outcome forwarded back to the TUI, tagged with the session that asked so
/// late replies land in the right transcript.
#[derive(Debug)]
pub enum BackendEvent {
    Response { session: SessionId, text: String },
    Failure { session: SessionId, error: String },
}

/// Background task that owns the backend and answers requests one at a time.
/// Each session only ever has one request in flight (the store enforces it),
/// so a single worker is enough.
pub async fn backend_task(
    backend: Box<dyn ChatBackend>,
    mut rx: mpsc::Receiver<BackendRequest>,
    tx: mpsc::Sender<BackendEvent>,
) {
    while let Some(req) = rx.recv().await {
        debug!(query_len = req.query.len(), "backend task received query");
        let event = match backend.ask(&req.query).await {
            Ok(text) => BackendEvent::Response { session: req.session, text },
            Err(e) => {
                warn!(error = %e, "backend request failed");
                BackendEvent::Failure { session: req.session, error: e.to_string() }
            }
        };
        if tx.send(event).await.is_err() {
            // TUI is gone; stop the worker.
            return;
        }
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
