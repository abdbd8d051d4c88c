// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{BackendError, ChatBackend};

/// Deterministic mock backend for tests.  Echoes the query back.
#[derive(Default)]
pub struct MockBackend;

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn ask(&self, query: &str) -> Result<String, BackendError> {
        Ok(format!("MOCK: {query}"))
    }
}

/// A pre-scripted mock backend.  Each call to `ask` pops the next response
/// from the front of the queue; an exhausted queue answers with the echo.
pub struct ScriptedMockBackend {
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl ScriptedMockBackend {
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(Into::into).collect(),
            )),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedMockBackend {
    fn name(&self) -> &str {
        "scripted-mock"
    }

    async fn ask(&self, query: &str) -> Result<String, BackendError> {
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front());
        Ok(next.unwrap_or_else(|| format!("MOCK: {query}")))
    }
}
