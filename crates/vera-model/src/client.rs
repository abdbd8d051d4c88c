// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The chat backend client.  One request per user turn: the full query goes
//! out as JSON, the full response comes back as JSON — no streaming.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{ChatRequest, ChatResponse};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection failures, timeouts, malformed response bodies.
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A chat backend answering one query at a time.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable backend name for status display.
    fn name(&self) -> &str;

    /// Send one query and wait for the complete answer.
    async fn ask(&self, query: &str) -> Result<String, BackendError>;
}

/// HTTP client for the `POST {base}/v1/chat` endpoint.
pub struct HttpBackend {
    client: reqwest::Client,
    chat_url: String,
}

impl HttpBackend {
    /// `timeout` covers the whole request, connect included.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let chat_url = format!("{}/v1/chat", base_url.trim_end_matches('/'));
        Ok(Self { client, chat_url })
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, query: &str) -> Result<String, BackendError> {
        debug!(url = %self.chat_url, "sending chat request");
        let resp = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequest { query: query.to_string() })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body: ChatResponse = resp.json().await?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_joined_without_double_slash() {
        let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(30)).unwrap();
        assert_eq!(backend.chat_url, "http://localhost:8080/v1/chat");

        let backend = HttpBackend::new("http://localhost:8080", Duration::from_secs(30)).unwrap();
        assert_eq!(backend.chat_url, "http://localhost:8080/v1/chat");
    }
}
