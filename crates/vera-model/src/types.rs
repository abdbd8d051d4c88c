// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The configured welcome greeting; always the oldest transcript entry.
    System,
    User,
    Assistant,
}

/// One transcript entry.  Assistant messages hold the raw response text,
/// sentinels included; segmentation and rendering happen at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ─── Wire format ──────────────────────────────────────────────────────────────

/// Request body for `POST /v1/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Response body for `POST /v1/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_types_match_the_backend_contract() {
        let req = serde_json::to_value(ChatRequest { query: "why is the sky blue".into() })
            .unwrap();
        assert_eq!(req, serde_json::json!({"query": "why is the sky blue"}));

        let resp: ChatResponse =
            serde_json::from_str(r#"{"response": "Rayleigh scattering."}"#).unwrap();
        assert_eq!(resp.response, "Rayleigh scattering.");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    }
}
