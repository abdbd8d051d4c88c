// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub tui: TuiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat backend.  The client appends `/v1/chat`.
    #[serde(default = "BackendConfig::default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "BackendConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    fn default_base_url() -> String {
        "http://localhost:8080".into()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Greeting seeded as the first message of every session.
    #[serde(default = "ChatConfig::default_welcome")]
    pub welcome: String,
    /// Notice appended to the transcript when a request fails.
    #[serde(default = "ChatConfig::default_error_notice")]
    pub error_notice: String,
    /// Name of the session created on first start.
    #[serde(default = "ChatConfig::default_session_name")]
    pub default_session_name: String,
}

impl ChatConfig {
    fn default_welcome() -> String {
        "欢迎使用天津城建大学理学院物理研究社所研发的 Physics-LLM v0.0.1，您可以问我任何物理问题。"
            .into()
    }
    fn default_error_notice() -> String {
        "❗️ 发生错误，请稍后重试。".into()
    }
    fn default_session_name() -> String {
        "默认聊天".into()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome: Self::default_welcome(),
            error_notice: Self::default_error_notice(),
            default_session_name: Self::default_session_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Splice raw HTML fragments without the safety filter.  Off by default;
    /// only enable for trusted backends.
    #[serde(default)]
    pub allow_unsafe_html: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Use plain ASCII borders/indicators instead of Unicode box-drawing.
    /// Enable when the terminal font lacks wide Unicode support.
    #[serde(default)]
    pub ascii_borders: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file path; None disables file logging.  The terminal is owned by
    /// the TUI, so logs never go to stderr while it runs.
    #[serde(default)]
    pub file: Option<String>,
    /// Default tracing filter, overridable with VERA_LOG.
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl LogConfig {
    fn default_filter() -> String {
        "info".into()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: Self::default_filter(),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
