/// Integration tests for the chat flow using the mock backend.
use vera_config::Config;
use vera_model::{ChatBackend, Role, ScriptedMockBackend};
use vera_render::{render, split_reasoning, PipelineConfig, SegmentKind};
use vera_tui::{ChatStore, StoreState, SubmitError};

#[tokio::test]
async fn submit_ask_resolve_roundtrip() {
    let config = Config::default();
    let backend = ScriptedMockBackend::new(vec![
        "<think>牛顿第二定律</think>F = ma".to_string(),
    ]);
    let mut store = ChatStore::new(&config.chat.welcome, &config.chat.error_notice);

    let query = store.submit("什么是力?").unwrap();
    assert_eq!(store.state(), StoreState::Pending);

    let response = backend.ask(&query).await.unwrap();
    store.resolve(response);

    assert_eq!(store.state(), StoreState::Idle);
    let last = store.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);

    let segments = split_reasoning(&last.content);
    assert_eq!(segments.len(), 3, "empty leading answer, reasoning, answer");
    assert_eq!(segments[1].kind, SegmentKind::Reasoning);
    assert_eq!(segments[1].text, "牛顿第二定律");
    assert_eq!(segments[2].text, "F = ma");
}

#[tokio::test]
async fn failed_request_surfaces_the_error_notice() {
    let config = Config::default();
    let mut store = ChatStore::new(&config.chat.welcome, &config.chat.error_notice);

    store.submit("hello").unwrap();
    assert_eq!(store.submit("again"), Err(SubmitError::Busy));

    store.fail();
    let last = store.messages().last().unwrap();
    assert_eq!(last.content, config.chat.error_notice);
    assert_eq!(store.state(), StoreState::Idle, "a failure must unblock submits");
}

#[test]
fn config_defaults_are_valid() {
    let cfg = Config::default();
    assert_eq!(cfg.backend.base_url, "http://localhost:8080");
    assert_eq!(cfg.backend.timeout_secs, 30);
    assert!(cfg.chat.welcome.contains("Physics-LLM"));
    assert_eq!(cfg.chat.default_session_name, "默认聊天");
    assert!(!cfg.render.allow_unsafe_html);
}

#[test]
fn config_file_layers_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[backend]\nbase_url = \"http://physics.example:9000\"\n",
    )
    .unwrap();

    let cfg = vera_config::load(Some(&path)).unwrap();
    assert_eq!(cfg.backend.base_url, "http://physics.example:9000");
    // Untouched sections keep their defaults.
    assert_eq!(cfg.backend.timeout_secs, 30);
    assert_eq!(cfg.chat.default_session_name, "默认聊天");
}

#[test]
fn hostile_markup_in_a_response_is_neutralized() {
    let doc = render(
        "safe text <script>alert(1)</script> more",
        &PipelineConfig::default(),
    );
    let flat = format!("{doc:?}");
    assert!(!flat.contains("alert(1)"));
    assert!(flat.contains("safe text"));
}

#[test]
fn welcome_message_renders_without_markup() {
    let cfg = Config::default();
    let doc = render(&cfg.chat.welcome, &PipelineConfig::default());
    assert!(!doc.blocks.is_empty());
}
