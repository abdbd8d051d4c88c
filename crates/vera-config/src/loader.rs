// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest
/// priority.  Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/vera/config.toml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/vera/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("vera/config.toml"));
    }

    // 3. Workspace-local
    paths.push(PathBuf::from(".vera/config.toml"));
    paths.push(PathBuf::from("vera.toml"));

    paths
}

/// Load configuration by merging all discovered TOML files.  The `extra`
/// argument may provide an explicit path (e.g. `--config` CLI flag); unlike
/// the search paths, an explicit path that does not exist is an error.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            merge_toml(&mut merged, read_layer(&path)?);
        }
    }

    if let Some(path) = extra {
        debug!(path = %path.display(), "loading explicit config");
        merge_toml(&mut merged, read_layer(path)?);
    }

    let config: Config = merged
        .try_into()
        .context("invalid configuration values")?;
    Ok(config)
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::map::Map::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn val(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val(r#"x = 1"#);
        let src = val(r#"x = 2"#);
        merge_toml(&mut dst, src);
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_preserves_keys_not_in_src() {
        let mut dst = val("a = 1\nb = 2");
        let src = val(r#"b = 99"#);
        merge_toml(&mut dst, src);
        assert_eq!(dst["a"].as_integer(), Some(1));
        assert_eq!(dst["b"].as_integer(), Some(99));
    }

    #[test]
    fn merge_nested_tables() {
        let mut dst = val("[backend]\nbase_url = \"http://a\"\ntimeout_secs = 30");
        let src = val("[backend]\ntimeout_secs = 5");
        merge_toml(&mut dst, src);
        assert_eq!(dst["backend"]["base_url"].as_str(), Some("http://a"));
        assert_eq!(dst["backend"]["timeout_secs"].as_integer(), Some(5));
    }

    #[test]
    fn load_fails_on_missing_explicit_path() {
        let result = load(Some(Path::new("/tmp/vera_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "[backend]\nbase_url = \"http://127.0.0.1:9999\"\n\n[render]\nallow_unsafe_html = true"
        )
        .unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:9999");
        assert!(cfg.render.allow_unsafe_html);
        assert_eq!(cfg.backend.timeout_secs, 30, "untouched keys keep defaults");
    }
}
