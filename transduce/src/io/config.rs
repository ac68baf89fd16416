//! Runtime configuration stored under `.transduce/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::run::ExecMode;

/// Transduce configuration (TOML).
///
/// Missing fields default to the values in [`TransduceConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransduceConfig {
    /// Mode used by `transduce run` when `--mode` is not given.
    pub default_mode: ExecMode,

    /// Upper bound on the number of input elements a plan may request.
    pub max_input_len: usize,

    /// Pretty-print JSON written to stdout.
    pub pretty: bool,
}

impl Default for TransduceConfig {
    fn default() -> Self {
        Self {
            default_mode: ExecMode::Fused,
            max_input_len: 1_000_000,
            pretty: true,
        }
    }
}

impl TransduceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_input_len == 0 {
            return Err(anyhow!("max_input_len must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TransduceConfig::default()`.
pub fn load_config(path: &Path) -> Result<TransduceConfig> {
    if !path.exists() {
        let cfg = TransduceConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TransduceConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &TransduceConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, TransduceConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let cfg = TransduceConfig {
            default_mode: ExecMode::Eager,
            max_input_len: 50,
            pretty: false,
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_mode = \"eager\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.default_mode, ExecMode::Eager);
        assert_eq!(cfg.max_input_len, TransduceConfig::default().max_input_len);
    }

    #[test]
    fn rejects_zero_input_limit() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "max_input_len = 0\n").expect("write");
        let err = load_config(&path).expect_err("invalid config");
        assert!(err.to_string().contains("max_input_len"));
    }
}
