//! Initialization helpers for `.transduce/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::config::{TransduceConfig, write_config};
use super::plan_store::write_plan;
use crate::plan::default_plan;

pub const PLAN_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/plan/v1.schema.json"
));

/// All canonical paths within `.transduce/` for a project root.
#[derive(Debug, Clone)]
pub struct TransducePaths {
    pub root: PathBuf,
    pub state_dir: PathBuf,
    pub plan_path: PathBuf,
    pub schema_path: PathBuf,
    pub config_path: PathBuf,
}

impl TransducePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state_dir = root.join(".transduce");
        Self {
            root,
            plan_path: state_dir.join("plan.json"),
            schema_path: state_dir.join("schema.json"),
            config_path: state_dir.join("config.toml"),
            state_dir,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Overwrite existing files.
    pub force: bool,
}

/// Create `.transduce/` with the plan schema, a default plan and config.
///
/// Existing files are kept unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<TransducePaths> {
    let paths = TransducePaths::new(root);
    fs::create_dir_all(&paths.state_dir)
        .with_context(|| format!("create {}", paths.state_dir.display()))?;

    if options.force || !paths.schema_path.exists() {
        fs::write(&paths.schema_path, PLAN_SCHEMA)
            .with_context(|| format!("write {}", paths.schema_path.display()))?;
    }
    if options.force || !paths.plan_path.exists() {
        write_plan(&paths.plan_path, &default_plan())?;
    }
    if options.force || !paths.config_path.exists() {
        write_config(&paths.config_path, &TransduceConfig::default())?;
    }
    debug!(root = %root.display(), force = options.force, "workspace initialized");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;
    use crate::io::plan_store::load_plan;

    #[test]
    fn init_writes_loadable_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions::default()).expect("init");
        let cfg = load_config(&paths.config_path).expect("config");
        let plan = load_plan(&paths.schema_path, &paths.plan_path, cfg.max_input_len)
            .expect("plan");
        assert_eq!(plan, default_plan());
    }

    #[test]
    fn init_keeps_existing_plan_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions::default()).expect("init");
        fs::write(&paths.plan_path, "edited").expect("edit plan");

        init_workspace(temp.path(), &InitOptions::default()).expect("re-init");
        assert_eq!(fs::read_to_string(&paths.plan_path).expect("read"), "edited");

        init_workspace(temp.path(), &InitOptions { force: true }).expect("force init");
        assert_ne!(fs::read_to_string(&paths.plan_path).expect("read"), "edited");
    }
}
