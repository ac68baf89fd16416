//! Test-only helpers for constructing plans and scratch workspaces.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::catalog::{MapFn, Predicate};
use crate::io::config::{TransduceConfig, write_config};
use crate::io::init::{InitOptions, TransducePaths, init_workspace};
use crate::io::plan_store::write_plan;
use crate::plan::{InputRange, Plan, Stage};

/// Create a plan with a fixed id and no `take` limit.
pub fn plan_with(input: InputRange, stages: Vec<Stage>) -> Plan {
    Plan {
        id: "test-plan".to_string(),
        input,
        stages,
        take: None,
    }
}

pub fn map_stage(function: MapFn) -> Stage {
    Stage::Map { function }
}

pub fn filter_stage(predicate: Predicate) -> Stage {
    Stage::Filter { predicate }
}

/// Scratch project root with an initialized `.transduce/` directory.
pub struct TestWorkspace {
    dir: tempfile::TempDir,
    pub paths: TransducePaths,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp workspace")?;
        let paths = init_workspace(dir.path(), &InitOptions::default())?;
        Ok(Self { dir, paths })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_plan(&self, plan: &Plan) -> Result<()> {
        write_plan(&self.paths.plan_path, plan)
    }

    pub fn write_config(&self, cfg: &TransduceConfig) -> Result<()> {
        write_config(&self.paths.config_path, cfg)
    }
}
