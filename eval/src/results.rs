//! Result capture and persistence.
//!
//! Each eval run gets its own directory holding `meta.json` and, when the
//! plan ran, `stats.json` with the traversal counters of both modes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};
use transduce::run::{Comparison, TraversalStats};

use crate::outcome::Outcome;

/// Input for capturing results from a completed run.
#[derive(Debug)]
pub struct CaptureInput<'a> {
    pub case_id: &'a str,
    pub case_path: &'a Path,
    pub eval_run_id: &'a str,
    pub plan_id: Option<&'a str>,
    pub outcome: Outcome,
    pub failures: &'a [String],
    pub comparison: Option<&'a Comparison>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Metadata for an eval run, persisted to `meta.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvalMeta {
    pub case_id: String,
    pub eval_run_id: String,
    /// SHA-256 hash of the case file for reproducibility tracking.
    pub case_hash: String,
    pub plan_id: Option<String>,
    pub outcome: Outcome,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    /// Unmet expectations, or the load error for `error` outcomes.
    pub failures: Vec<String>,
    /// Non-fatal errors encountered during capture.
    pub errors: Vec<String>,
}

/// Traversal counters of both modes, persisted to `stats.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub output_len: usize,
    pub outputs_match: bool,
    pub fused: TraversalStats,
    pub eager: TraversalStats,
}

impl RunStats {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        Self {
            output_len: comparison.fused.output.len(),
            outputs_match: comparison.outputs_match,
            fused: comparison.fused.stats.clone(),
            eager: comparison.eager.stats.clone(),
        }
    }
}

/// Write `meta.json` (and `stats.json` when a comparison exists) for a run.
#[instrument(skip_all, fields(case_id = %input.case_id, eval_run_id = %input.eval_run_id))]
pub fn capture_results(base_dir: &Path, input: &CaptureInput<'_>) -> Result<PathBuf> {
    let results_dir = results_dir(base_dir, input.case_id, input.eval_run_id);
    fs::create_dir_all(&results_dir)
        .with_context(|| format!("create results dir {}", results_dir.display()))?;

    let mut errors = Vec::new();

    let case_hash = match file_sha256(input.case_path) {
        Ok(hash) => hash,
        Err(err) => {
            errors.push(format!("case hash: {err}"));
            String::new()
        }
    };

    if let Some(comparison) = input.comparison {
        write_json(
            &results_dir.join("stats.json"),
            &RunStats::from_comparison(comparison),
        )?;
    }

    if !errors.is_empty() {
        warn!(errors = ?errors, "result capture had errors");
    }

    let duration = input.finished_at - input.started_at;
    let meta = EvalMeta {
        case_id: input.case_id.to_string(),
        eval_run_id: input.eval_run_id.to_string(),
        case_hash,
        plan_id: input.plan_id.map(str::to_string),
        outcome: input.outcome,
        start_time: input.started_at.to_rfc3339(),
        end_time: input.finished_at.to_rfc3339(),
        duration_secs: duration.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0,
        failures: input.failures.to_vec(),
        errors,
    };

    write_json(&results_dir.join("meta.json"), &meta)?;
    debug!(results_dir = %results_dir.display(), "results captured");
    Ok(results_dir)
}

pub fn results_dir(base_dir: &Path, case_id: &str, eval_run_id: &str) -> PathBuf {
    base_dir.join(case_id).join(eval_run_id)
}

pub fn read_meta(path: &Path) -> Result<EvalMeta> {
    read_json(path)
}

pub fn read_stats(path: &Path) -> Result<RunStats> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, format!("{contents}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}
