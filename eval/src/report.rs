use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::outcome::Outcome;
use crate::results::{read_meta, read_stats};

#[derive(Debug, Default)]
pub struct ReportSummary {
    pub runs: usize,
    pub pass: usize,
    pub fail: usize,
    pub mismatch: usize,
    pub error: usize,
    pub avg_duration_secs: Option<f64>,
    pub avg_fused_traversals: Option<f64>,
    pub avg_eager_traversals: Option<f64>,
}

pub fn load_run_dirs(case_results_dir: &Path) -> Result<Vec<PathBuf>> {
    if !case_results_dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(case_results_dir)
        .with_context(|| format!("read {}", case_results_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub fn aggregate(case_results_dir: &Path) -> Result<(ReportSummary, Vec<String>)> {
    let mut summary = ReportSummary::default();
    let mut warnings = Vec::new();
    let mut durations = Vec::new();
    let mut fused_traversals = Vec::new();
    let mut eager_traversals = Vec::new();

    for run_dir in load_run_dirs(case_results_dir)? {
        let meta = match read_meta(&run_dir.join("meta.json")) {
            Ok(meta) => meta,
            Err(err) => {
                warnings.push(format!(
                    "skip {}: meta.json invalid ({err:#})",
                    run_dir.display()
                ));
                continue;
            }
        };

        summary.runs += 1;
        match meta.outcome {
            Outcome::Pass => summary.pass += 1,
            Outcome::Fail => summary.fail += 1,
            Outcome::Mismatch => summary.mismatch += 1,
            Outcome::Error => summary.error += 1,
        }
        durations.push(meta.duration_secs);

        let stats_path = run_dir.join("stats.json");
        if !stats_path.exists() {
            continue;
        }
        match read_stats(&stats_path) {
            Ok(stats) => {
                fused_traversals.push(stats.fused.traversals as f64);
                eager_traversals.push(stats.eager.traversals as f64);
            }
            Err(err) => warnings.push(format!(
                "{}: stats.json invalid ({err:#})",
                run_dir.display()
            )),
        }
    }

    summary.avg_duration_secs = mean(&durations);
    summary.avg_fused_traversals = mean(&fused_traversals);
    summary.avg_eager_traversals = mean(&eager_traversals);
    Ok((summary, warnings))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
