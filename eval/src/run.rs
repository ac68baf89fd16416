//! Case execution orchestration.
//!
//! Validates the case plan, runs it fused and eager, classifies the outcome
//! and captures results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, instrument, warn};
use transduce::io::init::PLAN_SCHEMA;
use transduce::io::plan_store::parse_plan;
use transduce::plan::Plan;
use transduce::run::{Comparison, compare_plan};

use crate::case::CaseFile;
use crate::config::apply_case_config;
use crate::outcome::{Outcome, classify_outcome};
use crate::results::{CaptureInput, capture_results};

/// Result of running a single case.
#[derive(Debug)]
pub struct RunOutcome {
    /// Unique identifier for this eval run.
    pub eval_run_id: String,
    /// Path to the results directory.
    pub results_dir: PathBuf,
    /// Classified outcome.
    pub outcome: Outcome,
}

/// In-memory verdict for a case, before anything is written.
#[derive(Debug)]
pub struct Evaluation {
    pub plan: Option<Plan>,
    pub comparison: Option<Comparison>,
    pub outcome: Outcome,
    pub failures: Vec<String>,
}

/// Validate the case plan with the case config and compare both modes.
///
/// A plan that fails schema or invariant checks yields `Outcome::Error`
/// with the validation message as its only failure.
pub fn evaluate(case: &CaseFile) -> Result<Evaluation> {
    let cfg = apply_case_config(Default::default(), &case.config)?;
    let plan_raw = serde_json::to_string(&case.plan).context("serialize case plan")?;
    let plan = match parse_plan(PLAN_SCHEMA, &plan_raw, cfg.max_input_len) {
        Ok(plan) => plan,
        Err(err) => {
            warn!(case_id = %case.case.id, error = %format!("{err:#}"), "case plan rejected");
            return Ok(Evaluation {
                plan: None,
                comparison: None,
                outcome: Outcome::Error,
                failures: vec![format!("{err:#}")],
            });
        }
    };

    let comparison = compare_plan(&plan);
    let (outcome, failures) = classify_outcome(&comparison, &case.expect);
    Ok(Evaluation {
        plan: Some(plan),
        comparison: Some(comparison),
        outcome,
        failures,
    })
}

/// Run a case end-to-end: evaluation, classification, result capture.
#[instrument(skip_all, fields(case_id = %case.case.id))]
pub fn run_case(repo_root: &Path, case_path: &Path, case: &CaseFile) -> Result<RunOutcome> {
    info!("case run started");

    let started_at = Utc::now();
    let eval_run_id = new_eval_run_id(started_at);
    let evaluation = evaluate(case)?;
    let finished_at = Utc::now();
    debug!(outcome = ?evaluation.outcome, "case evaluated");

    let capture_input = CaptureInput {
        case_id: &case.case.id,
        case_path,
        eval_run_id: &eval_run_id,
        plan_id: evaluation.plan.as_ref().map(|plan| plan.id.as_str()),
        outcome: evaluation.outcome,
        failures: &evaluation.failures,
        comparison: evaluation.comparison.as_ref(),
        started_at,
        finished_at,
    };
    let results_dir = capture_results(&repo_root.join("eval").join("results"), &capture_input)
        .context("capture results")?;

    info!(outcome = ?evaluation.outcome, results_dir = %results_dir.display(), "case run complete");

    Ok(RunOutcome {
        eval_run_id,
        results_dir,
        outcome: evaluation.outcome,
    })
}

/// `eval-<timestamp>-<hex>`; the random suffix keeps runs within one second
/// apart.
fn new_eval_run_id(at: chrono::DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().r#gen();
    format!("eval-{}-{:04x}", at.format("%Y%m%d_%H%M%S"), suffix)
}
