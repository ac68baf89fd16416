//! Plan execution for `transduce run` and `transduce compare`.

use std::cell::Cell;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::eager;
use crate::core::executor::execute;
use crate::core::reducer::{Reducer, append_at_most};
use crate::core::transducer::Transducer;
use crate::io::config::load_config;
use crate::io::init::TransducePaths;
use crate::io::plan_store::load_plan;
use crate::plan::{Plan, Stage};

/// How a plan is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// All stages fused into one traversal.
    Fused,
    /// One traversal per stage, materializing each intermediate sequence.
    Eager,
}

/// Work counters gathered while running a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Number of passes over a materialized sequence.
    pub traversals: usize,
    /// Elements read across all passes.
    pub elements_read: usize,
    /// Invocations per stage, indexed like `plan.stages`.
    pub stage_calls: Vec<usize>,
}

/// Output and counters of one plan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub plan: String,
    pub mode: ExecMode,
    pub output: Vec<i64>,
    pub stats: TraversalStats,
}

/// Fused and eager runs of the same plan side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub fused: RunReport,
    pub eager: RunReport,
    pub outputs_match: bool,
}

struct Probe {
    reads: Cell<usize>,
    calls: Vec<Cell<usize>>,
}

impl Probe {
    fn new(stages: usize) -> Self {
        Self {
            reads: Cell::new(0),
            calls: (0..stages).map(|_| Cell::new(0)).collect(),
        }
    }

    fn read(&self) {
        self.read_many(1);
    }

    fn read_many(&self, count: usize) {
        self.reads.set(self.reads.get() + count);
    }

    fn call(&self, stage: usize) {
        let counter = &self.calls[stage];
        counter.set(counter.get() + 1);
    }

    fn stage_calls(&self) -> Vec<usize> {
        self.calls.iter().map(Cell::get).collect()
    }
}

/// A plan whose per-element walk reports stage invocations to a probe.
#[derive(Clone, Copy)]
struct Probed<'a> {
    plan: &'a Plan,
    probe: &'a Probe,
}

impl Transducer<i64, i64> for Probed<'_> {
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, i64>
    where
        R: Reducer<Acc, i64>,
    {
        move |acc: Acc, item: i64| {
            self.probe.read();
            match self.plan.walk(item, &|index: usize| self.probe.call(index)) {
                Some(value) => reducer.step(acc, value),
                None => acc,
            }
        }
    }
}

/// Run `plan` in the requested mode.
#[instrument(skip_all, fields(plan = %plan.id, mode = ?mode))]
pub fn run_plan(plan: &Plan, mode: ExecMode) -> RunReport {
    let input = plan.input.values();
    let probe = Probe::new(plan.stages.len());
    let (output, traversals) = match mode {
        ExecMode::Fused => (run_fused(plan, &input, &probe), 1),
        ExecMode::Eager => run_eager(plan, &input, &probe),
    };
    let stats = TraversalStats {
        traversals,
        elements_read: probe.reads.get(),
        stage_calls: probe.stage_calls(),
    };
    debug!(
        traversals = stats.traversals,
        elements_read = stats.elements_read,
        output_len = output.len(),
        "plan executed"
    );
    RunReport {
        plan: plan.id.clone(),
        mode,
        output,
        stats,
    }
}

/// Fold the input once; `take` is enforced by the terminal reducer.
fn run_fused(plan: &Plan, input: &[i64], probe: &Probe) -> Vec<i64> {
    let probed = Probed { plan, probe };
    let limit = plan.take.unwrap_or(usize::MAX);
    let reducer = probed.transduce(append_at_most::<i64>(limit));
    execute(input.iter().copied(), reducer, Vec::new())
}

/// Materialize the sequence after every stage, then after `take`.
fn run_eager(plan: &Plan, input: &[i64], probe: &Probe) -> (Vec<i64>, usize) {
    let mut current = input.to_vec();
    let mut traversals = 0;
    for (index, stage) in plan.stages.iter().enumerate() {
        probe.read_many(current.len());
        current = match *stage {
            Stage::Map { function } => eager::map(|x: i64| {
                probe.call(index);
                function.apply(x)
            })(&current),
            Stage::Filter { predicate } => eager::filter(|x: &i64| {
                probe.call(index);
                predicate.test(x)
            })(&current),
        };
        traversals += 1;
    }
    if let Some(n) = plan.take {
        probe.read_many(current.len());
        current = eager::take(n)(&current);
        traversals += 1;
    }
    (current, traversals)
}

/// Run `plan` both ways and check the outputs agree element for element.
pub fn compare_plan(plan: &Plan) -> Comparison {
    let fused = run_plan(plan, ExecMode::Fused);
    let eager = run_plan(plan, ExecMode::Eager);
    let outputs_match = fused.output == eager.output;
    info!(
        plan = %plan.id,
        outputs_match,
        fused_reads = fused.stats.elements_read,
        eager_reads = eager.stats.elements_read,
        "compared fused and eager runs"
    );
    Comparison {
        fused,
        eager,
        outputs_match,
    }
}

/// Load config and plan from disk and run the plan.
///
/// `mode` overrides `default_mode` from the config.
pub fn run_from_root(root: &Path, mode: Option<ExecMode>) -> Result<RunReport> {
    let paths = TransducePaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config for run")?;
    let plan = load_plan(&paths.schema_path, &paths.plan_path, cfg.max_input_len)
        .context("load plan for run")?;
    Ok(run_plan(&plan, mode.unwrap_or(cfg.default_mode)))
}

/// Load config and plan from disk and compare both modes.
pub fn compare_from_root(root: &Path) -> Result<Comparison> {
    let paths = TransducePaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config for compare")?;
    let plan = load_plan(&paths.schema_path, &paths.plan_path, cfg.max_input_len)
        .context("load plan for compare")?;
    Ok(compare_plan(&plan))
}
