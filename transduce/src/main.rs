//! Fused map/filter pipelines over integer ranges.
//!
//! Manages a plan (`.transduce/plan.json`) describing an input range and a
//! list of catalogue stages, and runs it either fused (one traversal) or
//! eagerly (one traversal per stage).

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use transduce::exit_codes;
use transduce::io::config::load_config;
use transduce::io::init::{InitOptions, TransducePaths, init_workspace};
use transduce::io::plan_store::load_plan;
use transduce::run::{ExecMode, compare_from_root, run_from_root};

#[derive(Parser)]
#[command(
    name = "transduce",
    version,
    about = "Fused map/filter pipelines over integer ranges"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.transduce/` with schema, default plan and config if missing.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check the plan against schema and invariants.
    Validate,
    /// Run the plan and print the output with traversal counters as JSON.
    Run {
        /// Override `default_mode` from config.
        #[arg(long, value_enum)]
        mode: Option<ExecMode>,
    },
    /// Run the plan fused and eager; exit 2 when the outputs differ.
    Compare,
}

fn main() {
    transduce::logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = std::env::current_dir().context("resolve current directory")?;
    match cli.command {
        Command::Init { force } => cmd_init(&root, force),
        Command::Validate => cmd_validate(&root),
        Command::Run { mode } => cmd_run(&root, mode),
        Command::Compare => cmd_compare(&root),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_workspace(root, &InitOptions { force })?;
    println!("initialized {}", paths.state_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let paths = TransducePaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config.toml")?;
    let plan = load_plan(&paths.schema_path, &paths.plan_path, cfg.max_input_len)
        .context("load plan.json")?;
    let stages: Vec<String> = plan.stages.iter().map(|stage| stage.label()).collect();
    println!("valid: {} [{}]", plan.id, stages.join(" -> "));
    Ok(exit_codes::OK)
}

fn cmd_run(root: &Path, mode: Option<ExecMode>) -> Result<i32> {
    let report = run_from_root(root, mode)?;
    print_json(root, &report)?;
    Ok(exit_codes::OK)
}

fn cmd_compare(root: &Path) -> Result<i32> {
    let comparison = compare_from_root(root)?;
    print_json(root, &comparison)?;
    if comparison.outputs_match {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::MISMATCH)
    }
}

/// Serialize `value` to stdout, pretty-printed when config asks for it.
fn print_json<T: Serialize>(root: &Path, value: &T) -> Result<()> {
    let cfg = load_config(&TransducePaths::new(root).config_path)?;
    let payload = if cfg.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serialize json")?;
    println!("{payload}");
    Ok(())
}
