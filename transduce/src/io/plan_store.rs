//! Plan load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::plan::Plan;

/// Load and validate a plan from disk (schema + invariants).
pub fn load_plan(schema_path: &Path, plan_path: &Path, max_input_len: usize) -> Result<Plan> {
    let plan_contents = fs::read_to_string(plan_path)
        .with_context(|| format!("read plan {}", plan_path.display()))?;
    let schema_contents = fs::read_to_string(schema_path)
        .with_context(|| format!("read schema {}", schema_path.display()))?;
    let plan = parse_plan(&schema_contents, &plan_contents, max_input_len)
        .with_context(|| format!("load plan {}", plan_path.display()))?;
    debug!(plan = %plan.id, stages = plan.stages.len(), "plan loaded");
    Ok(plan)
}

/// Parse and validate plan JSON against `schema_raw` and the semantic
/// invariants.
pub fn parse_plan(schema_raw: &str, plan_raw: &str, max_input_len: usize) -> Result<Plan> {
    let plan_value: Value = serde_json::from_str(plan_raw).context("parse plan json")?;
    let schema_value: Value = serde_json::from_str(schema_raw).context("parse schema json")?;
    validate_schema(&schema_value, &plan_value)?;
    let plan: Plan = serde_json::from_value(plan_value).context("deserialize plan")?;
    let errors = validate_invariants(&plan, max_input_len);
    if !errors.is_empty() {
        return Err(anyhow!("plan invariants failed: {}", errors.join("; ")));
    }
    Ok(plan)
}

/// Write plan to disk as pretty-printed JSON with trailing newline.
pub fn write_plan(plan_path: &Path, plan: &Plan) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(plan).context("serialize plan")?;
    buf.push('\n');
    fs::write(plan_path, buf).with_context(|| format!("write plan {}", plan_path.display()))
}

fn validate_schema(schema: &Value, plan: &Value) -> Result<()> {
    let compiled = validator_for(schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(plan) {
        let messages = compiled
            .iter_errors(plan)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "plan schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::init::PLAN_SCHEMA;
    use crate::plan::default_plan;

    /// Verifies write → load round-trip preserves the plan.
    #[test]
    fn load_and_write_plan_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let schema_path = temp.path().join("schema.json");
        let plan_path = temp.path().join("plan.json");

        fs::write(&schema_path, PLAN_SCHEMA).expect("write schema");
        let mut plan = default_plan();
        plan.take = Some(7);
        write_plan(&plan_path, &plan).expect("write plan");

        let loaded = load_plan(&schema_path, &plan_path, 1_000).expect("load plan");
        assert_eq!(loaded, plan);
    }

    #[test]
    fn rejects_unknown_function_name() {
        let raw = r#"{
            "id": "bad",
            "input": {"start": 1, "end": 3},
            "stages": [{"kind": "map", "function": "cube"}]
        }"#;
        let err = parse_plan(PLAN_SCHEMA, raw, 1_000).expect_err("unknown function");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn rejects_missing_input() {
        let raw = r#"{"id": "bad", "stages": []}"#;
        let err = parse_plan(PLAN_SCHEMA, raw, 1_000).expect_err("missing input");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn reports_invariant_violations() {
        let raw = r#"{
            "id": "inverted",
            "input": {"start": 9, "end": 1},
            "stages": []
        }"#;
        let err = parse_plan(PLAN_SCHEMA, raw, 1_000).expect_err("inverted range");
        assert!(format!("{err:#}").contains("plan invariants failed"));
    }
}
