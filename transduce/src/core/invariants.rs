//! Semantic plan invariants checked after schema validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::plan::Plan;

static PLAN_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap_or_else(|err| panic!("plan id pattern: {err}"))
});

/// Check semantic plan invariants:
/// - Plan id is a slug (`[a-z0-9][a-z0-9_-]*`)
/// - `input.start <= input.end`
/// - Input length does not exceed `max_input_len`
pub fn validate_invariants(plan: &Plan, max_input_len: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if !PLAN_ID.is_match(&plan.id) {
        errors.push(format!(
            "id '{}' must match [a-z0-9][a-z0-9_-]*",
            plan.id
        ));
    }

    if plan.input.start > plan.input.end {
        errors.push(format!(
            "input.start {} exceeds input.end {}",
            plan.input.start, plan.input.end
        ));
    } else if plan.input.len() > max_input_len {
        errors.push(format!(
            "input has {} elements, limit is {}",
            plan.input.len(),
            max_input_len
        ));
    }

    errors
}
