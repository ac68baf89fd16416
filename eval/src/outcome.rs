use serde::{Deserialize, Serialize};
use transduce::run::Comparison;

use crate::case::Expectation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// Fused and eager runs disagreed.
    Mismatch,
    Error,
}

/// Classify a completed comparison against the case expectations.
///
/// Returns the outcome and one message per unmet expectation.
pub fn classify_outcome(comparison: &Comparison, expect: &Expectation) -> (Outcome, Vec<String>) {
    if !comparison.outputs_match {
        return (
            Outcome::Mismatch,
            vec![format!(
                "fused produced {} elements, eager produced {}",
                comparison.fused.output.len(),
                comparison.eager.output.len()
            )],
        );
    }

    let mut failures = Vec::new();
    if let Some(expected) = &expect.output
        && *expected != comparison.fused.output
    {
        failures.push(format!(
            "output {:?} differs from expected {:?}",
            comparison.fused.output, expected
        ));
    }
    if let Some(max) = expect.max_traversals
        && comparison.fused.stats.traversals > max
    {
        failures.push(format!(
            "fused run took {} traversals, limit is {}",
            comparison.fused.stats.traversals, max
        ));
    }

    if failures.is_empty() {
        (Outcome::Pass, failures)
    } else {
        (Outcome::Fail, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transduce::plan::default_plan;
    use transduce::run::compare_plan;

    fn comparison() -> Comparison {
        let mut plan = default_plan();
        plan.take = Some(3);
        compare_plan(&plan)
    }

    #[test]
    fn pass_when_expectations_hold() {
        let expect = Expectation {
            output: Some(vec![9, 16, 36]),
            max_traversals: Some(1),
        };
        let (outcome, failures) = classify_outcome(&comparison(), &expect);
        assert_eq!(outcome, Outcome::Pass);
        assert!(failures.is_empty());
    }

    #[test]
    fn pass_without_expectations() {
        let (outcome, _) = classify_outcome(&comparison(), &Expectation::default());
        assert_eq!(outcome, Outcome::Pass);
    }

    #[test]
    fn fail_when_output_differs() {
        let expect = Expectation {
            output: Some(vec![9, 16]),
            max_traversals: None,
        };
        let (outcome, failures) = classify_outcome(&comparison(), &expect);
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn mismatch_wins_over_expectations() {
        let mut comparison = comparison();
        comparison.eager.output.pop();
        comparison.outputs_match = false;
        let (outcome, _) = classify_outcome(&comparison, &Expectation::default());
        assert_eq!(outcome, Outcome::Mismatch);
    }
}
