//! Data-driven `i64` pipelines stored in `.transduce/plan.json`.

use serde::{Deserialize, Serialize};

use crate::core::catalog::{MapFn, Predicate};
use crate::core::reducer::{Reducer, append_at_most};
use crate::core::transducer::Transducer;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub id: String,
    pub input: InputRange,
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<usize>,
}

/// Inclusive integer range fed into the pipeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    Map { function: MapFn },
    Filter { predicate: Predicate },
}

impl Stage {
    /// Run one element through this stage; `None` means it was filtered out.
    pub fn apply(&self, value: i64) -> Option<i64> {
        match self {
            Stage::Map { function } => Some(function.apply(value)),
            Stage::Filter { predicate } => predicate.test(&value).then_some(value),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Stage::Map { function } => format!("map({})", function.name()),
            Stage::Filter { predicate } => format!("filter({})", predicate.name()),
        }
    }
}

impl InputRange {
    /// Number of elements in the range; zero when `start > end`.
    pub fn len(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        (self.end as i128 - self.start as i128 + 1)
            .try_into()
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<i64> {
        (self.start..=self.end).collect()
    }
}

impl Plan {
    /// Pass `value` through every stage in order, reporting each stage index
    /// that sees the element to `observe`.
    ///
    /// Stops at the first filter that rejects the element.
    pub fn walk(&self, value: i64, observe: &dyn Fn(usize)) -> Option<i64> {
        self.stages
            .iter()
            .enumerate()
            .try_fold(value, |current, (index, stage)| {
                observe(index);
                stage.apply(current)
            })
    }

    /// Stages fused in front of an `append` that stops after `take` elements.
    pub fn reducer(&self) -> impl Reducer<Vec<i64>, i64> + '_ {
        let limit = self.take.unwrap_or(usize::MAX);
        self.transduce(append_at_most::<i64>(limit))
    }
}

/// The whole stage list fused into one per-element walk.
///
/// `take` is not a stage: it bounds the terminal reducer instead, see
/// [`Plan::reducer`].
impl Transducer<i64, i64> for &Plan {
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, i64>
    where
        R: Reducer<Acc, i64>,
    {
        move |acc: Acc, item: i64| match self.walk(item, &|_: usize| {}) {
            Some(value) => reducer.step(acc, value),
            None => acc,
        }
    }
}

/// `1..=100 |> filter(is_prime) |> map(incr) |> map(square)`.
pub fn default_plan() -> Plan {
    Plan {
        id: "primes-incr-square".to_string(),
        input: InputRange { start: 1, end: 100 },
        stages: vec![
            Stage::Filter {
                predicate: Predicate::IsPrime,
            },
            Stage::Map {
                function: MapFn::Incr,
            },
            Stage::Map {
                function: MapFn::Square,
            },
        ],
        take: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::{execute, into_vec};

    #[test]
    fn default_plan_squares_successors_of_primes() {
        let plan = default_plan();
        let output = into_vec(plan.input.values(), &plan);
        assert_eq!(output.len(), 25);
        assert_eq!(&output[..4], &[9, 16, 36, 64]);
        assert_eq!(output.last(), Some(&(98 * 98)));
    }

    #[test]
    fn reducer_applies_take_but_transducer_does_not() {
        let mut plan = default_plan();
        plan.take = Some(3);
        let bounded = execute(plan.input.values(), plan.reducer(), Vec::new());
        assert_eq!(bounded, vec![9, 16, 36]);
        assert_eq!(into_vec(plan.input.values(), &plan).len(), 25);

        plan.take = None;
        let unbounded = execute(plan.input.values(), plan.reducer(), Vec::new());
        assert_eq!(unbounded.len(), 25);
    }

    #[test]
    fn walk_stops_at_rejecting_filter() {
        let plan = default_plan();
        let seen = std::cell::RefCell::new(Vec::new());
        let result = plan.walk(4, &|index: usize| seen.borrow_mut().push(index));
        assert_eq!(result, None);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn stages_serialize_with_kind_tag() {
        let stage = Stage::Map {
            function: MapFn::Square,
        };
        let json = serde_json::to_value(stage).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"kind": "map", "function": "square"})
        );
    }

    #[test]
    fn input_range_len_handles_inverted_and_extreme_bounds() {
        assert_eq!(InputRange { start: 3, end: 1 }.len(), 0);
        assert_eq!(InputRange { start: 1, end: 1 }.len(), 1);
        let full = InputRange {
            start: i64::MIN,
            end: i64::MAX,
        };
        assert_eq!(full.len(), usize::MAX);
    }
}
