//! The fold-step abstraction and the canonical terminal reducers.
//!
//! A reducer combines an accumulator with one element into a new
//! accumulator. Every plain `Fn(Acc, T) -> Acc` is a reducer, so closures and
//! function items can be handed to the executor directly.

use std::ops::Add;

/// Binary fold step: `(Acc, T) -> Acc`.
///
/// Implementations are assumed to be pure. Nothing enforces it, but fusion
/// only preserves meaning when they are.
pub trait Reducer<Acc, T> {
    fn step(&self, acc: Acc, item: T) -> Acc;
}

impl<Acc, T, F> Reducer<Acc, T> for F
where
    F: Fn(Acc, T) -> Acc,
{
    #[inline]
    fn step(&self, acc: Acc, item: T) -> Acc {
        self(acc, item)
    }
}

/// Append `item` to the end of `acc`.
///
/// The vector is moved in and moved out, so no other owner can observe the
/// push: callers get copy-on-append semantics with amortized O(1) cost.
#[inline]
pub fn append<T>(mut acc: Vec<T>, item: T) -> Vec<T> {
    acc.push(item);
    acc
}

/// [`append`] gated on the number of elements already emitted.
///
/// Once `acc` holds `limit` elements, later items leave it unchanged.
pub fn append_at_most<T>(limit: usize) -> impl Fn(Vec<T>, T) -> Vec<T> + Copy {
    move |acc: Vec<T>, item: T| {
        if acc.len() < limit {
            append(acc, item)
        } else {
            acc
        }
    }
}

/// Numeric terminal: running total.
#[inline]
pub fn sum<T: Add<Output = T>>(acc: T, item: T) -> T {
    acc + item
}

/// Terminal that ignores elements and counts them.
#[inline]
pub fn count<T>(acc: usize, _item: T) -> usize {
    acc + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_and_functions_are_reducers() {
        let max = |acc: i64, item: i64| acc.max(item);
        assert_eq!(max.step(3, 9), 9);
        assert_eq!(sum::<i64>.step(2, 5), 7);
        assert_eq!(count::<&str>.step(4, "ignored"), 5);
    }

    #[test]
    fn append_preserves_existing_order() {
        let acc = append(vec![1, 2], 3);
        assert_eq!(append(acc, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn append_leaves_cloned_original_untouched() {
        let original = vec!["a"];
        let extended = append(original.clone(), "b");
        assert_eq!(original, vec!["a"]);
        assert_eq!(extended, vec!["a", "b"]);
    }

    #[test]
    fn append_at_most_stops_at_emitted_count() {
        let bounded = append_at_most(2);
        let acc = bounded(Vec::new(), 'x');
        let acc = bounded(acc, 'y');
        let acc = bounded(acc, 'z');
        assert_eq!(acc, vec!['x', 'y']);
    }

    #[test]
    fn append_at_most_zero_never_appends() {
        let bounded = append_at_most(0);
        assert!(bounded(Vec::new(), 1).is_empty());
    }
}
