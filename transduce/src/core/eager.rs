//! Whole-sequence transforms built on a fold.
//!
//! Each wrapper traverses its input once and materializes a new vector, so a
//! chain of `n` wrappers costs `n` traversals. They are the reference
//! semantics that fused transducer pipelines must reproduce element for
//! element.

use crate::core::executor::execute;
use crate::core::reducer::{append, append_at_most};

/// `f` applied to every element, in input order.
pub fn map<A, B>(f: impl Fn(A) -> B) -> impl Fn(&[A]) -> Vec<B>
where
    A: Clone,
{
    move |xs: &[A]| {
        execute(
            xs.iter().cloned(),
            |acc: Vec<B>, x: A| append(acc, f(x)),
            Vec::with_capacity(xs.len()),
        )
    }
}

/// Elements for which `predicate` holds, relative order preserved.
pub fn filter<A>(predicate: impl Fn(&A) -> bool) -> impl Fn(&[A]) -> Vec<A>
where
    A: Clone,
{
    move |xs: &[A]| {
        execute(
            xs,
            |acc: Vec<A>, x: &A| {
                if predicate(x) {
                    append(acc, x.clone())
                } else {
                    acc
                }
            },
            Vec::new(),
        )
    }
}

/// The first `min(n, len)` elements.
///
/// Inclusion is decided by how many elements were already emitted, not by
/// the length of the input.
pub fn take<A>(n: usize) -> impl Fn(&[A]) -> Vec<A>
where
    A: Clone,
{
    move |xs: &[A]| {
        let bounded = append_at_most(n);
        execute(
            xs,
            |acc: Vec<A>, x: &A| bounded(acc, x.clone()),
            Vec::with_capacity(n.min(xs.len())),
        )
    }
}
