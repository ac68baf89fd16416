//! Single left-to-right fold over a sequence.

use crate::core::reducer::{Reducer, append};
use crate::core::transducer::Transducer;

/// Fold `sequence` with `reducer`, starting from `initial`.
///
/// Each element is read exactly once, in order. When `reducer` was built by
/// stacking transducers in front of a terminal reducer, that terminal fires
/// once per element surviving every stage. A panic raised by a user function
/// unwinds through this call with no recovery.
pub fn execute<I, Acc, R>(sequence: I, reducer: R, initial: Acc) -> Acc
where
    I: IntoIterator,
    R: Reducer<Acc, I::Item>,
{
    sequence
        .into_iter()
        .fold(initial, |acc, item| reducer.step(acc, item))
}

/// Fold with a fallible step; the first `Err` stops the traversal.
///
/// The accumulator is owned by the fold, so on failure the partially built
/// value is dropped and only the error reaches the caller.
pub fn try_execute<I, Acc, E, R>(sequence: I, reducer: R, initial: Acc) -> Result<Acc, E>
where
    I: IntoIterator,
    R: Fn(Acc, I::Item) -> Result<Acc, E>,
{
    sequence.into_iter().try_fold(initial, reducer)
}

/// Run `xf` over `sequence` and collect the surviving elements in order.
pub fn into_vec<I, Out, X>(sequence: I, xf: X) -> Vec<Out>
where
    I: IntoIterator,
    X: Transducer<I::Item, Out>,
{
    execute(sequence, xf.transduce::<Vec<Out>, _>(append), Vec::new())
}
