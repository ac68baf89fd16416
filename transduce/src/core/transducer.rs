//! Reducer-to-reducer transformations.
//!
//! A transducer describes one pipeline stage without knowing how results
//! are accumulated: it takes a reducer over the stage's output type and
//! returns a reducer over its input type. Chaining stages therefore builds a
//! single reducer, and folding with it visits every input element once no
//! matter how many stages are stacked.

use std::marker::PhantomData;

use crate::core::reducer::Reducer;

/// One composable pipeline stage from `In` elements to `Out` elements.
///
/// The accumulator type is chosen per call of [`Transducer::transduce`], so a
/// `Copy` stage can feed a `Vec`, a running sum, or any other reducer.
pub trait Transducer<In, Out>: Sized {
    /// Wrap `reducer` so that it accepts `In` elements.
    ///
    /// The stage moves into the returned reducer, which can then be stored
    /// or returned independently of the call site.
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, In>
    where
        R: Reducer<Acc, Out>;

    /// Chain `next` after this stage: each element passes through `self`
    /// first, then through `next`.
    fn then<Next, Final>(self, next: Next) -> Composed<Self, Next, Out>
    where
        Next: Transducer<Out, Final>,
    {
        compose::<In, Out, Final, Self, Next>(self, next)
    }
}

/// Stage that transforms every element with `f`.
#[derive(Debug, Clone, Copy)]
pub struct Mapping<F> {
    f: F,
}

/// Build a stage that calls the downstream reducer once per element with
/// `f(element)`.
pub fn mapping<In, Out, F>(f: F) -> Mapping<F>
where
    F: Fn(In) -> Out,
{
    Mapping { f }
}

impl<In, Out, F> Transducer<In, Out> for Mapping<F>
where
    F: Fn(In) -> Out,
{
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, In>
    where
        R: Reducer<Acc, Out>,
    {
        move |acc: Acc, item: In| reducer.step(acc, (self.f)(item))
    }
}

/// Stage that drops elements rejected by a predicate.
#[derive(Debug, Clone, Copy)]
pub struct Filtering<P> {
    predicate: P,
}

/// Build a stage that forwards only elements for which `predicate` holds.
///
/// Rejected elements never reach the downstream reducer; the accumulator is
/// returned untouched.
pub fn filtering<T, P>(predicate: P) -> Filtering<P>
where
    P: Fn(&T) -> bool,
{
    Filtering { predicate }
}

impl<T, P> Transducer<T, T> for Filtering<P>
where
    P: Fn(&T) -> bool,
{
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, T>
    where
        R: Reducer<Acc, T>,
    {
        move |acc: Acc, item: T| {
            if (self.predicate)(&item) {
                reducer.step(acc, item)
            } else {
                acc
            }
        }
    }
}

/// Neutral stage: hands the downstream reducer back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

pub fn identity() -> Identity {
    Identity
}

impl<T> Transducer<T, T> for Identity {
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, T>
    where
        R: Reducer<Acc, T>,
    {
        reducer
    }
}

/// Two stages run back to back; `Mid` is the element type between them.
pub struct Composed<A, B, Mid> {
    first: A,
    second: B,
    _mid: PhantomData<fn(Mid) -> Mid>,
}

impl<A: Copy, B: Copy, Mid> Copy for Composed<A, B, Mid> {}

impl<A: Clone, B: Clone, Mid> Clone for Composed<A, B, Mid> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _mid: PhantomData,
        }
    }
}

/// Compose two stages; `first` sees each element before `second`.
///
/// Composition is associative: `compose(compose(a, b), c)` and
/// `compose(a, compose(b, c))` build reducers with identical behavior.
pub fn compose<In, Mid, Out, A, B>(first: A, second: B) -> Composed<A, B, Mid>
where
    A: Transducer<In, Mid>,
    B: Transducer<Mid, Out>,
{
    Composed {
        first,
        second,
        _mid: PhantomData,
    }
}

impl<In, Mid, Out, A, B> Transducer<In, Out> for Composed<A, B, Mid>
where
    A: Transducer<In, Mid>,
    B: Transducer<Mid, Out>,
{
    fn transduce<Acc, R>(self, reducer: R) -> impl Reducer<Acc, In>
    where
        R: Reducer<Acc, Out>,
    {
        let downstream = self.second.transduce::<Acc, R>(reducer);
        self.first.transduce::<Acc, _>(downstream)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::core::executor::{execute, into_vec};
    use crate::core::reducer::{append, sum};

    fn square(x: i64) -> i64 {
        x * x
    }

    #[test]
    fn mapping_feeds_transformed_element() {
        let reducer = mapping(square).transduce(append::<i64>);
        assert_eq!(reducer.step(vec![1], 3), vec![1, 9]);
    }

    #[test]
    fn filtering_skips_downstream_for_rejected() {
        let calls = Cell::new(0);
        let counting = |acc: i64, item: i64| {
            calls.set(calls.get() + 1);
            acc + item
        };
        let reducer = filtering(|x: &i64| x % 2 == 0).transduce(counting);
        let acc = reducer.step(10, 3);
        assert_eq!(acc, 10);
        assert_eq!(calls.get(), 0);
        let acc = reducer.step(acc, 4);
        assert_eq!(acc, 14);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn decorating_reducer_is_mapping_in_front() {
        fn squaring_by_hand<Acc>(reducer: impl Reducer<Acc, i64>) -> impl Reducer<Acc, i64> {
            move |acc: Acc, x: i64| reducer.step(acc, x * x)
        }
        fn squaring<Acc>(reducer: impl Reducer<Acc, i64>) -> impl Reducer<Acc, i64> {
            mapping(square).transduce(reducer)
        }
        let xs: Vec<i64> = (1..=10).collect();
        let by_hand = execute(xs.iter().copied(), squaring_by_hand(sum::<i64>), 0);
        let transduced = execute(xs.iter().copied(), squaring(sum::<i64>), 0);
        assert_eq!(by_hand, transduced);
        assert_eq!(transduced, 385);
    }

    #[test]
    fn built_reducer_outlives_its_stage_expression() {
        fn evens_into<Acc>(reducer: impl Reducer<Acc, i64>) -> impl Reducer<Acc, i64> {
            filtering(|x: &i64| x % 2 == 0)
                .then(mapping(|x: i64| x / 2))
                .transduce(reducer)
        }
        let halved = evens_into(append::<i64>);
        let counted = evens_into(|acc: usize, _: i64| acc + 1);
        let stepped = |acc: Vec<i64>, x: i64| halved.step(acc, x);
        assert_eq!(execute([1_i64, 2, 3, 4, 6], stepped, Vec::new()), vec![1, 2, 3]);
        assert_eq!(execute([1_i64, 2, 3, 4, 6], counted, 0), 3);
        assert_eq!(halved.step(vec![9], 10), vec![9, 5]);
    }

    #[test]
    fn composition_order_is_processing_order() {
        let xs = [1_i64, 2, 3, 4];
        let filter_then_map = filtering(|x: &i64| x % 2 == 0).then(mapping(|x: i64| x + 1));
        let map_then_filter = mapping(|x: i64| x + 1).then(filtering(|x: &i64| x % 2 == 0));
        assert_eq!(into_vec(xs.iter().copied(), filter_then_map), vec![3, 5]);
        assert_eq!(into_vec(xs.iter().copied(), map_then_filter), vec![2, 4]);
    }

    #[test]
    fn stages_can_change_element_type() {
        let xf = mapping(|x: i64| x * 3).then(mapping(|x: i64| format!("#{x}")));
        assert_eq!(into_vec([1_i64, 2], xf), vec!["#3", "#6"]);
    }

    #[test]
    fn identity_is_neutral() {
        let xs = [5_i64, 1, 4];
        let plain = into_vec(xs, mapping(square));
        let left = into_vec(xs, identity().then(mapping(square)));
        let right = into_vec(xs, mapping(square).then(identity()));
        assert_eq!(plain, left);
        assert_eq!(plain, right);
    }

    #[test]
    fn one_copy_stage_serves_many_accumulators() {
        let xf = filtering(|x: &i64| *x > 2).then(mapping(square));
        let xs = [1_i64, 2, 3, 4];
        assert_eq!(execute(xs, xf.transduce(append::<i64>), Vec::new()), vec![9, 16]);
        assert_eq!(execute(xs, xf.transduce(sum::<i64>), 0), 25);
        assert_eq!(execute(xs, xf.transduce(sum::<i64>), 100), 125);
    }
}
