//! Value application and left-to-right function composition.
//!
//! Rust has no polymorphic infix operator that covers both "feed a value into
//! a function" and "chain two functions", so the two shapes are separate,
//! explicitly named operations. Each also has a fluent method form so chains
//! still read left to right.

/// Apply `f` to `value`.
///
/// Law: `pipe_into(x, f) == f(x)`.
pub fn pipe_into<A, B>(value: A, f: impl FnOnce(A) -> B) -> B {
    f(value)
}

/// Compose two functions so that `f` runs first and its output feeds `g`.
///
/// Law: `pipe_into(x, compose_with(f, g)) == g(f(x))`.
pub fn compose_with<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |value| g(f(value))
}

/// Boxed same-typed stage, the element type of [`compose_all`].
pub type Stage<'a, A> = Box<dyn Fn(A) -> A + 'a>;

/// Fold an arbitrary-length chain of stages into one function, left to right.
///
/// An empty chain yields the identity function.
pub fn compose_all<'a, A: 'a>(stages: impl IntoIterator<Item = Stage<'a, A>>) -> Stage<'a, A> {
    let identity: Stage<'a, A> = Box::new(|value| value);
    stages
        .into_iter()
        .fold(identity, |chain, stage| -> Stage<'a, A> {
            Box::new(compose_with(chain, stage))
        })
}

/// Fluent form of [`pipe_into`]: `x.pipe(f).pipe(g)`.
pub trait Pipe: Sized {
    #[inline]
    fn pipe<B>(self, f: impl FnOnce(Self) -> B) -> B {
        pipe_into(self, f)
    }
}

impl<T> Pipe for T {}

/// Fluent form of [`compose_with`]: `f.compose_with(g)`.
pub trait Compose<A, B>: Fn(A) -> B + Sized {
    #[inline]
    fn compose_with<C>(self, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
        compose_with(self, g)
    }
}

impl<A, B, F> Compose<A, B> for F where F: Fn(A) -> B {}
