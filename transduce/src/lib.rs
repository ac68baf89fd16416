//! Function composition and transducer fusion.
//!
//! Sequence operations such as map and filter are written as independent,
//! reusable stages and fused into a single traversal of the input. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (composition, reducers,
//!   transducers, folds). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, plan files, scaffolding).
//!
//! Orchestration ([`run`]) coordinates core logic with I/O to implement the
//! `transduce` CLI commands over data-driven [`plan`]s.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod plan;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::eager::{filter, map, take};
pub use crate::core::executor::{execute, into_vec, try_execute};
pub use crate::core::pipe::{Compose, Pipe, compose_all, compose_with, pipe_into};
pub use crate::core::reducer::{Reducer, append, append_at_most, count, sum};
pub use crate::core::transducer::{
    Composed, Filtering, Identity, Mapping, Transducer, compose, filtering, identity, mapping,
};
