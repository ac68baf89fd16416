//! Deterministic, pure logic: composition, reducers, transducers and folds.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and keep no state between calls, so every piece can be reused
//! across any number of executions.

pub mod catalog;
pub mod eager;
pub mod executor;
pub mod invariants;
pub mod pipe;
pub mod reducer;
pub mod transducer;
