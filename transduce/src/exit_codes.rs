//! Stable exit codes for transduce CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid layout/config/plan or other errors.
pub const INVALID: i32 = 1;
/// `transduce compare` found fused and eager outputs that differ.
pub const MISMATCH: i32 = 2;
