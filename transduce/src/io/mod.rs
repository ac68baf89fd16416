//! I/O helpers for transduce commands.

pub mod config;
pub mod init;
pub mod plan_store;
