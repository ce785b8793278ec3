// missive/src/executor/mod.rs

//! Defines the `Executor<M, O>` struct, its construction, lifecycle callbacks and execution logic.

pub mod definition;
pub mod execution;
pub mod hooks;

// Re-export the main Executor struct and its builder
pub use definition::{Executor, ExecutorBuilder};
pub use hooks::{ExecutorCallbacks, NoopCallbacks};
