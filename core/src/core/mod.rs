pub mod control;
pub mod payload;
pub mod result;

// Re-export key types for easier access from other modules (and lib.rs)
pub use control::{Flow, RunOutcome, StopPipeline};
pub use payload::{Payload, ResultData, Serialized};
pub use result::{HandlingResult, HandlingStatus};
