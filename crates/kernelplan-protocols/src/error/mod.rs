//! Error types for the KernelPlan protocol layer.

mod cycle;
mod document;
mod plan;
mod retrieval;
mod synthesis;

pub use cycle::*;
pub use document::*;
pub use plan::*;
pub use retrieval::*;
pub use synthesis::*;
