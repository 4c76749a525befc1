//! # KernelPlan Protocols
//!
//! Shared data model and interface definitions for the KernelPlan workspace.
//! Contains no compilation logic.
//!
//! ## Contents
//!
//! - [`KernelGraph`] / [`Kernel`] - the in-memory kernel description
//! - [`KernelDocument`] - the JSON wire shape and its boundary conversion
//! - [`Diagnostic`] - structured validation findings
//! - [`ToolRetriever`] - the injected similarity-search capability

pub mod diagnostic;
pub mod error;
pub mod kernel;
pub mod retrieval;
pub mod wire;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{CycleError, DocumentError, PlanError, RetrievalError, SynthesisError};
pub use kernel::{AssignedTool, Kernel, KernelGraph, GENERAL_TOOL_TYPE};
pub use retrieval::{ToolCandidate, ToolRetriever};
pub use wire::{KernelDocument, KernelRecord, LoadedGraph, ToolsRequired};
