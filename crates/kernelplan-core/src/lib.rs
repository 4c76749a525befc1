//! # KernelPlan Core
//!
//! Compiles kernel graphs into executable agent pipelines.
//!
//! ## Components
//!
//! - [`validate`] - structural checks, reported as diagnostics
//! - [`compute_order`] - layered topological sort into waves
//! - [`ToolBinder`] - concurrent tool retrieval per kernel
//! - [`PipelineSynthesizer`] - ordered stages with sanitized ids
//! - [`render`] - workflow script, `go` commands and DOT output
//! - [`Compiler`] - runs every stage in order

pub mod binder;
pub mod compiler;
pub mod order;
pub mod render;
pub mod synthesize;
pub mod validate;

pub use binder::{BindingOutcome, BindingWarning, ToolBinder};
pub use compiler::{plan_document, CompileOutput, Compiler, PlanOutput};
pub use order::{compute_order, ExecutionPlan};
pub use synthesize::{
    assign_stage_ids, sanitize_name, Pipeline, PipelineMode, PipelineSynthesizer, Stage,
};
pub use validate::{validate, ValidationReport};
