//! End-to-end compilation of a kernel document.
//!
//! Stages run in a fixed order and hand their results to the next stage
//! explicitly: boundary conversion, validation, ordering, binding, then
//! synthesis. Validation failures do not stop ordering or binding, but
//! synthesis refuses an invalid graph.

use std::sync::Arc;
use tracing::info;

use kernelplan_config::Config;
use kernelplan_protocols::{
    CycleError, KernelDocument, KernelGraph, SynthesisError, ToolRetriever,
};

use crate::binder::{BindingWarning, ToolBinder};
use crate::order::{compute_order, ExecutionPlan};
use crate::synthesize::{Pipeline, PipelineSynthesizer};
use crate::validate::{validate, ValidationReport};

/// Validation and ordering results, without tool binding.
#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub graph: KernelGraph,
    /// Boundary diagnostics followed by graph validation diagnostics.
    pub report: ValidationReport,
    pub plan: Result<ExecutionPlan, CycleError>,
}

/// Everything produced by a full compile.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The bound graph.
    pub graph: KernelGraph,
    pub report: ValidationReport,
    pub plan: Result<ExecutionPlan, CycleError>,
    pub warnings: Vec<BindingWarning>,
    pub pipeline: Result<Pipeline, SynthesisError>,
}

impl CompileOutput {
    pub fn is_success(&self) -> bool {
        self.report.valid && self.plan.is_ok() && self.pipeline.is_ok()
    }
}

/// Runs the compilation stages with one retriever and configuration.
pub struct Compiler {
    binder: ToolBinder,
    synthesizer: PipelineSynthesizer,
}

impl Compiler {
    pub fn new(retriever: Arc<dyn ToolRetriever>, config: Config) -> Self {
        Self {
            binder: ToolBinder::new(retriever, config.binder),
            synthesizer: PipelineSynthesizer::new(config.synthesis),
        }
    }

    /// Convert, validate and order a document.
    pub fn plan(&self, document: KernelDocument) -> PlanOutput {
        plan_document(document)
    }

    /// Run every stage.
    pub async fn compile(&self, document: KernelDocument) -> CompileOutput {
        let PlanOutput {
            graph,
            report,
            plan,
        } = plan_document(document);

        let outcome = self.binder.bind(&graph).await;
        let graph = outcome.graph;

        let pipeline = if !report.valid {
            Err(SynthesisError::InvalidGraph {
                diagnostics: report.errors().cloned().collect(),
            })
        } else {
            match &plan {
                Ok(plan) => self.synthesizer.synthesize(&graph, plan),
                Err(err) => Err(SynthesisError::PlanMismatch(err.to_string())),
            }
        };

        info!(
            "Compiled {} kernels: valid={}, binding warnings={}, pipeline={}",
            graph.len(),
            report.valid,
            outcome.warnings.len(),
            if pipeline.is_ok() { "ok" } else { "refused" }
        );

        CompileOutput {
            graph,
            report,
            plan,
            warnings: outcome.warnings,
            pipeline,
        }
    }
}

/// Synchronous part of a compile. Needs no retriever.
pub fn plan_document(document: KernelDocument) -> PlanOutput {
    let loaded = document.into_graph();
    let mut report = validate(&loaded.graph);
    report.prepend(loaded.diagnostics);
    let plan = compute_order(&loaded.graph);

    PlanOutput {
        graph: loaded.graph,
        report,
        plan,
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
