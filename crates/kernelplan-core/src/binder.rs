//! Tool binding.
//!
//! For every kernel that needs tools, query the injected [`ToolRetriever`]
//! and copy the best candidates into `assigned_tools`. All queries of a
//! graph run concurrently; results are reassembled in declared order, not
//! completion order.

use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use kernelplan_config::BinderConfig;
use kernelplan_protocols::{
    AssignedTool, Kernel, KernelGraph, RetrievalError, ToolCandidate, ToolRetriever,
    GENERAL_TOOL_TYPE,
};

/// A non-fatal problem found while binding tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingWarning {
    /// The search returned nothing for a declared tool type.
    NoCandidates { kernel: String, tool_type: String },
    /// The retriever failed for one query.
    RetrievalFailed {
        kernel: String,
        query: String,
        error: String,
    },
    /// The kernel requires tools without naming any tool type.
    UnspecifiedToolTypes { kernel: String },
}

impl BindingWarning {
    pub fn kernel(&self) -> &str {
        match self {
            Self::NoCandidates { kernel, .. }
            | Self::RetrievalFailed { kernel, .. }
            | Self::UnspecifiedToolTypes { kernel } => kernel,
        }
    }
}

impl fmt::Display for BindingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates { kernel, tool_type } => write!(
                f,
                "No tool found for type '{}' on kernel '{}'",
                tool_type, kernel
            ),
            Self::RetrievalFailed {
                kernel,
                query,
                error,
            } => write!(
                f,
                "Retrieval for '{}' on kernel '{}' failed: {}",
                query, kernel, error
            ),
            Self::UnspecifiedToolTypes { kernel } => write!(
                f,
                "Kernel '{}' requires tools but has no required_tool_types; using general retrieval",
                kernel
            ),
        }
    }
}

/// A bound graph together with every warning raised while binding it.
#[derive(Debug, Clone)]
pub struct BindingOutcome {
    pub graph: KernelGraph,
    pub warnings: Vec<BindingWarning>,
}

/// Assigns tools to kernels using an injected retriever.
pub struct ToolBinder {
    retriever: Arc<dyn ToolRetriever>,
    config: BinderConfig,
}

impl ToolBinder {
    pub fn new(retriever: Arc<dyn ToolRetriever>, config: BinderConfig) -> Self {
        Self { retriever, config }
    }

    /// Bind tools for every kernel of `graph`.
    ///
    /// The input graph is not modified. Kernels that do not require tools
    /// come back with no assigned tools and cost no retrieval call.
    pub async fn bind(&self, graph: &KernelGraph) -> BindingOutcome {
        let results = join_all(graph.kernels.iter().map(|kernel| self.bind_kernel(kernel))).await;

        let mut bound = graph.clone();
        let mut warnings = Vec::new();
        for (kernel, (tools, kernel_warnings)) in bound.kernels.iter_mut().zip(results) {
            kernel.assigned_tools = tools;
            warnings.extend(kernel_warnings);
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        info!(
            "Bound tools for {} kernels ({} warnings)",
            bound.len(),
            warnings.len()
        );

        BindingOutcome {
            graph: bound,
            warnings,
        }
    }

    async fn bind_kernel(&self, kernel: &Kernel) -> (Vec<AssignedTool>, Vec<BindingWarning>) {
        if !kernel.tools_required {
            return (Vec::new(), Vec::new());
        }
        if kernel.required_tool_types.is_empty() {
            self.bind_general(kernel).await
        } else {
            self.bind_typed(kernel).await
        }
    }

    /// One query per declared type; the top candidate of each is kept.
    async fn bind_typed(&self, kernel: &Kernel) -> (Vec<AssignedTool>, Vec<BindingWarning>) {
        let searches = kernel
            .required_tool_types
            .iter()
            .map(|tool_type| self.search(tool_type));
        let results = join_all(searches).await;

        let mut tools = Vec::new();
        let mut warnings = Vec::new();
        for (tool_type, result) in kernel.required_tool_types.iter().zip(results) {
            match result {
                Ok(candidates) => match candidates.first() {
                    Some(best) => tools.push(best.assign(tool_type.as_str())),
                    None => warnings.push(BindingWarning::NoCandidates {
                        kernel: kernel.name.clone(),
                        tool_type: tool_type.clone(),
                    }),
                },
                Err(err) => warnings.push(BindingWarning::RetrievalFailed {
                    kernel: kernel.name.clone(),
                    query: tool_type.clone(),
                    error: err.to_string(),
                }),
            }
        }
        (tools, warnings)
    }

    /// One composite query; the top `general_limit` candidates are kept.
    async fn bind_general(&self, kernel: &Kernel) -> (Vec<AssignedTool>, Vec<BindingWarning>) {
        let mut warnings = vec![BindingWarning::UnspecifiedToolTypes {
            kernel: kernel.name.clone(),
        }];
        let query = general_query(kernel);

        let tools = match self.search(&query).await {
            Ok(candidates) => {
                if candidates.is_empty() {
                    warnings.push(BindingWarning::NoCandidates {
                        kernel: kernel.name.clone(),
                        tool_type: GENERAL_TOOL_TYPE.to_string(),
                    });
                }
                candidates
                    .iter()
                    .take(self.config.general_limit)
                    .map(|candidate| candidate.assign(GENERAL_TOOL_TYPE))
                    .collect()
            }
            Err(err) => {
                warnings.push(BindingWarning::RetrievalFailed {
                    kernel: kernel.name.clone(),
                    query,
                    error: err.to_string(),
                });
                Vec::new()
            }
        };
        (tools, warnings)
    }

    async fn search(&self, query: &str) -> Result<Vec<ToolCandidate>, RetrievalError> {
        debug!("Searching tools for: {}", query);
        let candidates = self.retriever.retrieve(query).await?;
        debug!("Found {} candidates for: {}", candidates.len(), query);
        Ok(candidates)
    }
}

/// Query used for kernels without declared tool types.
pub fn general_query(kernel: &Kernel) -> String {
    format!("{}: {}", kernel.agent_type, kernel.description)
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
