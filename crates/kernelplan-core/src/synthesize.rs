//! Pipeline synthesis.
//!
//! Turns a validated, bound graph and its execution plan into an ordered
//! list of agent stages.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use kernelplan_config::SynthesisConfig;
use kernelplan_protocols::{Kernel, KernelGraph, SynthesisError};

use crate::order::ExecutionPlan;
use crate::validate::validate;

/// Fallback stage id for names with no alphanumeric characters.
const FALLBACK_STAGE_ID: &str = "kernel";

/// How the stages are wired together at run time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PipelineMode {
    /// Zero or one stage, run directly.
    Single { entry: Option<String> },
    /// Stages run in sequence, each feeding the next.
    Chain {
        name: String,
        sequence: Vec<String>,
        cumulative: bool,
    },
}

/// One agent step, bound to one kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    /// Sanitized, unique identifier.
    pub id: String,
    /// Original kernel name.
    pub kernel: String,
    pub instruction: String,
    pub agent_type: String,
    /// Bound tool names.
    pub servers: Vec<String>,
    /// Position in execution order.
    pub index: usize,
    pub wave: usize,
    /// Stage ids of the kernel's dependencies.
    pub depends_on: Vec<String>,
}

/// An executable pipeline definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub name: String,
    pub instruction: String,
    pub model: String,
    pub mode: PipelineMode,
    pub stages: Vec<Stage>,
    /// Stage ids grouped by wave.
    pub waves: Vec<Vec<String>>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn is_chain(&self) -> bool {
        matches!(self.mode, PipelineMode::Chain { .. })
    }
}

/// Builds pipelines from bound graphs.
pub struct PipelineSynthesizer {
    config: SynthesisConfig,
}

impl PipelineSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn synthesize(
        &self,
        graph: &KernelGraph,
        plan: &ExecutionPlan,
    ) -> Result<Pipeline, SynthesisError> {
        let report = validate(graph);
        if !report.valid {
            let diagnostics = report.errors().cloned().collect();
            return Err(SynthesisError::InvalidGraph { diagnostics });
        }

        check_plan(graph, plan)?;

        for (_, kernel) in graph.unique_kernels() {
            let missing = kernel.unfulfilled_tool_types();
            if missing.is_empty() {
                continue;
            }
            if !self.config.allow_unfulfilled_tools {
                return Err(SynthesisError::UnfulfilledTools {
                    kernel: kernel.name.clone(),
                    tool_types: missing,
                });
            }
            warn!(
                "Kernel '{}' has unfulfilled tool types: {}",
                kernel.name,
                missing.join(", ")
            );
        }

        let ids = assign_stage_ids(graph);
        let kernels: HashMap<&str, &Kernel> = graph
            .unique_kernels()
            .into_iter()
            .map(|(_, k)| (k.name.as_str(), k))
            .collect();

        let mut stages = Vec::with_capacity(plan.len());
        let mut waves = Vec::with_capacity(plan.wave_count());
        for (wave, names) in plan.waves().iter().enumerate() {
            let mut wave_ids = Vec::with_capacity(names.len());
            for name in names {
                let (Some(kernel), Some(id)) = (kernels.get(name.as_str()), ids.get(name.as_str()))
                else {
                    return Err(SynthesisError::PlanMismatch(format!(
                        "plan names unknown kernel '{}'",
                        name
                    )));
                };
                let id = id.clone();
                stages.push(Stage {
                    id: id.clone(),
                    kernel: kernel.name.clone(),
                    instruction: stage_instruction(kernel),
                    agent_type: kernel.agent_type.clone(),
                    servers: kernel.servers(),
                    index: stages.len(),
                    wave,
                    depends_on: kernel
                        .distinct_dependencies()
                        .into_iter()
                        .filter_map(|dep| ids.get(dep).cloned())
                        .collect(),
                });
                wave_ids.push(id);
            }
            waves.push(wave_ids);
        }

        let mode = match stages.len() {
            0 => PipelineMode::Single { entry: None },
            1 => PipelineMode::Single {
                entry: Some(stages[0].id.clone()),
            },
            _ => PipelineMode::Chain {
                name: self.config.chain_name.clone(),
                sequence: stages.iter().map(|s| s.id.clone()).collect(),
                cumulative: self.config.cumulative,
            },
        };

        let pipeline = Pipeline {
            name: graph.name.clone().unwrap_or_else(|| "kernelplan".to_string()),
            instruction: graph.summary.clone().unwrap_or_default(),
            model: self.config.model.clone(),
            mode,
            stages,
            waves,
        };
        info!(
            "Synthesized pipeline '{}' with {} stages in {} waves",
            pipeline.name,
            pipeline.len(),
            pipeline.waves.len()
        );
        Ok(pipeline)
    }
}

/// The plan must place every kernel of the graph exactly once, and nothing else.
fn check_plan(graph: &KernelGraph, plan: &ExecutionPlan) -> Result<(), SynthesisError> {
    let mut placed = HashSet::new();
    for name in plan.linear_order() {
        if !graph.contains(name) {
            return Err(SynthesisError::PlanMismatch(format!(
                "plan names unknown kernel '{}'",
                name
            )));
        }
        if !placed.insert(name) {
            return Err(SynthesisError::PlanMismatch(format!(
                "kernel '{}' is placed more than once",
                name
            )));
        }
    }

    if let Some((_, missing)) = graph
        .unique_kernels()
        .into_iter()
        .find(|(_, k)| !placed.contains(k.name.as_str()))
    {
        return Err(SynthesisError::PlanMismatch(format!(
            "kernel '{}' is not placed",
            missing.name
        )));
    }
    Ok(())
}

/// Instruction text handed to a stage's agent.
pub fn stage_instruction(kernel: &Kernel) -> String {
    format!(
        "{}\n\nYou are acting as a {}",
        kernel.description, kernel.agent_type
    )
}

/// Lowercase identifier form of a kernel name.
///
/// Non-alphanumeric runs become a single `_`; leading and trailing `_` are
/// trimmed. Returns an empty string when nothing is left.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Unique stage id per kernel name, assigned in input order.
///
/// The first kernel to sanitize to a given id keeps it; later ones get
/// `_1`, `_2`, ... skipping ids that are already taken.
pub fn assign_stage_ids(graph: &KernelGraph) -> HashMap<&str, String> {
    let mut ids = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    for (_, kernel) in graph.unique_kernels() {
        let mut base = sanitize_name(&kernel.name);
        if base.is_empty() {
            base = FALLBACK_STAGE_ID.to_string();
        }

        let mut id = base.clone();
        let mut suffix = 1;
        while taken.contains(&id) {
            id = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        taken.insert(id.clone());
        ids.insert(kernel.name.as_str(), id);
    }
    ids
}

#[cfg(test)]
#[path = "synthesize_tests.rs"]
mod tests;
