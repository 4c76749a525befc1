//! Kernel graph types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Tool type used when a kernel did not declare any.
pub const GENERAL_TOOL_TYPE: &str = "general";

/// A tool bound to a kernel by the binder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedTool {
    #[serde(rename = "name", alias = "tool_name")]
    pub tool_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub relevance_score: f32,
    #[serde(default = "default_tool_type")]
    pub tool_type: String,
}

fn default_tool_type() -> String {
    GENERAL_TOOL_TYPE.to_string()
}

impl AssignedTool {
    pub fn new(
        tool_name: impl Into<String>,
        description: impl Into<String>,
        relevance_score: f32,
        tool_type: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            description: description.into(),
            relevance_score,
            tool_type: tool_type.into(),
        }
    }
}

/// One unit of planned work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kernel {
    pub name: String,
    pub agent_type: String,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Names of kernels that must complete first.
    pub dependencies: Vec<String>,
    pub tools_required: bool,
    /// Declared tool types, in the order tools should be bound.
    pub required_tool_types: Vec<String>,
    pub assigned_tools: Vec<AssignedTool>,
    /// Fields of the input record this crate does not interpret.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Kernel {
    pub fn new(
        name: impl Into<String>,
        agent_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            agent_type: agent_type.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the kernel as needing tools of the given types.
    ///
    /// An empty iterator means "needs tools, type unspecified".
    pub fn with_tool_types<I, S>(mut self, tool_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools_required = true;
        self.required_tool_types = tool_types.into_iter().map(Into::into).collect();
        self
    }

    /// Distinct dependency names, first occurrence order.
    pub fn distinct_dependencies(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.dependencies
            .iter()
            .map(String::as_str)
            .filter(|dep| seen.insert(*dep))
            .collect()
    }

    /// Names of the bound tools, in assignment order.
    pub fn servers(&self) -> Vec<String> {
        self.assigned_tools
            .iter()
            .map(|tool| tool.tool_name.clone())
            .collect()
    }

    /// Bound tool names grouped by tool type.
    pub fn tool_types_assigned(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for tool in &self.assigned_tools {
            grouped
                .entry(tool.tool_type.clone())
                .or_default()
                .push(tool.tool_name.clone());
        }
        grouped
    }

    /// Declared tool types that have no bound tool.
    ///
    /// A type declared twice needs two bound tools of that type.
    pub fn unfulfilled_tool_types(&self) -> Vec<String> {
        if !self.tools_required {
            return Vec::new();
        }
        let mut available: BTreeMap<&str, usize> = BTreeMap::new();
        for tool in &self.assigned_tools {
            *available.entry(tool.tool_type.as_str()).or_insert(0) += 1;
        }
        let mut missing = Vec::new();
        for tool_type in &self.required_tool_types {
            match available.get_mut(tool_type.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => missing.push(tool_type.clone()),
            }
        }
        missing
    }
}

/// The full set of kernels for one task.
///
/// Kernels keep their input order. Duplicate names are retained so
/// validation can point at them; name lookups resolve to the first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KernelGraph {
    pub name: Option<String>,
    pub summary: Option<String>,
    /// Human-readable sequence description. Informational only.
    pub execution_sequence: Option<String>,
    pub kernels: Vec<Kernel>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl KernelGraph {
    pub fn new(kernels: Vec<Kernel>) -> Self {
        Self {
            kernels,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// First kernel with the given name.
    pub fn get(&self, name: &str) -> Option<&Kernel> {
        self.kernels.iter().find(|k| k.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Named kernels with their input positions, skipping later duplicates.
    pub fn unique_kernels(&self) -> Vec<(usize, &Kernel)> {
        let mut seen = HashSet::new();
        self.kernels
            .iter()
            .enumerate()
            .filter(|(_, k)| !k.name.is_empty() && seen.insert(k.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
