//! JSON wire format for kernel descriptions.
//!
//! The wire types keep every field optional so that a hand- or
//! model-written description can always be read. Conversion into a
//! [`KernelGraph`] turns absent required fields into diagnostics instead of
//! silently defaulting them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::DocumentError;
use crate::kernel::{AssignedTool, Kernel, KernelGraph};

/// `tools_required` as it appears on the wire.
///
/// Older plans encode the flag as a string ("True", "false"); those are
/// accepted case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolsRequired {
    Flag(bool),
    Text(String),
}

impl ToolsRequired {
    /// The boolean meaning, if the value has one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
            Self::Text(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
            Self::Text(_) => None,
        }
    }
}

/// One kernel entry of a [`KernelDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub inputs: Vec<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub outputs: Vec<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_required: Option<ToolsRequired>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub required_tool_types: Vec<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub assigned_tools: Vec<AssignedTool>,

    /// Flattened tool names. Derived from `assigned_tools` on output.
    #[serde(default, deserialize_with = "nullable_list")]
    pub servers: Vec<String>,

    /// Tool names grouped by type. Derived from `assigned_tools` on output.
    #[serde(default)]
    pub tool_types_assigned: BTreeMap<String, Vec<String>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A complete kernel description document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_sequence: Option<String>,

    pub kernels: Vec<KernelRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A graph together with the diagnostics raised while building it.
#[derive(Debug, Clone, Default)]
pub struct LoadedGraph {
    pub graph: KernelGraph,
    pub diagnostics: Vec<Diagnostic>,
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl KernelDocument {
    /// Parse a document from JSON text.
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(input: &[u8]) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_slice(input)?;
        Self::from_value(value)
    }

    /// Read and parse a document from a file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        if !value.get("kernels").is_some_and(serde_json::Value::is_array) {
            return Err(DocumentError::MissingKernels);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert into a kernel graph, reporting missing or invalid fields.
    pub fn into_graph(self) -> LoadedGraph {
        let mut diagnostics = Vec::new();
        let kernels = self
            .kernels
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_kernel(index, &mut diagnostics))
            .collect();

        LoadedGraph {
            graph: KernelGraph {
                name: self.name,
                summary: self.summary,
                execution_sequence: self.execution_sequence,
                kernels,
                extra: self.extra,
            },
            diagnostics,
        }
    }

    /// Render a graph back into wire form, adding the derived tool fields.
    pub fn from_graph(graph: &KernelGraph) -> Self {
        Self {
            name: graph.name.clone(),
            summary: graph.summary.clone(),
            execution_sequence: graph.execution_sequence.clone(),
            kernels: graph.kernels.iter().map(KernelRecord::from_kernel).collect(),
            extra: graph.extra.clone(),
        }
    }
}

impl KernelRecord {
    fn into_kernel(self, index: usize, diagnostics: &mut Vec<Diagnostic>) -> Kernel {
        let name = match self.name {
            Some(name) => name,
            None => {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::MissingField,
                        format!("Kernel at index {} has no name", index),
                    )
                    .at(index),
                );
                String::new()
            }
        };

        let label = kernel_label(&name, index);
        let mut required = |field: &str, value: Option<String>| {
            value.unwrap_or_else(|| {
                let mut diag = Diagnostic::error(
                    DiagnosticKind::MissingField,
                    format!("{} is missing required field '{}'", label, field),
                )
                .at(index);
                if !name.is_empty() {
                    diag = diag.with_kernel(name.clone());
                }
                diagnostics.push(diag);
                String::new()
            })
        };
        let agent_type = required("agent_type", self.agent_type);
        let description = required("description", self.description);

        let tools_required = match self.tools_required {
            None => false,
            Some(flag) => flag.as_bool().unwrap_or_else(|| {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::InvalidField,
                        format!(
                            "{} has a tools_required value that is not a boolean: {:?}",
                            label, flag
                        ),
                    )
                    .with_kernel(name.clone())
                    .at(index),
                );
                false
            }),
        };

        Kernel {
            name,
            agent_type,
            description,
            inputs: self.inputs,
            outputs: self.outputs,
            dependencies: self.dependencies,
            tools_required,
            required_tool_types: self.required_tool_types,
            assigned_tools: self.assigned_tools,
            extra: self.extra,
        }
    }

    fn from_kernel(kernel: &Kernel) -> Self {
        Self {
            name: Some(kernel.name.clone()).filter(|n| !n.is_empty()),
            agent_type: Some(kernel.agent_type.clone()),
            description: Some(kernel.description.clone()),
            inputs: kernel.inputs.clone(),
            outputs: kernel.outputs.clone(),
            dependencies: kernel.dependencies.clone(),
            tools_required: Some(ToolsRequired::Flag(kernel.tools_required)),
            required_tool_types: kernel.required_tool_types.clone(),
            assigned_tools: kernel.assigned_tools.clone(),
            servers: kernel.servers(),
            tool_types_assigned: kernel.tool_types_assigned(),
            extra: kernel.extra.clone(),
        }
    }
}

fn kernel_label(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("Kernel at index {}", index)
    } else {
        format!("Kernel '{}'", name)
    }
}

impl KernelGraph {
    /// Wire form of this graph.
    pub fn to_document(&self) -> KernelDocument {
        KernelDocument::from_graph(self)
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
