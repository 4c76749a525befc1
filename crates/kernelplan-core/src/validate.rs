//! Graph validation.
//!
//! Every check runs and every finding is collected; nothing here returns
//! early or fails on malformed input.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use kernelplan_protocols::{Diagnostic, DiagnosticKind, KernelGraph};

use crate::order::compute_order;

/// Outcome of validating a kernel graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True when no diagnostic has error severity.
    pub valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let valid = !diagnostics.iter().any(Diagnostic::is_error);
        Self { valid, diagnostics }
    }

    /// Put `diagnostics` in front of the existing ones and recompute validity.
    pub fn prepend(&mut self, diagnostics: Vec<Diagnostic>) {
        let mut merged = diagnostics;
        merged.append(&mut self.diagnostics);
        *self = Self::from_diagnostics(merged);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Validate a kernel graph.
pub fn validate(graph: &KernelGraph) -> ValidationReport {
    let mut diagnostics = Vec::new();

    check_names(graph, &mut diagnostics);
    check_dependencies(graph, &mut diagnostics);
    check_cycles(graph, &mut diagnostics);
    check_tool_fields(graph, &mut diagnostics);

    if graph.is_empty() {
        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::EmptyGraph,
            "Kernel graph contains no kernels",
        ));
    }

    let report = ValidationReport::from_diagnostics(diagnostics);
    if report.valid {
        debug!("Kernel graph with {} kernels is valid", graph.len());
    } else {
        warn!(
            "Kernel graph failed validation with {} error(s)",
            report.error_count()
        );
    }
    report
}

fn check_names(graph: &KernelGraph, diagnostics: &mut Vec<Diagnostic>) {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (index, kernel) in graph.kernels.iter().enumerate() {
        if kernel.name.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::MissingName,
                    format!("Kernel at index {} has an empty name", index),
                )
                .at(index),
            );
            continue;
        }

        match first_seen.get(kernel.name.as_str()) {
            Some(&first) => diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::DuplicateName,
                    format!(
                        "Duplicate kernel name '{}' (first defined at index {})",
                        kernel.name, first
                    ),
                )
                .with_kernel(&kernel.name)
                .at(index),
            ),
            None => {
                first_seen.insert(kernel.name.as_str(), index);
            }
        }
    }
}

fn check_dependencies(graph: &KernelGraph, diagnostics: &mut Vec<Diagnostic>) {
    let known: HashSet<&str> = graph
        .unique_kernels()
        .into_iter()
        .map(|(_, kernel)| kernel.name.as_str())
        .collect();

    for (index, kernel) in graph.unique_kernels() {
        for dep in kernel.distinct_dependencies() {
            if dep == kernel.name {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::SelfDependency,
                        format!("Kernel '{}' depends on itself", kernel.name),
                    )
                    .with_kernel(&kernel.name)
                    .at(index),
                );
            } else if !known.contains(dep) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::DanglingDependency,
                        format!(
                            "Kernel '{}' depends on non-existent kernel '{}'",
                            kernel.name, dep
                        ),
                    )
                    .with_kernel(&kernel.name)
                    .at(index),
                );
            }
        }
    }
}

fn check_cycles(graph: &KernelGraph, diagnostics: &mut Vec<Diagnostic>) {
    let Err(err) = compute_order(graph) else {
        return;
    };
    let positions: HashMap<&str, usize> = graph
        .unique_kernels()
        .into_iter()
        .map(|(index, kernel)| (kernel.name.as_str(), index))
        .collect();

    for name in &err.cycle {
        let mut diag = Diagnostic::error(
            DiagnosticKind::CircularDependency,
            format!("Circular dependency involved: kernel '{}'", name),
        )
        .with_kernel(name);
        if let Some(&index) = positions.get(name.as_str()) {
            diag = diag.at(index);
        }
        diagnostics.push(diag);
    }

    for name in &err.blocked {
        let mut diag = Diagnostic::error(
            DiagnosticKind::BlockedByCycle,
            format!(
                "Kernel '{}' cannot be scheduled because it depends on a cycle",
                name
            ),
        )
        .with_kernel(name);
        if let Some(&index) = positions.get(name.as_str()) {
            diag = diag.at(index);
        }
        diagnostics.push(diag);
    }
}

fn check_tool_fields(graph: &KernelGraph, diagnostics: &mut Vec<Diagnostic>) {
    for (index, kernel) in graph.kernels.iter().enumerate() {
        if kernel.tools_required {
            continue;
        }
        if !kernel.required_tool_types.is_empty() || !kernel.assigned_tools.is_empty() {
            let mut diag = Diagnostic::warning(
                DiagnosticKind::UnusedToolFields,
                format!(
                    "Kernel at index {} does not require tools but declares tool types or assigned tools",
                    index
                ),
            )
            .at(index);
            if !kernel.name.is_empty() {
                diag = diag.with_kernel(&kernel.name);
            }
            diagnostics.push(diag);
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
