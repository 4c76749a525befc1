//! Structured validation findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The check that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required field was absent from the input document.
    MissingField,
    /// A field was present but could not be interpreted.
    InvalidField,
    /// A kernel has an empty name.
    MissingName,
    /// A kernel name was already used by an earlier kernel.
    DuplicateName,
    /// A dependency names a kernel that does not exist.
    DanglingDependency,
    /// A kernel depends on itself.
    SelfDependency,
    /// A kernel lies on a dependency cycle.
    CircularDependency,
    /// A kernel cannot be placed because it depends on a cycle.
    BlockedByCycle,
    /// Tool fields are set on a kernel that does not require tools.
    UnusedToolFields,
    /// The graph has no kernels.
    EmptyGraph,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Name of the kernel the finding is about, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    /// Position of the kernel in the input sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            kernel: None,
            index: None,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            kernel: None,
            index: None,
            message: message.into(),
        }
    }

    /// Attach the kernel name.
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = Some(kernel.into());
        self
    }

    /// Attach the kernel position.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.index {
            Some(index) => write!(f, "{}[kernel #{}]: {}", level, index, self.message),
            None => write!(f, "{}: {}", level, self.message),
        }
    }
}
