//! Pipeline synthesis errors.

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Synthesis refused to build a pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    #[error("Kernel graph failed validation ({} error(s)): {}", .diagnostics.len(), first_message(.diagnostics))]
    InvalidGraph { diagnostics: Vec<Diagnostic> },

    #[error("Execution plan does not match the kernel graph: {0}")]
    PlanMismatch(String),

    #[error("Kernel '{kernel}' has unfulfilled tool types: {}", .tool_types.join(", "))]
    UnfulfilledTools {
        kernel: String,
        tool_types: Vec<String>,
    },
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.message.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    #[test]
    fn test_invalid_graph_display() {
        let err = SynthesisError::InvalidGraph {
            diagnostics: vec![Diagnostic::error(
                DiagnosticKind::DanglingDependency,
                "Kernel 'B' depends on non-existent kernel 'Z'",
            )],
        };
        let display = err.to_string();
        assert!(display.contains("1 error(s)"));
        assert!(display.contains("non-existent kernel 'Z'"));
    }

    #[test]
    fn test_unfulfilled_tools_display() {
        let err = SynthesisError::UnfulfilledTools {
            kernel: "Fetch".to_string(),
            tool_types: vec!["web_browser".to_string(), "api_client".to_string()],
        };
        assert!(err.to_string().contains("web_browser, api_client"));
    }
}
