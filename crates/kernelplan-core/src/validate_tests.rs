
    use super::*;
    use kernelplan_protocols::{AssignedTool, Kernel, Severity};

    fn kernel(name: &str, deps: &[&str]) -> Kernel {
        Kernel::new(name, "worker", "does work").with_dependencies(deps.iter().copied())
    }

    fn kinds(report: &ValidationReport) -> Vec<DiagnosticKind> {
        report.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_valid_graph() {
        let graph = KernelGraph::new(vec![
            kernel("A", &[]),
            kernel("B", &[]),
            kernel("C", &["A", "B"]),
        ]);
        let report = validate(&graph);
        assert!(report.valid);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_dangling_dependency() {
        let graph = KernelGraph::new(vec![kernel("A", &[]), kernel("B", &["Z"])]);
        let report = validate(&graph);

        assert!(!report.valid);
        assert_eq!(report.diagnostics.len(), 1);
        let diag = &report.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::DanglingDependency);
        assert_eq!(diag.kernel.as_deref(), Some("B"));
        assert_eq!(diag.index, Some(1));
        assert!(diag.message.contains("non-existent kernel 'Z'"));
    }

    #[test]
    fn test_cycle_reported_for_every_member() {
        let graph = KernelGraph::new(vec![
            kernel("X", &["Z"]),
            kernel("Y", &["X"]),
            kernel("Z", &["Y"]),
        ]);
        let report = validate(&graph);

        assert!(!report.valid);
        let cyclic: Vec<&str> = report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::CircularDependency)
            .filter_map(|d| d.kernel.as_deref())
            .collect();
        assert_eq!(cyclic, vec!["X", "Y", "Z"]);
        assert!(
            report
                .diagnostics
                .iter()
                .all(|d| d.message.contains("Circular dependency involved"))
        );
    }

    #[test]
    fn test_blocked_kernels_reported_separately() {
        let graph = KernelGraph::new(vec![
            kernel("X", &["Y"]),
            kernel("Y", &["X"]),
            kernel("After", &["X"]),
        ]);
        let report = validate(&graph);

        assert_eq!(
            kinds(&report),
            vec![
                DiagnosticKind::CircularDependency,
                DiagnosticKind::CircularDependency,
                DiagnosticKind::BlockedByCycle,
            ]
        );
        assert_eq!(report.diagnostics[2].kernel.as_deref(), Some("After"));
        assert_eq!(report.diagnostics[2].index, Some(2));
    }

    #[test]
    fn test_self_dependency() {
        let graph = KernelGraph::new(vec![kernel("A", &["A"])]);
        let report = validate(&graph);

        assert!(!report.valid);
        assert_eq!(
            kinds(&report),
            vec![
                DiagnosticKind::SelfDependency,
                DiagnosticKind::CircularDependency,
            ]
        );
    }

    #[test]
    fn test_duplicate_name_reported_at_later_position() {
        let graph = KernelGraph::new(vec![
            kernel("A", &[]),
            kernel("B", &["A"]),
            kernel("A", &["Ghost"]),
        ]);
        let report = validate(&graph);

        assert!(!report.valid);
        assert_eq!(kinds(&report), vec![DiagnosticKind::DuplicateName]);
        assert_eq!(report.diagnostics[0].index, Some(2));
        assert!(report.diagnostics[0].message.contains("index 0"));
    }

    #[test]
    fn test_missing_name() {
        let graph = KernelGraph::new(vec![kernel("", &[]), kernel("B", &[])]);
        let report = validate(&graph);

        assert!(!report.valid);
        assert_eq!(kinds(&report), vec![DiagnosticKind::MissingName]);
        assert_eq!(report.diagnostics[0].index, Some(0));
        assert!(report.diagnostics[0].kernel.is_none());
    }

    #[test]
    fn test_all_issues_reported_in_one_pass() {
        let graph = KernelGraph::new(vec![
            kernel("", &[]),
            kernel("A", &["Missing"]),
            kernel("A", &[]),
            kernel("L", &["L"]),
        ]);
        let report = validate(&graph);

        let found = kinds(&report);
        assert!(found.contains(&DiagnosticKind::MissingName));
        assert!(found.contains(&DiagnosticKind::DuplicateName));
        assert!(found.contains(&DiagnosticKind::DanglingDependency));
        assert!(found.contains(&DiagnosticKind::SelfDependency));
        assert!(found.contains(&DiagnosticKind::CircularDependency));
        assert_eq!(report.error_count(), 5);
    }

    #[test]
    fn test_unused_tool_fields_is_warning() {
        let mut k = kernel("A", &[]);
        k.required_tool_types = vec!["web_browser".to_string()];
        let mut other = kernel("B", &[]);
        other.assigned_tools = vec![AssignedTool::new("fetch", "Fetch pages", 0.8, "general")];
        let report = validate(&KernelGraph::new(vec![k, other]));

        assert!(report.valid);
        assert_eq!(
            kinds(&report),
            vec![
                DiagnosticKind::UnusedToolFields,
                DiagnosticKind::UnusedToolFields,
            ]
        );
        assert!(report.diagnostics.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_tool_fields_allowed_when_required() {
        let k = kernel("A", &[]).with_tool_types(["web_browser"]);
        let report = validate(&KernelGraph::new(vec![k]));
        assert!(report.valid);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_graph_is_valid_with_warning() {
        let report = validate(&KernelGraph::default());
        assert!(report.valid);
        assert_eq!(kinds(&report), vec![DiagnosticKind::EmptyGraph]);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_prepend_recomputes_validity() {
        let mut report = validate(&KernelGraph::new(vec![kernel("A", &[])]));
        assert!(report.valid);

        report.prepend(vec![
            Diagnostic::error(DiagnosticKind::MissingField, "missing agent_type").at(0),
        ]);
        assert!(!report.valid);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MissingField);
    }

    #[test]
    fn test_report_serializes() {
        let report = validate(&KernelGraph::new(vec![kernel("B", &["Z"])]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["diagnostics"][0]["kind"], "dangling_dependency");
        assert_eq!(json["diagnostics"][0]["severity"], "error");
    }
