
    use super::*;
    use async_trait::async_trait;
    use kernelplan_protocols::{DiagnosticKind, RetrievalError, ToolCandidate};

    struct EchoRetriever;

    #[async_trait]
    impl ToolRetriever for EchoRetriever {
        async fn retrieve(&self, query: &str) -> Result<Vec<ToolCandidate>, RetrievalError> {
            Ok(vec![ToolCandidate::new(
                format!("{}-server", query),
                format!("Serves {}", query),
                0.75,
            )])
        }
    }

    fn compiler() -> Compiler {
        Compiler::new(Arc::new(EchoRetriever), Config::default())
    }

    const PLAN: &str = r#"{
      "name": "news_digest",
      "summary": "Collect and summarize today's news",
      "kernels": [
        {
          "name": "Fetch News",
          "agent_type": "researcher",
          "description": "Fetch the latest headlines",
          "tools_required": true,
          "required_tool_types": ["web_browser"]
        },
        {
          "name": "Summarize",
          "agent_type": "writer",
          "description": "Summarize the articles",
          "dependencies": ["Fetch News"]
        }
      ]
    }"#;

    #[tokio::test]
    async fn test_compile_end_to_end() {
        let document = KernelDocument::from_json(PLAN).unwrap();
        let output = compiler().compile(document).await;

        assert!(output.is_success());
        assert!(output.warnings.is_empty());
        assert_eq!(output.graph.kernels[0].servers(), vec!["web_browser-server"]);

        let plan = output.plan.unwrap();
        assert_eq!(plan.linear_order(), vec!["Fetch News", "Summarize"]);

        let pipeline = output.pipeline.unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.stages[0].servers, vec!["web_browser-server"]);
        assert!(pipeline.is_chain());
    }

    #[tokio::test]
    async fn test_boundary_diagnostics_come_first() {
        let document = KernelDocument::from_json(
            r#"{"kernels": [
                {"name": "A", "description": "a"},
                {"name": "B", "agent_type": "w", "description": "b", "dependencies": ["Z"]}
            ]}"#,
        )
        .unwrap();
        let output = compiler().compile(document).await;

        assert!(!output.report.valid);
        let kinds: Vec<DiagnosticKind> = output.report.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::MissingField, DiagnosticKind::DanglingDependency]
        );
        assert!(matches!(
            output.pipeline,
            Err(SynthesisError::InvalidGraph { .. })
        ));
    }

    #[tokio::test]
    async fn test_cycle_still_binds_but_refuses_pipeline() {
        let document = KernelDocument::from_json(
            r#"{"kernels": [
                {"name": "X", "agent_type": "w", "description": "x", "dependencies": ["Y"],
                 "tools_required": true, "required_tool_types": ["database"]},
                {"name": "Y", "agent_type": "w", "description": "y", "dependencies": ["X"]}
            ]}"#,
        )
        .unwrap();
        let output = compiler().compile(document).await;

        let err = output.plan.as_ref().unwrap_err();
        assert_eq!(err.cycle, vec!["X", "Y"]);
        assert_eq!(output.graph.kernels[0].servers(), vec!["database-server"]);
        assert!(output.pipeline.is_err());
        assert!(!output.is_success());
    }

    #[test]
    fn test_plan_without_binding() {
        let document = KernelDocument::from_json(PLAN).unwrap();
        let output = compiler().plan(document);

        assert!(output.report.valid);
        assert_eq!(output.plan.unwrap().wave_count(), 2);
        assert!(output.graph.kernels[0].assigned_tools.is_empty());
    }

    #[test]
    fn test_invalid_tools_required_is_reported() {
        let document = KernelDocument::from_json(
            r#"{"kernels": [
                {"name": "A", "agent_type": "w", "description": "a", "tools_required": "maybe"}
            ]}"#,
        )
        .unwrap();
        let output = plan_document(document);

        assert!(!output.report.valid);
        assert_eq!(output.report.diagnostics[0].kind, DiagnosticKind::InvalidField);
        assert!(!output.graph.kernels[0].tools_required);
    }
