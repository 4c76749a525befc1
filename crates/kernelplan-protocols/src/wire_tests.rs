
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    const NEWS_PLAN: &str = r#"{
      "name": "news_digest",
      "summary": "Collect and summarize today's news",
      "execution_sequence": "Fetch News -> Summarize",
      "kernels": [
        {
          "name": "Fetch News",
          "agent_type": "researcher",
          "description": "Fetch the latest headlines",
          "inputs": ["topic"],
          "outputs": ["articles"],
          "dependencies": [],
          "tools_required": "True",
          "required_tool_types": ["web_browser", "api_client"],
          "priority": "high"
        },
        {
          "name": "Summarize",
          "agent_type": "writer",
          "description": "Summarize the articles",
          "dependencies": ["Fetch News"],
          "tools_required": false
        }
      ],
      "author": "planner"
    }"#;

    #[test]
    fn test_parse_and_convert() {
        let doc = KernelDocument::from_json(NEWS_PLAN).unwrap();
        let loaded = doc.into_graph();
        assert!(loaded.diagnostics.is_empty());

        let graph = loaded.graph;
        assert_eq!(graph.name.as_deref(), Some("news_digest"));
        assert_eq!(graph.len(), 2);

        let fetch = graph.get("Fetch News").unwrap();
        assert!(fetch.tools_required);
        assert_eq!(fetch.required_tool_types, vec!["web_browser", "api_client"]);
        assert_eq!(fetch.inputs, vec!["topic"]);

        let summarize = graph.get("Summarize").unwrap();
        assert!(!summarize.tools_required);
        assert_eq!(summarize.dependencies, vec!["Fetch News"]);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let graph = KernelDocument::from_json(NEWS_PLAN).unwrap().into_graph().graph;
        assert_eq!(graph.extra["author"], "planner");
        assert_eq!(graph.kernels[0].extra["priority"], "high");

        let json = graph.to_document().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["author"], "planner");
        assert_eq!(value["kernels"][0]["priority"], "high");
    }

    #[test]
    fn test_missing_kernels_is_document_error() {
        let result = KernelDocument::from_json(r#"{"name": "empty"}"#);
        assert!(matches!(result, Err(DocumentError::MissingKernels)));
    }

    #[test]
    fn test_invalid_json_is_document_error() {
        let result = KernelDocument::from_json("{not json");
        assert!(matches!(result, Err(DocumentError::Json(_))));
    }

    #[test]
    fn test_missing_required_fields_become_diagnostics() {
        let doc = KernelDocument::from_json(
            r#"{"kernels": [{"agent_type": "writer"}, {"name": "B"}]}"#,
        )
        .unwrap();
        let loaded = doc.into_graph();

        let kinds: Vec<_> = loaded.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::MissingField,
                DiagnosticKind::MissingField,
                DiagnosticKind::MissingField,
                DiagnosticKind::MissingField,
            ]
        );
        assert_eq!(loaded.diagnostics[0].index, Some(0));
        assert!(loaded.diagnostics[0].message.contains("has no name"));
        assert_eq!(loaded.diagnostics[2].kernel.as_deref(), Some("B"));
        assert!(loaded.graph.kernels[0].name.is_empty());
    }

    #[test]
    fn test_tools_required_string_forms() {
        assert_eq!(ToolsRequired::Text("TRUE".into()).as_bool(), Some(true));
        assert_eq!(ToolsRequired::Text(" false ".into()).as_bool(), Some(false));
        assert_eq!(ToolsRequired::Text("yes".into()).as_bool(), None);
        assert_eq!(ToolsRequired::Flag(true).as_bool(), Some(true));
    }

    #[test]
    fn test_invalid_tools_required_is_reported() {
        let doc = KernelDocument::from_json(
            r#"{"kernels": [{"name": "A", "agent_type": "t", "description": "d", "tools_required": "maybe"}]}"#,
        )
        .unwrap();
        let loaded = doc.into_graph();
        assert_eq!(loaded.diagnostics.len(), 1);
        assert_eq!(loaded.diagnostics[0].kind, DiagnosticKind::InvalidField);
        assert!(!loaded.graph.kernels[0].tools_required);
    }

    #[test]
    fn test_null_lists_are_empty() {
        let doc = KernelDocument::from_json(
            r#"{"kernels": [{"name": "A", "agent_type": "t", "description": "d", "dependencies": null, "required_tool_types": null}]}"#,
        )
        .unwrap();
        let graph = doc.into_graph().graph;
        assert!(graph.kernels[0].dependencies.is_empty());
        assert!(graph.kernels[0].required_tool_types.is_empty());
    }

    #[test]
    fn test_output_adds_derived_tool_fields() {
        let mut graph = KernelDocument::from_json(NEWS_PLAN).unwrap().into_graph().graph;
        graph.kernels[0].assigned_tools = vec![
            AssignedTool::new("browser1", "Browser", 0.9, "web_browser"),
            AssignedTool::new("newsapi", "News API", 0.8, "api_client"),
        ];

        let value = serde_json::to_value(graph.to_document()).unwrap();
        let fetch = &value["kernels"][0];
        assert_eq!(fetch["servers"], serde_json::json!(["browser1", "newsapi"]));
        assert_eq!(fetch["tool_types_assigned"]["api_client"], serde_json::json!(["newsapi"]));
        assert_eq!(fetch["assigned_tools"][0]["name"], "browser1");
        assert_eq!(fetch["tools_required"], true);

        let summarize = &value["kernels"][1];
        assert_eq!(summarize["servers"], serde_json::json!([]));
        assert_eq!(summarize["assigned_tools"], serde_json::json!([]));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("kernelplan-wire-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plan.json");
        std::fs::write(&path, NEWS_PLAN).unwrap();

        let doc = KernelDocument::load(&path).unwrap();
        assert_eq!(doc.kernels.len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let result = KernelDocument::load(Path::new("/nonexistent/kernelplan/plan.json"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
