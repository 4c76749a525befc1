//! `fast-agent go` command lines.

use kernelplan_protocols::{Kernel, KernelGraph};

use super::escape_quoted;

/// One `fast-agent go` command for a kernel.
pub fn go_command(kernel: &Kernel, model: &str) -> String {
    let mut parts = vec![
        "fast-agent".to_string(),
        "go".to_string(),
        format!("--model={}", model),
        format!("--name=\"{}\"", escape_quoted(&kernel.name)),
    ];
    if !kernel.description.is_empty() {
        parts.push(format!(
            "--instruction=\"{}\"",
            escape_quoted(&kernel.description)
        ));
    }
    let servers = kernel.servers();
    if !servers.is_empty() {
        parts.push(format!("--servers={}", servers.join(",")));
    }
    parts.join(" ")
}

/// Commands for every named kernel, in input order.
pub fn go_commands(graph: &KernelGraph, model: &str) -> Vec<(String, String)> {
    graph
        .unique_kernels()
        .into_iter()
        .map(|(_, kernel)| (kernel.name.clone(), go_command(kernel, model)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernelplan_protocols::AssignedTool;

    #[test]
    fn test_go_command_with_servers() {
        let mut kernel = Kernel::new("Fetch News", "researcher", "Fetch the \"top\" stories")
            .with_tool_types(["web_browser", "api_client"]);
        kernel.assigned_tools = vec![
            AssignedTool::new("fetch", "", 0.9, "web_browser"),
            AssignedTool::new("nyt", "", 0.8, "api_client"),
        ];

        assert_eq!(
            go_command(&kernel, "openai.gpt-4.1-nano"),
            r#"fast-agent go --model=openai.gpt-4.1-nano --name="Fetch News" --instruction="Fetch the \"top\" stories" --servers=fetch,nyt"#
        );
    }

    #[test]
    fn test_go_command_without_servers_or_description() {
        let kernel = Kernel::new("Think", "planner", "");
        assert_eq!(
            go_command(&kernel, "m"),
            r#"fast-agent go --model=m --name="Think""#
        );
    }

    #[test]
    fn test_go_commands_skip_duplicates() {
        let graph = KernelGraph::new(vec![
            Kernel::new("A", "w", "a"),
            Kernel::new("", "w", "nameless"),
            Kernel::new("A", "w", "again"),
            Kernel::new("B", "w", "b"),
        ]);
        let commands = go_commands(&graph, "m");
        let names: Vec<&str> = commands.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(commands[0].1.contains("--instruction=\"a\""));
    }
}
