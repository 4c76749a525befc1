//! fast-agent workflow script.

use std::fmt::Write;

use crate::synthesize::{Pipeline, PipelineMode, Stage};

use super::escape_quoted;

/// Render a pipeline as a runnable fast-agent Python workflow.
pub fn agent_script(pipeline: &Pipeline) -> String {
    let mut out = String::new();
    let summary = if pipeline.instruction.is_empty() {
        "Generated workflow from kernel definitions"
    } else {
        pipeline.instruction.as_str()
    };

    out.push_str("#!/usr/bin/env python3\n");
    let _ = writeln!(out, "\"\"\"\n{}\n\nGenerated by kernelplan\n\"\"\"", escape_docstring(summary));
    out.push_str("\nimport asyncio\n");
    out.push_str("from mcp_agent.core.fastagent import FastAgent\n\n");
    let _ = writeln!(out, "fast = FastAgent(name=\"{}\")\n", escape_quoted(&pipeline.name));

    for stage in &pipeline.stages {
        render_stage(&mut out, stage, &pipeline.model);
    }

    if let PipelineMode::Chain {
        name,
        sequence,
        cumulative,
    } = &pipeline.mode
    {
        let sequence = sequence
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("\n@fast.chain(\n");
        let _ = writeln!(out, "    name=\"{}\",", name);
        let _ = writeln!(out, "    sequence=[{}],", sequence);
        let _ = writeln!(out, "    instruction=\"{}\",", escape_quoted(summary));
        let _ = writeln!(out, "    cumulative={},", if *cumulative { "True" } else { "False" });
        out.push_str(")\n");
    }

    out.push_str("\n\nasync def main() -> None:\n");
    out.push_str("    async with fast.run() as agent:\n");
    match &pipeline.mode {
        PipelineMode::Chain { name, .. } => {
            let _ = writeln!(out, "        result = await agent.{}.send(\"\")", name);
            out.push_str("        print(result)\n");
        }
        PipelineMode::Single { entry: Some(id) } => {
            let _ = writeln!(out, "        await agent.{}.interactive()", id);
        }
        PipelineMode::Single { entry: None } => {
            out.push_str("        await agent.interactive()\n");
        }
    }

    out.push_str("\n\nif __name__ == \"__main__\":\n");
    out.push_str("    asyncio.run(main())\n");
    out
}

fn render_stage(out: &mut String, stage: &Stage, model: &str) {
    out.push_str("@fast.agent(\n");
    let _ = writeln!(out, "    name=\"{}\",", stage.id);
    let _ = writeln!(
        out,
        "    instruction=\"\"\"{}\"\"\",",
        escape_docstring(&stage.instruction)
    );
    if !stage.servers.is_empty() {
        let servers = stage
            .servers
            .iter()
            .map(|s| format!("\"{}\"", escape_quoted(s)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "    servers=[{}],", servers);
    }
    let _ = writeln!(out, "    model=\"{}\",", escape_quoted(model));
    out.push_str(")\n");
}

/// Escape text for a triple-quoted Python string.
fn escape_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}
