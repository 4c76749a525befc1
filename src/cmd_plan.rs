//! Subcommands that need no tool retrieval.

use std::path::Path;

use tracing::{info, warn};

use kernelplan_config::Config;
use kernelplan_core::{plan_document, render, PlanOutput};
use kernelplan_protocols::{KernelDocument, PlanError};

/// Load a kernel file and run validation and ordering.
pub(crate) fn load_plan(file: &Path) -> Result<PlanOutput, Box<dyn std::error::Error>> {
    let document = KernelDocument::load(file)?;
    info!("Loaded {} kernels from {}", document.kernels.len(), file.display());
    Ok(plan_document(document))
}

/// Print every diagnostic of a plan to stderr.
pub(crate) fn report_diagnostics(output: &PlanOutput) {
    for diagnostic in &output.report.diagnostics {
        eprintln!("{}", diagnostic);
    }
}

pub(crate) fn validation_failed(file: &Path, output: &PlanOutput) -> PlanError {
    PlanError::Validation(format!(
        "{} failed with {} error(s)",
        file.display(),
        output.report.error_count()
    ))
}

pub(crate) fn validate(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let output = load_plan(file)?;
    report_diagnostics(&output);

    if !output.report.valid {
        return Err(validation_failed(file, &output).into());
    }
    println!("{}: {} kernels, valid", file.display(), output.graph.len());
    Ok(())
}

pub(crate) fn order(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let output = load_plan(file)?;
    report_diagnostics(&output);

    let plan = match output.plan {
        Ok(plan) => plan,
        Err(err) => {
            let unplaced: Vec<&str> = err.unplaced().collect();
            eprintln!("Cannot order: {}", unplaced.join(", "));
            return Err(err.into());
        }
    };
    for (i, wave) in plan.waves().iter().enumerate() {
        println!("Wave {}: {}", i + 1, wave.join(", "));
    }
    println!("Execution order: {}", plan.linear_order().join(" -> "));
    Ok(())
}

pub(crate) fn go(
    file: &Path,
    kernel: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = load_plan(file)?;
    let model = config.synthesis.model.as_str();

    match kernel {
        Some(name) => {
            let Some(found) = output.graph.get(name) else {
                let available: Vec<&str> = output
                    .graph
                    .unique_kernels()
                    .into_iter()
                    .map(|(_, k)| k.name.as_str())
                    .collect();
                return Err(format!(
                    "Kernel '{}' not found. Available kernels: {}",
                    name,
                    available.join(", ")
                )
                .into());
            };
            println!("{}", render::go_command(found, model));
        }
        None => {
            for (name, command) in render::go_commands(&output.graph, model) {
                println!("# {}", name);
                println!("{}", command);
            }
        }
    }
    Ok(())
}

pub(crate) fn visualize(file: &Path, out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let output = load_plan(file)?;
    if !output.report.valid {
        warn!("Rendering a graph that failed validation");
    }

    let dot = render::dot(&output.graph);
    match out {
        Some(path) => {
            std::fs::write(path, dot)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", dot),
    }
    Ok(())
}
