//! Subcommands that bind tools.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use kernelplan_config::Config;
use kernelplan_core::{render, Compiler, Pipeline, PipelineSynthesizer, ToolBinder};
use kernelplan_protocols::{KernelDocument, ToolRetriever};
use kernelplan_retrieval::explain;

use crate::cmd_plan::{load_plan, report_diagnostics, validation_failed};
use crate::retriever::build_retriever;

/// `<stem>-enhanced.json` next to the input file.
pub(crate) fn enhanced_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "kernels".to_string());
    file.with_file_name(format!("{}-enhanced.json", stem))
}

pub(crate) async fn assign(
    file: &Path,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(file)?;
    report_diagnostics(&plan);

    let retriever = build_retriever(config).await?;
    let binder = ToolBinder::new(retriever, config.binder.clone());
    let outcome = binder.bind(&plan.graph).await;

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }

    let output = output.unwrap_or_else(|| enhanced_path(file));
    let json = outcome.graph.to_document().to_json_pretty()?;
    std::fs::write(&output, json)?;

    for kernel in &outcome.graph.kernels {
        if kernel.tools_required {
            println!("{}: {}", kernel.name, kernel.servers().join(", "));
        }
    }
    println!("Wrote {}", output.display());
    Ok(())
}

pub(crate) async fn compose(
    file: &Path,
    output: Option<PathBuf>,
    script: Option<PathBuf>,
    no_bind: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = if no_bind {
        let plan = load_plan(file)?;
        report_diagnostics(&plan);
        if !plan.report.valid {
            return Err(validation_failed(file, &plan).into());
        }
        let order = plan.plan?;
        PipelineSynthesizer::new(config.synthesis.clone()).synthesize(&plan.graph, &order)?
    } else {
        let document = KernelDocument::load(file)?;
        let retriever = build_retriever(config).await?;
        let compiled = Compiler::new(retriever, config.clone()).compile(document).await;

        for diagnostic in &compiled.report.diagnostics {
            eprintln!("{}", diagnostic);
        }
        for warning in &compiled.warnings {
            eprintln!("warning: {}", warning);
        }
        compiled.pipeline?
    };

    write_pipeline(&pipeline, output.as_deref())?;
    if let Some(path) = script {
        std::fs::write(&path, render::agent_script(&pipeline))?;
        make_executable(&path);
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_pipeline(pipeline: &Pipeline, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(pipeline)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Wrote pipeline with {} stages", pipeline.len());
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)) {
        warn!("Could not make {} executable: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

pub(crate) async fn search(query: &str, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let retriever = build_retriever(config).await?;
    let candidates = retriever.retrieve(query).await?;
    println!("{}", explain(query, &candidates));
    Ok(())
}
