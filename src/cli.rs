//! CLI definitions for KernelPlan.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// KernelPlan CLI.
#[derive(Parser)]
#[command(name = "kernelplan")]
#[command(about = "Compile kernel descriptions into validated, tool-bound agent pipelines")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "kernelplan.toml", global = true)]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check a kernel file for structural problems
    Validate {
        /// Kernel description (JSON)
        file: PathBuf,
    },

    /// Print the execution waves of a kernel file
    Order {
        /// Kernel description (JSON)
        file: PathBuf,
    },

    /// Bind tools to every kernel that needs them
    Assign {
        /// Kernel description (JSON)
        file: PathBuf,

        /// Output file (default: <stem>-enhanced.json next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a kernel file into a pipeline
    Compose {
        /// Kernel description (JSON)
        file: PathBuf,

        /// Write the pipeline JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a fast-agent workflow script
        #[arg(long)]
        script: Option<PathBuf>,

        /// Use the tools already assigned in the file
        #[arg(long)]
        no_bind: bool,
    },

    /// Print `fast-agent go` commands for each kernel
    Go {
        /// Kernel description (JSON)
        file: PathBuf,

        /// Only this kernel
        #[arg(short, long)]
        kernel: Option<String>,
    },

    /// Render the dependency graph as Graphviz DOT
    Visualize {
        /// Kernel description (JSON)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search the tool index and explain the matches
    Search {
        /// Natural-language query
        query: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compose() {
        let cli = Cli::try_parse_from([
            "kernelplan",
            "compose",
            "plan.json",
            "--script",
            "agent.py",
            "--no-bind",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("kernelplan.toml"));
        match cli.command {
            Commands::Compose {
                file,
                output,
                script,
                no_bind,
            } => {
                assert_eq!(file, PathBuf::from("plan.json"));
                assert!(output.is_none());
                assert_eq!(script, Some(PathBuf::from("agent.py")));
                assert!(no_bind);
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["kernelplan", "search", "web browser", "--config", "x.toml"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Search { query } if query == "web browser"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["kernelplan"]).is_err());
    }
}
