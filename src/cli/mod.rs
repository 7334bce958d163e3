//! CLI argument parsing for crewl.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Crewl: minimal sequential pipeline runner for LLM-backed research crews.
///
/// Five agents and five tasks are wired into one fixed chain from two YAML
/// files; generation knobs (MODEL, MAX_TOKENS, MAX_ITER, MAX_RPM) come from
/// the environment; execution is delegated to a runner command you supply.
#[derive(Parser, Debug)]
#[command(name = "crewl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for crewl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute the pipeline end to end.
    ///
    /// Builds the crew from the config files and the environment, runs the
    /// five tasks in order through the runner command, and writes the
    /// terminal task's output to the report file.
    Run(RunArgs),

    /// Show the resolved pipeline without executing anything.
    ///
    /// Prints the settings, agents, task chain with context edges, and the
    /// report path.
    Plan(PlanArgs),

    /// Validate the configuration files and environment.
    ///
    /// Loads both YAML files, resolves the environment knobs, and assembles
    /// the crew; reports the first problem found.
    Check(CheckArgs),
}

/// Config file locations, shared by every command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to the agents configuration file.
    #[arg(long, default_value = "config/agents.yaml")]
    pub agents: PathBuf,

    /// Path to the tasks configuration file.
    #[arg(long, default_value = "config/tasks.yaml")]
    pub tasks: PathBuf,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Runner command template executed per task, with {model},
    /// {max_tokens}, {max_iter}, {agent}, {task}, and {prompt_file}
    /// placeholders. Example: 'llm -m {model} -o max_tokens {max_tokens} -f {prompt_file}'
    #[arg(long)]
    pub runner: String,

    /// Override the report path declared by the terminal task.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for composed prompts, captured runner output, and the run
    /// log.
    #[arg(long, default_value = ".crewl")]
    pub work_dir: PathBuf,

    /// Per-task timeout in seconds.
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    /// Suppress per-task progress output.
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}
