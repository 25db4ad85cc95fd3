//! Command-line interface.

pub mod analyze;
pub mod completions;
pub mod experiment;
pub mod output;
pub mod report;
pub mod workflows;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::constants;
use crate::core::experiment::{Experiment, Params};
use crate::error::Result;

/// Maskrace - reproduce secret rotation leaks in CI log masking.
#[derive(Parser)]
#[command(
    name = "maskrace",
    about = "Reproduce mid-run secret rotation leaks in CI log masking",
    version,
    after_help = "A leak is a successful experiment: analyses exit 0 whatever the verdict."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Repository as OWNER/NAME (defaults to the current directory's repository)
    #[arg(long, env = "REPO", global = true)]
    pub repo: Option<String>,

    /// Branch the workflows are dispatched on
    #[arg(long, env = "BRANCH", default_value = "main", global = true)]
    pub branch: String,

    /// Wait window handed to the workflows, in seconds
    #[arg(long, env = "WAIT", default_value_t = 30, global = true)]
    pub wait: u64,

    /// Number of rotations in the rapid experiment
    #[arg(long, env = "RAPID", default_value_t = 15, global = true)]
    pub rapid: u32,

    /// Repository secret to rotate
    #[arg(long, env = "SECRET_NAME", default_value = constants::DEFAULT_SECRET, global = true)]
    pub secret: String,

    /// Timestamp suffix for marker values (defaults to now)
    #[arg(long, env = "STAMP", global = true)]
    pub stamp: Option<i64>,

    /// Experiment profile (defaults to .maskrace.toml when present)
    #[arg(long, env = "MASKRACE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Rotate after the capture job completes and print the job × version matrix
    CrossJob(RunArgs),

    /// Same as cross-job against a print job that references the secret
    Mitigated(RunArgs),

    /// Rotate after a fixed fraction of the wait window
    Late(RunArgs),

    /// Fire RAPID rotations after the capture job completes
    Rapid(RunArgs),

    /// Check encoded forms of the secret against masking
    Bypass(RunArgs),

    /// Classify a saved run log without calling the platform
    Analyze {
        /// Experiment whose markers to look for
        #[arg(value_enum)]
        experiment: Experiment,
        /// Path to the saved log
        #[arg(long)]
        log: PathBuf,
    },

    /// Install the bundled workflow definitions
    Workflows {
        /// Target directory
        #[arg(long, default_value = constants::WORKFLOW_DIR)]
        dir: PathBuf,
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by the experiment commands.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Also write the fetched run log to this file
    #[arg(long)]
    pub save_log: Option<PathBuf>,
}

/// Settings resolved from flags, environment and the profile.
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: Option<String>,
    pub branch: String,
    pub secret: String,
    pub stamp: Option<i64>,
    pub config: Config,
    pub params: Params,
}

impl Settings {
    /// Resolve settings, loading the experiment profile.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let params = Params {
            wait_secs: cli.wait,
            rapid: cli.rapid,
            timing: config.timing.clone(),
        };
        Ok(Self {
            repo: cli.repo.clone(),
            branch: cli.branch.clone(),
            secret: cli.secret.clone(),
            stamp: cli.stamp,
            config,
            params,
        })
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    match &cli.command {
        Workflows { dir, force } => workflows::execute(dir, &cli.secret, *force),
        Completions { shell } => completions::execute(*shell),
        Analyze { experiment, log } => {
            let settings = Settings::resolve(&cli)?;
            analyze::execute(*experiment, log, &settings)
        }
        CrossJob(args) => run(&cli, Experiment::CrossJob, args),
        Mitigated(args) => run(&cli, Experiment::Mitigated, args),
        Late(args) => run(&cli, Experiment::Late, args),
        Rapid(args) => run(&cli, Experiment::Rapid, args),
        Bypass(args) => run(&cli, Experiment::Bypass, args),
    }
}

fn run(cli: &Cli, kind: Experiment, args: &RunArgs) -> Result<()> {
    let settings = Settings::resolve(cli)?;
    experiment::execute(kind, args, &settings)
}
