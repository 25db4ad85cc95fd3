//! Error types.
//!
//! Setup failures abort an experiment. Everything that happens after the
//! run has been discovered is swallowed by the orchestrator and never
//! reaches this module.

use thiserror::Error;

/// Top-level error returned by every fallible operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal failures before the experiment has anything to observe.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("gh CLI not found: install it from https://cli.github.com/")]
    ToolMissing,

    #[error("failed to set secret {name}: {reason}")]
    SecretSet { name: String, reason: String },

    #[error("failed to trigger workflow {workflow}: {reason}")]
    Trigger { workflow: String, reason: String },

    #[error("no active run of {workflow} on {branch} after {attempts} attempts")]
    RunNotFound {
        workflow: String,
        branch: String,
        attempts: u32,
    },

    #[error("job {job} of run {run} did not complete after {attempts} attempts")]
    BarrierTimeout { run: u64, job: String, attempts: u32 },
}

/// A single call to the CI command-line tool failed.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to `gh {command}`: {source}")]
    Stdin {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`gh {command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("unexpected output from `gh {command}`: {source}")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("log file not found: {0}")]
    LogNotFound(String),

    #[error("{0} already exists (use --force to overwrite)")]
    WorkflowExists(String),
}

pub type Result<T> = std::result::Result<T, Error>;
