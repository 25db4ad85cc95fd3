//! Maskrace - reproduce mid-run secret rotation leaks in CI log masking.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maskrace::cli::output;
use maskrace::cli::{execute, Cli};
use maskrace::error::{ConfigError, Error, SetupError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("MASKRACE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("maskrace=debug")
        } else {
            EnvFilter::new("maskrace=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}

/// Manual follow-up for errors the user can act on.
fn suggestion(e: &Error) -> Option<String> {
    match e {
        Error::Setup(SetupError::ToolMissing) => {
            Some("or point MASKRACE_GH at the gh binary".to_string())
        }
        Error::Setup(SetupError::SecretSet { .. }) => {
            Some("check write access with: gh secret list".to_string())
        }
        Error::Setup(SetupError::Trigger { workflow, .. }) => Some(format!(
            "is {} pushed? install it with: maskrace workflows",
            workflow
        )),
        Error::Setup(SetupError::RunNotFound {
            workflow, branch, ..
        }) => Some(format!(
            "inspect with: gh run list --workflow {} --branch {}",
            workflow, branch
        )),
        Error::Setup(SetupError::BarrierTimeout { run, .. }) => {
            Some(format!("inspect with: gh run view {}", run))
        }
        Error::Config(ConfigError::WorkflowExists(_)) => {
            Some("run: maskrace workflows --force".to_string())
        }
        _ => None,
    }
}
