//! Shell completions for every experiment subcommand and global flag.

use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::Cli;
use crate::error::Result;

/// Print the completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    render(shell, &mut std::io::stdout())
}

/// Write the completion script for `shell` into `out`.
pub fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
    out.flush()?;
    Ok(())
}
