//! Completion command implementation.

use crate::cli::{Cli, CompletionArgs};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

/// Binary name used in generated scripts
const BIN_NAME: &str = "kube-reclaim";

/// Write the completion script for `shell`
pub fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, BIN_NAME, out);
}

/// Execute the completion command.
pub fn execute_completion(args: CompletionArgs) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_completion(args.shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}
