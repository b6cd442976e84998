//! kube-reclaim - Clean up finished Pods and Jobs in Kubernetes.

use clap::Parser;
use reclaim_cli::commands::{self, run::EXIT_FAILURE};
use reclaim_cli::{logging, Cli, Command, FileConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    logging::init(cli.log_level);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> reclaim_cli::Result<u8> {
    match cli.command {
        Command::Run(args) => {
            let (file, source) = FileConfig::load(cli.config.as_deref())?;
            if let Some(path) = source {
                tracing::debug!(path = %path.display(), "Loaded config file");
            }
            commands::execute_run(args, &file).await
        }
        Command::Version(args) => {
            commands::execute_version(args)?;
            Ok(0)
        }
        Command::Completion(args) => {
            commands::execute_completion(args)?;
            Ok(0)
        }
    }
}
