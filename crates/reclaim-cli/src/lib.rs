//! kube-reclaim CLI library.
//!
//! Argument parsing, config file merging, output rendering, the audit trail
//! and the command implementations behind the `kube-reclaim` binary.

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{FileConfig, OutputFormat, RunSettings};
pub use error::{CliError, Result};
pub use output::Formatter;
