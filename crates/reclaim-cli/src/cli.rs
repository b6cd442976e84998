//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// kube-reclaim - Clean up finished Pods and Jobs in Kubernetes.
#[derive(Debug, Parser)]
#[command(name = "kube-reclaim")]
#[command(version, about, long_about = None)]
#[command(after_help = "Environment variables:\n  KUBECONFIG\tPath to kubeconfig file(s)\n  RUST_LOG\tOverrides --log-level")]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(long, global = true, env = "KUBE_RECLAIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan and delete old Pods and Jobs (dry-run by default)
    Run(RunArgs),

    /// Print version information
    Version(VersionArgs),

    /// Print a shell completion script
    Completion(CompletionArgs),
}

/// Arguments for the run command.
///
/// Every option is optional here; unset options fall back to the config
/// file and then to the built-in defaults.
#[derive(Debug, Default, Parser)]
pub struct RunArgs {
    /// Simulate without deleting [default: true]
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub dry_run: Option<bool>,

    /// Age threshold, e.g. 30m, 24h, 7d [default: 24h]
    #[arg(long)]
    pub older_than: Option<String>,

    /// Resource kinds: pod,job [default: pod,job]
    #[arg(long = "kind", value_delimiter = ',')]
    pub kinds: Option<Vec<String>>,

    /// Target namespace [default: default]
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Process all namespaces
    #[arg(short = 'A', long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub all_namespaces: Option<bool>,

    /// Namespaces to skip with --all-namespaces [default: kube-system,kube-public]
    #[arg(long = "exclude-ns", value_delimiter = ',')]
    pub exclude_namespaces: Option<Vec<String>>,

    /// Label selector pushed to the API server
    #[arg(short = 'l', long)]
    pub label_selector: Option<String>,

    /// Field selector pushed to the API server
    #[arg(long)]
    pub field_selector: Option<String>,

    /// Include completed pods and jobs [default: true]
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub completed: Option<bool>,

    /// Include failed pods and jobs [default: true]
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub failed: Option<bool>,

    /// Include evicted pods [default: true]
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub evicted: Option<bool>,

    /// Protect resources with this label, key[=value]; empty disables [default: keep=true]
    #[arg(long = "protect")]
    pub protect_label: Option<String>,

    /// Concurrent deletions [default: 10]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write NDJSON audit events to this file
    #[arg(long)]
    pub audit_file: Option<PathBuf>,

    /// Exit with code 2 when a dry-run finds candidates
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub exit_nonzero_on_changes: Option<bool>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Give up if connecting and scanning take longer than this
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

/// Arguments for the version command.
#[derive(Debug, Parser)]
pub struct VersionArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print only the version number
    #[arg(long)]
    pub short: bool,

    /// Show commit, build date and target
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the completion command.
#[derive(Debug, Parser)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Debugging detail
    Debug,
    /// Normal operation
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Directive name understood by `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
