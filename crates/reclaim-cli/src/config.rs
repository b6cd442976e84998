//! Configuration file loading and flag merging.
//!
//! Precedence for every `run` setting is: explicit flag, then config file,
//! then the built-in default.

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use reclaim_engine::config::{DEFAULT_CONCURRENCY, DEFAULT_EXCLUDED_NAMESPACES};
use reclaim_engine::{ExecutionOptions, ReclaimConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "kube-reclaim.toml";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table and summary
    #[default]
    Text,
    /// Pretty JSON
    Json,
}

/// Settings read from a config file. Keys mirror the `run` flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileConfig {
    /// Simulate without deleting
    pub dry_run: Option<bool>,
    /// Age threshold
    pub older_than: Option<String>,
    /// Resource kinds
    pub kinds: Option<Vec<String>>,
    /// Target namespace
    pub namespace: Option<String>,
    /// Process all namespaces
    pub all_namespaces: Option<bool>,
    /// Namespaces to skip with `allNamespaces`
    pub exclude_namespaces: Option<Vec<String>>,
    /// Label selector
    pub label_selector: Option<String>,
    /// Field selector
    pub field_selector: Option<String>,
    /// Include completed resources
    pub completed: Option<bool>,
    /// Include failed resources
    pub failed: Option<bool>,
    /// Include evicted pods
    pub evicted: Option<bool>,
    /// Protect label, `key[=value]`
    pub protect_label: Option<String>,
    /// Concurrent deletions
    pub concurrency: Option<usize>,
    /// Output format
    pub output: Option<OutputFormat>,
    /// NDJSON audit file
    pub audit_file: Option<PathBuf>,
    /// Exit 2 when a dry-run finds candidates
    pub exit_non_zero_on_changes: Option<bool>,
    /// Kubeconfig context
    pub context: Option<String>,
}

impl FileConfig {
    /// Default search path: `./kube-reclaim.toml`, then
    /// `~/.config/kube-reclaim/config.toml`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("kube-reclaim").join("config.toml"));
        }
        paths
    }

    /// Load the explicit file, or the first file found on the search path
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        Self::load_from(explicit, &Self::search_paths())
    }

    /// Like [`load`](Self::load) with a caller-supplied search path
    ///
    /// An explicit path must exist. Missing search-path files are skipped;
    /// one that exists but does not parse is an error.
    pub fn load_from(explicit: Option<&Path>, search: &[PathBuf]) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let contents = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
            return Ok((Self::parse(path, &contents)?, Some(path.to_path_buf())));
        }

        for path in search {
            match fs::read_to_string(path) {
                Ok(contents) => return Ok((Self::parse(path, &contents)?, Some(path.clone()))),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(CliError::ConfigRead {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok((Self::default(), None))
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings for one `run` invocation
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Candidate selection
    pub reclaim: ReclaimConfig,
    /// Dry-run and concurrency
    pub options: ExecutionOptions,
    /// Output format
    pub output: OutputFormat,
    /// NDJSON audit file
    pub audit_file: Option<PathBuf>,
    /// Exit 2 when a dry-run finds candidates
    pub exit_nonzero_on_changes: bool,
    /// Kubeconfig context; `None` infers
    pub context: Option<String>,
    /// Limit on connecting and scanning
    pub timeout: Option<Duration>,
}

impl RunSettings {
    /// Merge flags over file values over defaults and validate
    pub fn resolve(args: &RunArgs, file: &FileConfig) -> Result<Self> {
        fn pick<T: Clone>(flag: &Option<T>, file: &Option<T>) -> Option<T> {
            flag.clone().or_else(|| file.clone())
        }
        fn list(values: Vec<String>) -> Vec<String> {
            values
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }

        let mut builder = ReclaimConfig::builder()
            .include_completed(pick(&args.completed, &file.completed).unwrap_or(true))
            .include_failed(pick(&args.failed, &file.failed).unwrap_or(true))
            .include_evicted(pick(&args.evicted, &file.evicted).unwrap_or(true));

        if let Some(older_than) = pick(&args.older_than, &file.older_than) {
            builder = builder.older_than_str(older_than);
        }
        if let Some(kinds) = pick(&args.kinds, &file.kinds) {
            builder = builder.kinds(list(kinds));
        }
        if let Some(protect) = pick(&args.protect_label, &file.protect_label) {
            builder = builder.protect(protect);
        }

        if pick(&args.all_namespaces, &file.all_namespaces).unwrap_or(false) {
            let exclude = pick(&args.exclude_namespaces, &file.exclude_namespaces)
                .map(list)
                .unwrap_or_else(|| DEFAULT_EXCLUDED_NAMESPACES.map(String::from).to_vec());
            builder = builder.all_namespaces(exclude);
        } else {
            let namespace = pick(&args.namespace, &file.namespace)
                .map(|ns| ns.trim().to_string())
                .filter(|ns| !ns.is_empty());
            builder = builder.namespaces(namespace);
        }

        if let Some(selector) = pick(&args.label_selector, &file.label_selector) {
            builder = builder.label_selector(selector);
        }
        if let Some(selector) = pick(&args.field_selector, &file.field_selector) {
            builder = builder.field_selector(selector);
        }

        let options = ExecutionOptions {
            dry_run: pick(&args.dry_run, &file.dry_run).unwrap_or(true),
            concurrency: pick(&args.concurrency, &file.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
        };

        Ok(Self {
            reclaim: builder.build()?,
            options,
            output: pick(&args.output, &file.output).unwrap_or_default(),
            audit_file: pick(&args.audit_file, &file.audit_file),
            exit_nonzero_on_changes: pick(
                &args.exit_nonzero_on_changes,
                &file.exit_non_zero_on_changes,
            )
            .unwrap_or(false),
            context: pick(&args.context, &file.context).filter(|c| !c.trim().is_empty()),
            timeout: args.timeout,
        })
    }
}
