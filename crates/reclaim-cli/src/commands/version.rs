//! Version command implementation.

use crate::cli::VersionArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Build metadata, injected at compile time where available
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Crate version
    pub version: String,
    /// Source commit
    pub commit: String,
    /// Build date (RFC 3339)
    pub date: String,
    /// Who or what produced the build
    pub built_by: String,
    /// Target operating system
    pub os: String,
    /// Target architecture
    pub arch: String,
}

impl VersionInfo {
    /// Metadata of the running binary
    ///
    /// `KUBE_RECLAIM_COMMIT`, `KUBE_RECLAIM_BUILD_DATE` and
    /// `KUBE_RECLAIM_BUILT_BY` are read at compile time. Without a build date
    /// the current time is reported.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("KUBE_RECLAIM_COMMIT").unwrap_or("none").to_string(),
            date: option_env!("KUBE_RECLAIM_BUILD_DATE")
                .map(String::from)
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            built_by: option_env!("KUBE_RECLAIM_BUILT_BY").unwrap_or("").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Render according to the version flags
    pub fn render(&self, args: &VersionArgs) -> Result<String> {
        if args.output == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(self)?);
        }
        if args.short && !args.verbose {
            return Ok(self.version.clone());
        }
        if args.verbose {
            return Ok(format!(
                "kube-reclaim {} ({})\nBuilt: {} by {}\nTarget: {}/{}",
                self.version, self.commit, self.date, self.built_by, self.os, self.arch
            ));
        }
        Ok(format!("kube-reclaim version {}", self.version))
    }
}

/// Execute the version command.
pub fn execute_version(args: VersionArgs) -> Result<()> {
    println!("{}", VersionInfo::current().render(&args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> VersionInfo {
        VersionInfo {
            version: "1.2.3".to_string(),
            commit: "abc123".to_string(),
            date: "2025-01-01T00:00:00Z".to_string(),
            built_by: "ci".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        }
    }

    fn args(output: OutputFormat, short: bool, verbose: bool) -> VersionArgs {
        VersionArgs {
            output,
            short,
            verbose,
        }
    }

    #[test]
    fn test_default_line() {
        let out = info().render(&args(OutputFormat::Text, false, false)).unwrap();
        assert_eq!(out, "kube-reclaim version 1.2.3");
    }

    #[test]
    fn test_short() {
        let out = info().render(&args(OutputFormat::Text, true, false)).unwrap();
        assert_eq!(out, "1.2.3");
    }

    #[test]
    fn test_verbose_wins_over_short() {
        let out = info().render(&args(OutputFormat::Text, true, true)).unwrap();
        assert!(out.contains("(abc123)"));
        assert!(out.contains("Built: 2025-01-01T00:00:00Z by ci"));
        assert!(out.contains("linux/x86_64"));
    }

    #[test]
    fn test_json() {
        let out = info().render(&args(OutputFormat::Json, true, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["version"], "1.2.3");
        assert_eq!(value["builtBy"], "ci");
    }

    #[test]
    fn test_current_uses_package_version() {
        assert_eq!(VersionInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
