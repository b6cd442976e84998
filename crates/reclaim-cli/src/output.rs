//! Output formatting for the CLI.

use crate::audit::RecordView;
use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use reclaim_domain::OutcomeRecord;
use reclaim_engine::ReclaimMetrics;
use std::time::Duration;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The format this formatter renders.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the outcome records.
    pub fn format_records(&self, records: &[OutcomeRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(records),
            OutputFormat::Text => Ok(self.format_records_table(records)),
        }
    }

    fn format_records_json(&self, records: &[OutcomeRecord]) -> Result<String> {
        let views: Vec<RecordView<'_>> = records.iter().map(RecordView::from).collect();
        Ok(serde_json::to_string_pretty(&views)?)
    }

    fn format_records_table(&self, records: &[OutcomeRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No candidates found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Kind", "Namespace", "Name", "State", "Age", "Result"]);

        for record in records {
            builder.push_record([
                record.kind.as_str().to_string(),
                record.namespace.clone(),
                record.name.clone(),
                record.state.to_string(),
                human_age(record.age),
                self.result_cell(record),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn result_cell(&self, record: &OutcomeRecord) -> String {
        match (&record.error, record.deleted, record.dry_run) {
            (Some(error), _, _) => self.colorize(error, "red"),
            (None, true, _) => self.colorize("deleted", "green"),
            (None, false, true) => self.colorize("would delete", "cyan"),
            (None, false, false) => String::new(),
        }
    }

    /// Summary line printed after the table.
    pub fn summary(&self, metrics: &ReclaimMetrics, dry_run: bool) -> String {
        let line = metrics.summary();
        if metrics.has_errors() {
            self.warning(&line)
        } else if dry_run {
            self.info(&format!("Dry run: {}", line))
        } else {
            self.success(&line)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Compact age such as `3d`, `5h`, `12m` or `40s`, rounded to the nearest unit.
pub fn human_age(age: Duration) -> String {
    let secs = age.as_secs_f64();
    if secs >= 86_400.0 {
        format!("{:.0}d", secs / 86_400.0)
    } else if secs >= 3_600.0 {
        format!("{:.0}h", secs / 3_600.0)
    } else if secs >= 60.0 {
        format!("{:.0}m", secs / 60.0)
    } else {
        format!("{:.0}s", secs)
    }
}
