//! Run command implementation.

use crate::audit::AuditWriter;
use crate::cli::RunArgs;
use crate::config::{FileConfig, RunSettings};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use reclaim_domain::{Candidate, ClusterApi, OutcomeRecord};
use reclaim_engine::cancel::{self, CancelHandle};
use reclaim_engine::{OutcomeStream, ReclaimMetrics, Reclaimer};
use reclaim_kube::KubeCluster;
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::time::Instant;

/// Exit code for a clean run
pub const EXIT_OK: u8 = 0;

/// Exit code when changes were made, or a dry-run found candidates with
/// `--exit-nonzero-on-changes`
pub const EXIT_CHANGES: u8 = 2;

/// Exit code for failed deletions and fatal errors
pub const EXIT_FAILURE: u8 = 3;

/// Execute the run command and return the process exit code.
pub async fn execute_run(args: RunArgs, file: &FileConfig) -> Result<u8> {
    let settings = RunSettings::resolve(&args, file)?;
    tracing::debug!(?settings, "Resolved run settings");

    let scan = async {
        let cluster = KubeCluster::connect(settings.context.as_deref()).await?;
        tracing::debug!(context = %cluster.context(), "Scanning for candidates");
        let reclaimer = Reclaimer::new(cluster, settings.reclaim.clone());
        let candidates = reclaimer.find_candidates().await?;
        Ok::<_, CliError>((reclaimer, candidates))
    };
    let (reclaimer, candidates) = scan_with_limits(scan, &settings).await?;

    let formatter = Formatter::new(settings.output, std::io::stdout().is_terminal());
    reclaim(&reclaimer, candidates, &settings, &formatter).await
}

/// Race the scan against Ctrl-C and the optional timeout
async fn scan_with_limits<T, F>(scan: F, settings: &RunSettings) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let interruptible = async {
        tokio::select! {
            result = scan => result,
            _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
        }
    };

    match settings.timeout {
        Some(limit) => tokio::time::timeout(limit, interruptible)
            .await
            .map_err(|_| CliError::Timeout(limit))?,
        None => interruptible.await,
    }
}

/// Delete (or preview) the candidates, write the audit trail, render the
/// results and decide the exit code
pub async fn reclaim<C: ClusterApi + 'static>(
    reclaimer: &Reclaimer<C>,
    candidates: Vec<Candidate>,
    settings: &RunSettings,
    formatter: &Formatter,
) -> Result<u8> {
    let mut audit = settings
        .audit_file
        .as_deref()
        .map(AuditWriter::create)
        .transpose()?;

    let candidate_count = candidates.len();
    let started = Instant::now();
    let (handle, signal) = cancel::channel();
    let mut outcomes = reclaimer.execute(candidates, settings.options, signal);
    let (records, audit_error) = drain_outcomes(&mut outcomes, &handle, &mut audit).await;

    let mut metrics = ReclaimMetrics::from_records(&records);
    metrics.elapsed = started.elapsed();
    println!("{}", formatter.format_records(&records)?);
    if formatter.format() == crate::config::OutputFormat::Text {
        println!("{}", formatter.summary(&metrics, settings.options.dry_run));
    }

    if let Some(e) = audit_error {
        return Err(e);
    }
    if let Some(writer) = audit {
        let lines = writer.finish()?;
        tracing::debug!(lines, "Audit file written");
    }

    Ok(exit_code(
        settings.options.dry_run,
        settings.exit_nonzero_on_changes,
        candidate_count,
        &metrics,
    ))
}

/// Collect every outcome until the stream ends, appending each to the audit
/// trail
///
/// Ctrl-C or a failed audit write cancels the remaining work; the stream is
/// still drained so that every delete that happened is returned. The first
/// audit error is handed back alongside the records and later records are
/// not written.
pub async fn drain_outcomes<W: Write>(
    outcomes: &mut OutcomeStream,
    handle: &CancelHandle,
    audit: &mut Option<AuditWriter<W>>,
) -> (Vec<OutcomeRecord>, Option<CliError>) {
    let mut records: Vec<OutcomeRecord> = Vec::with_capacity(outcomes.expected());
    let mut audit_error = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            next = outcomes.recv() => match next {
                Some(record) => {
                    if audit_error.is_none() {
                        if let Some(writer) = audit.as_mut() {
                            if let Err(e) = writer.write(&record) {
                                tracing::error!(error = %e, "Audit write failed, cancelling remaining deletions");
                                handle.cancel();
                                audit_error = Some(e);
                            }
                        }
                    }
                    records.push(record);
                }
                None => break,
            },
            _ = &mut ctrl_c, if !interrupted => {
                tracing::warn!("Interrupted, finishing in-flight deletions");
                handle.cancel();
                interrupted = true;
            }
        }
    }

    (records, audit_error)
}

/// Map the outcome of a run onto the process exit code
///
/// Checked in order: dry-run with candidates and the opt-in flag, then
/// failures of a real run, then deletions of a real run.
pub fn exit_code(
    dry_run: bool,
    exit_nonzero_on_changes: bool,
    candidates: usize,
    metrics: &ReclaimMetrics,
) -> u8 {
    if dry_run {
        if exit_nonzero_on_changes && candidates > 0 {
            return EXIT_CHANGES;
        }
        return EXIT_OK;
    }
    if metrics.has_errors() {
        EXIT_FAILURE
    } else if metrics.total_deleted() > 0 {
        EXIT_CHANGES
    } else {
        EXIT_OK
    }
}
