//! Sweep orchestration - per-category cleaners and the retry loop.
//!
//! A sweep fetches one snapshot, then runs each enabled category in order:
//! transient I/O errors (start with retries, optionally escalating to
//! remove-and-re-add), missing data (remove-and-re-add plus verification),
//! unregistered (remove), and the passkey subset (force start). Snapshots go
//! stale the moment a remediation lands, so the retry loop re-fetches by id
//! after every pass instead of mutating its local copy.

use colored::*;
use log::info;

use crate::classify;
use crate::config::Config;
use crate::engine::EngineClient;
use crate::fetch::fetch_snapshot;
use crate::remediate::{Action, SEPARATOR, run_pass};
use crate::torrent::TorrentRecord;

/// State of the transient-error retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Subset still contains matching torrents (non-terminal)
    Pending,
    /// Subset drained before the attempt budget ran out
    Resolved,
    /// Attempt budget spent with torrents remaining, no escalation
    Exhausted,
    /// Attempt budget spent, remainder escalated to remove-and-re-add
    Escalated,
}

/// Terminal outcome of the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub state: RetryState,
    /// Torrents counted as cleaned for the summary line
    pub cleaned: usize,
    /// Start passes actually executed
    pub passes: u32,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub checked: usize,
    pub with_errors: usize,
    pub io_cleaned: usize,
    pub missing_data_cleaned: usize,
    pub unregistered_cleaned: usize,
    pub passkey_cleaned: usize,
}

/// Start-with-retries loop for torrents with transient I/O errors.
///
/// Each pass force-starts the pending subset, re-fetches the affected ids,
/// and re-classifies. Runs at most `retries + 1` passes. When the budget is
/// spent and escalation is enabled, the remainder (filtered to torrents that
/// actually have data) gets one remove-and-re-add pass and every originally
/// pending torrent is counted as cleaned; without escalation the cleaned
/// count is the drained difference.
pub async fn retry_start_loop<E: EngineClient>(
    engine: &mut E,
    snapshot: &[TorrentRecord],
    config: &Config,
) -> RetryOutcome {
    let mut pending = classify::transient_io(snapshot);
    let starting = pending.len();

    if starting == 0 {
        println!("No torrents with temporary errors to clean");
        return RetryOutcome {
            state: RetryState::Resolved,
            cleaned: 0,
            passes: 0,
        };
    }

    let max_attempts = config.retries + 1;
    let mut attempt = 0;

    let mut state = RetryState::Pending;
    while state == RetryState::Pending {
        let pending_count = pending.len();
        attempt += 1;

        println!(
            "Cleaning torrents with temporary errors. Clean action: force start. Attempt {attempt} / {max_attempts}"
        );
        let report = run_pass(engine, &pending, Action::Start { force: true }, config.dry_run).await;

        let refreshed = fetch_snapshot(engine, Some(report.ids)).await;
        pending = classify::transient_io(&refreshed);
        println!("Unresolved: {} / {}", pending.len(), pending_count);
        println!("{SEPARATOR}");

        state = if pending.is_empty() {
            RetryState::Resolved
        } else if attempt < max_attempts {
            RetryState::Pending
        } else if config.categories.io_force {
            RetryState::Escalated
        } else {
            RetryState::Exhausted
        };
    }

    let cleaned = match state {
        RetryState::Resolved => starting,
        RetryState::Escalated => {
            println!("Re-cleaning torrents with temporary errors. Clean action: remove and re-add");
            let escalation = classify::with_data(&pending, config.completion_threshold);
            run_pass(engine, &escalation, Action::ReAdd, config.dry_run).await;
            // Every originally pending torrent counts, by design, even when
            // individual escalations fail.
            starting
        }
        RetryState::Exhausted => starting - pending.len(),
        RetryState::Pending => unreachable!("loop exits only on terminal states"),
    };

    info!("Retry loop finished: state={state:?} cleaned={cleaned}/{starting} passes={attempt}");
    RetryOutcome {
        state,
        cleaned,
        passes: attempt,
    }
}

/// Remove-and-re-add torrents whose data went missing, then verify the
/// re-added entries appear in a fresh snapshot.
pub async fn clean_missing_data<E: EngineClient>(
    engine: &mut E,
    snapshot: &[TorrentRecord],
    config: &Config,
) -> usize {
    let subset = classify::with_data(&classify::missing_data(snapshot), config.completion_threshold);
    if subset.is_empty() {
        println!("No torrents missing data to clean");
        return 0;
    }

    println!(
        "Cleaning {} torrents missing data. Clean action: remove and re-add",
        subset.len()
    );
    let report = run_pass(engine, &subset, Action::ReAdd, config.dry_run).await;

    let fresh = fetch_snapshot(engine, None).await;
    verify_readded(&subset, &fresh);

    report.attempted
}

/// Remove torrents the tracker no longer knows.
pub async fn clean_unregistered<E: EngineClient>(
    engine: &mut E,
    snapshot: &[TorrentRecord],
    config: &Config,
) -> usize {
    let subset = classify::unregistered(snapshot);
    if subset.is_empty() {
        println!("No unregistered torrents to clean");
        return 0;
    }

    println!(
        "Cleaning {} unregistered torrents. Clean action: remove",
        subset.len()
    );
    let report = run_pass(
        engine,
        &subset,
        Action::Remove {
            delete_local_data: config.delete_local_data,
        },
        config.dry_run,
    )
    .await;

    report.attempted
}

/// Force-start the passkey subset.
///
/// The passkey predicate is inverted, so it is first restricted to torrents
/// that actually have errors and bound to the non-destructive start action.
pub async fn clean_invalid_passkey<E: EngineClient>(
    engine: &mut E,
    snapshot: &[TorrentRecord],
    config: &Config,
) -> usize {
    let subset = classify::invalid_passkey(&classify::with_errors(snapshot));
    if subset.is_empty() {
        println!("No passkey-suspect torrents to clean");
        return 0;
    }

    println!(
        "Cleaning {} passkey-suspect torrents. Clean action: force start",
        subset.len()
    );
    let report = run_pass(engine, &subset, Action::Start { force: true }, config.dry_run).await;

    report.attempted
}

/// Compare a cleaned subset against a fresh snapshot by name, reporting
/// torrents that did not come back. Returns the match count.
pub fn verify_readded(expected: &[TorrentRecord], fresh: &[TorrentRecord]) -> usize {
    let mut matches = 0;
    for torrent in expected {
        if fresh.iter().any(|f| f.name == torrent.name) {
            matches += 1;
        } else {
            println!(
                "{} {} {} {}",
                "No fresh match found for:".yellow(),
                torrent.error_string,
                torrent.id,
                torrent.name
            );
        }
    }
    println!(
        "Found: {matches} / {} re-added torrents in the fresh snapshot",
        expected.len()
    );
    matches
}

/// Run one full sweep with the given configuration.
///
/// Never fails: fetch problems shrink to an empty snapshot and per-torrent
/// remediation failures only show up in the counts.
pub async fn run<E: EngineClient>(config: &Config, engine: &mut E) -> SweepSummary {
    if config.dry_run {
        println!(
            "{}",
            "Running in test mode - actions are printed, not sent".yellow()
        );
    }

    let mut snapshot = fetch_snapshot(engine, None).await;
    if let Some(limit) = config.limit
        && snapshot.len() > limit
    {
        println!(
            "Limiting the check to the first {limit} of {} torrents",
            snapshot.len()
        );
        snapshot.truncate(limit);
    }

    let mut summary = SweepSummary {
        checked: snapshot.len(),
        with_errors: classify::with_errors(&snapshot).len(),
        ..Default::default()
    };

    if snapshot.is_empty() {
        println!("No torrents known; nothing to clean");
        return summary;
    }

    if config.categories.io {
        summary.io_cleaned = retry_start_loop(engine, &snapshot, config).await.cleaned;
    }
    if config.categories.missing_data {
        summary.missing_data_cleaned = clean_missing_data(engine, &snapshot, config).await;
    }
    if config.categories.unregistered {
        summary.unregistered_cleaned = clean_unregistered(engine, &snapshot, config).await;
    }
    if config.categories.passkey {
        summary.passkey_cleaned = clean_invalid_passkey(engine, &snapshot, config).await;
    }

    info!(
        "Sweep complete: io={} missing_data={} unregistered={} passkey={} errors={} checked={}",
        summary.io_cleaned,
        summary.missing_data_cleaned,
        summary.unregistered_cleaned,
        summary.passkey_cleaned,
        summary.with_errors,
        summary.checked
    );
    println!(
        "Cleaned {} temporary, {} missing-data, {} unregistered, {} passkey from {} errors across {} torrents",
        summary.io_cleaned,
        summary.missing_data_cleaned,
        summary.unregistered_cleaned,
        summary.passkey_cleaned,
        summary.with_errors,
        summary.checked
    );

    summary
}
