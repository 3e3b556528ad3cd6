//! Remediation primitives.
//!
//! Three actions can be applied to a torrent: start (optionally forced),
//! remove (optionally deleting data), and remove-and-re-add. Every primitive
//! honors dry-run mode, in which the intended action is printed and nothing
//! is sent to the daemon. Failures are logged and reflected only in the
//! aggregate counts; they never abort a pass.

use colored::*;
use log::{info, warn};

use crate::engine::EngineClient;
use crate::torrent::TorrentRecord;

/// Per-torrent separator printed between remediation attempts
pub const SEPARATOR: &str = "--------------------------------------------------------------";

/// A remediation action applied to one classified subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Issue a start command; `force` bypasses the daemon's start queue
    Start { force: bool },
    /// Remove the torrent, optionally deleting its downloaded data
    Remove { delete_local_data: bool },
    /// Remove the torrent (keeping data) and re-add its magnet link, paused
    ReAdd,
}

impl Action {
    /// Human-readable action name used in progress lines
    pub fn describe(&self) -> &'static str {
        match self {
            Action::Start { force: true } => "force start",
            Action::Start { force: false } => "start",
            Action::Remove { .. } => "remove",
            Action::ReAdd => "remove and re-add",
        }
    }
}

/// Aggregate result of one remediation pass over a subset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Torrents the pass attempted to remediate
    pub attempted: usize,
    /// Daemon-confirmed successes
    pub cleaned: usize,
    /// Ids of every attempted torrent, for the re-fetch that follows
    pub ids: Vec<i64>,
}

/// Apply one action to one torrent.
///
/// Returns the torrent id on a daemon-reported success, `None` otherwise.
/// Dry-run always returns `None`: nothing was confirmed because nothing was
/// sent.
pub async fn apply<E: EngineClient>(
    engine: &mut E,
    action: Action,
    torrent: &TorrentRecord,
    dry_run: bool,
) -> Option<i64> {
    if dry_run {
        println!(
            "{} {} {} {} {}",
            "Test mode, skipping".yellow(),
            action.describe(),
            torrent.error_string,
            torrent.id,
            torrent.name
        );
        return None;
    }

    match action {
        Action::Start { force } => {
            let verb = if force { "Force starting:" } else { "Starting:" };
            println!(
                "{} {} {} {}",
                verb.green(),
                torrent.error_string,
                torrent.id,
                torrent.name
            );
            match engine.start(torrent.id, force).await {
                Ok(()) => Some(torrent.id),
                Err(err) => {
                    warn!("Start failed for {} ({}): {err}", torrent.id, torrent.name);
                    println!("{} {err}", "Start failed:".red());
                    None
                }
            }
        }
        Action::Remove { delete_local_data } => {
            println!(
                "{} {} {} {}",
                "Removing:".red(),
                torrent.error_string,
                torrent.id,
                torrent.name
            );
            match engine.remove(torrent.id, delete_local_data).await {
                Ok(()) => Some(torrent.id),
                Err(err) => {
                    warn!("Remove failed for {} ({}): {err}", torrent.id, torrent.name);
                    println!("{} {err}", "Remove failed:".red());
                    None
                }
            }
        }
        Action::ReAdd => {
            let Some(magnet_link) = torrent.magnet_link.clone() else {
                warn!(
                    "Cannot re-add {} ({}): no magnet link in snapshot",
                    torrent.id, torrent.name
                );
                println!("{} {} {}", "No magnet link for:".red(), torrent.id, torrent.name);
                return None;
            };

            println!(
                "{} {} {} {}",
                "Removing:".red(),
                torrent.error_string,
                torrent.id,
                torrent.name
            );
            if let Err(err) = engine.remove(torrent.id, false).await {
                // The add is still attempted; the daemon may have dropped the
                // entry even when the response was lost.
                warn!("Remove failed for {} ({}): {err}", torrent.id, torrent.name);
                println!("{} {err}", "Remove failed:".red());
            }

            println!("{} {} {}", "Adding:".cyan(), torrent.id, torrent.name);
            match engine.add_paused(&magnet_link).await {
                Ok(()) => Some(torrent.id),
                Err(err) => {
                    warn!("Re-add failed for {} ({}): {err}", torrent.id, torrent.name);
                    println!("{} {err}", "Re-add failed:".red());
                    None
                }
            }
        }
    }
}

/// Apply one action to every torrent in a subset, sequentially.
pub async fn run_pass<E: EngineClient>(
    engine: &mut E,
    torrents: &[TorrentRecord],
    action: Action,
    dry_run: bool,
) -> PassReport {
    let mut report = PassReport::default();

    for torrent in torrents {
        println!("{SEPARATOR}");
        report.attempted += 1;
        report.ids.push(torrent.id);
        if apply(engine, action, torrent, dry_run).await.is_some() {
            report.cleaned += 1;
        }
    }

    info!(
        "Pass complete: action={} cleaned={}/{}",
        action.describe(),
        report.cleaned,
        report.attempted
    );
    println!("Cleaned: {} / {}", report.cleaned, report.attempted);
    report
}
