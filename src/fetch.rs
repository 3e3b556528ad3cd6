//! Snapshot fetching with failure downgrade.
//!
//! Every engine failure is logged with a category-specific message and
//! downgraded to an empty snapshot. Callers must treat "empty" as "nothing
//! known", not "nothing exists" - the sweep simply has nothing to act on.

use colored::*;
use log::{info, warn};

use crate::engine::{EngineClient, EngineError};
use crate::torrent::TorrentRecord;

/// Fetch the current torrent records, optionally restricted to `ids`.
pub async fn fetch_snapshot<E: EngineClient>(
    engine: &mut E,
    ids: Option<Vec<i64>>,
) -> Vec<TorrentRecord> {
    println!("Loading torrent list from the daemon");

    match engine.fetch(ids).await {
        Ok(snapshot) => {
            info!("Loaded {} torrents", snapshot.len());
            println!("Loaded {} torrents", snapshot.len());
            snapshot
        }
        Err(err) => {
            let message = match &err {
                EngineError::ConnectionRefused => {
                    "Daemon connection failure. Connection refused.".to_string()
                }
                EngineError::InvalidResponse(detail) => {
                    format!("Daemon connection failure. Response invalid: {detail}")
                }
                EngineError::Connection(detail) => {
                    format!("Daemon connection failure. Connection failed: {detail}")
                }
                EngineError::Daemon(detail) => {
                    format!("Daemon failed to return a torrent list: {detail}")
                }
                EngineError::Unexpected(detail) => {
                    format!("Daemon connection failure. Unexpected error: {detail}")
                }
            };
            warn!("{message}");
            println!("{}", message.red());
            Vec::new()
        }
    }
}
