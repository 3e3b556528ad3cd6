//! Core engine client trait and error definitions

use async_trait::async_trait;

use crate::torrent::TorrentRecord;

/// The daemon operations the sweep logic needs, behind one seam.
///
/// Every call blocks (awaits) until the daemon responds; there is no
/// parallelism across torrents and no cancellation. Methods take `&mut self`
/// because the underlying RPC client renegotiates its session id in place.
#[async_trait]
pub trait EngineClient: Send {
    /// Fetch the current torrent records, optionally restricted to `ids`.
    async fn fetch(&mut self, ids: Option<Vec<i64>>) -> Result<Vec<TorrentRecord>, EngineError>;

    /// Start a torrent; `force` bypasses the daemon's start queue.
    async fn start(&mut self, id: i64, force: bool) -> Result<(), EngineError>;

    /// Remove a torrent, optionally deleting its downloaded data.
    async fn remove(&mut self, id: i64, delete_local_data: bool) -> Result<(), EngineError>;

    /// Re-submit a torrent by magnet link, paused on add.
    async fn add_paused(&mut self, magnet_link: &str) -> Result<(), EngineError>;
}

/// Errors that can occur while talking to the daemon
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("connection refused by the daemon")]
    ConnectionRefused,

    #[error("response failed schema validation: {0}")]
    InvalidResponse(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("daemon rejected the request: {0}")]
    Daemon(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}
