//! Transmission RPC engine implementation
//!
//! This module implements the EngineClient trait over the transmission-rpc
//! crate, which owns the HTTP transport, session negotiation, and response
//! schema validation.

use async_trait::async_trait;
use transmission_rpc::TransClient;
use transmission_rpc::types::{BasicAuth, Id, TorrentAction, TorrentAddArgs};
use url::Url;

use crate::engine::client::{EngineClient, EngineError};
use crate::torrent::TorrentRecord;

/// Engine over a live Transmission daemon.
pub struct TransmissionEngine {
    client: TransClient,
}

impl TransmissionEngine {
    /// Create an engine for an unauthenticated daemon
    pub fn new(url: Url) -> Self {
        Self {
            client: TransClient::new(url),
        }
    }

    /// Create an engine using HTTP basic auth
    pub fn with_auth(url: Url, user: String, password: String) -> Self {
        Self {
            client: TransClient::with_auth(url, BasicAuth { user, password }),
        }
    }
}

#[async_trait]
impl EngineClient for TransmissionEngine {
    async fn fetch(&mut self, ids: Option<Vec<i64>>) -> Result<Vec<TorrentRecord>, EngineError> {
        let ids = ids.map(|ids| ids.into_iter().map(Id::Id).collect());
        let response = self
            .client
            .torrent_get(Some(TorrentRecord::request_fields()), ids)
            .await
            .map_err(map_rpc_error)?;

        if !response.is_ok() {
            return Err(EngineError::Daemon(response.result));
        }

        response
            .arguments
            .torrents
            .into_iter()
            .map(|t| {
                TorrentRecord::try_from(t).map_err(|e| EngineError::InvalidResponse(e.to_string()))
            })
            .collect()
    }

    async fn start(&mut self, id: i64, force: bool) -> Result<(), EngineError> {
        let action = if force {
            TorrentAction::StartNow
        } else {
            TorrentAction::Start
        };

        let response = self
            .client
            .torrent_action(action, vec![Id::Id(id)])
            .await
            .map_err(map_rpc_error)?;

        if response.is_ok() {
            Ok(())
        } else {
            Err(EngineError::Daemon(response.result))
        }
    }

    async fn remove(&mut self, id: i64, delete_local_data: bool) -> Result<(), EngineError> {
        let response = self
            .client
            .torrent_remove(vec![Id::Id(id)], delete_local_data)
            .await
            .map_err(map_rpc_error)?;

        if response.is_ok() {
            Ok(())
        } else {
            Err(EngineError::Daemon(response.result))
        }
    }

    async fn add_paused(&mut self, magnet_link: &str) -> Result<(), EngineError> {
        let response = self
            .client
            .torrent_add(TorrentAddArgs {
                filename: Some(magnet_link.to_string()),
                paused: Some(true),
                ..TorrentAddArgs::default()
            })
            .await
            .map_err(map_rpc_error)?;

        if response.is_ok() {
            Ok(())
        } else {
            Err(EngineError::Daemon(response.result))
        }
    }
}

/// Map a boxed transport error onto the engine error categories.
///
/// transmission-rpc surfaces everything as a boxed error; the interesting
/// cases (refused connection, undecodable body) are recovered by downcasting
/// through the source chain.
fn map_rpc_error(err: Box<dyn std::error::Error + Send + Sync>) -> EngineError {
    if let Some(std::io::ErrorKind::ConnectionRefused) = find_io_kind(err.as_ref()) {
        return EngineError::ConnectionRefused;
    }

    if let Some(req) = err.downcast_ref::<reqwest::Error>() {
        if req.is_decode() {
            return EngineError::InvalidResponse(req.to_string());
        }
        return EngineError::Connection(req.to_string());
    }

    if let Some(json) = err.downcast_ref::<serde_json::Error>() {
        return EngineError::InvalidResponse(json.to_string());
    }

    EngineError::Unexpected(err.to_string())
}

/// Walk the source chain looking for an underlying IO error kind.
fn find_io_kind(err: &(dyn std::error::Error + 'static)) -> Option<std::io::ErrorKind> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        current = e.source();
    }
    None
}
