//! Snapshot representation of a torrent on the Transmission instance.
//!
//! The daemon owns every torrent; this crate only ever holds read snapshots,
//! re-fetched after each remediation pass rather than mutated in place.

use std::convert::TryFrom;

use transmission_rpc::types::{ErrorType, TorrentGetField};

use crate::error::SweeprError;

/// One torrent record as captured at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentRecord {
    /// Engine-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Error category reported by the daemon (`Ok` means none)
    pub error: ErrorType,
    /// Free-text diagnostic set by the daemon
    pub error_string: String,
    /// Completion fraction, 0.0 through 1.0
    pub percent_done: f64,
    /// Source locator used for remove-and-re-add
    pub magnet_link: Option<String>,
}

impl TorrentRecord {
    /// The accessor fields requested on every fetch.
    pub fn request_fields() -> Vec<TorrentGetField> {
        use TorrentGetField::*;
        vec![Id, Name, Error, ErrorString, PercentDone, MagnetLink]
    }

    /// Returns true if the daemon reports any error on this torrent
    pub fn has_error(&self) -> bool {
        self.error != ErrorType::Ok
    }
}

fn ensure_field<T>(field: Option<T>, name: &str) -> Result<T, SweeprError> {
    field.ok_or_else(|| SweeprError::Config(format!("torrent has no field {name:?}")))
}

impl TryFrom<transmission_rpc::types::Torrent> for TorrentRecord {
    type Error = SweeprError;

    fn try_from(t: transmission_rpc::types::Torrent) -> Result<Self, Self::Error> {
        Ok(TorrentRecord {
            id: ensure_field(t.id, "id")?,
            name: ensure_field(t.name, "name")?,
            error: ensure_field(t.error, "error")?,
            error_string: ensure_field(t.error_string, "error_string")?,
            percent_done: ensure_field(t.percent_done, "percent_done")? as f64,
            magnet_link: t.magnet_link,
        })
    }
}
