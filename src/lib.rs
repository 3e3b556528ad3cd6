//! Sweepr - a Transmission maintenance tool
//!
//! Sweepr polls a Transmission daemon over its JSON-RPC API, classifies
//! torrents in error states by their error strings, and applies a remediation
//! action (force-start, remove, or remove-and-re-add) with limited retries.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod remediate;
pub mod sweep;
pub mod torrent;

pub use error::{Result, SweeprError};
