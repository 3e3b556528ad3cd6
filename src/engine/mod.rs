//! Engine layer - the seam between sweep logic and the torrent daemon.
//!
//! This module provides:
//! - EngineClient trait abstracting the daemon's RPC operations
//! - TransmissionEngine implementation over transmission-rpc
//! - MockEngine with a scripted snapshot queue and a call log, for tests

pub mod client;
pub mod mock;
pub mod transmission;

pub use client::{EngineClient, EngineError};
pub use mock::{EngineCall, MockEngine};
pub use transmission::TransmissionEngine;
