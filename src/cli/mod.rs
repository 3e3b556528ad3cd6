//! CLI module for sweepr - command-line flag surface.
//!
//! Provides the flag definitions and the merge of parsed flags over the
//! loaded configuration.

pub mod commands;

pub use commands::Cli;
