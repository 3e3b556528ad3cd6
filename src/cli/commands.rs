//! CLI flag definitions using clap.
//!
//! Flags override whatever the config file provided; absent flags leave the
//! loaded configuration untouched.

use clap::Parser;
use std::path::PathBuf;

use sweepr::config::Config;

/// Sweepr - automatically remedy those torrent errors!
#[derive(Parser, Debug)]
#[command(name = "sweepr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Full RPC URL, e.g. http://localhost:9091/transmission/rpc
    #[arg(long)]
    pub address: Option<String>,

    /// Connection scheme, e.g. http
    #[arg(long)]
    pub scheme: Option<String>,

    /// Connection host, e.g. localhost
    #[arg(long)]
    pub host: Option<String>,

    /// Connection port, e.g. 9091
    #[arg(long)]
    pub port: Option<u16>,

    /// RPC path, e.g. /transmission/rpc
    #[arg(long)]
    pub rpc_path: Option<String>,

    /// Extra query string appended to the RPC URL
    #[arg(long)]
    pub query: Option<String>,

    /// Basic-auth username
    #[arg(long)]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long)]
    pub password: Option<String>,

    /// Print intended actions instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Check at most this many torrents
    #[arg(long)]
    pub limit: Option<usize>,

    /// Completion fraction below which a torrent counts as never-started
    #[arg(long)]
    pub completion_threshold: Option<f64>,

    /// Extra start passes for transient I/O errors
    #[arg(long)]
    pub retries: Option<u32>,

    /// Keep downloaded data when removing unregistered torrents
    #[arg(long)]
    pub keep_data: bool,

    /// Skip the unregistered-torrent pass
    #[arg(long)]
    pub skip_unregistered: bool,

    /// Skip the missing-data pass
    #[arg(long)]
    pub skip_missing_data: bool,

    /// Skip the transient I/O pass
    #[arg(long)]
    pub skip_io: bool,

    /// Escalate unresolved I/O errors to remove-and-re-add
    #[arg(long)]
    pub io_force: bool,

    /// Enable the passkey pass (force start)
    #[arg(long)]
    pub passkey: bool,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Overlay parsed flags onto the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if self.address.is_some() {
            config.connection.address = self.address.clone();
        }
        if self.scheme.is_some() {
            config.connection.scheme = self.scheme.clone();
        }
        if self.host.is_some() {
            config.connection.host = self.host.clone();
        }
        if self.port.is_some() {
            config.connection.port = self.port;
        }
        if self.rpc_path.is_some() {
            config.connection.rpc_path = self.rpc_path.clone();
        }
        if self.query.is_some() {
            config.connection.query = self.query.clone();
        }
        if self.username.is_some() {
            config.connection.username = self.username.clone();
        }
        if self.password.is_some() {
            config.connection.password = self.password.clone();
        }

        if self.dry_run {
            config.dry_run = true;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        if let Some(threshold) = self.completion_threshold {
            config.completion_threshold = threshold;
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if self.keep_data {
            config.delete_local_data = false;
        }

        if self.skip_unregistered {
            config.categories.unregistered = false;
        }
        if self.skip_missing_data {
            config.categories.missing_data = false;
        }
        if self.skip_io {
            config.categories.io = false;
        }
        if self.io_force {
            config.categories.io_force = true;
        }
        if self.passkey {
            config.categories.passkey = true;
        }
    }
}
