//! Configuration for a sweep run.
//!
//! An explicit `Config` is assembled once (file fallback chain, then CLI
//! overrides in the binary) and passed into `sweep::run` - there is no
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Result, SweeprError};

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 9091;
const DEFAULT_RPC_PATH: &str = "/transmission/rpc";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub connection: ConnectionConfig,
    /// Print intended actions instead of sending them
    pub dry_run: bool,
    pub categories: CategoryConfig,
    /// Maximum number of torrents considered per run
    pub limit: Option<usize>,
    /// Completion fraction below which a torrent counts as never-started
    pub completion_threshold: f64,
    /// Extra start passes for transient I/O errors
    pub retries: u32,
    /// Delete downloaded data when removing unregistered torrents
    pub delete_local_data: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Full RPC URL; overrides the individual components below
    pub address: Option<String>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rpc_path: Option<String>,
    pub query: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Remove torrents the tracker no longer knows
    pub unregistered: bool,
    /// Remove-and-re-add torrents whose data went missing
    pub missing_data: bool,
    /// Start torrents with transient I/O errors
    pub io: bool,
    /// Escalate unresolved I/O errors to remove-and-re-add
    pub io_force: bool,
    /// Force-start the (inverted) passkey subset; off by default
    pub passkey: bool,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            unregistered: true,
            missing_data: true,
            io: true,
            io_force: false,
            passkey: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            connection: ConnectionConfig::default(),
            dry_run: false,
            categories: CategoryConfig::default(),
            limit: None,
            completion_threshold: 0.02,
            retries: 2,
            delete_local_data: true,
        }
    }
}

impl ConnectionConfig {
    /// Resolve the RPC endpoint, either from the combined address or from
    /// the individual components with Transmission's defaults.
    pub fn url(&self) -> Result<Url> {
        if let Some(address) = &self.address {
            return Url::parse(address)
                .map_err(|e| SweeprError::InvalidUrl(format!("{address}: {e}")));
        }

        let scheme = self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME);
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let rpc_path = self.rpc_path.as_deref().unwrap_or(DEFAULT_RPC_PATH);

        let mut address = format!("{scheme}://{host}:{port}{rpc_path}");
        if let Some(query) = &self.query {
            address.push('?');
            address.push_str(query);
        }

        Url::parse(&address).map_err(|e| SweeprError::InvalidUrl(format!("{address}: {e}")))
    }

    /// Basic-auth credentials, when both halves are present
    pub fn auth(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir
                .join(project_name)
                .join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!(
                            "Failed to load config from {}: {}",
                            primary_config.display(),
                            e
                        );
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!(
                        "Failed to load config from {}: {}",
                        fallback_config.display(),
                        e
                    );
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.dry_run);
        assert_eq!(config.retries, 2);
        assert!((config.completion_threshold - 0.02).abs() < f64::EPSILON);
        assert!(config.limit.is_none());
        assert!(config.delete_local_data);
        assert!(config.categories.unregistered);
        assert!(config.categories.missing_data);
        assert!(config.categories.io);
        assert!(!config.categories.io_force);
        assert!(!config.categories.passkey);
    }

    #[test]
    fn test_url_from_defaults() {
        let conn = ConnectionConfig::default();
        let url = conn.url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:9091/transmission/rpc");
    }

    #[test]
    fn test_url_from_components() {
        let conn = ConnectionConfig {
            scheme: Some("https".to_string()),
            host: Some("seedbox.example".to_string()),
            port: Some(443),
            rpc_path: Some("/rpc".to_string()),
            query: Some("session=1".to_string()),
            ..Default::default()
        };
        let url = conn.url().unwrap();
        assert_eq!(url.as_str(), "https://seedbox.example/rpc?session=1");
        assert_eq!(url.port_or_known_default(), Some(443));
    }

    #[test]
    fn test_combined_address_wins_over_components() {
        let conn = ConnectionConfig {
            address: Some("http://other:9092/transmission/rpc".to_string()),
            host: Some("ignored".to_string()),
            ..Default::default()
        };
        let url = conn.url().unwrap();
        assert_eq!(url.host_str(), Some("other"));
        assert_eq!(url.port(), Some(9092));
    }

    #[test]
    fn test_invalid_address() {
        let conn = ConnectionConfig {
            address: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(conn.url(), Err(SweeprError::InvalidUrl(_))));
    }

    #[test]
    fn test_auth_requires_both_halves() {
        let mut conn = ConnectionConfig {
            username: Some("admin".to_string()),
            ..Default::default()
        };
        assert!(conn.auth().is_none());

        conn.password = Some("hunter2".to_string());
        assert_eq!(
            conn.auth(),
            Some(("admin".to_string(), "hunter2".to_string()))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "dry_run: true\nretries: 5\nconnection:\n  host: seedbox\ncategories:\n  io_force: true\n"
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.retries, 5);
        assert_eq!(config.connection.host.as_deref(), Some("seedbox"));
        assert!(config.categories.io_force);
        // Unset fields keep their defaults
        assert!(config.categories.unregistered);
        assert!((config.completion_threshold - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/sweepr.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
