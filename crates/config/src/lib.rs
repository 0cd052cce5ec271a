//! Readstack Configuration
//!
//! Typed TOML configuration with a default for every field, so a partial or
//! missing file still yields a working setup. Values are injected where
//! components are constructed; nothing reads ambient global state.
//!
//! # Example
//!
//! ```rust
//! use readstack_config::Config;
//!
//! let config = Config::load("readstack.toml").unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//! println!("Database: {}", config.database.path);
//! ```

mod error;

pub use error::{ConfigError, ConfigResult};

use log::warn;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub library: LibrarySettings,
    pub metadata: MetadataSettings,
    pub server: ServerSettings,
}

/// Database settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file
    pub path: String,
    /// Maximum pool connections
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "readstack.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Library behavior settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// A genre is flagged popular when its book count exceeds this
    pub popular_genre_threshold: i64,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            popular_genre_threshold: 5,
        }
    }
}

/// External metadata lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Whether the lookup endpoints are exposed at all
    pub enabled: bool,
    /// Provider base URL
    pub base_url: String,
    /// Optional API key
    pub api_key: Option<String>,
    /// Bounded request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address, host:port
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Parses a TOML document; absent sections and fields take defaults
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. A missing file yields the defaults with a
    /// warning; a malformed or invalid file is an error.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Config file '{}' not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Writes the config atomically: serialize to a temp file in the target
    /// directory, then rename over the destination
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let raw = toml::to_string_pretty(self)?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let write_err = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(raw.as_bytes()).map_err(write_err)?;
        temp.persist(path)
            .map_err(|e| write_err(e.error))?;

        Ok(())
    }

    /// Checks cross-field constraints the type system cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid(
                "database.path",
                &self.database.path,
                "must not be empty",
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                self.database.max_connections,
                "must be at least 1",
            ));
        }
        if self.library.popular_genre_threshold < 0 {
            return Err(ConfigError::invalid(
                "library.popular_genre_threshold",
                self.library.popular_genre_threshold,
                "must not be negative",
            ));
        }
        if self.metadata.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "metadata.timeout_secs",
                self.metadata.timeout_secs,
                "must be at least 1",
            ));
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::invalid(
                "server.bind_addr",
                &self.server.bind_addr,
                "must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, "readstack.db");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert!(config.metadata.enabled);
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = Config::from_toml_str(
            r#"
            [database]
            path = "/var/lib/readstack/books.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, "/var/lib/readstack/books.db");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.library.popular_genre_threshold, 5);
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let mut config = Config::default();
        config.metadata.api_key = Some("key-123".to_string());
        config.library.popular_genre_threshold = 3;

        let raw = toml::to_string_pretty(&config).unwrap();
        let restored = Config::from_toml_str(&raw).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_zero_connections_is_invalid() {
        let result = Config::from_toml_str(
            r#"
            [database]
            max_connections = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_negative_threshold_is_invalid() {
        let result = Config::from_toml_str(
            r#"
            [library]
            popular_genre_threshold = -1
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = Config::from_toml_str("not [valid toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/readstack.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readstack.toml");

        let mut config = Config::default();
        config.server.bind_addr = "0.0.0.0:9090".to_string();
        config.save(&path).unwrap();

        let restored = Config::load(&path).unwrap();
        assert_eq!(restored, config);
    }
}
