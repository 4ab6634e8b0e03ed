//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/weekgrid/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [source]
//! ical_url = "https://example.com/team.ics"
//! # api_key = "..."
//! calendar_id = "primary"
//! max_results = 50
//!
//! [grid]
//! origin_hour = 7
//! end_hour = 22
//!
//! [cache]
//! ttl_secs = 300
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! Environment variables and command-line flags override the `[source]`
//! table; see [`crate::cli::SourceArgs`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use weekgrid_core::GridConfig;
use weekgrid_providers::CalendarSourceConfig;
use weekgrid_server::{CALENDAR_EVENTS_TAG, DEFAULT_TTL, PipelineConfig};

use crate::error::{ClientError, ClientResult};

/// Configuration for the weekgrid client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Calendar source settings.
    pub source: CalendarSourceConfig,

    /// Grid geometry.
    pub grid: GridSettings,

    /// Cache settings.
    pub cache: CacheSettings,

    /// Outbound request settings.
    pub http: HttpSection,
}

/// Grid geometry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Hour mapped to the first row.
    pub origin_hour: u32,
    /// Hour where the visible grid ends.
    pub end_hour: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            origin_hour: GridConfig::DEFAULT_ORIGIN_HOUR,
            end_hour: GridConfig::DEFAULT_END_HOUR,
        }
    }
}

impl GridSettings {
    /// Converts to the layout engine's geometry, rejecting impossible hours.
    pub fn to_grid_config(&self) -> ClientResult<GridConfig> {
        if self.end_hour > 24 {
            return Err(ClientError::Config(format!(
                "grid end_hour must be at most 24, got {}",
                self.end_hour
            )));
        }
        if self.origin_hour >= self.end_hour {
            return Err(ClientError::Config(format!(
                "grid origin_hour ({}) must be before end_hour ({})",
                self.origin_hour, self.end_hour
            )));
        }
        Ok(GridConfig::new(self.origin_hour, self.end_hour))
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Lifetime of a cached week in seconds.
    pub ttl_secs: u64,
    /// Tag attached to cached weeks.
    pub tag: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL.as_secs(),
            tag: CALENDAR_EVENTS_TAG.to_string(),
        }
    }
}

/// Outbound request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL of the remote events API. The public endpoint when unset.
    pub api_base_url: Option<String>,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: PipelineConfig::default().request_timeout.as_secs(),
            api_base_url: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ClientError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pipeline settings derived from the `[cache]` and `[http]` tables.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_cache_ttl(Duration::from_secs(self.cache.ttl_secs))
            .with_request_timeout(Duration::from_secs(self.http.timeout_secs));
        config.cache_tag = self.cache.tag.clone();
        if let Some(ref url) = self.http.api_base_url {
            config = config.with_api_base_url(url.clone());
        }
        config
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weekgrid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_file() {
        let file = write_config(
            r#"
debug = true

[source]
api_key = "secret"
calendar_id = "team@example.com"
max_results = 20

[grid]
origin_hour = 8
end_hour = 20

[cache]
ttl_secs = 60

[http]
timeout_secs = 5
api_base_url = "http://localhost:9000"
"#,
        );

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.source.api_key.as_deref(), Some("secret"));
        assert_eq!(config.source.calendar_id, "team@example.com");
        assert_eq!(config.source.max_results, 20);
        assert_eq!(config.grid.origin_hour, 8);

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.cache_ttl, Duration::from_secs(60));
        assert_eq!(pipeline.cache_tag, "calendar-events");
        assert_eq!(pipeline.request_timeout, Duration::from_secs(5));
        assert_eq!(pipeline.api_base_url, "http://localhost:9000");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config("[source]\nical_url = \"https://example.com/a.ics\"\n");

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(
            config.source.ical_url.as_deref(),
            Some("https://example.com/a.ics")
        );
        assert_eq!(config.source.calendar_id, "primary");
        assert_eq!(config.source.max_results, 50);
        assert_eq!(config.grid, GridSettings::default());
        assert_eq!(config.cache, CacheSettings::default());
        assert_eq!(config.pipeline_config(), PipelineConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        let file = write_config("");
        assert_eq!(
            ClientConfig::load_from(file.path()).unwrap(),
            ClientConfig::default()
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let file = write_config("[source\nical_url = ");
        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::ParseConfig { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ClientError::ReadConfig { .. }));
    }

    #[test]
    fn dump_round_trips() {
        let mut config = ClientConfig::default();
        config.source = config.source.with_ical_url("https://example.com/a.ics");
        config.grid.end_hour = 23;

        let dumped = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&dumped).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn grid_settings_validation() {
        assert_eq!(
            GridSettings::default().to_grid_config().unwrap(),
            GridConfig::default()
        );
        assert!(GridSettings {
            origin_hour: 10,
            end_hour: 9
        }
        .to_grid_config()
        .is_err());
        assert!(GridSettings {
            origin_hour: 0,
            end_hour: 25
        }
        .to_grid_config()
        .is_err());
    }

    #[test]
    fn default_path_ends_with_weekgrid_config() {
        let path = ClientConfig::default_path();
        assert!(path.ends_with("weekgrid/config.toml"));
    }
}
