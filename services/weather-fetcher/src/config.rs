//! Configuration for the weather fetcher.
//!
//! Loaded from a YAML file (default `config/weather.yaml`). Every section and
//! field is optional; anything left out falls back to the QPEplus monitor
//! defaults for Taoyuan City.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use city_common::CityFilter;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub portal: PortalConfig,
    pub request: RequestConfig,
    pub session: SessionConfig,
    pub filter: FilterConfig,
    pub snapshot: SnapshotConfig,
    pub labels: LabelConfig,
    pub output: OutputConfig,
}

/// Remote portal endpoints and the fixed form fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Page visited first to obtain the session cookies
    pub landing_url: String,
    /// Endpoint receiving the snapshot POST
    pub api_url: String,
    /// Value of the `Origin` header
    pub origin: String,
    /// `tag_id` form field ("14" selects all stations)
    pub tag_id: String,
    pub group: String,
    pub lang: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            landing_url: "https://qpeplus.cwa.gov.tw/pub/?tab=monitor".to_string(),
            api_url: "https://qpeplus.cwa.gov.tw/pub/rainmonitor/get_tag_sectiondisplay_by_tag/"
                .to_string(),
            origin: "https://qpeplus.cwa.gov.tw".to_string(),
            tag_id: "14".to_string(),
            group: "Guest".to_string(),
            lang: "tw".to_string(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Where session cookies come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionConfig {
    /// Visit the landing page and use the cookies it sets
    Live {
        #[serde(default = "default_csrf_cookie")]
        csrf_cookie: String,
    },
    /// Use cookies captured elsewhere (e.g. from a browser)
    Static {
        #[serde(default)]
        cookies: BTreeMap<String, String>,
        /// Explicit token; defaults to the `csrf_cookie` cookie value
        #[serde(default)]
        csrf_token: Option<String>,
        #[serde(default = "default_csrf_cookie")]
        csrf_cookie: String,
    },
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::Live {
            csrf_cookie: default_csrf_cookie(),
        }
    }
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

/// Which readings to keep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Station field holding the city name
    pub field: String,
    /// City to keep (exact match)
    pub target: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            field: "縣市".to_string(),
            target: "桃園市".to_string(),
        }
    }
}

impl FilterConfig {
    pub fn city_filter(&self) -> CityFilter {
        CityFilter::new(self.field.clone(), self.target.clone())
    }
}

/// Snapshot time resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Extra 10-minute steps back to try when the portal rejects a snapshot.
    /// 0 asks once and gives up.
    pub step_back_attempts: u32,
    /// Fixed UTC offset for the wall clock; machine local time when unset
    pub utc_offset_hours: Option<i32>,
}

/// Field labels used when logging sample readings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub name: String,
    pub id: String,
    pub temperature: String,
    pub rainfall: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            name: "站名".to_string(),
            id: "站號".to_string(),
            temperature: "溫度(°C)".to_string(),
            rainfall: "當日累積雨量(mm)".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Number of filtered readings echoed to the log
    pub sample_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("taoyuan_realtime_weather.json"),
            sample_size: 5,
        }
    }
}

impl FetcherConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FetcherConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded fetcher config");
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        info!(
            path = %path.display(),
            city = %config.filter.target,
            "Loaded configuration"
        );
        Ok(config)
    }
}
