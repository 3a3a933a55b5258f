use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::extractor::ExtractorConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub operator: OperatorConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The single privileged operator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorConfig {
    /// Chat user id allowed to add, edit and delete entries.
    /// Also receives ingestion and commit notifications.
    pub id: i64,
}

/// Source channel whose posts are harvested
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Only posts from this channel are processed. `None` disables ingestion.
    #[serde(default)]
    pub channel_id: Option<i64>,
    /// Public username used to build post links when the post lacks one.
    #[serde(default)]
    pub channel_username: Option<String>,
}

/// Catalog storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("anime_list.json")
}

/// Wizard session lifetime
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Sessions untouched for this long are dropped.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// How often idle sessions are swept.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum results returned for one query.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    50
}

/// Outbound notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Webhook receiving notifications as JSON. Notifications are only
    /// logged when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_notify_timeout(),
        }
    }
}

fn default_notify_timeout() -> u64 {
    10
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret required on API requests. Open when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub operator_id: i64,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
    pub wizard: WizardConfig,
    pub search: SearchConfig,
    pub extractor: ExtractorConfig,
    pub notify: SanitizedNotifyConfig,
    pub server: SanitizedServerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNotifyConfig {
    pub webhook_configured: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            operator_id: config.operator.id,
            feed: config.feed.clone(),
            storage: config.storage.clone(),
            wizard: config.wizard.clone(),
            search: config.search.clone(),
            extractor: config.extractor.clone(),
            notify: SanitizedNotifyConfig {
                webhook_configured: config.notify.webhook_url.is_some(),
                timeout_secs: config.notify.timeout_secs,
            },
            server: SanitizedServerConfig {
                host: config.server.host,
                port: config.server.port,
                api_key_configured: config
                    .server
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
            },
        }
    }
}
