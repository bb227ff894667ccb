//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ListingSelectors;

/// Environment variable overriding the webhook endpoint.
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
/// Environment variable overriding the mentioned recipient.
pub const ENV_RECIPIENT_ID: &str = "DISCORD_USER_ID";
/// Environment variable overriding the poll interval in seconds.
pub const ENV_POLL_INTERVAL: &str = "STOCKWATCH_POLL_INTERVAL";
/// Environment variable overriding the snapshot file path.
pub const ENV_STATE_FILE: &str = "STOCKWATCH_STATE_FILE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Polling schedule and monitored sources
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Listing page selectors
    #[serde(default)]
    pub selectors: ListingSelectors,

    /// Notification transport
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No config at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// clear a value set in the file.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.notify.webhook_url = Some(url.trim().to_string());
        }
        if let Some(id) = get(ENV_RECIPIENT_ID) {
            self.notify.recipient_id = Some(id.trim().to_string());
        }
        if let Some(secs) = get(ENV_POLL_INTERVAL) {
            self.monitor.poll_interval_secs = secs.trim().parse().map_err(|_| {
                AppError::config(format!("{ENV_POLL_INTERVAL} is not a number: {secs}"))
            })?;
        }
        if let Some(path) = get(ENV_STATE_FILE) {
            self.storage.state_file = PathBuf::from(path.trim());
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_secs == 0 {
            return Err(AppError::validation("monitor.poll_interval_secs must be > 0"));
        }
        if self.monitor.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }

        let mut seen = HashSet::new();
        for source in &self.monitor.sources {
            let parsed = url::Url::parse(source)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::validation(format!(
                    "Source must be an http(s) URL: {source}"
                )));
            }
            if !seen.insert(source.as_str()) {
                return Err(AppError::validation(format!("Duplicate source: {source}")));
            }
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }

        self.selectors.compile()?;

        if let Some(webhook) = &self.notify.webhook_url {
            url::Url::parse(webhook)?;
        }
        if self.storage.state_file.as_os_str().is_empty() {
            return Err(AppError::validation("storage.state_file is empty"));
        }
        Ok(())
    }
}

/// Polling schedule and the ordered list of monitored sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds to sleep between the end of one cycle and the start of the next
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Listing pages to watch; order decides alert order within a cycle
    #[serde(default = "defaults::sources")]
    pub sources: Vec<String>,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::poll_interval(),
            sources: defaults::sources(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Notification transport settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoint; alerts are skipped with a warning when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Recipient mentioned at the end of each alert
    #[serde(default)]
    pub recipient_id: Option<String>,

    /// Announce the start of every cycle through the notifier
    #[serde(default)]
    pub heartbeat: bool,
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// CSV file holding the last known items
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: defaults::state_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn poll_interval() -> u64 {
        60
    }
    pub fn sources() -> Vec<String> {
        vec![
            "https://www.example.com/category/mini-gt".into(),
            "https://www.example.com/category/mini-gt?page=2".into(),
            "https://www.example.com/category/hot-wheels-mainlines".into(),
            "https://www.example.com/category/hot-wheels-premium".into(),
        ]
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("stock_state.csv")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_legacy_watcher() {
        let config = Config::default();
        assert_eq!(config.monitor.poll_interval_secs, 60);
        assert_eq!(config.monitor.sources.len(), 4);
        assert_eq!(config.storage.state_file, PathBuf::from("stock_state.csv"));
        assert!(!config.notify.heartbeat);
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.monitor.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_sources() {
        let mut config = Config::default();
        config.monitor.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_and_non_http_sources() {
        let mut config = Config::default();
        config.monitor.sources = vec!["https://a.test/".into(), "https://a.test/".into()];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        config.monitor.sources = vec!["ftp://a.test/list".into()];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        config.monitor.sources = vec!["not a url".into()];
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.item_selector = "[[broken".into();
        assert!(matches!(config.validate(), Err(AppError::Selector { .. })));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let toml = r#"
            [monitor]
            poll_interval_secs = 120
            sources = ["https://shop.test/new"]

            [notify]
            recipient_id = "42"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 120);
        assert_eq!(config.monitor.sources, vec!["https://shop.test/new"]);
        assert_eq!(config.notify.recipient_id.as_deref(), Some("42"));
        assert_eq!(config.http.user_agent, "Mozilla/5.0");
        assert_eq!(config.selectors.id_attribute, "data-latest");
    }

    #[test]
    fn bundled_config_file_is_valid() {
        let config: Config = toml::from_str(include_str!("../../stockwatch.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.sources, Config::default().monitor.sources);
    }

    #[test]
    fn load_or_default_uses_defaults_when_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.monitor.sources, Config::default().monitor.sources);
    }

    #[test]
    fn load_or_default_rejects_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stockwatch.toml");
        fs::write(
            &path,
            "[monitor]\nsources = [\"https://real.shop/new\"\n[storage]\nstate_file = \"real.csv\"\n",
        )
        .unwrap();

        let result = Config::load_or_default(&path);
        assert!(matches!(result, Err(AppError::Toml(_))));
    }

    #[test]
    fn load_or_default_keeps_file_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stockwatch.toml");
        fs::write(
            &path,
            "[monitor]\nsources = [\"https://real.shop/new\"]\n\n[storage]\nstate_file = \"real.csv\"\n",
        )
        .unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.monitor.sources, vec!["https://real.shop/new"]);
        assert_eq!(config.storage.state_file, PathBuf::from("real.csv"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars = env(&[
            (ENV_WEBHOOK_URL, "https://hooks.test/abc"),
            (ENV_RECIPIENT_ID, " 1234 "),
            (ENV_POLL_INTERVAL, "15"),
            (ENV_STATE_FILE, "/var/lib/stockwatch/state.csv"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("https://hooks.test/abc")
        );
        assert_eq!(config.notify.recipient_id.as_deref(), Some("1234"));
        assert_eq!(config.monitor.poll_interval_secs, 15);
        assert_eq!(
            config.storage.state_file,
            PathBuf::from("/var/lib/stockwatch/state.csv")
        );
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let vars = env(&[(ENV_RECIPIENT_ID, "   ")]);
        let mut config = Config::default();
        config.notify.recipient_id = Some("7".into());
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.notify.recipient_id.as_deref(), Some("7"));
    }

    #[test]
    fn non_numeric_interval_override_is_rejected() {
        let vars = env(&[(ENV_POLL_INTERVAL, "soon")]);
        let mut config = Config::default();
        let result = config.apply_overrides(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
