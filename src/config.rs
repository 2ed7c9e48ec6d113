use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_sources")]
    pub sources: HashMap<String, String>,

    /// Domains on this list are dropped from the output. Absent or empty
    /// disables filtering entirely.
    #[serde(default = "default_allowlist_url")]
    pub allowlist_url: Option<String>,

    #[serde(default = "default_output_file")]
    pub output_file: String,

    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Defaults
fn default_sources() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert(
        "disposable".to_string(),
        "https://raw.githubusercontent.com/disposable/disposable-email-domains/refs/heads/master/domains.txt"
            .to_string(),
    );
    m.insert(
        "disposable-email-domains".to_string(),
        "https://raw.githubusercontent.com/disposable-email-domains/disposable-email-domains/refs/heads/main/disposable_email_blocklist.conf"
            .to_string(),
    );
    m.insert(
        "fakefilter".to_string(),
        "https://raw.githubusercontent.com/7c/fakefilter/refs/heads/main/txt/data.txt".to_string(),
    );
    m.insert(
        "burner-email-providers".to_string(),
        "https://raw.githubusercontent.com/wesbos/burner-email-providers/refs/heads/master/emails.txt"
            .to_string(),
    );
    m
}
fn default_allowlist_url() -> Option<String> {
    Some(
        "https://raw.githubusercontent.com/disposable-email-domains/disposable-email-domains/refs/heads/main/allowlist.conf"
            .to_string(),
    )
}
fn default_output_file() -> String {
    "output.txt".to_string()
}
fn default_refresh_minutes() -> u64 {
    30
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_concurrent_downloads() -> usize {
    4
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            allowlist_url: default_allowlist_url(),
            output_file: default_output_file(),
            refresh_minutes: default_refresh_minutes(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrent_downloads: default_concurrent_downloads(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Sources in a deterministic order for logging; the merge itself is a
    /// set union, so iteration order never affects the result.
    pub fn get_sources_sorted(&self) -> Vec<(String, String)> {
        let mut list: Vec<_> = self
            .sources
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }

    /// The allowlist URL, with an empty string treated the same as absent.
    pub fn allowlist_url(&self) -> Option<&str> {
        self.allowlist_url.as_deref().filter(|u| !u.is_empty())
    }

    /// Refresh interval, never below one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs((self.refresh_minutes * 60).max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_floor() {
        let mut config = Config::default();
        config.refresh_minutes = 0;
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        config.refresh_minutes = 30;
        assert_eq!(config.refresh_interval(), Duration::from_secs(1800));
    }

    #[test]
    fn test_sources_sorted_is_stable() {
        let config = Config::default();
        let names: Vec<_> = config
            .get_sources_sorted()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_empty_allowlist_url_disables_filtering() {
        let mut config = Config::default();
        config.allowlist_url = Some(String::new());
        assert_eq!(config.allowlist_url(), None);
        config.allowlist_url = None;
        assert_eq!(config.allowlist_url(), None);
    }
}
