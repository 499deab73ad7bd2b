use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub local_sink: LocalSinkConfig,
    pub github_sink: Option<GithubSinkConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_sport")]
    pub sport: String,
    #[serde(default = "default_league")]
    pub league: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_market")]
    pub market_name: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_sport() -> String { "baseball".to_string() }
fn default_league() -> String { "mlb".to_string() }
fn default_state() -> String { "TN".to_string() }
fn default_market() -> String { "moneyline".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }

impl ApiConfig {
    /// Full query set for the oddscreen endpoint. The paywall and subscription
    /// flags must always be sent as "false" or the endpoint gates the response.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sport", self.sport.clone()),
            ("league", self.league.clone()),
            ("state", self.state.clone()),
            ("market_name", self.market_name.clone()),
            ("is_future", "0".to_string()),
            ("game_status_filter", "All".to_string()),
            ("show_paywall", "false".to_string()),
            ("paywall", "false".to_string()),
            ("premium", "false".to_string()),
            ("subscription", "false".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_s: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_poll_interval() -> u64 { 30 }
fn default_history_capacity() -> usize { 50 }

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_s: 30,
            history_capacity: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_port() -> u16 { 5000 }
fn default_cors_origin() -> String { "https://apnpapnu.github.io".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_origin: default_cors_origin(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalSinkConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

fn default_data_dir() -> String { "data".to_string() }

impl Default for LocalSinkConfig {
    fn default() -> Self {
        Self { dir: default_data_dir() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubSinkConfig {
    pub owner: String,
    pub repo: String,
    pub committer_name: String,
    pub committer_email: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Bearer credential for the GitHub contents API. Absent means the remote
    /// sink stays degraded until the process is restarted with the token set.
    pub fn github_token() -> Option<String> {
        match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.is_empty() => Some(sanitize_token(&token)),
            _ => None,
        }
    }
}

/// Strip carriage returns, BOM, and other invisible chars from a token value.
fn sanitize_token(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
