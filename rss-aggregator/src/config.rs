use crate::content::ContentMode;
use crate::filter::DEFAULT_IGNORE_TITLES;
use crate::llm_adapter::{GeminiConfig, DEFAULT_GEMINI_MODEL};
use crate::types::FetchConfig;
use crate::utils::url::is_valid_http_url;
use email_delivery::{DeliveryConfig, SmtpConfig, WebhookConfig, DEFAULT_SMTP_PORT};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MIN_CHARS: usize = 150;
pub const DEFAULT_FEED_DELAY_SECS: u64 = 2;

/// Shortest accepted value for hosts, credentials and addresses.
const MIN_SETTING_LEN: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot read env file: {0}")]
    EnvFile(String),
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub delivery: DeliveryConfig,
    /// `None` runs without AI summaries.
    pub gemini: Option<GeminiConfig>,
    pub content_mode: ContentMode,
    pub min_chars: usize,
    pub feed_delay: Duration,
    pub ignore_titles: Vec<String>,
    pub debug: bool,
    pub overall_summary: bool,
    pub fetch: FetchConfig,
}

impl AppConfig {
    /// Read `.env` (searched upwards from the working directory) and the
    /// process environment. Values from the file win over exported ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file_vars = match dotenv::dotenv_iter() {
            Ok(entries) => collect_entries(entries),
            Err(e) => {
                debug!("No .env file loaded: {}", e);
                HashMap::new()
            }
        };
        Self::layered(file_vars)
    }

    /// Like [`AppConfig::from_env`], with an explicit env file that must exist.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let entries = dotenv::from_path_iter(path.as_ref()).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
        Self::layered(collect_entries(entries))
    }

    fn layered(file_vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| file_vars.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let channel = get("EXPL_DELIVERY").unwrap_or_else(|| "email".to_string());
        let delivery = match channel.to_ascii_lowercase().as_str() {
            "email" => DeliveryConfig::Email(smtp_config(&get)?),
            "webhook" => {
                let url = get("EXPL_WEBHOOK_URL").ok_or(ConfigError::Missing("EXPL_WEBHOOK_URL"))?;
                if !is_valid_http_url(&url) {
                    return Err(ConfigError::Invalid {
                        name: "EXPL_WEBHOOK_URL",
                        reason: "expected an http(s) URL".to_string(),
                    });
                }
                DeliveryConfig::Webhook(WebhookConfig::new(url))
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "EXPL_DELIVERY",
                    reason: format!("unknown channel '{}', expected 'email' or 'webhook'", other),
                })
            }
        };

        let gemini = match get("GEMINI_API_KEY") {
            Some(key) => {
                require_len("GEMINI_API_KEY", &key)?;
                let model = get("EXPL_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
                Some(GeminiConfig::new(key).with_model(model))
            }
            None => None,
        };

        let content_mode = match get("EXPL_CONTENT_MODE") {
            Some(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                name: "EXPL_CONTENT_MODE",
                reason,
            })?,
            None => ContentMode::PageFetch,
        };

        let min_chars = parse_number("EXPL_MIN_CHARS", get("EXPL_MIN_CHARS"), DEFAULT_MIN_CHARS)?;
        let delay_secs = parse_number("EXPL_FEED_DELAY_SECS", get("EXPL_FEED_DELAY_SECS"), DEFAULT_FEED_DELAY_SECS)?;

        let ignore_titles = match get("EXPL_IGNORE_TITLES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_IGNORE_TITLES.iter().map(|k| k.to_string()).collect(),
        };

        Ok(Self {
            delivery,
            gemini,
            content_mode,
            min_chars,
            feed_delay: Duration::from_secs(delay_secs),
            ignore_titles,
            debug: parse_flag("EXPL_DEBUG", get("EXPL_DEBUG"), false)?,
            overall_summary: parse_flag("EXPL_OVERALL_SUMMARY", get("EXPL_OVERALL_SUMMARY"), true)?,
            fetch: FetchConfig::default(),
        })
    }
}

fn collect_entries<I>(entries: I) -> HashMap<String, String>
where
    I: Iterator<Item = dotenv::Result<(String, String)>>,
{
    entries
        .filter_map(|entry| match entry {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("Skipping malformed env file line: {}", e);
                None
            }
        })
        .collect()
}

fn smtp_config<G>(get: &G) -> Result<SmtpConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let server = get("EXPL_SMTPserver").ok_or(ConfigError::Missing("EXPL_SMTPserver"))?;
    require_len("EXPL_SMTPserver", &server)?;

    let port: u16 = parse_number("EXPL_SMTPPort", get("EXPL_SMTPPort"), DEFAULT_SMTP_PORT)?;
    if port == 0 {
        return Err(ConfigError::Invalid {
            name: "EXPL_SMTPPort",
            reason: "port must be greater than zero".to_string(),
        });
    }

    let username = get("EXPL_USERNAME").ok_or(ConfigError::Missing("EXPL_USERNAME"))?;
    require_len("EXPL_USERNAME", &username)?;
    let password = get("EXPL_PASSWORD").ok_or(ConfigError::Missing("EXPL_PASSWORD"))?;
    require_len("EXPL_PASSWORD", &password)?;
    let destination = get("EXPL_DESTINATION").ok_or(ConfigError::Missing("EXPL_DESTINATION"))?;
    require_len("EXPL_DESTINATION", &destination)?;

    Ok(SmtpConfig::new(server, port, username, password, destination))
}

fn require_len(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.chars().count() < MIN_SETTING_LEN {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("must be at least {} characters", MIN_SETTING_LEN),
        });
    }
    Ok(())
}

fn parse_number<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
