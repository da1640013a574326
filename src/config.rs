//! Configuration loading and management
//!
//! Handles parsing of the `tb.toml` file in the data directory.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Auth configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Board configuration
    #[serde(default)]
    pub boards: BoardsConfig,

    /// External integrations
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

impl Config {
    /// Load configuration from a `tb.toml` file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `tb.toml` file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        parse_duration(&self.auth.code_ttl)
            .map_err(|_| Error::InvalidConfig(format!("auth.code_ttl: {}", self.auth.code_ttl)))?;
        parse_duration(&self.integrations.assistant.timeout).map_err(|_| {
            Error::InvalidConfig(format!(
                "integrations.assistant.timeout: {}",
                self.integrations.assistant.timeout
            ))
        })?;
        Ok(())
    }
}

/// Auth-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// How long an issued login code stays valid
    #[serde(default = "default_code_ttl")]
    pub code_ttl: String,
}

fn default_code_ttl() -> String {
    "10m".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_ttl: default_code_ttl(),
        }
    }
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardsConfig {
    /// Lists seeded by `tb board new --with-lists`
    #[serde(default = "default_lists")]
    pub default_lists: Vec<String>,
}

fn default_lists() -> Vec<String> {
    vec![
        "To Do".to_string(),
        "In Progress".to_string(),
        "Done".to_string(),
    ]
}

impl Default for BoardsConfig {
    fn default() -> Self {
        Self {
            default_lists: default_lists(),
        }
    }
}

/// External integration configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntegrationsConfig {
    /// Assistant (chatbot) proxy
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Assistant proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Whether `tb chat` is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Chat endpoint URL, e.g. "http://localhost:5000/chat"
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout
    #[serde(default = "default_assistant_timeout")]
    pub timeout: String,
}

fn default_assistant_timeout() -> String {
    "30s".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            timeout: default_assistant_timeout(),
        }
    }
}

/// Parse a human duration string like "10m", "30s", "2h", "1d"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidArgument(
            "Duration cannot be empty".to_string(),
        ));
    }

    // Find where the number ends and unit begins
    let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
        (&s[..pos], &s[pos..])
    } else {
        // Assume minutes if no unit
        (s, "m")
    };

    let num: i64 = num_str
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("Invalid duration number: {}", num_str)))?;

    let duration = match unit.to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::seconds(num),
        "m" | "min" | "minute" | "minutes" => Duration::minutes(num),
        "h" | "hr" | "hour" | "hours" => Duration::hours(num),
        "d" | "day" | "days" => Duration::days(num),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Invalid duration unit '{}'. Expected: s, m, h, d",
                unit
            )));
        }
    };

    Ok(duration)
}
