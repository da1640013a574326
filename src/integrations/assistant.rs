//! Assistant (chatbot) proxy
//!
//! `tb chat` relays a message to an external assistant service and prints
//! its reply. The integration is disabled unless configured:
//!
//! ```toml
//! [integrations.assistant]
//! enabled = true
//! url = "http://localhost:5000/chat"
//! timeout = "30s"
//! ```
//!
//! The service contract is one POST of `{user_id, message}` answered with
//! `{response}`. Nothing else in the tool depends on this integration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{parse_duration, AssistantConfig};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    user_id: &'a str,
    message: &'a str,
}

/// Reply from the assistant service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Client for the configured assistant endpoint
#[derive(Debug, Clone)]
pub struct AssistantClient {
    url: String,
    timeout: Duration,
}

impl AssistantClient {
    /// Build a client from config; disabled or incomplete config is a user
    /// error with a hint
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        if !config.enabled {
            return Err(Error::IntegrationDisabled("assistant".to_string()));
        }

        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::InvalidConfig("integrations.assistant.url is not set".to_string())
            })?
            .to_string();

        let timeout = parse_duration(&config.timeout)?
            .to_std()
            .map_err(|_| Error::InvalidConfig("integrations.assistant.timeout".to_string()))?;

        Ok(Self { url, timeout })
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Relay one message and return the assistant's reply
    pub fn send(&self, user_id: &str, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidArgument(
                "message cannot be empty".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let reply = client
            .post(&self.url)
            .json(&ChatRequest { user_id, message })
            .send()?
            .error_for_status()?
            .json::<ChatReply>()?;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = AssistantConfig::default();
        assert!(matches!(
            AssistantClient::from_config(&config),
            Err(Error::IntegrationDisabled(_))
        ));
    }

    #[test]
    fn enabled_requires_url() {
        let config = AssistantConfig {
            enabled: true,
            ..AssistantConfig::default()
        };
        assert!(matches!(
            AssistantClient::from_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn builds_from_complete_config() {
        let config = AssistantConfig {
            enabled: true,
            url: Some("http://localhost:5000/chat".to_string()),
            timeout: "5s".to_string(),
        };
        let client = AssistantClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:5000/chat");
    }

    #[test]
    fn request_payload_shape() {
        let request = ChatRequest {
            user_id: "user-1",
            message: "how do I create a task?",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["message"], "how do I create a task?");
    }
}
