// src/services/sink.rs

//! Notification sink abstraction and the Discord webhook implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::SinkConfig;
use crate::error::{AppError, Result};
use crate::services::message::IncidentMessage;

/// External destination for incident notifications.
///
/// Session establishment, reconnection and presence are owned by whatever
/// backs the sink; the pipeline only ever sends one message or refreshes one
/// status string.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one message. Must only return `Ok` once the sink confirmed
    /// receipt; the watermark advances on that confirmation.
    async fn send(&self, message: &IncidentMessage) -> Result<()>;

    /// Refresh the externally visible status indicator.
    async fn update_status(&self, status: &str) -> Result<()>;
}

/// Sink that posts incident embeds to a Discord webhook.
pub struct DiscordWebhookSink {
    webhook_url: String,
    username: Option<String>,
    client: Client,
}

impl DiscordWebhookSink {
    /// Create a new webhook sink from the sink configuration.
    pub fn new(config: &SinkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            webhook_url: config.webhook_url.clone(),
            username: config.username.clone(),
            client,
        })
    }

    /// Build the webhook JSON payload for a message.
    fn payload(&self, message: &IncidentMessage) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = message
            .fields
            .iter()
            .map(|field| {
                json!({
                    "name": field.label,
                    "value": field.value,
                    "inline": field.inline,
                })
            })
            .collect();

        let mut payload = json!({
            "embeds": [{
                "title": message.title,
                "description": message.description,
                "color": message.color,
                "fields": fields,
                "footer": {
                    "text": message.footer_text,
                    "icon_url": message.footer_icon_url,
                },
            }]
        });
        if let Some(username) = &self.username {
            payload["username"] = json!(username);
        }
        payload
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhookSink {
    async fn send(&self, message: &IncidentMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(AppError::sink_unavailable)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Rate limits and server trouble are transient; anything else means
        // the sink refused the message itself.
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AppError::sink_unavailable(format!("HTTP {status}")))
        } else {
            Err(AppError::SinkRejected { status })
        }
    }

    async fn update_status(&self, status: &str) -> Result<()> {
        // Webhooks carry no presence surface; a gateway-backed sink would
        // forward this to the session it owns.
        log::debug!("Sink status: {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::message::{ALERT_COLOR, MessageField};

    fn sample_message() -> IncidentMessage {
        IncidentMessage {
            title: "🔥 Požár 05.03.2026 14:22:00".to_string(),
            description: "Požár nízké budovy".to_string(),
            color: ALERT_COLOR,
            fields: vec![MessageField {
                label: "Stav".to_string(),
                value: "Likvidace".to_string(),
                inline: false,
            }],
            footer_text: "HZS Vysočina Výjezdy".to_string(),
            footer_icon_url: "https://example.com/icon.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn payload_matches_webhook_embed_shape() {
        let sink = DiscordWebhookSink::new(&SinkConfig::default()).unwrap();
        let payload = sink.payload(&sample_message());

        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "🔥 Požár 05.03.2026 14:22:00");
        assert_eq!(embed["color"], 0xFF0000);
        assert_eq!(embed["fields"][0]["name"], "Stav");
        assert_eq!(embed["fields"][0]["inline"], false);
        assert_eq!(embed["footer"]["text"], "HZS Vysočina Výjezdy");
        assert!(payload.get("username").is_none());
    }

    #[tokio::test]
    async fn payload_includes_username_when_configured() {
        let config = SinkConfig {
            username: Some("firewatch".to_string()),
            ..SinkConfig::default()
        };
        let sink = DiscordWebhookSink::new(&config).unwrap();
        let payload = sink.payload(&sample_message());
        assert_eq!(payload["username"], "firewatch");
    }
}
