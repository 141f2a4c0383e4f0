use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

use crate::config::TelegramConfig;
use crate::plugins::traits::{NotificationResult, Notifier, PriceAlert};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
struct Credentials {
    bot_token: String,
    chat_id: String,
}

/// Sends alerts through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    credentials: Option<Credentials>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let credentials = match (&config.bot_token, &config.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(Credentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => {
                error!("Missing TELEGRAM_TOKEN or TELEGRAM_CHAT_ID; alerts cannot be delivered");
                None
            }
        };

        Ok(TelegramNotifier {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, alert: &PriceAlert) -> Result<NotificationResult> {
        let Some(credentials) = &self.credentials else {
            return Ok(NotificationResult::failed("missing credentials"));
        };

        let text = alert.render();
        let response = self
            .client
            .post(self.send_message_url(&credentials.bot_token))
            .form(&[
                ("chat_id", credentials.chat_id.as_str()),
                ("text", text.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        info!("Telegram status: {}", status.as_u16());

        if status.is_success() {
            let message_id = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["result"]["message_id"].as_i64())
                .map(|id| id.to_string());

            Ok(NotificationResult {
                success: true,
                message_id,
                error: None,
            })
        } else {
            Ok(NotificationResult::failed(format!("Telegram responded with {}", status)))
        }
    }
}
