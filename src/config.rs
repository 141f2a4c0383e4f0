use config::{Config, ConfigError, Environment, File, Map};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::models::CommodityKind;

pub const DEFAULT_TARIFF_URL: &str = "https://octopusenergy.it/le-nostre-tariffe";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; PriceBot/1.0; +https://example.org/bot)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub electricity: CommodityConfig,
    pub gas: CommodityConfig,
    pub scraper: ScraperConfig,
    pub state: StateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommodityConfig {
    pub target_price: Decimal,
    pub tariff_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScraperConfig {
    /// Per-request timeout in seconds, shared by page fetches and deliveries.
    pub request_timeout: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateConfig {
    pub path: PathBuf,
}

/// Flat key layout shared by the TOML file and the environment.
#[derive(Debug, Deserialize)]
struct Settings {
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
    telegram_api_base: String,
    target_electricity_price: Decimal,
    target_gas_price: Decimal,
    electricity_tariff_url: String,
    gas_tariff_url: String,
    state_file: PathBuf,
    request_timeout: u64,
    user_agent: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<Settings> for AppConfig {
    fn from(s: Settings) -> Self {
        AppConfig {
            telegram: TelegramConfig {
                bot_token: non_empty(s.telegram_token),
                chat_id: non_empty(s.telegram_chat_id),
                api_base: s.telegram_api_base,
            },
            electricity: CommodityConfig {
                target_price: s.target_electricity_price,
                tariff_url: s.electricity_tariff_url,
            },
            gas: CommodityConfig {
                target_price: s.target_gas_price,
                tariff_url: s.gas_tariff_url,
            },
            scraper: ScraperConfig {
                request_timeout: s.request_timeout,
                user_agent: s.user_agent,
            },
            state: StateConfig { path: s.state_file },
        }
    }
}

impl AppConfig {
    pub fn from_env(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(config_file, None)
    }

    /// Layers built-in defaults, an optional TOML file and the environment.
    /// `env` replaces the process environment when given.
    pub fn load(
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("telegram_api_base", DEFAULT_TELEGRAM_API)?
            .set_default("target_electricity_price", "0.11")?
            .set_default("target_gas_price", "0.85")?
            .set_default("electricity_tariff_url", DEFAULT_TARIFF_URL)?
            .set_default("gas_tariff_url", DEFAULT_TARIFF_URL)?
            .set_default("state_file", "state.json")?
            .set_default("request_timeout", 15)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("tariff-watcher").required(false)),
        };

        let s = builder
            .add_source(Environment::default().ignore_empty(true).source(env))
            .build()?;

        let config: AppConfig = s.try_deserialize::<Settings>()?.into();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in CommodityKind::ALL {
            let commodity = self.commodity(kind);

            if commodity.target_price.is_sign_negative() {
                return Err(ConfigError::Message(format!(
                    "Target {} price must not be negative",
                    kind
                )));
            }

            if !Self::is_http_url(&commodity.tariff_url) {
                return Err(ConfigError::Message(format!("Invalid {} tariff URL", kind)));
            }
        }

        if !Self::is_http_url(&self.telegram.api_base) {
            return Err(ConfigError::Message("Invalid Telegram API base URL".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Request timeout must be greater than 0".into()));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("User agent must not be empty".into()));
        }

        Ok(())
    }

    pub fn commodity(&self, kind: CommodityKind) -> &CommodityConfig {
        match kind {
            CommodityKind::Electricity => &self.electricity,
            CommodityKind::Gas => &self.gas,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.request_timeout)
    }

    fn is_http_url(raw: &str) -> bool {
        matches!(Url::parse(raw), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
    }
}
