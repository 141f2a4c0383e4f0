// Shared fixtures for integration tests

pub mod scenario_tests;

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use tariff_watcher::{
    AppConfig, RunReport, TariffMonitor,
    config::{CommodityConfig, ScraperConfig, StateConfig, TelegramConfig},
    core::JsonStateStore,
    plugins::notifiers::TelegramNotifier,
    scraper::HttpFetcher,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BOT_TOKEN: &str = "123:test";
pub const TARIFF_PATH: &str = "/le-nostre-tariffe";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A mock tariff site, a mock Telegram API and a scratch state directory.
pub struct TestEnv {
    pub server: MockServer,
    pub dir: TempDir,
    pub config: AppConfig,
}

impl TestEnv {
    pub async fn start() -> anyhow::Result<Self> {
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let config = get_test_config(&server.uri(), dir.path().join("state.json"));
        Ok(TestEnv { server, dir, config })
    }

    pub fn state_path(&self) -> PathBuf {
        self.config.state.path.clone()
    }

    pub fn store(&self) -> JsonStateStore {
        JsonStateStore::new(self.state_path())
    }

    pub async fn serve_page(&self, body: &str) {
        Mock::given(method("GET"))
            .and(path(TARIFF_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(&self.server)
            .await;
    }

    pub async fn telegram_responds(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "ok": status == 200,
                "result": {"message_id": 1}
            })))
            .mount(&self.server)
            .await;
    }

    /// Requests received by the mock Telegram API so far.
    pub async fn sent_messages(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with("/sendMessage"))
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect()
    }

    pub fn monitor(&self) -> anyhow::Result<TariffMonitor> {
        let fetcher = HttpFetcher::new(&self.config.scraper)?;
        let notifier = TelegramNotifier::new(&self.config.telegram, self.config.request_timeout())?;
        Ok(TariffMonitor::new(self.config.clone(), Box::new(fetcher), Box::new(notifier))?)
    }

    pub async fn run(&self) -> anyhow::Result<RunReport> {
        let store = self.store();
        Ok(self.monitor()?.run(&store).await?)
    }
}

/// Test configuration pointing every collaborator at the mock server
pub fn get_test_config(base_url: &str, state_path: PathBuf) -> AppConfig {
    let tariff_url = format!("{}{}", base_url, TARIFF_PATH);
    AppConfig {
        telegram: TelegramConfig {
            bot_token: Some(BOT_TOKEN.to_string()),
            chat_id: Some("42".to_string()),
            api_base: base_url.to_string(),
        },
        electricity: CommodityConfig {
            target_price: dec("0.11"),
            tariff_url: tariff_url.clone(),
        },
        gas: CommodityConfig {
            target_price: dec("0.85"),
            tariff_url,
        },
        scraper: ScraperConfig {
            request_timeout: 5,
            user_agent: "TariffWatcher-Test/1.0".to_string(),
        },
        state: StateConfig { path: state_path },
    }
}
