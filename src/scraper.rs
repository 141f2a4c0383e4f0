use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    pub url: String,
}

/// Source of tariff page markup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Non-2xx responses are errors; 403 is reported as [`AppError::AccessDenied`].
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(AppError::AccessDenied {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
            url: final_url,
        })
    }
}

/// Text nodes of an HTML document joined by single spaces. Comments and tags
/// are dropped, so prices split by hidden markup come back together.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
