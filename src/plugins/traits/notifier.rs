use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CommodityKind;
use crate::utils::error::Result;

/// Payload of a below-threshold alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceAlert {
    pub kind: CommodityKind,
    pub price: Decimal,
    pub threshold: Decimal,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub source_url: String,
}

impl PriceAlert {
    pub fn render(&self) -> String {
        format!(
            "Price Alert! Octopus current {} price is {:.4} {}, below your target {:.4} {}. ({} UTC)\n{}",
            self.kind,
            self.price,
            self.unit,
            self.threshold,
            self.unit,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true).trim_end_matches('Z'),
            self.source_url,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn failed(error: impl Into<String>) -> Self {
        NotificationResult {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Delivery channel for price alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok` with `success == false` and `Err` both count as a failed delivery.
    async fn notify(&self, alert: &PriceAlert) -> Result<NotificationResult>;
}
