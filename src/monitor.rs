use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::core::{AlertContext, AlertDecision, StateStore, evaluate};
use crate::models::{CommodityKind, MonitorState, StateSnapshot};
use crate::plugins::traits::{Confidence, Extraction, Notifier};
use crate::plugins::trackers::TariffExtractor;
use crate::scraper::{PageFetcher, visible_text};
use crate::utils::error::{AppError, Result};

/// Outcome of checking one commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub kind: CommodityKind,
    pub extraction: Option<Extraction>,
    pub decision: AlertDecision,
    pub state: MonitorState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub checks: Vec<CheckReport>,
    pub snapshot: StateSnapshot,
}

impl RunReport {
    pub fn notifications_sent(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.decision == AlertDecision::Notified)
            .count()
    }
}

/// One monitoring pass: fetch, extract and evaluate every commodity in turn.
pub struct TariffMonitor {
    config: AppConfig,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
    extractor: TariffExtractor,
}

impl TariffMonitor {
    pub fn new(
        config: AppConfig,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        Ok(TariffMonitor {
            config,
            fetcher,
            notifier,
            extractor: TariffExtractor::new()?,
        })
    }

    /// Fetches the tariff page and extracts a price, trying the raw markup
    /// before its visible text. Every failure collapses to `None`.
    pub async fn observe(&self, kind: CommodityKind) -> Option<Extraction> {
        let url = &self.config.commodity(kind).tariff_url;
        info!("Scraping {} for {}", url, kind);

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(AppError::AccessDenied { url }) => {
                warn!("Got 403 from {} for {}; scraping might be blocked", url, kind);
                return None;
            }
            Err(e) => {
                error!("Scraping failed for {}: {}", kind, e);
                return None;
            }
        };
        debug!("Fetched {} page {} (HTTP {})", kind, page.url, page.status);

        let raw = self.extractor.extract_detailed(&page.body, kind);
        if matches!(raw, Some(Extraction { confidence: Confidence::Strict, .. })) {
            return raw;
        }

        // A unit-aware match on the visible text outranks a fallback on the markup.
        match (raw, self.extractor.extract_detailed(&visible_text(&page.body), kind)) {
            (_, Some(text)) if text.confidence == Confidence::Strict => Some(text),
            (Some(raw), _) => Some(raw),
            (None, text) => text,
        }
    }

    pub async fn check(&self, kind: CommodityKind, prior: MonitorState) -> CheckReport {
        let commodity = self.config.commodity(kind);
        let extraction = self.observe(kind).await;

        let observation: Option<Decimal> = match &extraction {
            Some(found) => {
                info!("Current {} price discovered: {} {}", kind, found.price, kind.unit());
                info!("Target {} price: {} {}", kind, commodity.target_price, kind.unit());
                Some(found.price)
            }
            None => {
                error!("Could not determine {} price. Skipping.", kind);
                None
            }
        };

        let context = AlertContext {
            kind,
            source_url: commodity.tariff_url.clone(),
        };
        let evaluation = evaluate(
            &context,
            observation,
            commodity.target_price,
            prior,
            self.notifier.as_ref(),
        )
        .await;

        CheckReport {
            kind,
            extraction,
            decision: evaluation.decision,
            state: evaluation.state,
        }
    }

    /// Loads state, checks each commodity sequentially and saves the result.
    /// Only state store failures abort the run.
    pub async fn run(&self, store: &dyn StateStore) -> Result<RunReport> {
        let mut snapshot = store.load()?;
        let mut checks = Vec::with_capacity(CommodityKind::ALL.len());

        for kind in CommodityKind::ALL {
            info!("=== Checking {} price ===", kind);
            let report = self.check(kind, snapshot.get(kind)).await;
            snapshot.set(kind, report.state);
            checks.push(report);
        }

        store.save(&snapshot)?;

        Ok(RunReport { checks, snapshot })
    }
}
