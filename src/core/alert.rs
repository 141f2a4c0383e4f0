use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::models::{CommodityKind, MonitorState};
use crate::plugins::traits::{Notifier, PriceAlert};

/// What identifies an alert besides the numbers.
#[derive(Debug, Clone)]
pub struct AlertContext {
    pub kind: CommodityKind,
    pub source_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// Extraction failed; state left untouched.
    NoObservation,
    /// Below target while armed and the alert was delivered.
    Notified,
    /// Below target while armed but delivery failed; stays armed for the next run.
    DeliveryFailed,
    /// Below target and already notified for this episode.
    Suppressed,
    /// Back at or above target; lock cleared.
    Reset,
    /// At or above target and armed.
    AboveThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub state: MonitorState,
    pub decision: AlertDecision,
}

pub async fn evaluate(
    context: &AlertContext,
    observation: Option<Decimal>,
    threshold: Decimal,
    prior: MonitorState,
    notifier: &dyn Notifier,
) -> Evaluation {
    let Some(price) = observation else {
        return Evaluation {
            state: prior,
            decision: AlertDecision::NoObservation,
        };
    };

    let mut state = MonitorState {
        last_price: Some(price),
        notified: prior.notified,
    };

    let decision = if price < threshold && !prior.notified {
        let alert = PriceAlert {
            kind: context.kind,
            price,
            threshold,
            unit: context.kind.unit().to_string(),
            timestamp: Utc::now(),
            source_url: context.source_url.clone(),
        };

        match notifier.notify(&alert).await {
            Ok(result) if result.success => {
                info!(
                    "{} alert sent via {} ({} < {})",
                    context.kind,
                    notifier.name(),
                    price,
                    threshold
                );
                state.notified = true;
                AlertDecision::Notified
            }
            Ok(result) => {
                error!(
                    "{} alert not delivered via {}: {}",
                    context.kind,
                    notifier.name(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
                AlertDecision::DeliveryFailed
            }
            Err(e) => {
                error!(
                    "{} alert not delivered via {}: {}",
                    context.kind,
                    notifier.name(),
                    e
                );
                AlertDecision::DeliveryFailed
            }
        }
    } else if price >= threshold && prior.notified {
        info!("{} price has gone back up, resetting notification lock", context.kind);
        state.notified = false;
        AlertDecision::Reset
    } else if price < threshold {
        AlertDecision::Suppressed
    } else {
        AlertDecision::AboveThreshold
    };

    Evaluation { state, decision }
}
