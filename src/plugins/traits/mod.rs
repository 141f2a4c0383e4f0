pub mod matcher;
pub mod notifier;

pub use matcher::{Confidence, Extraction, PriceMatcher};
pub use notifier::{NotificationResult, Notifier, PriceAlert};
