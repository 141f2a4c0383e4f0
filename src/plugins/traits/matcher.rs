use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much a matched price can be trusted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// A unit-aware pattern for the commodity matched.
    Strict,
    /// Only the generic "number before €" pattern matched; the value may be
    /// an unrelated amount such as a fixed fee.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub price: Decimal,
    pub confidence: Confidence,
    pub pattern: &'static str,
}

/// A single candidate pattern in an ordered extraction chain.
pub trait PriceMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the price for the first match in `text`, or `None` when the
    /// pattern does not match or the numeral does not parse.
    fn match_price(&self, text: &str) -> Option<Decimal>;
}
