use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::CommodityKind;
use crate::plugins::traits::{Confidence, Extraction, PriceMatcher};
use crate::utils::error::Result;

/// Numeral with a comma or period fractional separator.
const AMOUNT: &str = r"(\d+[.,]\d+)";
/// Hidden markup some tariff pages inject between the amount and the unit.
const COMMENT: &str = r"(?:\s*<!--[^>]*-->)?";

const ELECTRICITY_UNIT: &str = r"k? ?wh";
const GAS_UNIT: &str = r"s?mc";

/// Converts a captured numeral to a decimal, accepting `,` as the separator.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.replace(',', ".")).ok()
}

/// A case-insensitive pattern whose first capture group is the amount.
pub struct RegexMatcher {
    name: &'static str,
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self> {
        Ok(RegexMatcher {
            name,
            regex: Regex::new(&format!("(?i){}", pattern))?,
        })
    }
}

impl PriceMatcher for RegexMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn match_price(&self, text: &str) -> Option<Decimal> {
        let captures = self.regex.captures(text)?;
        let raw = captures.get(1)?.as_str();
        let price = parse_amount(raw);
        if price.is_none() {
            debug!("Pattern {} matched unparsable amount '{}'", self.name, raw);
        }
        price
    }
}

type MatcherChain = Vec<Box<dyn PriceMatcher>>;

const ELECTRICITY_PATTERNS: [&str; 4] = [
    "amount-euro-kwh",
    "euro-amount-kwh",
    "amount-euro-slash-kwh",
    "amount-euro-slash-kw",
];

const GAS_PATTERNS: [&str; 4] = [
    "amount-euro-smc",
    "euro-amount-smc",
    "amount-euro-slash-smc",
    "amount-euro-slash-mc",
];

/// Ordered pattern chains per commodity, strictest first, plus a
/// kind-agnostic fallback.
pub struct TariffExtractor {
    electricity: MatcherChain,
    gas: MatcherChain,
    fallback: Box<dyn PriceMatcher>,
}

impl TariffExtractor {
    pub fn new() -> Result<Self> {
        Ok(TariffExtractor {
            electricity: Self::chain(ELECTRICITY_UNIT, ELECTRICITY_PATTERNS, "kwh", "kw")?,
            gas: Self::chain(GAS_UNIT, GAS_PATTERNS, "smc", "mc")?,
            fallback: Box::new(RegexMatcher::new("amount-euro", &format!(r"{}\s*€", AMOUNT))?),
        })
    }

    fn chain(
        unit: &str,
        names: [&'static str; 4],
        exact: &str,
        short: &str,
    ) -> Result<MatcherChain> {
        let patterns = [
            format!(r"{AMOUNT}{COMMENT}\s*€\s*/?\s*{unit}"),
            format!(r"€\s*{AMOUNT}{COMMENT}\s*/?\s*{unit}"),
            format!(r"{AMOUNT}{COMMENT}\s*€/{exact}"),
            format!(r"{AMOUNT}{COMMENT}\s*€/{short}"),
        ];

        names
            .into_iter()
            .zip(patterns.iter())
            .map(|(name, pattern)| {
                RegexMatcher::new(name, pattern).map(|m| Box::new(m) as Box<dyn PriceMatcher>)
            })
            .collect()
    }

    pub fn matchers(&self, kind: CommodityKind) -> &[Box<dyn PriceMatcher>] {
        match kind {
            CommodityKind::Electricity => &self.electricity,
            CommodityKind::Gas => &self.gas,
        }
    }

    pub fn extract(&self, text: &str, kind: CommodityKind) -> Option<Decimal> {
        self.extract_detailed(text, kind).map(|e| e.price)
    }

    /// First matcher in declared order wins; the fallback only runs when
    /// every kind-specific matcher came up empty.
    pub fn extract_detailed(&self, text: &str, kind: CommodityKind) -> Option<Extraction> {
        for matcher in self.matchers(kind) {
            if let Some(price) = matcher.match_price(text) {
                debug!("{} price {} matched by {}", kind, price, matcher.name());
                return Some(Extraction {
                    price,
                    confidence: Confidence::Strict,
                    pattern: matcher.name(),
                });
            }
        }

        let price = self.fallback.match_price(text)?;
        warn!(
            "No {} unit pattern matched; using generic fallback price {} which may be an unrelated amount",
            kind, price
        );
        Some(Extraction {
            price,
            confidence: Confidence::Fallback,
            pattern: self.fallback.name(),
        })
    }
}
