// Price extraction implementations
pub mod tariff;

pub use tariff::{RegexMatcher, TariffExtractor};
