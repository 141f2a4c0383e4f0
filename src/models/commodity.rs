use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AppError;

/// A monitored energy commodity. Each kind has its own unit, patterns and state slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommodityKind {
    Electricity,
    Gas,
}

impl CommodityKind {
    /// Check order for a run.
    pub const ALL: [CommodityKind; 2] = [CommodityKind::Electricity, CommodityKind::Gas];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommodityKind::Electricity => "electricity",
            CommodityKind::Gas => "gas",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            CommodityKind::Electricity => "€/kWh",
            CommodityKind::Gas => "€/Smc",
        }
    }
}

impl fmt::Display for CommodityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommodityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electricity" => Ok(CommodityKind::Electricity),
            "gas" => Ok(CommodityKind::Gas),
            other => Err(AppError::Parse {
                message: format!("unknown commodity kind '{}'", other),
            }),
        }
    }
}
