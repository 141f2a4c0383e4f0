use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CommodityKind;

/// Whether the next below-threshold observation will alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    Armed,
    Tripped,
}

/// Per-commodity state carried between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub last_price: Option<Decimal>,
    /// Hysteresis lock: set after a delivered alert, cleared once the price
    /// is back at or above the target.
    pub notified: bool,
}

impl MonitorState {
    pub fn phase(&self) -> AlertPhase {
        if self.notified {
            AlertPhase::Tripped
        } else {
            AlertPhase::Armed
        }
    }
}

/// State for every commodity, loaded and saved as one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub electricity: MonitorState,
    pub gas: MonitorState,
}

impl StateSnapshot {
    pub fn get(&self, kind: CommodityKind) -> MonitorState {
        match kind {
            CommodityKind::Electricity => self.electricity,
            CommodityKind::Gas => self.gas,
        }
    }

    pub fn set(&mut self, kind: CommodityKind, state: MonitorState) {
        match kind {
            CommodityKind::Electricity => self.electricity = state,
            CommodityKind::Gas => self.gas = state,
        }
    }
}

/// Flat on-disk layout of a [`StateSnapshot`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StateFile {
    pub last_electricity_price: Option<Decimal>,
    pub last_gas_price: Option<Decimal>,
    pub electricity_notified: bool,
    pub gas_notified: bool,
}

impl From<StateFile> for StateSnapshot {
    fn from(file: StateFile) -> Self {
        StateSnapshot {
            electricity: MonitorState {
                last_price: file.last_electricity_price,
                notified: file.electricity_notified,
            },
            gas: MonitorState {
                last_price: file.last_gas_price,
                notified: file.gas_notified,
            },
        }
    }
}

impl From<&StateSnapshot> for StateFile {
    fn from(snapshot: &StateSnapshot) -> Self {
        StateFile {
            last_electricity_price: snapshot.electricity.last_price,
            last_gas_price: snapshot.gas.last_price,
            electricity_notified: snapshot.electricity.notified,
            gas_notified: snapshot.gas.notified,
        }
    }
}
