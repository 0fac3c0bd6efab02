//! Unit counts for a single defending hex.

use serde::Serialize;

use super::unit::UnitKind;

/// How many of each kind occupy a hex.
///
/// Field order gives the derived ordering used for deterministic iteration
/// over merged force states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ForceCounts {
    pub inf: u32,
    pub tnk: u32,
    pub art: u32,
    pub supply: u32,
    pub truck: u32,
}

impl ForceCounts {
    /// Creates a force from per-kind counts.
    pub const fn new(inf: u32, tnk: u32, art: u32, supply: u32, truck: u32) -> Self {
        ForceCounts {
            inf,
            tnk,
            art,
            supply,
            truck,
        }
    }

    /// Returns the count for one kind.
    pub const fn count(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Infantry => self.inf,
            UnitKind::Tank => self.tnk,
            UnitKind::Artillery => self.art,
            UnitKind::Supply => self.supply,
            UnitKind::Truck => self.truck,
        }
    }

    /// Total defense power: 1 per infantry, 2 per tank, 3 per artillery.
    pub const fn defense_power(&self) -> u32 {
        self.inf * UnitKind::Infantry.power()
            + self.tnk * UnitKind::Tank.power()
            + self.art * UnitKind::Artillery.power()
    }

    /// Number of combat units (logistics excluded).
    pub const fn combat_units(&self) -> u32 {
        self.inf + self.tnk + self.art
    }

    /// True when no combat unit remains in the hex.
    pub const fn is_evacuated(&self) -> bool {
        self.combat_units() == 0
    }
}
