//! Defending unit kinds.
//!
//! Infantry, tanks, and artillery are combat units that contribute defense
//! power and can retreat. Supply and trucks are logistics assets: they only
//! absorb hits and never count toward evacuation.

use serde::Serialize;

/// A kind of defending asset that can occupy a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Infantry,
    Tank,
    Artillery,
    Supply,
    Truck,
}

/// Combat kinds in slot enumeration order.
pub const COMBAT_KINDS: [UnitKind; 3] = [UnitKind::Infantry, UnitKind::Tank, UnitKind::Artillery];

/// Every kind in slot enumeration order.
pub const ALL_KINDS: [UnitKind; 5] = [
    UnitKind::Infantry,
    UnitKind::Tank,
    UnitKind::Artillery,
    UnitKind::Supply,
    UnitKind::Truck,
];

impl UnitKind {
    /// Defense power contributed by one unit of this kind.
    pub const fn power(self) -> u32 {
        match self {
            UnitKind::Infantry => 1,
            UnitKind::Tank => 2,
            UnitKind::Artillery => 3,
            UnitKind::Supply | UnitKind::Truck => 0,
        }
    }

    /// Maximum number of units of this kind allowed in one hex, if limited.
    pub const fn stacking_limit(self) -> Option<u32> {
        match self {
            UnitKind::Infantry | UnitKind::Tank => Some(6),
            UnitKind::Artillery => Some(3),
            UnitKind::Supply | UnitKind::Truck => None,
        }
    }

    /// Returns true for infantry, tanks, and artillery.
    pub const fn is_combat(self) -> bool {
        matches!(
            self,
            UnitKind::Infantry | UnitKind::Tank | UnitKind::Artillery
        )
    }

    /// Short label used in report column headers.
    pub const fn label(self) -> &'static str {
        match self {
            UnitKind::Infantry => "inf",
            UnitKind::Tank => "tnk",
            UnitKind::Artillery => "art",
            UnitKind::Supply => "supply",
            UnitKind::Truck => "truck",
        }
    }
}
