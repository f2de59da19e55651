use serde::{Deserialize, Serialize};

/// How many cameras of each AI tier one processing unit serves.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HardwareCapacity {
    pub tier1: u32,
    pub tier2: u32,
}

impl HardwareCapacity {
    pub fn new(tier1: u32, tier2: u32) -> Self {
        Self { tier1, tier2 }
    }

    pub fn is_valid(&self) -> bool {
        self.tier1 > 0 && self.tier2 > 0
    }
}

/// Units needed when both tiers draw fractionally from the same pool:
/// `ceil(tier1 / c1 + tier2 / c2)`, evaluated over a common denominator.
///
/// Capacities are checked at settings load; a zero capacity here yields 0.
pub fn hardware_units(tier1_count: u32, tier2_count: u32, capacity: &HardwareCapacity) -> u32 {
    if !capacity.is_valid() || (tier1_count == 0 && tier2_count == 0) {
        return 0;
    }

    let c1 = capacity.tier1 as u64;
    let c2 = capacity.tier2 as u64;
    let load = tier1_count as u64 * c2 + tier2_count as u64 * c1;

    load.div_ceil(c1 * c2) as u32
}
