use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit size in TB mapped to the number of units picked.
pub type StorageCombo = BTreeMap<u32, u32>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageUnit {
    pub size_tb: u32,
    pub price: f64,
}

impl StorageUnit {
    pub fn new(size_tb: u32, price: f64) -> Self {
        Self { size_tb, price }
    }
}

/// Greedy cover of `required_tb` using `sizes`: the largest size while the
/// remainder exceeds it, then the smallest size that fits the remainder.
/// The result always covers the requirement but is not guaranteed to be the
/// cheapest or the fewest units.
pub fn choose_storage_combo(required_tb: u32, sizes: &[u32]) -> StorageCombo {
    let mut combo = StorageCombo::new();

    let Some(&largest) = sizes.iter().filter(|s| **s > 0).max() else {
        return combo;
    };

    // Whole run of largest units while the remainder still exceeds one.
    let mut remaining = required_tb;
    if remaining > largest {
        let run = (remaining - 1) / largest;
        combo.insert(largest, run);
        remaining -= run * largest;
    }

    if remaining > 0 {
        let pick = smallest_fitting(remaining, sizes).unwrap_or(largest);
        *combo.entry(pick).or_insert(0) += 1;
    }

    combo
}

/// Smallest catalog size that holds `required_tb` on its own.
pub fn smallest_fitting(required_tb: u32, sizes: &[u32]) -> Option<u32> {
    sizes
        .iter()
        .copied()
        .filter(|s| *s > 0 && *s >= required_tb)
        .min()
}

pub fn combo_capacity(combo: &StorageCombo) -> u64 {
    combo
        .iter()
        .map(|(size, count)| *size as u64 * *count as u64)
        .sum()
}
