use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TierTableError {
    #[error("Tier table has no tiers")]
    Empty,

    #[error("Tier bounds must be strictly increasing: {previous} then {next}")]
    UnorderedBounds { previous: u32, next: u32 },

    #[error("Tier bound must be positive")]
    ZeroBound,

    #[error("Invalid unit price: {0}")]
    InvalidPrice(f64),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tier {
    pub up_to: u32,
    pub unit_price: f64,
}

impl Tier {
    pub fn new(up_to: u32, unit_price: f64) -> Self {
        Self { up_to, unit_price }
    }
}

/// Quantity breakpoints in ascending order. `overflow_price` is only read by
/// the fixed-overflow policy; the lookup itself never falls back to it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TierTable {
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub overflow_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierPrice {
    Price(f64),
    Overflow,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self {
            tiers,
            overflow_price: None,
        }
    }

    pub fn with_overflow_price(mut self, price: f64) -> Self {
        self.overflow_price = Some(price);
        self
    }

    pub fn max_bound(&self) -> Option<u32> {
        self.tiers.last().map(|t| t.up_to)
    }

    pub fn validate(&self) -> Result<(), TierTableError> {
        let first = self.tiers.first().ok_or(TierTableError::Empty)?;
        if first.up_to == 0 {
            return Err(TierTableError::ZeroBound);
        }

        for pair in self.tiers.windows(2) {
            if pair[1].up_to <= pair[0].up_to {
                return Err(TierTableError::UnorderedBounds {
                    previous: pair[0].up_to,
                    next: pair[1].up_to,
                });
            }
        }

        let prices = self
            .tiers
            .iter()
            .map(|t| t.unit_price)
            .chain(self.overflow_price);
        for price in prices {
            if !price.is_finite() || price < 0.0 {
                return Err(TierTableError::InvalidPrice(price));
            }
        }

        Ok(())
    }
}

pub fn tier_price(quantity: u32, table: &TierTable) -> TierPrice {
    if quantity == 0 {
        return TierPrice::Price(0.0);
    }

    table
        .tiers
        .iter()
        .find(|t| t.up_to >= quantity)
        .map_or(TierPrice::Overflow, |t| TierPrice::Price(t.unit_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cameras() -> TierTable {
        TierTable::new(vec![
            Tier::new(10, 1800.0),
            Tier::new(30, 1600.0),
            Tier::new(50, 1500.0),
            Tier::new(100, 1300.0),
        ])
    }

    #[test]
    fn zero_quantity_is_free() {
        assert_eq!(tier_price(0, &cameras()), TierPrice::Price(0.0));
    }

    #[test]
    fn picks_first_bound_at_or_above_quantity() {
        let table = cameras();
        assert_eq!(tier_price(1, &table), TierPrice::Price(1800.0));
        assert_eq!(tier_price(10, &table), TierPrice::Price(1800.0));
        assert_eq!(tier_price(11, &table), TierPrice::Price(1600.0));
        assert_eq!(tier_price(22, &table), TierPrice::Price(1600.0));
        assert_eq!(tier_price(50, &table), TierPrice::Price(1500.0));
        assert_eq!(tier_price(100, &table), TierPrice::Price(1300.0));
    }

    #[test]
    fn beyond_last_bound_overflows() {
        let table = cameras().with_overflow_price(1200.0);
        assert_eq!(tier_price(101, &table), TierPrice::Overflow);
    }

    #[test]
    fn validate_rejects_unordered_bounds() {
        let table = TierTable::new(vec![Tier::new(30, 1600.0), Tier::new(10, 1800.0)]);
        assert_eq!(
            table.validate(),
            Err(TierTableError::UnorderedBounds {
                previous: 30,
                next: 10
            })
        );
    }

    #[test]
    fn validate_rejects_empty_and_negative() {
        assert_eq!(TierTable::new(vec![]).validate(), Err(TierTableError::Empty));
        let table = TierTable::new(vec![Tier::new(10, -1.0)]);
        assert_eq!(table.validate(), Err(TierTableError::InvalidPrice(-1.0)));
        assert!(cameras().validate().is_ok());
    }
}
