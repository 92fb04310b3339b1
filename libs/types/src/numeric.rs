//! Integer tick prices and unit quantities
//!
//! All prices are signed tick counts and all quantities are unit counts,
//! so book arithmetic is exact integer arithmetic with no rounding policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn ticks(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity in units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction; quantities never go negative.
    pub fn saturating_sub(&self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(other.0))
    }

    pub fn min(self, other: Quantity) -> Quantity {
        Quantity(self.0.min(other.0))
    }
}

impl std::ops::Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_ticks(100) > Price::from_ticks(99));
        assert!(Price::from_ticks(-1) < Price::from_ticks(0));
    }

    #[test]
    fn test_quantity_saturating_sub() {
        let a = Quantity::new(5);
        let b = Quantity::new(7);
        assert_eq!(a.saturating_sub(b), Quantity::zero());
        assert_eq!(b.saturating_sub(a), Quantity::new(2));
    }

    #[test]
    fn test_quantity_min() {
        assert_eq!(Quantity::new(3).min(Quantity::new(9)), Quantity::new(3));
    }
}
