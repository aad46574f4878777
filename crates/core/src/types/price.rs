//! Minor-unit price representation.
//!
//! All money in the system is Colombian pesos in the smallest currency unit.
//! COP has no fractional digits in this catalog, so a `Price` is a plain
//! integer amount and all arithmetic stays exact.

use core::fmt;

use serde::{Deserialize, Serialize};

/// IVA rate applied at checkout, in percent.
pub const TAX_RATE_PERCENT: i64 = 19;

/// A price in the smallest currency unit (COP).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Multiply this unit price by a quantity.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }

    /// Add two prices.
    #[must_use]
    pub const fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// The 19% IVA on this amount, rounded half-up to the nearest minor unit.
    ///
    /// Matches the checkout arithmetic the backend applies: e.g. a subtotal
    /// of 42 000 yields a tax of 7 980.
    #[must_use]
    pub const fn tax(&self) -> Self {
        Self((self.0 * TAX_RATE_PERCENT + 50) / 100)
    }

    /// Format for display the way the storefront shows COP: `$ 15.000`.
    #[must_use]
    pub fn display(&self) -> String {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        if negative {
            format!("-$ {grouped}")
        } else {
            format!("$ {grouped}")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_reference_values() {
        // The worked example from the checkout flow
        assert_eq!(Price::from_minor(42_000).tax().minor(), 7_980);
        assert_eq!(
            Price::from_minor(42_000).plus(Price::from_minor(42_000).tax()),
            Price::from_minor(49_980)
        );
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 19% of 50 = 9.5 -> 10
        assert_eq!(Price::from_minor(50).tax().minor(), 10);
        // 19% of 10 = 1.9 -> 2
        assert_eq!(Price::from_minor(10).tax().minor(), 2);
        // 19% of 100 = 19 exactly
        assert_eq!(Price::from_minor(100).tax().minor(), 19);
        assert_eq!(Price::ZERO.tax(), Price::ZERO);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Price::from_minor(0).display(), "$ 0");
        assert_eq!(Price::from_minor(999).display(), "$ 999");
        assert_eq!(Price::from_minor(15_000).display(), "$ 15.000");
        assert_eq!(Price::from_minor(1_234_567).display(), "$ 1.234.567");
        assert_eq!(Price::from_minor(-1_500).display(), "-$ 1.500");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_minor(15_000).times(2), Price::from_minor(12_000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_minor(42_000));
    }
}
