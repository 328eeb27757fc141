use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Euro per kilowatt-hour.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct KilowattHourPrice(pub OrderedFloat<f64>);

impl KilowattHourPrice {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    /// Convert from the market-style euro per megawatt-hour.
    pub fn from_megawatt_hour(euro_per_mwh: f64) -> Self {
        Self(OrderedFloat(euro_per_mwh / 1000.0))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.0 < 0.0
    }
}

impl Display for KilowattHourPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} €/kWh", self.0)
    }
}

impl Debug for KilowattHourPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}€/kWh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_megawatt_hour() {
        assert_abs_diff_eq!(KilowattHourPrice::from_megawatt_hour(123.45).get(), 0.12345);
    }

    #[test]
    fn test_display() {
        assert_eq!(KilowattHourPrice::from(0.123_456).to_string(), "0.1235 €/kWh");
        assert_eq!(KilowattHourPrice::ZERO.to_string(), "0.0000 €/kWh");
    }

    #[test]
    fn test_ordering() {
        assert!(KilowattHourPrice::from(0.1) < KilowattHourPrice::from(0.2));
        assert_eq!(
            KilowattHourPrice::from(0.1).max(KilowattHourPrice::from(0.2)),
            KilowattHourPrice::from(0.2),
        );
    }
}
