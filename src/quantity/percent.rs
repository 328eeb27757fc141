use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::quantity::price::KilowattHourPrice;

/// Whole percent, as shown on a price badge.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
)]
#[must_use]
pub struct Percent(pub i64);

impl Percent {
    /// Relative change of `value` against `base`: `(value - base) / base * 100`.
    ///
    /// Returns [`None`] for a zero base instead of an infinite or undefined percentage.
    #[expect(clippy::cast_possible_truncation)]
    pub fn change(value: KilowattHourPrice, base: KilowattHourPrice) -> Option<Self> {
        let base = base.get();
        if base == 0.0 {
            return None;
        }
        let percent = ((value.get() - base) / base * 100.0).round();
        percent.is_finite().then_some(Self(percent as i64))
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}%", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change() {
        assert_eq!(
            Percent::change(KilowattHourPrice::from(10.0), KilowattHourPrice::from(8.0)),
            Some(Percent(25)),
        );
        assert_eq!(
            Percent::change(KilowattHourPrice::from(0.06), KilowattHourPrice::from(0.1)),
            Some(Percent(-40)),
        );
    }

    #[test]
    fn test_change_zero_base() {
        assert_eq!(Percent::change(KilowattHourPrice::from(10.0), KilowattHourPrice::ZERO), None);
        assert_eq!(Percent::change(KilowattHourPrice::ZERO, KilowattHourPrice::ZERO), None);
    }

    #[test]
    fn test_change_rounds_to_whole_percent() {
        assert_eq!(
            Percent::change(KilowattHourPrice::from(0.1), KilowattHourPrice::from(0.3)),
            Some(Percent(-67)),
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Percent(25).to_string(), "+25%");
        assert_eq!(Percent(-40).to_string(), "-40%");
        assert_eq!(Percent(0).to_string(), "+0%");
    }
}
