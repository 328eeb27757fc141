use chrono::NaiveDate;
use serde::Serialize;

use crate::{core::point::DailyPriceSet, prelude::*, quantity::price::KilowattHourPrice};

/// Aggregate summary of a day, shown once when the dashboard opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub n_hours: usize,
    pub average: KilowattHourPrice,
    pub minimum: KilowattHourPrice,
    pub maximum: KilowattHourPrice,
}

impl TryFrom<&DailyPriceSet> for DashboardStats {
    type Error = Error;

    #[expect(clippy::cast_precision_loss)]
    fn try_from(price_set: &DailyPriceSet) -> Result<Self> {
        let prices = price_set.points().iter().map(|point| point.price);
        let (Some(minimum), Some(maximum)) = (prices.clone().min(), prices.clone().max()) else {
            bail!("no prices on {}", price_set.date());
        };
        let total: KilowattHourPrice = prices.sum();
        Ok(Self {
            date: price_set.date(),
            n_hours: price_set.len(),
            average: KilowattHourPrice::from(total.get() / price_set.len() as f64),
            minimum,
            maximum,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::point::tests::{date, fetched_at, price_set};

    #[test]
    fn test_try_from_ok() -> Result {
        let stats = DashboardStats::try_from(&price_set(&[(0, 0.10), (1, 0.20), (2, 0.15)]))?;
        assert_eq!(stats.date, date());
        assert_eq!(stats.n_hours, 3);
        assert_abs_diff_eq!(stats.average.get(), 0.15);
        assert_abs_diff_eq!(stats.minimum.get(), 0.10);
        assert_abs_diff_eq!(stats.maximum.get(), 0.20);
        Ok(())
    }

    #[test]
    fn test_try_from_empty() -> Result {
        let price_set = DailyPriceSet::try_new(date(), [], fetched_at())?;
        assert!(DashboardStats::try_from(&price_set).is_err());
        Ok(())
    }
}
