use chrono::{DateTime, Local, NaiveDate};
use itertools::Itertools;

use crate::{core::hour::Hour, prelude::*, quantity::price::KilowattHourPrice};

/// Electricity price of a single hour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Constructor)]
pub struct PricePoint {
    pub hour: Hour,
    pub price: KilowattHourPrice,
}

/// Hourly prices of one calendar day, ordered by hour.
///
/// The set is never mutated: a newer fetch replaces it as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct DailyPriceSet {
    date: NaiveDate,
    points: Vec<PricePoint>,
    fetched_at: DateTime<Local>,
}

impl DailyPriceSet {
    /// Build the set from the points in any order.
    ///
    /// Duplicate hours keep the first occurrence, which is what the 25-hour day
    /// at the end of the daylight saving time produces.
    #[instrument(skip_all, fields(date = %date))]
    pub fn try_new(
        date: NaiveDate,
        points: impl IntoIterator<Item = PricePoint>,
        fetched_at: DateTime<Local>,
    ) -> Result<Self> {
        let points = points.into_iter().collect_vec();
        let n_points = points.len();
        if let Some(point) = points.iter().find(|point| point.price.is_negative()) {
            bail!("negative price {:?} at {}", point.price, point.hour);
        }
        let points = points
            .into_iter()
            .sorted_by_key(|point| point.hour)
            .dedup_by(|lhs, rhs| lhs.hour == rhs.hour)
            .collect_vec();
        if points.len() != n_points {
            warn!(n_points, n_unique = points.len(), "dropped duplicate hours");
        }
        Ok(Self { date, points, fetched_at })
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Price at the specified hour, if the day covers it.
    #[must_use]
    pub fn get(&self, hour: Hour) -> Option<KilowattHourPrice> {
        self.points
            .binary_search_by_key(&hour, |point| point.hour)
            .ok()
            .map(|index| self.points[index].price)
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::TimeZone;

    use super::*;

    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    pub fn fetched_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap()
    }

    pub fn point(hour: u32, price: f64) -> PricePoint {
        PricePoint::new(Hour::try_from(hour).unwrap(), KilowattHourPrice::from(price))
    }

    pub fn price_set(prices: &[(u32, f64)]) -> DailyPriceSet {
        DailyPriceSet::try_new(
            date(),
            prices.iter().map(|(hour, price)| point(*hour, *price)),
            fetched_at(),
        )
        .unwrap()
    }

    #[test]
    fn test_try_new_sorts_by_hour() {
        let set = price_set(&[(2, 0.3), (0, 0.1), (1, 0.2)]);
        assert_eq!(set.points(), &[point(0, 0.1), point(1, 0.2), point(2, 0.3)]);
    }

    #[test]
    fn test_try_new_drops_duplicate_hours() {
        let set = price_set(&[(1, 0.1), (2, 0.2), (2, 0.25), (3, 0.3)]);
        assert_eq!(set.points(), &[point(1, 0.1), point(2, 0.2), point(3, 0.3)]);
    }

    #[test]
    fn test_try_new_rejects_negative_price() {
        let result = DailyPriceSet::try_new(date(), [point(0, 0.1), point(1, -0.01)], fetched_at());
        assert!(result.is_err());
    }

    #[test]
    fn test_get() -> Result {
        let set = price_set(&[(0, 0.1), (5, 0.5)]);
        assert_eq!(set.get(Hour::try_from(5)?), Some(KilowattHourPrice::from(0.5)));
        assert_eq!(set.get(Hour::try_from(4)?), None);
        Ok(())
    }
}
