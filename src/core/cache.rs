use chrono::NaiveDate;

use crate::{core::point::DailyPriceSet, prelude::*};

/// Latest successfully fetched day of prices.
///
/// Lives as long as the owning dashboard. Written only by the loading path,
/// a failed fetch leaves the previous set in place.
#[derive(Default)]
pub struct DailyPriceCache(Option<DailyPriceSet>);

impl DailyPriceCache {
    #[must_use]
    pub const fn get(&self) -> Option<&DailyPriceSet> {
        self.0.as_ref()
    }

    /// Replace the cached set as a whole.
    pub fn set(&mut self, price_set: DailyPriceSet) {
        debug!(date = %price_set.date(), n_points = price_set.len(), "caching the prices…");
        self.0 = Some(price_set);
    }

    /// Apply the fetch result, keeping the stale set on failure.
    ///
    /// Returns whether the cache got updated.
    pub fn apply(&mut self, result: Result<DailyPriceSet>) -> bool {
        match result {
            Ok(price_set) => {
                self.set(price_set);
                true
            }
            Err(error) => {
                warn!(
                    error = format!("{error:#}"),
                    cached_date = ?self.0.as_ref().map(DailyPriceSet::date),
                    "failed to fetch the prices, keeping the cached ones",
                );
                false
            }
        }
    }

    /// Whether the cached set belongs to the specified day.
    #[must_use]
    pub fn is_fresh_on(&self, date: NaiveDate) -> bool {
        self.0.as_ref().is_some_and(|price_set| price_set.date() == date)
    }
}
