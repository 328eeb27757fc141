use std::cmp::Reverse;

use serde::Serialize;

use crate::{
    core::{
        hour::Hour,
        point::{DailyPriceSet, PricePoint},
    },
    quantity::{percent::Percent, price::KilowattHourPrice},
};

/// Price at a specific hour, possibly missing from the day.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PriceFact {
    pub hour: Hour,

    /// Zero when the fact is not available.
    pub price: KilowattHourPrice,

    pub is_available: bool,
}

impl PriceFact {
    const fn available(point: PricePoint) -> Self {
        Self { hour: point.hour, price: point.price, is_available: true }
    }

    const fn unavailable(hour: Hour) -> Self {
        Self { hour, price: KilowattHourPrice::ZERO, is_available: false }
    }

    #[must_use]
    pub const fn price(self) -> Option<KilowattHourPrice> {
        if self.is_available { Some(self.price) } else { None }
    }
}

/// Facts derived from a day of prices at a reference hour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[must_use]
pub struct PriceStats {
    pub reference_hour: Hour,
    pub current: PriceFact,
    pub lowest: PriceFact,
    pub highest: PriceFact,

    /// Change of the next hour's price against the current one.
    pub next_hour_percent: Option<Percent>,

    /// How much cheaper the lowest price is than the highest one.
    pub lowest_highest_percent: Option<Percent>,

    /// How much more expensive the highest price is than the current one.
    pub highest_current_percent: Option<Percent>,
}

impl PriceStats {
    /// Derive the facts from the day of prices.
    ///
    /// Pure: the wall clock enters only through `reference_hour`.
    pub fn derive(price_set: &DailyPriceSet, reference_hour: Hour) -> Self {
        let points = price_set.points();

        let current = price_set.get(reference_hour).map_or_else(
            || PriceFact::unavailable(reference_hour),
            |price| PriceFact::available(PricePoint::new(reference_hour, price)),
        );

        // Ties resolve to the earliest hour:
        let lowest = points
            .iter()
            .min_by_key(|point| (point.price, point.hour))
            .map_or_else(|| PriceFact::unavailable(Hour::MIDNIGHT), |point| {
                PriceFact::available(*point)
            });
        let highest = points
            .iter()
            .max_by_key(|point| (point.price, Reverse(point.hour)))
            .map_or_else(|| PriceFact::unavailable(Hour::MIDNIGHT), |point| {
                PriceFact::available(*point)
            });

        let next_hour_percent = current.price().and_then(|current_price| {
            let next_price = price_set.get(reference_hour.next()?)?;
            Percent::change(next_price, current_price)
        });
        let lowest_highest_percent = lowest
            .price()
            .zip(highest.price())
            .and_then(|(lowest, highest)| Percent::change(lowest, highest));
        let highest_current_percent = current
            .price()
            .zip(highest.price())
            .and_then(|(current, highest)| Percent::change(highest, current));

        Self {
            reference_hour,
            current,
            lowest,
            highest,
            next_hour_percent,
            lowest_highest_percent,
            highest_current_percent,
        }
    }

    /// Drop the facts tied to the current hour.
    ///
    /// For prices of another day: the hour is not the current one there.
    pub const fn with_current_unavailable(self) -> Self {
        Self {
            current: PriceFact::unavailable(self.reference_hour),
            next_hour_percent: None,
            highest_current_percent: None,
            ..self
        }
    }
}
