use chrono::NaiveDate;

use crate::{core::cache::DailyPriceCache, prelude::*};

/// Whether the view should fetch the prices now.
#[must_use]
pub const fn should_load(is_in_viewport: bool, already_loaded: bool, is_loading: bool) -> bool {
    is_in_viewport && !already_loaded && !is_loading
}

/// Fetch to be started by the owner.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoadRequest {
    /// Identifies the fetch, so that the owner can tell a superseded completion.
    pub generation: u64,

    pub date: NaiveDate,
}

/// One-shot gate deferring the fetch until the view gets revealed.
#[derive(Default)]
pub struct Loader {
    is_in_viewport: bool,

    /// The view has entered the viewport at least once.
    is_revealed: bool,

    in_flight: Option<u64>,
    n_requests: u64,
}

impl Loader {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Handle the visibility change of the view.
    ///
    /// Only a transition into the viewport may start a fetch.
    pub fn on_visibility(
        &mut self,
        is_in_viewport: bool,
        cache: &DailyPriceCache,
        today: NaiveDate,
    ) -> Option<LoadRequest> {
        let is_entering = is_in_viewport && !self.is_in_viewport;
        self.is_in_viewport = is_in_viewport;
        if !is_entering {
            return None;
        }
        self.is_revealed = true;
        self.try_start(true, cache, today)
    }

    /// Refetch when the cached set is not for `today`.
    ///
    /// Asked on every hour change and after each completed fetch, so a failed
    /// or outdated fetch gets retried. Refetches only for a view which has
    /// been revealed already.
    pub fn on_stale_check(
        &mut self,
        cache: &DailyPriceCache,
        today: NaiveDate,
    ) -> Option<LoadRequest> {
        self.try_start(self.is_revealed, cache, today)
    }

    /// Mark the fetch as finished.
    ///
    /// Returns `false` for a completion which is not the one in flight,
    /// its result must then be dropped.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
            true
        } else {
            warn!(generation, in_flight = ?self.in_flight, "ignoring a superseded fetch");
            false
        }
    }

    fn try_start(
        &mut self,
        is_in_viewport: bool,
        cache: &DailyPriceCache,
        today: NaiveDate,
    ) -> Option<LoadRequest> {
        if !should_load(is_in_viewport, cache.is_fresh_on(today), self.is_loading()) {
            return None;
        }
        self.n_requests += 1;
        self.in_flight = Some(self.n_requests);
        debug!(generation = self.n_requests, %today, "requesting the prices…");
        Some(LoadRequest { generation: self.n_requests, date: today })
    }
}
