//! Dashboard view: owns the price cache and keeps the derived facts up to date.

use std::{sync::Arc, time::Duration};

use bon::Builder;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::{
    api::source::PriceSource,
    core::{
        cache::DailyPriceCache,
        clock::{Clock, SystemClock},
        hour::Hour,
        loader::{LoadRequest, Loader},
        point::DailyPriceSet,
        scheduler::{HourlyScheduler, spawn_ticker},
        stats::PriceStats,
    },
    prelude::*,
    task::AbortOnDropHandle,
};

/// What the display layer gets to see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Day of the cached prices.
    pub date: NaiveDate,

    pub fetched_at: DateTime<Local>,

    /// The cached prices belong to a past day and a refetch is due.
    pub is_stale: bool,

    pub stats: PriceStats,
}

impl DashboardSnapshot {
    /// Derive the facts for the hour of `now`.
    ///
    /// Prices of another day have no current hour, and so no current price.
    #[must_use]
    pub fn new(price_set: &DailyPriceSet, now: DateTime<Local>) -> Self {
        let is_stale = price_set.date() != now.date_naive();
        let stats = PriceStats::derive(price_set, Hour::of(&now));
        Self {
            date: price_set.date(),
            fetched_at: price_set.fetched_at(),
            is_stale,
            stats: if is_stale { stats.with_current_unavailable() } else { stats },
        }
    }
}

enum Event {
    /// The view entered or left the viewport.
    Reveal(bool),

    Fetched { generation: u64, result: Result<DailyPriceSet> },

    /// Time to check the wall clock.
    Tick,
}

#[derive(Builder)]
pub struct Dashboard {
    source: Arc<dyn PriceSource>,

    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,

    /// How often to check the wall clock for the hour change.
    #[builder(into, default = Duration::from_secs(60))]
    check_interval: Duration,
}

impl Dashboard {
    /// Start the view on the current runtime.
    ///
    /// The view stays idle until revealed.
    pub fn spawn(self) -> DashboardHandle {
        let (event_sender, event_receiver) = mpsc::channel(16);
        let (snapshot_sender, snapshot_receiver) = watch::channel(None);
        let view = View {
            source: self.source,
            clock: self.clock,
            check_interval: self.check_interval,
            events: event_sender.clone(),
            snapshots: snapshot_sender,
            cache: DailyPriceCache::default(),
            loader: Loader::default(),
            scheduler: HourlyScheduler::default(),
            fetch: None,
        };
        DashboardHandle {
            events: event_sender,
            snapshots: snapshot_receiver,
            task: AbortOnDropHandle::from(tokio::spawn(view.run(event_receiver))),
        }
    }
}

/// Owner's end of the running view. Dropping it tears the view down.
pub struct DashboardHandle {
    events: mpsc::Sender<Event>,
    snapshots: watch::Receiver<Option<DashboardSnapshot>>,
    task: AbortOnDropHandle<()>,
}

impl DashboardHandle {
    /// Report the visibility of the view.
    pub async fn set_in_viewport(&self, is_in_viewport: bool) -> Result {
        self.events.send(Event::Reveal(is_in_viewport)).await.context("the view is gone")
    }

    /// Subscribe to the snapshots, [`None`] until the first prices arrive.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSnapshot>> {
        self.snapshots.clone()
    }

    /// Tear the view down and wait until it is gone.
    ///
    /// Cancels the timer and the fetch in flight, a late fetch result cannot reach the view.
    #[instrument(skip_all)]
    pub async fn teardown(self) {
        self.task.abort();
        let Self { task, .. } = self;
        if let Err(error) = task.await
            && !error.is_cancelled()
        {
            warn!(error = format!("{error:#}"), "the view failed");
        }
        info!("torn down");
    }
}

/// State of the running view, owned by its task.
///
/// Dropped on teardown, together with the timer and the fetch in flight.
struct View {
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    check_interval: Duration,
    events: mpsc::Sender<Event>,
    snapshots: watch::Sender<Option<DashboardSnapshot>>,
    cache: DailyPriceCache,
    loader: Loader,
    scheduler: HourlyScheduler,
    fetch: Option<AbortOnDropHandle<()>>,
}

impl View {
    async fn run(mut self, mut events: mpsc::Receiver<Event>) {
        while let Some(event) = events.recv().await {
            match event {
                Event::Reveal(is_in_viewport) => self.on_reveal(is_in_viewport),
                Event::Fetched { generation, result } => self.on_fetched(generation, result),
                Event::Tick => self.on_tick(),
            }
        }
    }

    fn on_reveal(&mut self, is_in_viewport: bool) {
        debug!(is_in_viewport, "visibility changed");
        let today = self.clock.now().date_naive();
        if let Some(request) = self.loader.on_visibility(is_in_viewport, &self.cache, today) {
            self.start_fetch(request);
        }
    }

    fn on_fetched(&mut self, generation: u64, result: Result<DailyPriceSet>) {
        if !self.loader.complete(generation) {
            return;
        }
        self.fetch = None;
        if !self.cache.apply(result) {
            return;
        }
        let now = self.clock.now();
        if !self.scheduler.is_active() {
            let ticker = spawn_ticker(self.check_interval, self.events.clone(), || Event::Tick);
            self.scheduler.activate(now, ticker);
        }
        // The fetch may have crossed midnight:
        self.check_stale(now.date_naive());
        self.publish(now);
    }

    fn on_tick(&mut self) {
        let now = self.clock.now();
        let Some(tick) = self.scheduler.tick(now) else {
            return;
        };
        if tick.is_new_hour {
            self.check_stale(tick.today);
        }
        self.publish(now);
    }

    /// Refetch unless the cache holds the prices for `today`.
    fn check_stale(&mut self, today: NaiveDate) {
        if let Some(request) = self.loader.on_stale_check(&self.cache, today) {
            self.start_fetch(request);
        }
    }

    fn start_fetch(&mut self, request: LoadRequest) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.fetch = Some(AbortOnDropHandle::from(tokio::spawn(async move {
            let result = source.get_daily_prices(request.date).await;
            // The view may be gone by now, and so the result:
            let _ = events.send(Event::Fetched { generation: request.generation, result }).await;
        })));
    }

    /// Derive the facts from the cache and notify the subscribers on change.
    fn publish(&self, now: DateTime<Local>) {
        let Some(price_set) = self.cache.get() else {
            return;
        };
        let snapshot = DashboardSnapshot::new(price_set, now);
        self.snapshots.send_if_modified(|current| {
            if current.as_ref() == Some(&snapshot) {
                false
            } else {
                *current = Some(snapshot);
                true
            }
        });
    }
}

impl Drop for View {
    fn drop(&mut self) {
        self.scheduler.deactivate();
    }
}
