use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use tokio::{
    sync::mpsc,
    time::{MissedTickBehavior, interval},
};

use crate::{core::hour::Hour, prelude::*, task::AbortOnDropHandle};

/// Outcome of a wall-clock check.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tick {
    pub today: NaiveDate,
    pub reference_hour: Hour,

    /// The hour differs from the one seen on the previous check.
    pub is_new_hour: bool,

    /// The calendar day differs from the one seen on the previous check.
    pub is_new_day: bool,
}

enum State {
    Idle,

    Active {
        last_seen: DateTime<Local>,

        /// Dropped on deactivation, which stops the timer.
        #[expect(dead_code)]
        ticker: AbortOnDropHandle<()>,
    },
}

/// Keeps the reference hour aligned with the wall clock.
///
/// The timer only wakes the owner up periodically, the hour change is detected by
/// comparing the wall clock against the last seen time. The drift is thus bounded by the period.
pub struct HourlyScheduler {
    state: State,
}

impl Default for HourlyScheduler {
    fn default() -> Self {
        Self { state: State::Idle }
    }
}

impl HourlyScheduler {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Enter the active state with the running ticker.
    ///
    /// No-op if already active, the new ticker then gets dropped right away.
    pub fn activate(&mut self, now: DateTime<Local>, ticker: AbortOnDropHandle<()>) {
        if self.is_active() {
            return;
        }
        info!(hour = %Hour::of(&now), "activated");
        self.state = State::Active { last_seen: now, ticker };
    }

    /// Leave the active state, cancelling the ticker.
    pub fn deactivate(&mut self) {
        if self.is_active() {
            info!("deactivated");
        }
        self.state = State::Idle;
    }

    /// Check the wall clock. Returns [`None`] when idle.
    pub fn tick(&mut self, now: DateTime<Local>) -> Option<Tick> {
        let State::Active { last_seen, .. } = &mut self.state else {
            return None;
        };
        let is_new_day = now.date_naive() != last_seen.date_naive();
        let is_new_hour = is_new_day || Hour::of(&now) != Hour::of(&*last_seen);
        *last_seen = now;
        let tick = Tick {
            today: now.date_naive(),
            reference_hour: Hour::of(&now),
            is_new_hour,
            is_new_day,
        };
        if is_new_hour {
            info!(hour = %tick.reference_hour, is_new_day, "hour changed");
        }
        Some(tick)
    }
}

/// Spawn the periodic timer sending the events to the owner.
///
/// The first event comes one period after spawning. The task stops by itself
/// as soon as the receiver is gone.
pub fn spawn_ticker<E: Send + 'static>(
    period: Duration,
    sender: mpsc::Sender<E>,
    event: fn() -> E,
) -> AbortOnDropHandle<()> {
    AbortOnDropHandle::from(tokio::spawn(async move {
        let mut interval = interval(period);
        interval.reset_after(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if sender.send(event()).await.is_err() {
                break;
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::core::clock::{Clock, tests::ManualClock};

    fn idle_ticker() -> AbortOnDropHandle<()> {
        AbortOnDropHandle::from(tokio::spawn(async {}))
    }

    #[tokio::test]
    async fn test_idle_does_not_tick() {
        let clock = ManualClock::at(2025, 6, 1, 10, 15);
        assert_eq!(HourlyScheduler::default().tick(clock.now()), None);
    }

    #[tokio::test]
    async fn test_same_hour() -> Result {
        let clock = ManualClock::at(2025, 6, 1, 10, 15);
        let mut scheduler = HourlyScheduler::default();
        scheduler.activate(clock.now(), idle_ticker());
        clock.advance(TimeDelta::minutes(30));

        let tick = scheduler.tick(clock.now()).context("should tick")?;
        assert_eq!(tick.reference_hour, Hour::try_from(10)?);
        assert!(!tick.is_new_hour);
        assert!(!tick.is_new_day);
        Ok(())
    }

    #[tokio::test]
    async fn test_new_hour() -> Result {
        let clock = ManualClock::at(2025, 6, 1, 10, 59);
        let mut scheduler = HourlyScheduler::default();
        scheduler.activate(clock.now(), idle_ticker());
        clock.advance(TimeDelta::minutes(1));

        let tick = scheduler.tick(clock.now()).context("should tick")?;
        assert_eq!(tick.reference_hour, Hour::try_from(11)?);
        assert!(tick.is_new_hour);
        assert!(!tick.is_new_day);

        // The change gets reported only once:
        let tick = scheduler.tick(clock.now()).context("should tick")?;
        assert!(!tick.is_new_hour);
        Ok(())
    }

    #[tokio::test]
    async fn test_day_rollover() -> Result {
        let clock = ManualClock::at(2025, 6, 1, 23, 59);
        let mut scheduler = HourlyScheduler::default();
        scheduler.activate(clock.now(), idle_ticker());
        clock.advance(TimeDelta::minutes(2));

        let tick = scheduler.tick(clock.now()).context("should tick")?;
        assert_eq!(tick.reference_hour, Hour::MIDNIGHT);
        assert_eq!(tick.today, NaiveDate::from_ymd_opt(2025, 6, 2).context("invalid date")?);
        assert!(tick.is_new_hour);
        assert!(tick.is_new_day);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_hour_on_next_day_is_new() -> Result {
        let clock = ManualClock::at(2025, 6, 1, 10, 0);
        let mut scheduler = HourlyScheduler::default();
        scheduler.activate(clock.now(), idle_ticker());
        clock.advance(TimeDelta::days(1));

        let tick = scheduler.tick(clock.now()).context("should tick")?;
        assert!(tick.is_new_hour);
        assert!(tick.is_new_day);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ticks_until_deactivated() {
        let (sender, mut receiver) = mpsc::channel(1);
        let clock = ManualClock::at(2025, 6, 1, 10, 0);
        let mut scheduler = HourlyScheduler::default();
        scheduler.activate(clock.now(), spawn_ticker(Duration::from_secs(60), sender, || ()));

        assert_eq!(receiver.recv().await, Some(()));
        assert_eq!(receiver.recv().await, Some(()));

        scheduler.deactivate();
        assert!(!scheduler.is_active());

        // Drain whatever got sent before the abort, then the channel must be closed:
        while receiver.recv().await.is_some() {}
        assert_eq!(scheduler.tick(clock.now()), None);
    }
}
