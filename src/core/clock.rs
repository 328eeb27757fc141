use chrono::{DateTime, Local};

/// Source of the wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeDelta, TimeZone};

    use super::*;

    /// Clock which only moves when told to.
    #[derive(Clone)]
    pub struct ManualClock(Arc<Mutex<DateTime<Local>>>);

    impl ManualClock {
        pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
            let now = Local.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap();
            Self(Arc::new(Mutex::new(now)))
        }

        pub fn advance(&self, delta: TimeDelta) {
            *self.0.lock().unwrap() += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.0.lock().unwrap()
        }
    }
}
