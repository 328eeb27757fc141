use std::fmt::{Debug, Display, Formatter};

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Hour of the day, `0..=23`.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[must_use]
pub struct Hour(u8);

impl Hour {
    pub const MIDNIGHT: Self = Self(0);
    pub const LAST: Self = Self(23);

    /// Hour of the specified timestamp.
    #[expect(clippy::cast_possible_truncation)]
    pub fn of<T: Timelike>(time: &T) -> Self {
        // `Timelike::hour` is always within `0..24`.
        Self(time.hour() as u8)
    }

    /// The next hour within the same day.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.0 < Self::LAST.0 { Some(Self(self.0 + 1)) } else { None }
    }
}

impl TryFrom<u32> for Hour {
    type Error = Error;

    fn try_from(hour: u32) -> Result<Self> {
        ensure!(hour <= u32::from(Self::LAST.0), "hour {hour} is out of range");
        Ok(Self(u8::try_from(hour)?))
    }
}

impl From<Hour> for u32 {
    fn from(hour: Hour) -> Self {
        Self::from(hour.0)
    }
}

impl Display for Hour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl Debug for Hour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
