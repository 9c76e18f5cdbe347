//! Game time
//!
//! Game time is counted in ticks of two seconds, matching the resolution
//! stored in save images:
//! - `Time` - A span or instant in ticks
//! - `Times` - Well-known spans
//! - `WorldClock` - Current time plus the time the party last slept

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Rem, Sub};

/// A span or instant measured in two-second ticks
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(pub u32);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn from_hours(hours: u32) -> Self {
        Self(hours * Times::ONE_HOUR.0)
    }

    pub fn seconds(&self) -> u64 {
        u64::from(self.0) * 2
    }

    pub fn minutes(&self) -> u64 {
        self.seconds() / 60
    }

    /// Whole hours elapsed
    pub fn hours(&self) -> u32 {
        self.0 / Times::ONE_HOUR.0
    }

    /// Whole days elapsed
    pub fn days(&self) -> u32 {
        self.0 / Times::ONE_DAY.0
    }

    /// Hour of the day, 0..24
    pub fn hour_of_day(&self) -> u32 {
        self.hours() % 24
    }

    pub fn minute_of_hour(&self) -> u32 {
        (self.minutes() % 60) as u32
    }

    pub fn saturating_sub(self, rhs: Time) -> Time {
        Time(self.0.saturating_sub(rhs.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        *self = *self + rhs;
    }
}

impl Sub for Time {
    type Output = Time;

    /// Saturates at zero.
    fn sub(self, rhs: Time) -> Time {
        self.saturating_sub(rhs)
    }
}

impl Rem for Time {
    type Output = Time;

    fn rem(self, rhs: Time) -> Time {
        Time(self.0 % rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:{:02}",
            self.days(),
            self.hour_of_day(),
            self.minute_of_hour()
        )
    }
}

/// Well-known spans
pub struct Times;

impl Times {
    pub const ONE_HOUR: Time = Time(1800);
    pub const TWELVE_HOURS: Time = Time(1800 * 12);
    pub const SEVENTEEN_HOURS: Time = Time(1800 * 17);
    pub const EIGHTEEN_HOURS: Time = Time(1800 * 18);
    pub const ONE_DAY: Time = Time(1800 * 24);
}

/// Current game time and the time the party last slept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClock {
    time: Time,
    time_last_slept: Time,
}

impl WorldClock {
    pub fn new(time: Time, time_last_slept: Time) -> Self {
        Self {
            time,
            time_last_slept,
        }
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn time_last_slept(&self) -> Time {
        self.time_last_slept
    }

    /// Move time forward
    pub fn advance(&mut self, delta: Time) {
        self.time += delta;
    }

    /// Jump to `time`; the party counts as having just slept
    pub fn set_time(&mut self, time: Time) {
        self.time = time;
        self.time_last_slept = time;
    }

    pub fn set_time_last_slept(&mut self, time: Time) {
        self.time_last_slept = time;
    }

    pub fn time_since_last_slept(&self) -> Time {
        self.time - self.time_last_slept
    }
}
