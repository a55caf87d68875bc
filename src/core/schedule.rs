use chrono::{Local, NaiveTime, Timelike};

use crate::models::{DoctorLocation, WorkingHours};

/// Source of the current local clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Wall clock in the host's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Clock frozen at one time of day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl FixedClock {
    /// `None` for an invalid hour/minute pair
    pub fn at(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

#[inline]
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Check whether `now` falls inside the window, bounds included
///
/// Compared at minute resolution. A window whose start is later than its
/// end wraps around midnight: 22:00-06:00 contains 23:30 and 05:00.
#[inline]
pub fn is_within_window(now: NaiveTime, hours: &WorkingHours) -> bool {
    let now = minutes_since_midnight(now);
    let start = minutes_since_midnight(hours.start);
    let end = minutes_since_midnight(hours.end);

    if start <= end {
        start <= now && now <= end
    } else {
        now >= start || now <= end
    }
}

/// A doctor is available now when switched on and inside working hours
#[inline]
pub fn is_doctor_available_now(doctor: &DoctorLocation, now: NaiveTime) -> bool {
    doctor.is_available && is_within_window(now, &doctor.working_hours)
}
