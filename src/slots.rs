//! Hourly slots shown for a selected time range.

use std::{fmt::Display, str::FromStr};

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::{TrackerError, TrackerResult};

const SLOT_STEP: Duration = Duration::hours(1);

/// A wall-clock label in `HH:mm` 24-hour form. Labels are also the keys notes are stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// # Panics
    /// If `hour` is not below 24. Meant for constants.
    pub const fn on_the_hour(hour: u32) -> Self {
        match NaiveTime::from_hms_opt(hour, 0, 0) {
            Some(time) => Self(time),
            None => panic!("hour must be below 24"),
        }
    }

    pub fn from_hour(hour: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, 0, 0).map(Self)
    }

    /// 12 hour form used when presenting slots, e.g. `9:00 AM`.
    pub fn display_label(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }

    /// Returns slots from `start` to `end` inclusive, one hour apart. A range that ends before it
    /// starts is empty, and stepping never continues past midnight.
    pub fn range(start: TimeSlot, end: TimeSlot) -> Vec<TimeSlot> {
        let mut slots = Vec::new();
        let mut current = start.0;
        while current <= end.0 {
            slots.push(TimeSlot(current));
            let (next, wrapped_seconds) = current.overflowing_add_signed(SLOT_STEP);
            if wrapped_seconds != 0 {
                break;
            }
            current = next;
        }
        slots
    }
}

impl FromStr for TimeSlot {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts single digit hours, so the shape is checked by hand.
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(TrackerError::time_format(s));
        }
        let hour = s[..2].parse::<u32>().map_err(|_| TrackerError::time_format(s))?;
        let minute = s[3..].parse::<u32>().map_err(|_| TrackerError::time_format(s))?;
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeSlot)
            .ok_or_else(|| TrackerError::time_format(s))
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

/// Generates the hourly labels between two `HH:mm` strings.
pub fn generate_time_slots(start: &str, end: &str) -> TrackerResult<Vec<TimeSlot>> {
    let start = start.parse::<TimeSlot>()?;
    let end = end.parse::<TimeSlot>()?;
    Ok(TimeSlot::range(start, end))
}

/// Whole hours of the day offered as range bounds.
pub fn time_options() -> Vec<TimeSlot> {
    (0..24).filter_map(TimeSlot::from_hour).collect()
}
