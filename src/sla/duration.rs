use crate::error::SlaError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 3_600;
pub const SECONDS_PER_DAY: u64 = 86_400;

/// A non-negative SLA duration with one-second resolution.
///
/// Forms edit it as days/hours/minutes; the backend exchanges it as a
/// `"D HH:MM:SS"` or `"HH:MM:SS"` string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SlaDuration(u64);

impl SlaDuration {
    pub const ZERO: SlaDuration = SlaDuration(0);

    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Builds a duration from form fields. Saturates at `u64::MAX` seconds.
    pub fn from_parts(days: u64, hours: u64, minutes: u64) -> Self {
        Self(
            days.saturating_mul(SECONDS_PER_DAY)
                .saturating_add(hours.saturating_mul(SECONDS_PER_HOUR))
                .saturating_add(minutes.saturating_mul(SECONDS_PER_MINUTE)),
        )
    }

    /// `None` when the total does not fit in `u64` seconds.
    fn checked_total(days: u64, hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
        days.checked_mul(SECONDS_PER_DAY)?
            .checked_add(hours.checked_mul(SECONDS_PER_HOUR)?)?
            .checked_add(minutes.checked_mul(SECONDS_PER_MINUTE)?)?
            .checked_add(seconds)
    }

    pub fn as_seconds(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn days(self) -> u64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn hours(self) -> u64 {
        (self.0 % SECONDS_PER_DAY) / SECONDS_PER_HOUR
    }

    pub fn minutes(self) -> u64 {
        (self.0 % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn seconds(self) -> u64 {
        self.0 % SECONDS_PER_MINUTE
    }

    /// Serializes as `"D HH:MM:SS"`, or `"HH:MM:SS"` when under a day.
    pub fn to_duration_string(self) -> String {
        let clock = format!(
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        );
        if self.days() > 0 {
            format!("{} {}", self.days(), clock)
        } else {
            clock
        }
    }

    /// Parses `"D HH:MM:SS"` or `"HH:MM:SS"`.
    ///
    /// Also accepts `"D day(s), HH:MM:SS"` and fractional seconds, both of
    /// which show up in responses from Python backends. Fractions are dropped.
    pub fn parse(input: &str) -> Result<Self, SlaError> {
        let invalid = || SlaError::InvalidDuration(input.to_string());
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (days_part, clock_part) = match trimmed.rsplit_once(' ') {
            Some((days, clock)) => (Some(days), clock),
            None => (None, trimmed),
        };

        let days = match days_part {
            Some(part) => {
                let digits = part
                    .trim_end_matches(',')
                    .trim_end_matches("days")
                    .trim_end_matches("day")
                    .trim();
                digits.parse::<u64>().map_err(|_| invalid())?
            }
            None => 0,
        };

        let fields: Vec<&str> = clock_part.split(':').collect();
        let [hours, minutes, seconds] = fields.as_slice() else {
            return Err(invalid());
        };
        let hours: u64 = hours.parse().map_err(|_| invalid())?;
        let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
        let whole_seconds = seconds.split('.').next().unwrap_or_default();
        let seconds: u64 = whole_seconds.parse().map_err(|_| invalid())?;
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        Self::checked_total(days, hours, minutes, seconds)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for SlaDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_duration_string())
    }
}

/// Formats a number of seconds as a compact `"1d 4h 30m"` string.
///
/// Days, hours and minutes are taken by floor division, each from the
/// remainder of the previous stage. Zero components are omitted and leftover
/// seconds are dropped. When nothing remains the result is `"< 1m"`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    let parts = [(days, 'd'), (hours, 'h'), (minutes, 'm')]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .join(" ");

    if parts.is_empty() {
        "< 1m".to_string()
    } else {
        parts
    }
}
