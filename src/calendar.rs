//! Calendar helpers: date strip generation, same-day comparison and labels.
//!
//! Timestamps are stored in UTC everywhere else in the crate; this module is the
//! only place that knows which timezone "a day" is measured in.

use crate::config::{DATE_STRIP_FORMAT, HEADER_DATE_FORMAT, TIME_FORMAT};
use chrono::{
    DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

/// Timezone used to decide where calendar days begin and end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone)]
pub struct Calendar {
    zone: Zone,
    pinned_now: Option<DateTime<Utc>>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::local()
    }
}

impl Calendar {
    /// Calendar in the machine's local timezone.
    pub fn local() -> Self {
        Self {
            zone: Zone::Local,
            pinned_now: None,
        }
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(offset),
            pinned_now: None,
        }
    }

    pub fn utc() -> Self {
        Self::fixed(Utc.fix())
    }

    /// Freeze "now" at the given instant instead of reading the system clock.
    pub fn pinned_at(mut self, now: DateTime<Utc>) -> Self {
        self.pinned_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    /// Calendar day of `t` in this calendar's timezone.
    pub fn day_of(&self, t: DateTime<Utc>) -> NaiveDate {
        match self.zone {
            Zone::Local => t.with_timezone(&Local).date_naive(),
            Zone::Fixed(offset) => t.with_timezone(&offset).date_naive(),
        }
    }

    /// Instant of the given wall-clock time in this calendar's timezone.
    /// Returns `None` for times skipped by a DST transition.
    pub fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.zone {
            Zone::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
            Zone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
        }
    }

    pub fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }

    /// Move `t` by whole calendar days, keeping its local wall-clock time.
    ///
    /// Falls back to 24h steps when the shifted wall-clock time does not exist
    /// (DST transitions).
    pub fn add_days(&self, t: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        let shifted = match self.zone {
            Zone::Local => shift_days(t.with_timezone(&Local), days),
            Zone::Fixed(offset) => shift_days(t.with_timezone(&offset), days),
        };
        shifted.unwrap_or_else(|| t + Duration::days(days))
    }

    /// Contiguous days from `today - days_before` through `today + days_after`.
    pub fn generate_date_range(&self, days_before: u32, days_after: u32) -> Vec<DateTime<Utc>> {
        self.date_range_around(self.now(), days_before, days_after)
    }

    /// Each entry is shifted from `center` directly, so a DST gap on one day
    /// cannot push later entries past the end of the range.
    pub fn date_range_around(
        &self,
        center: DateTime<Utc>,
        days_before: u32,
        days_after: u32,
    ) -> Vec<DateTime<Utc>> {
        (-i64::from(days_before)..=i64::from(days_after))
            .map(|offset| self.add_days(center, offset))
            .collect()
    }

    /// Position of the entry in `dates` that falls on the same day as `day`.
    pub fn index_of_day(&self, dates: &[DateTime<Utc>], day: DateTime<Utc>) -> Option<usize> {
        dates.iter().position(|d| self.is_same_day(*d, day))
    }

    /// Short label used in the date strip, e.g. "07 Mar".
    pub fn format_date(&self, t: DateTime<Utc>) -> String {
        self.format(t, DATE_STRIP_FORMAT)
    }

    /// Long label used above the list, e.g. "Fri, 07 March".
    pub fn format_header_date(&self, t: DateTime<Utc>) -> String {
        self.format(t, HEADER_DATE_FORMAT)
    }

    pub fn format_time(&self, t: DateTime<Utc>) -> String {
        self.format(t, TIME_FORMAT)
    }

    fn format(&self, t: DateTime<Utc>, pattern: &str) -> String {
        match self.zone {
            Zone::Local => t.with_timezone(&Local).format(pattern).to_string(),
            Zone::Fixed(offset) => t.with_timezone(&offset).format(pattern).to_string(),
        }
    }
}

fn shift_days<Tz: TimeZone>(t: DateTime<Tz>, days: i64) -> Option<DateTime<Utc>> {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        t.checked_add_days(magnitude)
    } else {
        t.checked_sub_days(magnitude)
    };
    shifted.map(|d| d.with_timezone(&Utc))
}
