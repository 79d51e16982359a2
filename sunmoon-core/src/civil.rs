//! Civil calendar arithmetic and time-range iteration.
//!
//! Metric samples walk a half-open range at a fixed step. Annotations walk it
//! one calendar day at a time, in the civil zone, so DST transitions change
//! which instants are visited.

use std::fmt;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Time zone used for calendar days and the fixed `noon`/`midnight` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CivilZone {
    /// The zone of the running process.
    #[default]
    Local,
    Utc,
}

impl CivilZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            CivilZone::Local => "local",
            CivilZone::Utc => "utc",
        }
    }

    pub const fn all() -> &'static [CivilZone] {
        &[CivilZone::Local, CivilZone::Utc]
    }

    /// Calendar date of `instant` in this zone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            CivilZone::Local => date_in(&Local, instant),
            CivilZone::Utc => date_in(&Utc, instant),
        }
    }

    /// The instant at wall-clock `time` on `date`.
    ///
    /// Returns `None` when that wall-clock time does not exist (DST gap).
    /// An ambiguous time resolves to its earlier occurrence.
    pub fn civil_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        match self {
            CivilZone::Local => instant_in(&Local, date, time),
            CivilZone::Utc => instant_in(&Utc, date, time),
        }
    }

    /// Civil noon of `date`, falling back to 12:00 UTC if noon is skipped.
    pub fn noon(&self, date: NaiveDate) -> DateTime<Utc> {
        self.civil_instant(date, noon_time())
            .unwrap_or_else(|| date.and_time(noon_time()).and_utc())
    }

    /// Start of `date`, or the first valid instant after a skipped midnight.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        self.civil_instant(date, NaiveTime::MIN)
            .or_else(|| self.civil_instant(date, NaiveTime::MIN + TimeDelta::hours(1)))
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Same wall-clock time on the next calendar day.
    pub fn next_day(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            CivilZone::Local => next_day_in(&Local, instant),
            CivilZone::Utc => next_day_in(&Utc, instant),
        }
    }

    /// Calendar days starting at `from`, while strictly before `to`.
    pub fn days(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> CalendarDays {
        CalendarDays {
            zone: *self,
            next: Some(from),
            to,
        }
    }
}

impl fmt::Display for CivilZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CivilZone {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "local" => Ok(CivilZone::Local),
            "utc" => Ok(CivilZone::Utc),
            _ => Err(anyhow::anyhow!(
                "Unknown civil zone '{value}'. Supported zones: local, utc."
            )),
        }
    }
}

fn date_in<Tz: TimeZone>(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

fn instant_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn next_day_in<Tz: TimeZone>(tz: &Tz, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
    instant
        .with_timezone(tz)
        .checked_add_days(Days::new(1))
        .map(|dt| dt.with_timezone(&Utc))
        // Tomorrow's wall-clock time is skipped or repeated: step a plain day.
        .or_else(|| instant.checked_add_signed(TimeDelta::days(1)))
}

pub(crate) fn noon_time() -> NaiveTime {
    NaiveTime::MIN + TimeDelta::hours(12)
}

/// Fixed-step instants over a half-open range.
#[derive(Debug, Clone)]
pub struct SampleInstants {
    next: Option<DateTime<Utc>>,
    to: DateTime<Utc>,
    step: TimeDelta,
}

impl SampleInstants {
    /// `step` must be positive; callers normalise it first.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, step: TimeDelta) -> Self {
        let next = (step > TimeDelta::zero()).then_some(from);
        Self { next, to, step }
    }
}

impl Iterator for SampleInstants {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|t| *t < self.to)?;
        self.next = current.checked_add_signed(self.step);
        Some(current)
    }
}

/// Instants one calendar day apart over a half-open range.
#[derive(Debug, Clone)]
pub struct CalendarDays {
    zone: CivilZone,
    next: Option<DateTime<Utc>>,
    to: DateTime<Utc>,
}

impl Iterator for CalendarDays {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|t| *t < self.to)?;
        self.next = self.zone.next_day(current);
        Some(current)
    }
}
