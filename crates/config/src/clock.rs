//! Wall-clock helpers pinned to the service time zone.
//!
//! Responsibilities:
//! - Resolve the service zone from `TIMEZONE`, either an IANA name or a
//!   literal `±HH:MM` offset.
//! - Compute calendar anchors (today, yesterday, start of year) in that zone.
//! - Format and parse RFC 3339 timestamps.
//!
//! Does NOT handle:
//! - Leap seconds.
//!
//! Invariants:
//! - Returned instants carry the zone's offset at that instant, so named
//!   zones follow daylight saving.
//! - Calendar anchors are at local midnight, or the first valid local time
//!   after it when midnight falls in a daylight-saving gap.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use utilkit_convert::{ConvertError, str_conv};

use crate::constants::{DEFAULT_TIMEZONE, TIMEZONE_VAR};
use crate::loader::{ConfigError, env};

const HOUR: i32 = 3600;

/// A resolved service time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// An IANA zone; its offset follows daylight saving.
    Named(Tz),
    /// A literal offset.
    Fixed(FixedOffset),
}

impl Zone {
    /// The zone's offset from UTC at `instant`.
    pub fn offset_at<Z: TimeZone>(&self, instant: &DateTime<Z>) -> FixedOffset {
        *self.localize(instant).offset()
    }

    fn localize<Z: TimeZone>(&self, instant: &DateTime<Z>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    fn from_local(&self, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Named(tz) => tz
                .from_local_datetime(local)
                .earliest()
                .map(|time| time.fixed_offset()),
            Self::Fixed(offset) => offset.from_local_datetime(local).single(),
        }
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

/// Resolve an IANA zone name or a `±HH:MM` offset.
///
/// Names are case-sensitive. `Z` is UTC.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use utilkit_config::parse_timezone;
///
/// let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
/// let paris = parse_timezone("Europe/Paris").unwrap();
/// assert_eq!(paris.offset_at(&winter).local_minus_utc(), 3600);
/// assert_eq!(paris.offset_at(&summer).local_minus_utc(), 7200);
///
/// let literal = parse_timezone("-03:30").unwrap();
/// assert_eq!(literal.offset_at(&winter).local_minus_utc(), -(3 * 3600 + 1800));
/// assert!(parse_timezone("Mars/Olympus").is_none());
/// ```
pub fn parse_timezone(name: &str) -> Option<Zone> {
    let name = name.trim();
    if name == "Z" {
        return FixedOffset::east_opt(0).map(Zone::Fixed);
    }

    let (sign, rest) = match name.as_bytes().first()? {
        b'+' => (1, &name[1..]),
        b'-' => (-1, &name[1..]),
        _ => return name.parse::<Tz>().ok().map(Zone::Named),
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * HOUR + minutes * 60)).map(Zone::Fixed)
}

/// A clock reporting time in the service zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    zone: Zone,
}

impl Default for Clock {
    /// `Asia/Ho_Chi_Minh` (+07:00).
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Ho_Chi_Minh)
    }
}

impl Clock {
    pub fn new(zone: impl Into<Zone>) -> Self {
        Self { zone: zone.into() }
    }

    /// Build a clock from `TIMEZONE`, default `Asia/Ho_Chi_Minh`.
    ///
    /// # Errors
    /// Returns `ConfigError::UnknownTimezone` if the name is neither an IANA
    /// zone nor a `±HH:MM` offset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let name: String = env(TIMEZONE_VAR, DEFAULT_TIMEZONE.to_string());
        parse_timezone(&name)
            .map(Self::new)
            .ok_or(ConfigError::UnknownTimezone(name))
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The zone's current offset from UTC.
    pub fn offset(&self) -> FixedOffset {
        *self.now().offset()
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.zone.localize(&Utc::now())
    }

    /// Local midnight of the current day.
    pub fn today(&self) -> DateTime<FixedOffset> {
        self.midnight(self.now().date_naive())
    }

    /// Local midnight of the previous day.
    pub fn yesterday(&self) -> DateTime<FixedOffset> {
        let today = self.now().date_naive();
        self.midnight(today.pred_opt().unwrap_or(today))
    }

    /// Local midnight of January 1st of the current year.
    pub fn first_date_of_year(&self) -> DateTime<FixedOffset> {
        let date = self.now().date_naive();
        self.midnight(date.with_ordinal(1).unwrap_or(date))
    }

    /// Format `time` as RFC 3339 with whole seconds in the clock's zone.
    pub fn time_str<Z: TimeZone>(&self, time: &DateTime<Z>) -> String {
        self.zone
            .localize(time)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Parse an RFC 3339 timestamp and express it in the clock's zone.
    ///
    /// # Errors
    /// Returns the conversion error for malformed input.
    pub fn parse_time(&self, raw: &str) -> Result<DateTime<FixedOffset>, ConvertError> {
        let time: DateTime<FixedOffset> = str_conv(raw)?;
        Ok(self.zone.localize(&time))
    }

    fn midnight(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        let local = date.and_time(NaiveTime::MIN);
        // Daylight-saving gaps are at most a few hours wide.
        (0..=3)
            .find_map(|hours| self.zone.from_local(&(local + TimeDelta::hours(hours))))
            .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(local, Utc.fix()))
    }
}

/// Whole days elapsed from `from` to `to`, truncated toward zero.
pub fn count_days<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> i64 {
    (to.naive_utc() - from.naive_utc()).num_days()
}

/// Number of days in `year` (365 or 366), or `None` outside chrono's range.
pub fn count_days_in_year(year: i32) -> Option<i64> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
    Some((end - start).num_days())
}
