//! Time handling utilities for gridded earth-observation data.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StacError, StacResult};

/// Parse an ISO 8601 style timestamp, assuming UTC when no offset is given.
pub fn parse_datetime(s: &str) -> StacResult<DateTime<Utc>> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // CF reference times often carry a trailing zone designator
    let naive = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim_end_matches(" +00:00")
        .trim_end_matches("+00:00")
        .trim();

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    }

    Err(StacError::InvalidTime(s.to_string()))
}

/// Unit of a CF `"<unit> since <epoch>"` time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    fn from_cf(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Some(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            "milliseconds" | "millisecond" | "msecs" | "ms" => Some(TimeUnit::Milliseconds),
            _ => None,
        }
    }

    fn milliseconds(&self) -> f64 {
        match self {
            TimeUnit::Days => 86_400_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Milliseconds => 1.0,
        }
    }
}

/// Decoded `units` attribute of a CF time coordinate.
///
/// Only the standard (proleptic gregorian) calendar is supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse e.g. `"seconds since 1981-01-01 00:00:00"`.
    pub fn parse(units: &str) -> StacResult<Self> {
        let (unit, epoch) = units
            .split_once(" since ")
            .ok_or_else(|| StacError::InvalidTime(format!("not a CF time unit: {}", units)))?;

        let unit = TimeUnit::from_cf(unit.trim())
            .ok_or_else(|| StacError::InvalidTime(format!("unsupported time unit: {}", unit)))?;
        let epoch = parse_datetime(epoch)?;

        Ok(Self { unit, epoch })
    }

    /// Convert an offset along the time axis to an instant.
    pub fn to_datetime(&self, value: f64) -> StacResult<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(StacError::InvalidTime(format!("non-finite time value {}", value)));
        }
        let out_of_range = || StacError::InvalidTime(format!("time value {} out of range", value));
        let millis = (value * self.unit.milliseconds()).round();
        // i64::MAX is not representable in f64; stay strictly below 2^63.
        if millis.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        Duration::try_milliseconds(millis as i64)
            .and_then(|d| self.epoch.checked_add_signed(d))
            .ok_or_else(out_of_range)
    }
}

/// Fixed multi-year interval summarised by climatology items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimatologyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ClimatologyInterval {
    /// Build from two `YYYY-MM-DD` strings (midnight UTC).
    pub fn from_dates(start: &str, end: &str) -> StacResult<Self> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }
}

fn parse_date(s: &str) -> StacResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| StacError::InvalidTime(format!("{}: {}", s, e)))?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// 1-based day of the year.
pub fn day_of_year(dt: &DateTime<Utc>) -> u32 {
    dt.ordinal()
}
