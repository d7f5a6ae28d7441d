//! Conversion of model time stamps to local time.
//!
//! Model output is stamped in UTC. Axes are labelled in local time, which
//! moves the daily record start from January 3 00:00 UTC to January 2 in the
//! afternoon (Pacific).

use crate::errors::{InletError, InletResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Daily samples dropped at the start of the calendar year.
const DAILY_RECORD_OFFSET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTimeConverter {
    tz: Tz,
}

impl Default for LocalTimeConverter {
    fn default() -> Self {
        Self::pacific()
    }
}

impl LocalTimeConverter {
    /// Converter for a named IANA zone, e.g. `"US/Pacific"`.
    pub fn new(name: &str) -> InletResult<Self> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| InletError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn pacific() -> Self {
        Self {
            tz: chrono_tz::US::Pacific,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.tz)
    }

    /// Interpret a naive model time stamp as UTC and convert it.
    pub fn naive_to_local(&self, model_time: NaiveDateTime) -> DateTime<Tz> {
        self.to_local(Utc.from_utc_datetime(&model_time))
    }

    /// Local time axis of the daily record of `year`.
    pub fn daily_record(&self, year: i32) -> InletResult<Vec<DateTime<Tz>>> {
        Ok(daily_record_utc(year)?
            .into_iter()
            .map(|t| self.to_local(t))
            .collect())
    }

    /// Local time axis of the hourly record of `year`.
    pub fn hourly_record(&self, year: i32) -> InletResult<Vec<DateTime<Tz>>> {
        Ok(hourly_record_utc(year)?
            .into_iter()
            .map(|t| self.to_local(t))
            .collect())
    }
}

fn year_start(year: i32) -> InletResult<DateTime<Utc>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| InletError::InvalidParameters(format!("invalid year {year}")))?;
    Ok(Utc.from_utc_datetime(&start))
}

/// UTC midnights from January 3 to December 31 of `year`.
///
/// The first two days of the year are not part of the daily record, so for
/// a non-leap year the axis has 363 entries.
pub fn daily_record_utc(year: i32) -> InletResult<Vec<DateTime<Utc>>> {
    let start = year_start(year)?;
    let end = year_start(year + 1)?;
    let days = (end - start).num_days() as usize;

    Ok((DAILY_RECORD_OFFSET..days)
        .map(|d| start + Duration::days(d as i64))
        .collect())
}

/// Every UTC hour from January 1 00:00 of `year` to January 1 00:00 of the
/// following year, both ends included.
pub fn hourly_record_utc(year: i32) -> InletResult<Vec<DateTime<Utc>>> {
    let start = year_start(year)?;
    let end = year_start(year + 1)?;
    let hours = (end - start).num_hours();

    Ok((0..=hours).map(|h| start + Duration::hours(h)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_winter_conversion() {
        let converter = LocalTimeConverter::pacific();
        let utc = Utc.with_ymd_and_hms(2017, 1, 3, 0, 0, 0).unwrap();
        let local = converter.to_local(utc);
        assert_eq!((local.month(), local.day(), local.hour()), (1, 2, 16));
    }

    #[test]
    fn test_summer_conversion_uses_daylight_time() {
        let converter = LocalTimeConverter::new("US/Pacific").unwrap();
        let utc = Utc.with_ymd_and_hms(2017, 7, 1, 12, 0, 0).unwrap();
        let local = converter.to_local(utc);
        assert_eq!((local.day(), local.hour()), (1, 5));
    }

    #[test]
    fn test_naive_model_time_is_utc() {
        let converter = LocalTimeConverter::default();
        let naive = NaiveDate::from_ymd_opt(2017, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let local = converter.naive_to_local(naive);
        assert_eq!((local.month(), local.day(), local.hour()), (12, 30, 16));
    }

    #[test]
    fn test_unknown_timezone() {
        let err = LocalTimeConverter::new("Mars/Olympus").unwrap_err();
        assert!(matches!(err, InletError::InvalidTimezone(ref z) if z == "Mars/Olympus"));
    }

    #[test]
    fn test_daily_record_axis() {
        let axis = daily_record_utc(2017).unwrap();
        assert_eq!(axis.len(), 363);
        assert_eq!((axis[0].month(), axis[0].day()), (1, 3));
        assert_eq!((axis[362].month(), axis[362].day()), (12, 31));

        let local = LocalTimeConverter::pacific().daily_record(2017).unwrap();
        assert_eq!((local[0].month(), local[0].day()), (1, 2));
        assert_eq!((local[362].month(), local[362].day()), (12, 30));
    }

    #[test]
    fn test_hourly_record_axis() {
        let axis = hourly_record_utc(2017).unwrap();
        assert_eq!(axis.len(), 365 * 24 + 1);
        assert_eq!(axis.last().unwrap().year(), 2018);
        assert_eq!(hourly_record_utc(2020).unwrap().len(), 366 * 24 + 1);
    }
}
