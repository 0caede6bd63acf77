mod anchor;
mod convert;
mod grid;
mod key;
mod months;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub use anchor::{Anchor, DEFAULT_ANCHOR};
pub use convert::{ad_to_bs, bs_to_ad};
pub use grid::{build_ad_month_matrix, build_bs_month_matrix, CellOffset, GridCell, MonthMatrix};
pub use key::{ad_date_key, bs_date_key, CalendarSystem, DateKey};
pub use months::{
    ad_month_length, bs_month_length, bs_month_name, MonthLength, BS_MONTH_LENGTHS,
    BS_MONTH_NAMES, FALLBACK_MONTH_LENGTH, WEEKDAY_ABBREVIATIONS,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("date is outside the supported civil range")]
    OutOfRange,
    #[error("invalid civil date {year}-{month:02}-{day:02}")]
    InvalidCivilDate { year: i32, month: u32, day: u32 },
    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),
}

/// A Bikram Sambat date. `month` is 0-based (0 = Baisakh).
///
/// Dates produced by [`ad_to_bs`] are always normalized against the fixed
/// month-length table; dates passed into [`bs_to_ad`] may be anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BsDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl BsDate {
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        BsDate { year, month, day }
    }
}

/// A Gregorian date. `month` is 0-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl AdDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        AdDate { year, month, day }
    }

    pub fn to_naive(self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day).ok_or(
            CalendarError::InvalidCivilDate {
                year: self.year,
                month: self.month + 1,
                day: self.day,
            },
        )
    }

    /// Weekday of this date, 0 = Sunday.
    pub fn weekday(self) -> Result<u32, CalendarError> {
        Ok(self.to_naive()?.weekday().num_days_from_sunday())
    }
}

impl From<NaiveDate> for AdDate {
    fn from(date: NaiveDate) -> Self {
        AdDate {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }
}

/// Builds a civil date from possibly out-of-range parts, rolling excess months
/// into years and excess days into following months (and the reverse for
/// values below range).
pub(crate) fn civil_date(year: i32, month0: i32, day: i32) -> Result<NaiveDate, CalendarError> {
    let months = i64::from(year) * 12 + i64::from(month0);
    let year = i32::try_from(months.div_euclid(12)).map_err(|_| CalendarError::OutOfRange)?;
    let month = months.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::OutOfRange)?;
    shift_days(first, i64::from(day) - 1)
}

pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, CalendarError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(CalendarError::OutOfRange)
}
