use super::{civil_date, CalendarError};
use chrono::{Datelike, Months};

/// Days in each BS month, Baisakh through Chaitra.
///
/// Real BS month lengths vary from year to year. This table is a fixed
/// approximation and is used for every year.
pub const BS_MONTH_LENGTHS: [u32; 12] = [31, 31, 31, 32, 32, 31, 30, 29, 30, 29, 30, 30];

/// Length assumed for a month index outside the table.
pub const FALLBACK_MONTH_LENGTH: u32 = 30;

pub const BS_MONTH_NAMES: [&str; 12] = [
    "Baisakh", "Jestha", "Ashadh", "Shrawan", "Bhadra", "Ashwin", "Kartik", "Mangsir", "Poush",
    "Magh", "Falgun", "Chaitra",
];

pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Sum of the month-length table. Any twelve consecutive BS months span this
/// many days.
pub(crate) const BS_TABLE_YEAR_DAYS: i64 = table_year_days();

const fn table_year_days() -> i64 {
    let mut total = 0;
    let mut idx = 0;
    while idx < BS_MONTH_LENGTHS.len() {
        total += BS_MONTH_LENGTHS[idx] as i64;
        idx += 1;
    }
    total
}

/// Result of looking a BS month index up in the length table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthLength {
    /// The index was 0..=11 and the table supplied the length.
    Table(u32),
    /// The index was outside the table; grids treat it as a
    /// [`FALLBACK_MONTH_LENGTH`]-day month.
    OutOfTable,
}

impl MonthLength {
    pub fn days(self) -> u32 {
        match self {
            MonthLength::Table(days) => days,
            MonthLength::OutOfTable => FALLBACK_MONTH_LENGTH,
        }
    }

    pub fn is_table(self) -> bool {
        matches!(self, MonthLength::Table(_))
    }
}

pub fn bs_month_length(month0: i32) -> MonthLength {
    usize::try_from(month0)
        .ok()
        .and_then(|idx| BS_MONTH_LENGTHS.get(idx))
        .map_or(MonthLength::OutOfTable, |days| MonthLength::Table(*days))
}

pub fn bs_month_name(month0: i32) -> Option<&'static str> {
    usize::try_from(month0)
        .ok()
        .and_then(|idx| BS_MONTH_NAMES.get(idx))
        .copied()
}

/// Days in a Gregorian month, leap-year February included. Out-of-range
/// months roll into neighbouring years.
pub fn ad_month_length(year: i32, month0: i32) -> Result<u32, CalendarError> {
    let first = civil_date(year, month0, 1)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(CalendarError::OutOfRange)?;
    let last = next.pred_opt().ok_or(CalendarError::OutOfRange)?;
    Ok(last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_year_is_366_days() {
        assert_eq!(BS_TABLE_YEAR_DAYS, 366);
    }

    #[test]
    fn month_lookup_tags_out_of_table_indices() {
        assert_eq!(bs_month_length(0), MonthLength::Table(31));
        assert_eq!(bs_month_length(3), MonthLength::Table(32));
        assert_eq!(bs_month_length(11), MonthLength::Table(30));
        assert_eq!(bs_month_length(12), MonthLength::OutOfTable);
        assert_eq!(bs_month_length(-1), MonthLength::OutOfTable);
        assert_eq!(bs_month_length(-1).days(), 30);
        assert!(!bs_month_length(40).is_table());
    }

    #[test]
    fn month_names_cover_table() {
        assert_eq!(bs_month_name(0), Some("Baisakh"));
        assert_eq!(bs_month_name(3), Some("Shrawan"));
        assert_eq!(bs_month_name(11), Some("Chaitra"));
        assert_eq!(bs_month_name(12), None);
    }

    #[test]
    fn ad_month_length_handles_leap_february() {
        assert_eq!(ad_month_length(2024, 1).unwrap(), 29);
        assert_eq!(ad_month_length(2025, 1).unwrap(), 28);
        assert_eq!(ad_month_length(1900, 1).unwrap(), 28);
        assert_eq!(ad_month_length(2000, 1).unwrap(), 29);
        assert_eq!(ad_month_length(2025, 11).unwrap(), 31);
        assert_eq!(ad_month_length(2025, 12).unwrap(), 31);
        assert_eq!(ad_month_length(2025, 3).unwrap(), 30);
    }
}
