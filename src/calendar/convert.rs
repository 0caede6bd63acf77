//! AD to BS and BS to AD conversion.
//!
//! The two directions use different arithmetic and are not inverses of each
//! other:
//!
//! - [`Anchor::ad_to_bs`] counts the exact civil days between the target and
//!   the anchor, then walks the fixed BS month-length table. It is exact with
//!   respect to that table, but the table itself is the same for every year.
//! - [`Anchor::bs_to_ad`] treats every BS year as 365 days and every BS month
//!   as 30 days. Each month away from the anchor can add up to two days of
//!   error, and each year adds about one more.
//!
//! Round trips agree within a day only inside the anchor's own month.

use super::months::{bs_month_length, BS_TABLE_YEAR_DAYS};
use super::{civil_date, shift_days, AdDate, Anchor, BsDate, CalendarError, DEFAULT_ANCHOR};

const APPROX_YEAR_DAYS: i64 = 365;
const APPROX_MONTH_DAYS: i64 = 30;

impl Anchor {
    /// Converts a Gregorian date (0-based month) to BS.
    ///
    /// Out-of-range months and days are normalized through civil-date
    /// arithmetic first, so `(2025, 0, 32)` means February 1st.
    pub fn ad_to_bs(&self, year: i32, month0: i32, day: i32) -> Result<BsDate, CalendarError> {
        let target = civil_date(year, month0, day)?;
        let diff_days = target.signed_duration_since(self.ad_naive()?).num_days();
        self.bs_after(diff_days)
    }

    /// Approximate BS to Gregorian conversion. See the module docs for the
    /// drift this carries.
    pub fn bs_to_ad(&self, year: i32, month0: i32, day: i32) -> Result<AdDate, CalendarError> {
        let anchor = self.bs();
        let diff_days = (i64::from(year) - i64::from(anchor.year)) * APPROX_YEAR_DAYS
            + (i64::from(month0) - i64::from(anchor.month)) * APPROX_MONTH_DAYS
            + (i64::from(day) - i64::from(anchor.day));
        let date = shift_days(self.ad_naive()?, diff_days)?;
        Ok(AdDate::from(date))
    }

    /// The BS date `diff_days` after the anchor, normalized so that `day`
    /// always lies within its month's table length.
    fn bs_after(&self, diff_days: i64) -> Result<BsDate, CalendarError> {
        let anchor = self.bs();
        let mut year = i64::from(anchor.year);
        let mut month = anchor.month;
        let mut day = i64::from(anchor.day) + diff_days;

        // Twelve consecutive table months always add up to one table year,
        // so whole years can be skipped without walking them.
        let years = (day - 1).div_euclid(BS_TABLE_YEAR_DAYS);
        year += years;
        day -= years * BS_TABLE_YEAR_DAYS;

        loop {
            let length = i64::from(bs_month_length(month).days());
            if day <= length {
                break;
            }
            day -= length;
            month += 1;
            if month > 11 {
                month = 0;
                year += 1;
            }
        }

        Ok(BsDate {
            year: i32::try_from(year).map_err(|_| CalendarError::OutOfRange)?,
            month,
            day: day as i32,
        })
    }
}

/// [`Anchor::ad_to_bs`] against [`DEFAULT_ANCHOR`].
pub fn ad_to_bs(year: i32, month0: i32, day: i32) -> Result<BsDate, CalendarError> {
    DEFAULT_ANCHOR.ad_to_bs(year, month0, day)
}

/// [`Anchor::bs_to_ad`] against [`DEFAULT_ANCHOR`].
pub fn bs_to_ad(year: i32, month0: i32, day: i32) -> Result<AdDate, CalendarError> {
    DEFAULT_ANCHOR.bs_to_ad(year, month0, day)
}
