use super::months::bs_month_length;
use super::{AdDate, BsDate, CalendarError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single AD/BS date pair every conversion is measured from.
///
/// Conversions are only exact at the anchor and drift with distance from it,
/// so recalibrating means building a new `Anchor`, never editing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnchor", into = "RawAnchor")]
pub struct Anchor {
    ad: AdDate,
    bs: BsDate,
}

/// AD 2025-08-11 is BS 2082 Shrawan 26.
pub const DEFAULT_ANCHOR: Anchor = Anchor {
    ad: AdDate::new(2025, 7, 11),
    bs: BsDate::new(2082, 3, 26),
};

impl Anchor {
    /// Builds an anchor after checking that `ad` is a real civil date and
    /// `bs` lies inside the month-length table.
    pub fn new(ad: AdDate, bs: BsDate) -> Result<Self, CalendarError> {
        ad.to_naive()
            .map_err(|err| CalendarError::InvalidAnchor(err.to_string()))?;
        let length = bs_month_length(bs.month);
        if !length.is_table() {
            return Err(CalendarError::InvalidAnchor(format!(
                "BS month index {} is outside 0..=11",
                bs.month
            )));
        }
        if bs.day < 1 || bs.day as u32 > length.days() {
            return Err(CalendarError::InvalidAnchor(format!(
                "BS day {} is outside 1..={}",
                bs.day,
                length.days()
            )));
        }
        Ok(Anchor { ad, bs })
    }

    pub fn ad(&self) -> AdDate {
        self.ad
    }

    pub fn bs(&self) -> BsDate {
        self.bs
    }

    pub(crate) fn ad_naive(&self) -> Result<NaiveDate, CalendarError> {
        self.ad.to_naive()
    }
}

impl Default for Anchor {
    fn default() -> Self {
        DEFAULT_ANCHOR
    }
}

#[derive(Serialize, Deserialize)]
struct RawAnchor {
    ad: AdDate,
    bs: BsDate,
}

impl TryFrom<RawAnchor> for Anchor {
    type Error = CalendarError;

    fn try_from(raw: RawAnchor) -> Result<Self, Self::Error> {
        Anchor::new(raw.ad, raw.bs)
    }
}

impl From<Anchor> for RawAnchor {
    fn from(anchor: Anchor) -> Self {
        RawAnchor {
            ad: anchor.ad,
            bs: anchor.bs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_anchor_passes_validation() {
        let rebuilt = Anchor::new(DEFAULT_ANCHOR.ad(), DEFAULT_ANCHOR.bs()).unwrap();
        assert_eq!(rebuilt, DEFAULT_ANCHOR);
        assert_eq!(Anchor::default(), DEFAULT_ANCHOR);
    }

    #[test]
    fn new_rejects_impossible_dates() {
        let bad_ad = Anchor::new(AdDate::new(2025, 1, 30), BsDate::new(2082, 3, 26));
        assert!(matches!(bad_ad, Err(CalendarError::InvalidAnchor(_))));

        let bad_month = Anchor::new(AdDate::new(2025, 7, 11), BsDate::new(2082, 12, 1));
        assert!(matches!(bad_month, Err(CalendarError::InvalidAnchor(_))));

        // Chaitra has 30 days in the table.
        let bad_day = Anchor::new(AdDate::new(2025, 7, 11), BsDate::new(2082, 11, 31));
        assert!(matches!(bad_day, Err(CalendarError::InvalidAnchor(_))));
    }
}
