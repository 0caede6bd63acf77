//! Bikram Sambat calendar core used by the `patro` terminal app.
//!
//! Everything here is pure and synchronous: conversions between Gregorian (AD)
//! and Bikram Sambat (BS) dates relative to a fixed anchor, 6x7 month grids for
//! both calendars, and the string keys that join tasks to calendar cells.

pub mod calendar;

pub use calendar::{
    ad_date_key, ad_to_bs, bs_date_key, bs_to_ad, build_ad_month_matrix, build_bs_month_matrix,
    AdDate, Anchor, BsDate, CalendarError, CalendarSystem, CellOffset, DateKey, GridCell,
    MonthLength, MonthMatrix, DEFAULT_ANCHOR,
};
