//! 6x7 month grids, Sunday first, with borrowed days from neighbouring months.

use super::months::{ad_month_length, bs_month_length, MonthLength};
use super::{civil_date, Anchor, CalendarError, DEFAULT_ANCHOR};
use chrono::Datelike;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLUMNS: usize = 7;

/// Which displayed month a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOffset {
    Previous,
    Current,
    Next,
}

impl CellOffset {
    pub fn as_i8(self) -> i8 {
        match self {
            CellOffset::Previous => -1,
            CellOffset::Current => 0,
            CellOffset::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub day: u32,
    pub offset: CellOffset,
}

impl GridCell {
    pub fn in_month(&self) -> bool {
        self.offset == CellOffset::Current
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMatrix {
    rows: [[GridCell; GRID_COLUMNS]; GRID_ROWS],
    length: MonthLength,
    leading: u32,
}

impl MonthMatrix {
    /// Lays out `leading` days borrowed from a `previous_length`-day month,
    /// then the current month, then days of the next month numbered from 1
    /// until all 42 cells are filled.
    fn layout(leading: u32, length: MonthLength, previous_length: u32) -> Self {
        let days = length.days();
        let rows = std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                let index = (row * GRID_COLUMNS + col) as u32;
                if index < leading {
                    GridCell {
                        day: previous_length - leading + 1 + index,
                        offset: CellOffset::Previous,
                    }
                } else if index < leading + days {
                    GridCell {
                        day: index - leading + 1,
                        offset: CellOffset::Current,
                    }
                } else {
                    GridCell {
                        day: index - leading - days + 1,
                        offset: CellOffset::Next,
                    }
                }
            })
        });
        MonthMatrix {
            rows,
            length,
            leading,
        }
    }

    pub fn rows(&self) -> &[[GridCell; GRID_COLUMNS]; GRID_ROWS] {
        &self.rows
    }

    /// All 42 cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flatten()
    }

    /// The month length the grid was built from. `OutOfTable` means the
    /// requested BS month index was outside 0..=11 and a fallback was used.
    pub fn month_length(&self) -> MonthLength {
        self.length
    }

    /// Number of leading cells borrowed from the previous month; also the
    /// weekday (0 = Sunday) of day 1.
    pub fn leading_days(&self) -> u32 {
        self.leading
    }

    pub fn in_month_count(&self) -> usize {
        self.cells().filter(|cell| cell.in_month()).count()
    }
}

impl Anchor {
    /// Grid for BS `year`/`month0`. The weekday of day 1 comes from the
    /// approximate [`Anchor::bs_to_ad`] conversion.
    pub fn bs_month_matrix(&self, year: i32, month0: i32) -> Result<MonthMatrix, CalendarError> {
        let length = bs_month_length(month0);
        let first = self.bs_to_ad(year, month0, 1)?;
        let leading = first.weekday()?;
        let previous = bs_month_length((month0 - 1).rem_euclid(12)).days();
        Ok(MonthMatrix::layout(leading, length, previous))
    }
}

/// [`Anchor::bs_month_matrix`] against [`DEFAULT_ANCHOR`].
pub fn build_bs_month_matrix(year: i32, month0: i32) -> Result<MonthMatrix, CalendarError> {
    DEFAULT_ANCHOR.bs_month_matrix(year, month0)
}

/// Grid for a Gregorian month. Out-of-range months roll into neighbouring
/// years, so `(2025, 12)` is January 2026.
pub fn build_ad_month_matrix(year: i32, month0: i32) -> Result<MonthMatrix, CalendarError> {
    let first = civil_date(year, month0, 1)?;
    let leading = first.weekday().num_days_from_sunday();
    let length = MonthLength::Table(ad_month_length(year, month0)?);
    let previous = ad_month_length(year, month0 - 1)?;
    Ok(MonthMatrix::layout(leading, length, previous))
}
