use serde::{Deserialize, Serialize};
use std::fmt;

const BS_SUFFIX: &str = "-BS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarSystem {
    Bs,
    Ad,
}

/// Canonical identity of a calendar date, used to join tasks to grid cells.
///
/// BS keys look like `2082-04-26-BS`, AD keys like `2025-08-11`; months are
/// written 1-based.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn system(&self) -> CalendarSystem {
        if self.0.ends_with(BS_SUFFIX) {
            CalendarSystem::Bs
        } else {
            CalendarSystem::Ad
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn bs_date_key(year: i32, month0: i32, day: i32) -> DateKey {
    DateKey(format!("{}{BS_SUFFIX}", numeric_key(year, month0, day)))
}

pub fn ad_date_key(year: i32, month0: i32, day: i32) -> DateKey {
    DateKey(numeric_key(year, month0, day))
}

fn numeric_key(year: i32, month0: i32, day: i32) -> String {
    format!("{year:04}-{:02}-{day:02}", i64::from(month0) + 1)
}
