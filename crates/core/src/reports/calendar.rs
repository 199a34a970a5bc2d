//! Calendar rules used by the engine: month periods and the month-closing Sunday.
//!
//! Everything here is a pure function of its inputs. Nothing reads the wall
//! clock; callers that care about "today" pass it in explicitly.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Locale-independent month abbreviations used in period labels.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns the last calendar day of the month containing `date`.
#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(date.year(), date.month(), day))
        .unwrap_or(date)
}

/// Returns the last Sunday of the month containing `date`.
///
/// Takes the last calendar day of the month and steps back to the most
/// recent Sunday, inclusive of that last day.
#[must_use]
pub fn last_sunday_of_month(date: NaiveDate) -> NaiveDate {
    let last_day = last_day_of_month(date);
    let back = u64::from(last_day.weekday().num_days_from_sunday());
    last_day.checked_sub_days(Days::new(back)).unwrap_or(last_day)
}

/// Returns true if `date` is the last Sunday of its month.
#[must_use]
pub fn is_last_sunday_of_month(date: NaiveDate) -> bool {
    last_sunday_of_month(date) == date
}

/// Year and month of a reporting period, encoded as `year * 100 + month`.
///
/// This is the grouping and sort key for month buckets; labels are derived
/// from it, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(i32);

impl PeriodKey {
    /// Period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        // month() is 1..=12, so the cast is lossless
        #[allow(clippy::cast_possible_wrap)]
        let month = date.month() as i32;
        Self(date.year() * 100 + month)
    }

    /// Raw `year * 100 + month` value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.0.div_euclid(100)
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        // rem_euclid(100) is always in 0..100
        #[allow(clippy::cast_sign_loss)]
        let month = self.0.rem_euclid(100) as u32;
        month
    }

    /// Human label such as `Jan 2025`, identical under every runtime locale.
    #[must_use]
    pub fn label(self) -> String {
        let index = usize::try_from(self.month().saturating_sub(1)).unwrap_or(0);
        let abbreviation = MONTH_ABBREVIATIONS.get(index).copied().unwrap_or("???");
        format!("{abbreviation} {:04}", self.year())
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
