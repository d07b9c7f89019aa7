//! Calendar billing periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::DuesError;

/// A calendar month a resident can owe dues for.
///
/// Ordered chronologically by `(year, month)`. The month is always in
/// `1..=12`; deserialization goes through the same check as [`PeriodKey::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriodKey")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriodKey {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriodKey> for PeriodKey {
    type Error = DuesError;

    fn try_from(raw: RawPeriodKey) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl PeriodKey {
    /// Creates a period, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, DuesError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DuesError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The following month.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month.
    #[must_use]
    pub const fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// December of the same year.
    #[must_use]
    pub const fn end_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 12,
        }
    }

    /// Number of days in this month.
    #[must_use]
    pub const fn days_in_month(&self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Last day of the month: the payment deadline for the period.
    #[must_use]
    pub fn due_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.days_in_month())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Iterates months from `self` through `last`, inclusive.
    pub fn through(self, last: Self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |p| Some(p.next())).take_while(move |p| *p <= last)
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
