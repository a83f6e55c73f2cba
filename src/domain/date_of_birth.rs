use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

/// Minimum age, in whole years, of anyone sending a message
pub const MIN_AGE: u32 = 16;

/// Date format produced by date inputs
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user supplied date of birth
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Whole years between the birth date and `today`.
    ///
    /// The year difference is decremented while `today` falls before the
    /// birthday in the current year. Dates in the future yield a negative age.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.0.year();
        if (today.month(), today.day()) < (self.0.month(), self.0.day()) {
            age -= 1;
        }
        age
    }

    /// Whether the person is at least [`MIN_AGE`] years old on `today`
    pub fn is_of_age_on(&self, today: NaiveDate) -> bool {
        self.age_on(today) >= MIN_AGE as i32
    }
}

/// The latest birth date that still satisfies [`MIN_AGE`] on `today`.
///
/// Used as the upper bound of date pickers. When `today` is 29 February and
/// the target year is not a leap year the bound clamps to 28 February.
pub fn latest_eligible_birth_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MIN_AGE * 12))
        .unwrap_or(NaiveDate::MIN)
}

impl FromStr for DateOfBirth {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Date of birth cannot be empty".into());
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|e| format!("Date of birth of incorrect format: {}", e))
    }
}

impl AsRef<NaiveDate> for DateOfBirth {
    fn as_ref(&self) -> &NaiveDate {
        &self.0
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.format(DATE_FORMAT).fmt(f)
    }
}
