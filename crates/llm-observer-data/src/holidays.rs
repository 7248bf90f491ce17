//! Holiday calendar collaborator.
//!
//! Sales generation only asks a calendar which dates in a span are holidays.
//! Deriving holiday rules is left to implementors; the crate ships an empty
//! calendar and one backed by an explicit list of dates.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::SettingsError;

/// Source of holiday dates for a date span.
#[cfg_attr(test, mockall::automock)]
pub trait HolidayCalendar {
    /// Returns the holidays between `start` and `end`, both inclusive.
    fn holidays(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate>;
}

/// Calendar with no holidays at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn holidays(&self, _start: NaiveDate, _end: NaiveDate) -> BTreeSet<NaiveDate> {
        BTreeSet::new()
    }
}

/// Calendar backed by a fixed set of dates.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use llm_observer_data::{FixedHolidayCalendar, HolidayCalendar};
///
/// let calendar = FixedHolidayCalendar::from_iso_dates(["2024-07-04", "2024-12-25"])
///     .expect("valid dates");
/// let july = calendar.holidays(
///     NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date"),
///     NaiveDate::from_ymd_opt(2024, 7, 31).expect("valid date"),
/// );
///
/// assert_eq!(july.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedHolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl FixedHolidayCalendar {
    /// Creates a calendar from the given dates.
    #[must_use]
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Parses `YYYY-MM-DD` strings into a calendar.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHolidayDate`] for the first entry that
    /// is not a valid ISO date.
    pub fn from_iso_dates<I, S>(values: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dates = values
            .into_iter()
            .map(|value| {
                let trimmed = value.as_ref().trim();
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|err| {
                    SettingsError::InvalidHolidayDate {
                        value: trimmed.to_owned(),
                        message: err.to_string(),
                    }
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { dates })
    }

    /// Returns every date in the calendar.
    #[must_use]
    pub const fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }
}

impl HolidayCalendar for FixedHolidayCalendar {
    fn holidays(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate> {
        if start > end {
            return BTreeSet::new();
        }
        self.dates.range(start..=end).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn calendar() -> FixedHolidayCalendar {
        FixedHolidayCalendar::new([date(2024, 1, 1), date(2024, 7, 4), date(2024, 12, 25)])
    }

    #[rstest]
    fn range_bounds_are_inclusive(calendar: FixedHolidayCalendar) {
        let found = calendar.holidays(date(2024, 1, 1), date(2024, 7, 4));
        assert_eq!(found, BTreeSet::from([date(2024, 1, 1), date(2024, 7, 4)]));
    }

    #[rstest]
    fn single_day_range_matches_holiday(calendar: FixedHolidayCalendar) {
        let found = calendar.holidays(date(2024, 12, 25), date(2024, 12, 25));
        assert_eq!(found.len(), 1);
    }

    #[rstest]
    fn reversed_range_is_empty(calendar: FixedHolidayCalendar) {
        assert!(
            calendar
                .holidays(date(2024, 12, 31), date(2024, 1, 1))
                .is_empty()
        );
    }

    #[test]
    fn no_holidays_is_always_empty() {
        assert!(NoHolidays.holidays(date(2000, 1, 1), date(2030, 1, 1)).is_empty());
    }

    #[test]
    fn parses_iso_dates_with_whitespace() {
        let calendar =
            FixedHolidayCalendar::from_iso_dates([" 2024-07-04", "2024-11-28 "]).expect("valid");
        assert_eq!(calendar.dates().len(), 2);
    }

    #[test]
    fn rejects_invalid_iso_date() {
        let err = FixedHolidayCalendar::from_iso_dates(["2024-07-04", "July 4th"])
            .expect_err("invalid date");
        let SettingsError::InvalidHolidayDate { value, .. } = err else {
            panic!("expected invalid holiday date error");
        };
        assert_eq!(value, "July 4th");
    }
}
