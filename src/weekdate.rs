use crate::datetime::{CalendarTime, Weekday, is_leap_year};

/// A date expressed in a week-numbering calendar whose weeks start on an
/// arbitrary weekday.
///
/// RFC 5545 numbers weeks the way ISO 8601 does, except that the first day
/// of the week is whatever WKST says instead of always Monday: week one of
/// a year is the first week with at least four days in that year. Week
/// numbering, and therefore the year a date belongs to, shifts with the
/// chosen week start.
#[derive(Clone, Copy, Debug)]
pub struct WeekDate {
    /// The weekday on which this week date calendar starts weeks.
    start: Weekday,
    year: i32,
    week: i8,
    weekday: Weekday,
}

impl WeekDate {
    /// Create a new week date.
    ///
    /// `week` must be in the range `1..=53`, although `53` is only valid
    /// for "long" years. `start` corresponds to how the week numbering
    /// scheme determines the start of a week.
    pub fn new(
        start: Weekday,
        year: i32,
        week: i8,
        weekday: Weekday,
    ) -> anyhow::Result<WeekDate> {
        anyhow::ensure!(
            1 <= week && week <= 53,
            "week number `{week}` is invalid \
             (week numbers must be in range 1..=53)",
        );
        if week == 53 && !is_long_year(start, year) {
            anyhow::bail!(
                "week number `{week}` (for weeks starting on {start}) \
                 is invalid for year `{year}`",
            );
        }
        Ok(WeekDate { start, year, week, weekday })
    }

    /// Returns the week date for the given Gregorian date.
    ///
    /// The week date uses a week numbering scheme where the given weekday
    /// is the first day in the week. That is, the first week of a year
    /// starts on the given weekday and is the first week whose majority of
    /// days (>= 4) falls in the same Gregorian year.
    pub fn from_date(start: Weekday, date: &CalendarTime) -> WeekDate {
        let mut year = date.year();
        let mut start_of_year = week_start_of_year(start, year);
        if date.days_from_epoch() < start_of_year.days_from_epoch() {
            year -= 1;
            start_of_year = week_start_of_year(start, year);
        } else {
            let next_start = week_start_of_year(start, year + 1);
            if date.days_from_epoch() >= next_start.days_from_epoch() {
                year += 1;
                start_of_year = next_start;
            }
        }

        let diff = date.days_from_epoch() - start_of_year.days_from_epoch();
        assert!(0 <= diff && diff < 54 * 7);
        // +1 because weeks are one-indexed.
        let week = i8::try_from(diff / 7).unwrap() + 1;
        WeekDate { start, year, week, weekday: date.weekday() }
    }

    /// Converts this week date to its corresponding Gregorian date, with
    /// zeroed time fields.
    pub fn date(&self) -> CalendarTime {
        let days = i64::from(self.week - 1) * 7
            + i64::from(self.weekday.since(self.start));
        week_start_of_year(self.start, self.year).add_days(days)
    }

    /// The week-numbering year this date belongs to. Near January 1 this
    /// can differ from the Gregorian year by one in either direction.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The one-indexed week number, in `1..=53`.
    pub fn week(&self) -> i8 {
        self.week
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the number of weeks in the year containing this week date.
    pub fn weeks_in_year(&self) -> i8 {
        if is_long_year(self.start, self.year) { 53 } else { 52 }
    }
}

/// Returns the start of the week that the given date resides in, keeping
/// the date's time fields.
///
/// The starting point of the week is determined by `start`.
pub fn first_of_week(start: Weekday, date: &CalendarTime) -> CalendarTime {
    date.add_days(-i64::from(date.weekday().since(start)))
}

/// Returns true if the given week year (with weeks starting on `start`) is
/// a "long" year or not.
///
/// A "long" year is a year with 53 weeks. Otherwise, it's a "short" year
/// with 52 weeks.
fn is_long_year(start: Weekday, year: i32) -> bool {
    // Inspired by: https://en.wikipedia.org/wiki/ISO_week_date#Weeks_per_year
    let last = CalendarTime::date(year, 12, 31).unwrap();
    let weekday = last.weekday();
    weekday == start.wrapping_add(3)
        || (is_leap_year(year) && weekday == start.wrapping_add(4))
}

/// Returns the first date in the first week of the given year, with zeroed
/// time fields.
///
/// The date returned is guaranteed to have a weekday equivalent to `start`.
pub(crate) fn week_start_of_year(start: Weekday, year: i32) -> CalendarTime {
    // RFC 5545 says:
    //
    // > A week is defined as a seven day period, starting on the day of the
    // > week defined to be the week start (see WKST). Week number one of the
    // > calendar year is the first week that contains at least four (4) days
    // > in that calendar year.
    //
    // Which means that Jan 4 *must* be in the first week of the year.
    let date_in_first_week = CalendarTime::date(year, 1, 4).unwrap();
    let diff_from_start = date_in_first_week.weekday().since(start);
    date_in_first_week.add_days(-i64::from(diff_from_start))
}
