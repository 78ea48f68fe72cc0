use std::{
    ops::{Range, RangeInclusive},
    sync::Arc,
};

use crate::{
    datetime::{CalendarTime, Weekday},
    iter::RecurrenceIter,
};

/// The frequency of a recurrence rule: the unit that DTSTART/interval
/// stepping advances when no BY-field overrides it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns a human readable string (in lowercase) for this frequency.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Frequency::Secondly => "secondly",
            Frequency::Minutely => "minutely",
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single BYDAY entry: a weekday, optionally qualified by an ordinal.
///
/// `nth` selects the nth occurrence of the weekday within the enclosing
/// period (the month for MONTHLY rules and YEARLY rules with BYMONTH, the
/// year otherwise). Negative ordinals count from the end of the period, so
/// `nth: Some(-1)` with `Weekday::Friday` is "the last Friday".
///
/// The historical wire form packs both pieces into one integer;
/// [`ByWeekday::from_encoded`] and [`ByWeekday::to_encoded`] speak that
/// form for parsers that carry it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ByWeekday {
    pub weekday: Weekday,
    pub nth: Option<i8>,
}

impl ByWeekday {
    /// A BYDAY entry matching every occurrence of the given weekday.
    pub fn every(weekday: Weekday) -> ByWeekday {
        ByWeekday { weekday, nth: None }
    }

    /// A BYDAY entry matching the nth occurrence of the given weekday in
    /// its period. Negative `nth` counts from the period's end.
    ///
    /// The value of `nth` is validated by `RecurrenceRuleBuilder::build`,
    /// not here.
    pub fn nth(nth: i8, weekday: Weekday) -> ByWeekday {
        ByWeekday { weekday, nth: Some(nth) }
    }

    /// Decodes the packed integer form: `sign × (|nth| × 8 + weekday)`,
    /// where the weekday is numbered 1=Sunday..7=Saturday and a zero
    /// ordinal means "every".
    pub fn from_encoded(encoded: i16) -> anyhow::Result<ByWeekday> {
        let magnitude = encoded.unsigned_abs();
        let weekday = Weekday::from_icalendar(
            i8::try_from(magnitude % 8).map_err(|_| {
                anyhow::anyhow!("invalid encoded weekday `{encoded}`")
            })?,
        )?;
        let nth = i16::try_from(magnitude / 8).unwrap();
        let nth = match nth {
            0 => None,
            n if encoded < 0 => Some(-i8::try_from(n)?),
            n => Some(i8::try_from(n)?),
        };
        Ok(ByWeekday { weekday, nth })
    }

    /// Encodes this entry into the packed integer form described on
    /// [`ByWeekday::from_encoded`].
    pub fn to_encoded(&self) -> i16 {
        let weekday = i16::from(self.weekday.to_icalendar());
        match self.nth {
            None => weekday,
            Some(n) if n < 0 => -(i16::from(n.unsigned_abs()) * 8 + weekday),
            Some(n) => i16::from(n) * 8 + weekday,
        }
    }
}

impl From<Weekday> for ByWeekday {
    fn from(weekday: Weekday) -> ByWeekday {
        ByWeekday::every(weekday)
    }
}

impl From<(i8, Weekday)> for ByWeekday {
    fn from((nth, weekday): (i8, Weekday)) -> ByWeekday {
        ByWeekday::nth(nth, weekday)
    }
}

impl std::fmt::Display for ByWeekday {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.nth {
            None => write!(f, "{}", self.weekday),
            Some(nth) => write!(f, "{nth}-{}", self.weekday),
        }
    }
}

/// The RFC 5545 recurrence rule.
///
/// A rule is just the description of a pattern. Pair it with an anchor
/// datetime via [`RecurrenceRule::iter_from`] to get the sequence of
/// occurrences. One rule can be reused with any number of different
/// anchors; the rule itself is immutable and cheap to clone.
#[derive(Clone, Debug)]
pub struct RecurrenceRule {
    inner: Arc<RecurrenceRuleInner>,
}

#[derive(Debug)]
pub(crate) struct RecurrenceRuleInner {
    pub(crate) freq: Frequency,
    pub(crate) interval: i32,
    pub(crate) until: Option<CalendarTime>,
    pub(crate) count: Option<u32>,
    pub(crate) week_start: Weekday,
    pub(crate) by_month: Box<[i8]>,
    // can be negative
    pub(crate) by_week: Box<[i8]>,
    // can be negative
    pub(crate) by_year_day: Box<[i16]>,
    // can be negative
    pub(crate) by_month_day: Box<[i8]>,
    pub(crate) by_week_day: Box<[ByWeekday]>,
    pub(crate) by_hour: Box<[i8]>,
    pub(crate) by_minute: Box<[i8]>,
    pub(crate) by_second: Box<[i8]>,
    // can be negative
    pub(crate) by_set_pos: Box<[i32]>,
}

impl RecurrenceRule {
    /// Returns a builder for constructing a `RecurrenceRule`.
    ///
    /// The frequency is the only thing required to create a rule.
    pub fn builder(freq: Frequency) -> RecurrenceRuleBuilder {
        RecurrenceRuleBuilder::new(freq)
    }

    /// Returns an iterator over the datetimes this rule describes,
    /// anchored at `dtstart`.
    ///
    /// The first occurrence is `dtstart` itself. The iterator may be
    /// "infinite" when the rule has neither `until` nor `count`; callers
    /// should bound it themselves (e.g. with `take(N)`).
    ///
    /// This returns an error when the rule cannot be anchored at
    /// `dtstart`: RFC 5545 forbids BYSECOND, BYMINUTE and BYHOUR (and the
    /// sub-daily frequencies) when the anchor is a bare date.
    pub fn iter_from(
        &self,
        dtstart: CalendarTime,
    ) -> anyhow::Result<RecurrenceIter> {
        RecurrenceIter::new(self.clone(), dtstart)
    }

    pub(crate) fn inner(&self) -> &RecurrenceRuleInner {
        &self.inner
    }
}

/// A builder for constructing a valid recurrence rule.
///
/// All validation happens in [`RecurrenceRuleBuilder::build`]: field
/// values out of range, BY-field combinations RFC 5545 forbids, and
/// combinations the expansion engine cannot give meaning to are all
/// rejected there, so a built rule never fails later for structural
/// reasons.
#[derive(Clone, Debug)]
pub struct RecurrenceRuleBuilder {
    freq: Frequency,
    until: Option<CalendarTime>,
    count: Option<u32>,
    interval: i32,
    week_start: Weekday,
    by_month: Vec<i8>,
    by_week: Vec<i8>,
    by_year_day: Vec<i16>,
    by_month_day: Vec<i8>,
    by_week_day: Vec<ByWeekday>,
    by_hour: Vec<i8>,
    by_minute: Vec<i8>,
    by_second: Vec<i8>,
    by_set_pos: Vec<i32>,
}

/// Maximum cardinality per list. These are generous: most are larger than
/// the number of distinct legal values, which is all a set can hold.
const MAX_BY_SECOND: usize = 61;
const MAX_BY_MINUTE: usize = 61;
const MAX_BY_HOUR: usize = 25;
const MAX_BY_WEEK_DAY: usize = 364;
const MAX_BY_MONTH_DAY: usize = 32;
const MAX_BY_YEAR_DAY: usize = 367;
const MAX_BY_WEEK: usize = 56;
const MAX_BY_MONTH: usize = 13;
const MAX_BY_SET_POS: usize = 367;

impl RecurrenceRuleBuilder {
    fn new(freq: Frequency) -> RecurrenceRuleBuilder {
        RecurrenceRuleBuilder {
            freq,
            until: None,
            count: None,
            interval: 1,
            week_start: Weekday::Monday,
            by_month: vec![],
            by_week: vec![],
            by_year_day: vec![],
            by_month_day: vec![],
            by_week_day: vec![],
            by_hour: vec![],
            by_minute: vec![],
            by_second: vec![],
            by_set_pos: vec![],
        }
    }

    pub fn build(&self) -> anyhow::Result<RecurrenceRule> {
        fn sort_and_dedup<T: Clone + Ord>(slice: &[T]) -> Box<[T]> {
            let mut vec = slice.to_vec();
            vec.sort();
            vec.dedup();
            vec.into_boxed_slice()
        }

        fn check_len<T>(
            name: &str,
            list: &[T],
            max: usize,
        ) -> anyhow::Result<()> {
            anyhow::ensure!(
                list.len() <= max,
                "too many '{name}' values \
                 (`{len}` exceeds the maximum of {max})",
                len = list.len(),
            );
            Ok(())
        }

        anyhow::ensure!(
            self.interval >= 1,
            "interval value of `{}` is invalid \
             (interval must be greater than or equal to 1)",
            self.interval,
        );
        if let Some(count) = self.count {
            anyhow::ensure!(
                count >= 1,
                "count value of `{count}` is invalid \
                 (count must be greater than or equal to 1)",
            );
        }
        anyhow::ensure!(
            self.until.is_none() || self.count.is_none(),
            "'until' and 'count' cannot both be set on the same rule",
        );

        check_len("by second", &self.by_second, MAX_BY_SECOND)?;
        check_len("by minute", &self.by_minute, MAX_BY_MINUTE)?;
        check_len("by hour", &self.by_hour, MAX_BY_HOUR)?;
        check_len("by week day", &self.by_week_day, MAX_BY_WEEK_DAY)?;
        check_len("by day of the month", &self.by_month_day, MAX_BY_MONTH_DAY)?;
        check_len("by day of the year", &self.by_year_day, MAX_BY_YEAR_DAY)?;
        check_len("by week", &self.by_week, MAX_BY_WEEK)?;
        check_len("by month", &self.by_month, MAX_BY_MONTH)?;
        check_len("by set position", &self.by_set_pos, MAX_BY_SET_POS)?;

        for &v in self.by_month.iter() {
            anyhow::ensure!(
                1 <= v && v <= 12,
                "invalid 'by month' value `{v}` \
                 (values must be in range 1..=12)",
            );
        }
        for &v in self.by_week.iter() {
            anyhow::ensure!(
                (-53 <= v && v <= -1) || (1 <= v && v <= 53),
                "invalid 'by week' value `{v}` \
                 (values must be in range 1..=53 or -53..=-1)",
            );
        }
        for &v in self.by_year_day.iter() {
            anyhow::ensure!(
                (-366 <= v && v <= -1) || (1 <= v && v <= 366),
                "invalid 'by day of the year' value `{v}` \
                 (values must be in range 1..=366 or -366..=-1)",
            );
        }
        for &v in self.by_month_day.iter() {
            anyhow::ensure!(
                (-31 <= v && v <= -1) || (1 <= v && v <= 31),
                "invalid 'by day of the month' value `{v}` \
                 (values must be in range 1..=31 or -31..=-1)",
            );
        }
        for &v in self.by_week_day.iter() {
            let Some(nth) = v.nth else { continue };
            // Numbered weekdays are only allowed for YEARLY or MONTHLY
            // frequencies.
            anyhow::ensure!(
                matches!(self.freq, Frequency::Yearly | Frequency::Monthly),
                "numbered weekday `{v}` is only allowed at \
                 yearly or monthly frequencies",
            );
            // ... except when using YEARLY frequency with BYWEEKNO set.
            anyhow::ensure!(
                !matches!(self.freq, Frequency::Yearly)
                    || self.by_week.is_empty(),
                "numbered weekday `{v}` is only allowed at yearly \
                 frequency when 'by week' is not used",
            );
            // The bounds on `nth` depend on the enclosing period: the
            // year when the frequency is yearly and BYMONTH isn't set,
            // the month otherwise.
            if matches!(self.freq, Frequency::Yearly)
                && self.by_month.is_empty()
            {
                anyhow::ensure!(
                    (-53 <= nth && nth <= -1) || (1 <= nth && nth <= 53),
                    "invalid numbered 'by week day' value `{v}` \
                     (values must be in range 1..=53 or -53..=-1)",
                );
            } else {
                anyhow::ensure!(
                    (-5 <= nth && nth <= -1) || (1 <= nth && nth <= 5),
                    "invalid numbered 'by week day' value `{v}` \
                     (values must be in range 1..=5 or -5..=-1)",
                );
            }
        }
        for &v in self.by_hour.iter() {
            anyhow::ensure!(
                0 <= v && v <= 23,
                "invalid 'by hour' value `{v}` \
                 (values must be in range 0..=23)",
            );
        }
        for &v in self.by_minute.iter() {
            anyhow::ensure!(
                0 <= v && v <= 59,
                "invalid 'by minute' value `{v}` \
                 (values must be in range 0..=59)",
            );
        }
        for &v in self.by_second.iter() {
            // RFC 5545 technically allows a value of `60` here for leap
            // seconds. Clamping a leap second to `59` makes no sense for
            // recurrence generation, so reject it. This is also what
            // `python-dateutil` does.
            anyhow::ensure!(
                0 <= v && v <= 59,
                "invalid 'by second' value `{v}` \
                 (values must be in range 0..=59)",
            );
        }
        for &v in self.by_set_pos.iter() {
            anyhow::ensure!(
                (-366 <= v && v <= -1) || (1 <= v && v <= 366),
                "invalid 'by set position' value `{v}` \
                 (values must be in range 1..=366 or -366..=-1)",
            );
        }

        // Combination restrictions. BYYEARDAY fully determines a date, so
        // it tolerates no other date-selecting rule; BYWEEKNO names weeks,
        // which months and month days cut across.
        if !self.by_year_day.is_empty() {
            anyhow::ensure!(
                self.by_month.is_empty()
                    && self.by_week.is_empty()
                    && self.by_month_day.is_empty()
                    && self.by_week_day.is_empty(),
                "'by day of the year' cannot be combined with 'by month', \
                 'by week', 'by day of the month' or 'by week day'",
            );
            anyhow::ensure!(
                !matches!(
                    self.freq,
                    Frequency::Monthly | Frequency::Weekly
                ),
                "'by day of the year' cannot be used \
                 with monthly or weekly frequency",
            );
        }
        if !self.by_week.is_empty() {
            anyhow::ensure!(
                self.by_month.is_empty() && self.by_month_day.is_empty(),
                "'by week' cannot be combined with 'by month' \
                 or 'by day of the month'",
            );
            anyhow::ensure!(
                !matches!(self.freq, Frequency::Monthly),
                "'by week' cannot be used with monthly frequency",
            );
        }
        if !self.by_month_day.is_empty() {
            anyhow::ensure!(
                !matches!(self.freq, Frequency::Weekly),
                "'by day of the month' cannot be used with weekly frequency",
            );
        }

        // A BYSETPOS specific error is that, if it's given, then there
        // MUST be another BY* rule.
        if !self.by_set_pos.is_empty() {
            anyhow::ensure!(
                !self.by_month.is_empty()
                    || !self.by_week.is_empty()
                    || !self.by_year_day.is_empty()
                    || !self.by_month_day.is_empty()
                    || !self.by_week_day.is_empty()
                    || !self.by_hour.is_empty()
                    || !self.by_minute.is_empty()
                    || !self.by_second.is_empty(),
                "when 'by set position' is used, at least one other \
                 'by' rule must be specified, but all are empty",
            );
        }

        // BYDAY is kept in chronological order within a week, which
        // depends on the week start. That ordering is what keeps weekly
        // expansion emitting candidates in time order.
        let week_start = self.week_start;
        let by_week_day = {
            let mut vec = self.by_week_day.clone();
            vec.sort_by_key(|wd| {
                (wd.weekday.since(week_start), wd.nth.unwrap_or(0))
            });
            vec.dedup();
            vec.into_boxed_slice()
        };

        let inner = Arc::new(RecurrenceRuleInner {
            freq: self.freq,
            interval: self.interval,
            until: self.until,
            count: self.count,
            week_start,
            by_month: sort_and_dedup(&self.by_month),
            by_week: sort_and_dedup(&self.by_week),
            by_year_day: sort_and_dedup(&self.by_year_day),
            by_month_day: sort_and_dedup(&self.by_month_day),
            by_week_day,
            by_hour: sort_and_dedup(&self.by_hour),
            by_minute: sort_and_dedup(&self.by_minute),
            by_second: sort_and_dedup(&self.by_second),
            by_set_pos: sort_and_dedup(&self.by_set_pos),
        });
        Ok(RecurrenceRule { inner })
    }

    /// Sets the datetime at which the recurrence ends, inclusively.
    ///
    /// Mutually exclusive with `count`.
    pub fn until(&mut self, until: CalendarTime) -> &mut RecurrenceRuleBuilder {
        self.until = Some(until);
        self
    }

    /// Sets the total number of occurrences, counting the anchor as the
    /// first.
    ///
    /// Mutually exclusive with `until`.
    pub fn count(&mut self, count: u32) -> &mut RecurrenceRuleBuilder {
        self.count = Some(count);
        self
    }

    pub fn interval(&mut self, increment: i32) -> &mut RecurrenceRuleBuilder {
        self.interval = increment;
        self
    }

    pub fn week_start(
        &mut self,
        weekday: Weekday,
    ) -> &mut RecurrenceRuleBuilder {
        self.week_start = weekday;
        self
    }

    pub fn by_month<I: IntoI8Iter>(
        &mut self,
        months: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_month.extend(months.into_i8_iter());
        self
    }

    pub fn by_week<I: IntoI8Iter>(
        &mut self,
        weeks: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_week.extend(weeks.into_i8_iter());
        self
    }

    pub fn by_year_day<I: IntoI16Iter>(
        &mut self,
        days: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_year_day.extend(days.into_i16_iter());
        self
    }

    pub fn by_month_day<I: IntoI8Iter>(
        &mut self,
        days: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_month_day.extend(days.into_i8_iter());
        self
    }

    pub fn by_week_day<I: IntoByWeekdayIter>(
        &mut self,
        week_days: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_week_day.extend(week_days.into_by_weekday_iter());
        self
    }

    pub fn by_hour<I: IntoI8Iter>(
        &mut self,
        hours: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_hour.extend(hours.into_i8_iter());
        self
    }

    pub fn by_minute<I: IntoI8Iter>(
        &mut self,
        minutes: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_minute.extend(minutes.into_i8_iter());
        self
    }

    pub fn by_second<I: IntoI8Iter>(
        &mut self,
        seconds: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_second.extend(seconds.into_i8_iter());
        self
    }

    pub fn by_set_position<I: IntoI32Iter>(
        &mut self,
        positions: I,
    ) -> &mut RecurrenceRuleBuilder {
        self.by_set_pos.extend(positions.into_i32_iter());
        self
    }
}

/// A trait that permits flexibly specifying a sequence of `i8` integers.
///
/// This trait is used for builder methods on `RecurrenceRuleBuilder`. It
/// permits callers to provide integers in a number of flexible ways:
///
/// * A single integer: `5`
/// * An array of integers: `[1, 3, 5]`.
/// * A single range of integers: `5..8` or `5..=8`.
///
/// The reason this trait _and_ its `i16`/`i32` siblings exist, instead of
/// one generic trait, is type inference: with one trait implemented for
/// several integer types, `builder.by_month(5)` could not infer the type
/// of `5` unambiguously.
pub trait IntoI8Iter {
    /// Creates an iterator over all integers in this sequence.
    fn into_i8_iter(self) -> impl Iterator<Item = i8>;
}

/// A trait that permits flexibly specifying a sequence of `i16` integers.
///
/// See [`IntoI8Iter`] for the supported shapes and the reason this isn't
/// one generic trait.
pub trait IntoI16Iter {
    /// Creates an iterator over all integers in this sequence.
    fn into_i16_iter(self) -> impl Iterator<Item = i16>;
}

/// A trait that permits flexibly specifying a sequence of `i32` integers.
///
/// See [`IntoI8Iter`] for the supported shapes and the reason this isn't
/// one generic trait.
pub trait IntoI32Iter {
    /// Creates an iterator over all integers in this sequence.
    fn into_i32_iter(self) -> impl Iterator<Item = i32>;
}

impl IntoI8Iter for i8 {
    fn into_i8_iter(self) -> impl Iterator<Item = i8> {
        std::iter::once(self)
    }
}

impl IntoI16Iter for i16 {
    fn into_i16_iter(self) -> impl Iterator<Item = i16> {
        std::iter::once(self)
    }
}

impl IntoI32Iter for i32 {
    fn into_i32_iter(self) -> impl Iterator<Item = i32> {
        std::iter::once(self)
    }
}

impl IntoI8Iter for Range<i8> {
    fn into_i8_iter(self) -> impl Iterator<Item = i8> {
        self.into_iter()
    }
}

impl IntoI16Iter for Range<i16> {
    fn into_i16_iter(self) -> impl Iterator<Item = i16> {
        self.into_iter()
    }
}

impl IntoI32Iter for Range<i32> {
    fn into_i32_iter(self) -> impl Iterator<Item = i32> {
        self.into_iter()
    }
}

impl IntoI8Iter for RangeInclusive<i8> {
    fn into_i8_iter(self) -> impl Iterator<Item = i8> {
        self.into_iter()
    }
}

impl IntoI16Iter for RangeInclusive<i16> {
    fn into_i16_iter(self) -> impl Iterator<Item = i16> {
        self.into_iter()
    }
}

impl IntoI32Iter for RangeInclusive<i32> {
    fn into_i32_iter(self) -> impl Iterator<Item = i32> {
        self.into_iter()
    }
}

impl<const N: usize> IntoI8Iter for [i8; N] {
    fn into_i8_iter(self) -> impl Iterator<Item = i8> {
        self.into_iter()
    }
}

impl<const N: usize> IntoI16Iter for [i16; N] {
    fn into_i16_iter(self) -> impl Iterator<Item = i16> {
        self.into_iter()
    }
}

impl<const N: usize> IntoI32Iter for [i32; N] {
    fn into_i32_iter(self) -> impl Iterator<Item = i32> {
        self.into_iter()
    }
}

/// A trait that permits flexibly specifying a sequence of BYDAY entries.
///
/// This trait is primarily used for `RecurrenceRuleBuilder::by_week_day`.
/// It permits callers to provide weekdays in a number of flexible ways:
///
/// * Directly via `ByWeekday::nth(3, Weekday::Monday)`.
/// * As just any weekday via `Weekday::Monday`.
/// * As a numbered weekday via `(3, Weekday::Monday)`.
/// * As a range of weekdays via `Weekday::Monday..=Weekday::Friday`
///   (in RFC 5545 weekday order, so Sunday is first).
/// * As an array of any of the single forms.
pub trait IntoByWeekdayIter {
    /// Creates an iterator over all BYDAY entries in this sequence.
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday>;
}

impl IntoByWeekdayIter for ByWeekday {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        std::iter::once(self)
    }
}

impl IntoByWeekdayIter for Weekday {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        std::iter::once(ByWeekday::every(self))
    }
}

impl IntoByWeekdayIter for (i8, Weekday) {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        std::iter::once(ByWeekday::from(self))
    }
}

impl IntoByWeekdayIter for RangeInclusive<Weekday> {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        let (start, end) =
            (self.start().to_icalendar(), self.end().to_icalendar());
        (start..=end).map(|n| {
            ByWeekday::every(Weekday::from_icalendar(n).unwrap())
        })
    }
}

impl<const N: usize> IntoByWeekdayIter for [ByWeekday; N] {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter()
    }
}

impl<const N: usize> IntoByWeekdayIter for [Weekday; N] {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter().map(ByWeekday::every)
    }
}

impl<const N: usize> IntoByWeekdayIter for [(i8, Weekday); N] {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter().map(ByWeekday::from)
    }
}
