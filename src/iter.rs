use std::collections::VecDeque;

use crate::{
    classify::{ByField, Classification, classify},
    datetime::{CalendarTime, Weekday, days_in_month, days_in_year, weekday_of},
    rule::{ByWeekday, Frequency, RecurrenceRule},
    weekdate::{WeekDate, first_of_week, week_start_of_year},
};

/// The Gregorian calendar repeats exactly every 400 years: 146097 days,
/// which is a whole number of weeks. Candidate generation and acceptance
/// therefore repeat with the same period, so a rule that accepts nothing
/// for 400 consecutive years can never accept anything. This is what lets
/// iteration terminate on unsatisfiable rules without imposing any
/// fixed-epoch ceiling on satisfiable ones.
const GREGORIAN_CYCLE_YEARS: i64 = 400;

/// An iterator over the occurrences of a recurrence rule, anchored at a
/// DTSTART.
///
/// Created by [`RecurrenceRule::iter_from`]. The anchor is always the
/// first occurrence. The sequence is lazy, strictly increasing and
/// forward-only; to restart, create a fresh iterator. Dropping the
/// iterator releases everything it owns.
///
/// All iteration state lives in this value. There is no global state
/// anywhere in the engine, so independent iterators over the same rule
/// never interfere.
#[derive(Clone, Debug)]
pub struct RecurrenceIter {
    rule: RecurrenceRule,
    dtstart: CalendarTime,
    /// The candidate most recently produced by the advancers. Mutated in
    /// place as granularities step and carry.
    current: CalendarTime,
    /// Working copies of the expanding lists. Where the rule left an
    /// EXPAND-classified list empty, the corresponding DTSTART field has
    /// been copied in as a single element, so expansion never has to
    /// special-case DTSTART.
    by_second: Box<[i8]>,
    by_minute: Box<[i8]>,
    by_hour: Box<[i8]>,
    by_month_day: Box<[i8]>,
    by_month: Box<[i8]>,
    by_week_day: Box<[ByWeekday]>,
    second_idx: usize,
    minute_idx: usize,
    hour_idx: usize,
    week_day_idx: usize,
    /// The day-of-year cache for YEARLY rules: every day the rule selects
    /// in the year `current` sits in, sorted ascending. Empty for other
    /// frequencies, and for years the rule skips entirely.
    days: Vec<i16>,
    days_idx: usize,
    /// When true, `current` itself (the candidate the initializer primed)
    /// has not been considered yet and the next advance must evaluate it
    /// before moving any cursor.
    primed: bool,
    /// Occurrences surfaced so far. DTSTART is number one.
    occurrences: u64,
    /// The most recently surfaced occurrence. Nothing at or before it is
    /// ever surfaced again.
    last: Option<CalendarTime>,
    /// Set when the advancers prove no further candidate can exist.
    dead: bool,
    done: bool,
    /// BYSETPOS only: candidates of the period currently being collected,
    /// the period's key, and selected occurrences awaiting emission.
    batch: Vec<CalendarTime>,
    batch_key: Option<PeriodKey>,
    pending: VecDeque<CalendarTime>,
}

/// Identifies one interval of the recurrence frequency, for grouping
/// occurrences under BYSETPOS. Fields beyond the frequency's granularity
/// stay zero.
type PeriodKey = (i32, i16, i8, i8, i8, i8);

impl RecurrenceIter {
    pub(crate) fn new(
        rule: RecurrenceRule,
        dtstart: CalendarTime,
    ) -> anyhow::Result<RecurrenceIter> {
        let r = rule.inner();
        if dtstart.is_date() {
            anyhow::ensure!(
                r.by_second.is_empty()
                    && r.by_minute.is_empty()
                    && r.by_hour.is_empty(),
                "'by second', 'by minute' and 'by hour' cannot be used \
                 when the anchor is a bare date",
            );
            anyhow::ensure!(
                !matches!(
                    r.freq,
                    Frequency::Secondly
                        | Frequency::Minutely
                        | Frequency::Hourly
                ),
                "{} frequency cannot be used when the anchor is a bare date",
                r.freq,
            );
        }

        let freq = r.freq;
        let seed = |field: ByField, list: &[i8], default: i8| -> Box<[i8]> {
            let expands = classify(freq, field) == Classification::Expand;
            if list.is_empty() && expands {
                vec![default].into_boxed_slice()
            } else {
                list.into()
            }
        };
        let by_second = seed(ByField::Second, &r.by_second, dtstart.second());
        let by_minute = seed(ByField::Minute, &r.by_minute, dtstart.minute());
        let by_hour = seed(ByField::Hour, &r.by_hour, dtstart.hour());
        let by_month_day =
            seed(ByField::MonthDay, &r.by_month_day, dtstart.day());
        let by_month = seed(ByField::Month, &r.by_month, dtstart.month());
        // Weekly recurrences with no BYDAY data occur on the same day of
        // the week as the anchor.
        let by_week_day: Box<[ByWeekday]> =
            if freq == Frequency::Weekly && r.by_week_day.is_empty() {
                vec![ByWeekday::every(dtstart.weekday())].into()
            } else {
                r.by_week_day.clone()
            };

        let mut it = RecurrenceIter {
            rule,
            dtstart,
            current: dtstart,
            by_second,
            by_minute,
            by_hour,
            by_month_day,
            by_month,
            by_week_day,
            second_idx: 0,
            minute_idx: 0,
            hour_idx: 0,
            week_day_idx: 0,
            days: Vec::new(),
            days_idx: 0,
            primed: true,
            occurrences: 0,
            last: None,
            dead: false,
            done: false,
            batch: Vec::new(),
            batch_key: None,
            pending: VecDeque::new(),
        };
        it.prime();
        log::trace!(
            "expanding {freq} rule anchored at `{dtstart}`, \
             first candidate `{current}`",
            current = it.current,
        );
        Ok(it)
    }

    /// Moves `current` from the bare anchor to the first candidate the
    /// advancers would generate: list heads for every expanding field, and
    /// the first selected day of the anchor's week, month or year. The
    /// first candidate may sit on either side of the anchor; the main loop
    /// discards it if it is too early.
    fn prime(&mut self) {
        let freq = self.freq();
        if classify(freq, ByField::Second) == Classification::Expand {
            self.current.set_second(self.by_second[0]);
        }
        if classify(freq, ByField::Minute) == Classification::Expand {
            self.current.set_minute(self.by_minute[0]);
        }
        if classify(freq, ByField::Hour) == Classification::Expand {
            self.current.set_hour(self.by_hour[0]);
        }
        if classify(freq, ByField::Month) == Classification::Expand {
            // Keep the day in range while the month changes; the day is
            // re-derived below or by the year day cache.
            let month = self.by_month[0];
            let day = self
                .current
                .day()
                .min(days_in_month(self.current.year(), month));
            self.current.set_year_month_day(
                self.current.year(),
                month,
                day,
            );
        }
        match freq {
            Frequency::Weekly => {
                // The first entry of BYDAY (in week order) anchors the
                // weekly cursor.
                let entry = self.by_week_day[0];
                let start = first_of_week(self.week_start(), &self.current);
                self.current = start
                    .add_days(i64::from(entry.weekday.since(self.week_start())));
            }
            Frequency::Monthly => {
                // The first selected day of the anchor's month. When the
                // month selects nothing at all there is no first candidate
                // to evaluate; the advancers scan forward from the anchor.
                let (year, month) =
                    (self.current.year(), self.current.month());
                let dim = days_in_month(year, month);
                let mut found = false;
                for day in 1..=dim {
                    if self.month_day_matches(year, month, day) {
                        self.current.set_day(day);
                        found = true;
                        break;
                    }
                }
                if !found {
                    self.primed = false;
                }
            }
            _ => {}
        }
        if freq == Frequency::Yearly {
            self.days = self.expand_year_days(self.current.year());
            self.days_idx = 0;
            match self.days.first() {
                Some(&doy) => {
                    self.current =
                        self.current.with_year_doy(self.current.year(), doy);
                }
                // The anchor's own year selects nothing; there is no
                // first candidate to evaluate.
                None => self.primed = false,
            }
        }
    }

    fn freq(&self) -> Frequency {
        self.rule.inner().freq
    }

    fn interval(&self) -> i32 {
        self.rule.inner().interval
    }

    fn week_start(&self) -> Weekday {
        self.rule.inner().week_start
    }

    /// Advances `current` to the next generated candidate, dispatching on
    /// the rule's frequency. Wrap results from the granularity chain are
    /// deliberately dropped here; there is nothing above the top.
    fn advance(&mut self) {
        match self.freq() {
            Frequency::Secondly => {
                self.next_second();
            }
            Frequency::Minutely => {
                self.next_minute();
            }
            Frequency::Hourly => {
                self.next_hour();
            }
            Frequency::Daily => {
                self.next_day();
            }
            Frequency::Weekly => {
                self.next_week();
            }
            Frequency::Monthly => {
                self.next_month();
            }
            Frequency::Yearly => {
                self.next_year();
            }
        }
    }

    /// Each `next_*` advance operation returns true when its granularity
    /// wrapped (exhausted its data for the enclosing period), telling the
    /// caller that the next coarser granularity must move too.
    fn next_second(&mut self) -> bool {
        match classify(self.freq(), ByField::Second) {
            Classification::Expand => {
                self.second_idx += 1;
                if self.second_idx >= self.by_second.len() {
                    self.second_idx = 0;
                    self.current.set_second(self.by_second[0]);
                    return true;
                }
                self.current.set_second(self.by_second[self.second_idx]);
                false
            }
            Classification::Contract => {
                // Only reachable at the rule's own frequency; everything
                // coarser sees an expanding (seeded) list.
                assert_eq!(self.freq(), Frequency::Secondly);
                self.add_seconds(i64::from(self.interval()));
                false
            }
            Classification::Illegal => {
                unreachable!("'by second' cannot be illegal")
            }
        }
    }

    fn next_minute(&mut self) -> bool {
        if !self.next_second() {
            return false;
        }
        match classify(self.freq(), ByField::Minute) {
            Classification::Expand => {
                self.minute_idx += 1;
                if self.minute_idx >= self.by_minute.len() {
                    self.minute_idx = 0;
                    self.current.set_minute(self.by_minute[0]);
                    return true;
                }
                self.current.set_minute(self.by_minute[self.minute_idx]);
                false
            }
            Classification::Contract => {
                assert_eq!(self.freq(), Frequency::Minutely);
                self.add_minutes(i64::from(self.interval()));
                false
            }
            Classification::Illegal => {
                unreachable!("'by minute' cannot be illegal")
            }
        }
    }

    fn next_hour(&mut self) -> bool {
        if !self.next_minute() {
            return false;
        }
        match classify(self.freq(), ByField::Hour) {
            Classification::Expand => {
                self.hour_idx += 1;
                if self.hour_idx >= self.by_hour.len() {
                    self.hour_idx = 0;
                    self.current.set_hour(self.by_hour[0]);
                    return true;
                }
                self.current.set_hour(self.by_hour[self.hour_idx]);
                false
            }
            Classification::Contract => {
                assert_eq!(self.freq(), Frequency::Hourly);
                self.add_hours(i64::from(self.interval()));
                false
            }
            Classification::Illegal => {
                unreachable!("'by hour' cannot be illegal")
            }
        }
    }

    fn next_day(&mut self) -> bool {
        if !self.next_hour() {
            return false;
        }
        // Day stepping ignores BYDAY on purpose: at DAILY frequency it is
        // a contracting rule, and the excluded days fall out in filtering.
        self.current = self.current.add_days(i64::from(self.interval()));
        false
    }

    fn next_week_day(&mut self) -> bool {
        if !self.next_hour() {
            return false;
        }
        assert!(!self.by_week_day.is_empty());
        self.week_day_idx += 1;
        let wrapped = self.week_day_idx >= self.by_week_day.len();
        if wrapped {
            self.week_day_idx = 0;
        }
        // The entries are kept in week order, so stepping the cursor walks
        // the current week chronologically.
        let entry = self.by_week_day[self.week_day_idx];
        let start = first_of_week(self.week_start(), &self.current);
        self.current =
            start.add_days(i64::from(entry.weekday.since(self.week_start())));
        wrapped
    }

    fn next_week(&mut self) -> bool {
        if !self.next_week_day() {
            return false;
        }
        // The weekday cursor wrapped back to the week's first entry; jump
        // whole weeks from there.
        self.current =
            self.current.add_days(7 * i64::from(self.interval()));
        true
    }

    fn next_month(&mut self) -> bool {
        if !self.next_hour() {
            return false;
        }
        let mut wrapped = false;
        let mut year = self.current.year();
        let mut month = self.current.month();
        let mut day = i16::from(self.current.day());
        let mut months_scanned = 0i64;
        loop {
            day += 1;
            if day > i16::from(days_in_month(year, month)) {
                let next = i64::from(month) - 1 + i64::from(self.interval());
                year = i32::try_from(i64::from(year) + next.div_euclid(12))
                    .expect("year out of range");
                month = i8::try_from(next.rem_euclid(12) + 1).unwrap();
                day = 0;
                wrapped = true;
                months_scanned += 1;
                if months_scanned > GREGORIAN_CYCLE_YEARS * 12 {
                    self.dead = true;
                    return true;
                }
                continue;
            }
            let day = i8::try_from(day).unwrap();
            if self.month_day_matches(year, month, day) {
                self.current.set_year_month_day(year, month, day);
                return wrapped;
            }
        }
    }

    fn next_year(&mut self) -> bool {
        if !self.next_hour() {
            return false;
        }
        self.days_idx += 1;
        if self.days_idx >= self.days.len() {
            self.days_idx = 0;
            let mut year = self.current.year();
            let mut attempts = 0i64;
            loop {
                year = year
                    .checked_add(self.interval())
                    .expect("year out of range");
                self.days = self.expand_year_days(year);
                if !self.days.is_empty() {
                    break;
                }
                attempts += 1;
                if attempts > GREGORIAN_CYCLE_YEARS {
                    self.dead = true;
                    return true;
                }
            }
            log::trace!(
                "expanded {} selected days for year `{year}`",
                self.days.len(),
            );
            self.current = self.current.with_year_doy(year, self.days[0]);
            return true;
        }
        let doy = self.days[self.days_idx];
        self.current = self.current.with_year_doy(self.current.year(), doy);
        true
    }

    fn add_seconds(&mut self, n: i64) {
        let total = i64::from(self.current.second()) + n;
        self.current
            .set_second(i8::try_from(total.rem_euclid(60)).unwrap());
        let carry = total.div_euclid(60);
        if carry > 0 {
            self.add_minutes(carry);
        }
    }

    fn add_minutes(&mut self, n: i64) {
        let total = i64::from(self.current.minute()) + n;
        self.current
            .set_minute(i8::try_from(total.rem_euclid(60)).unwrap());
        let carry = total.div_euclid(60);
        if carry > 0 {
            self.add_hours(carry);
        }
    }

    fn add_hours(&mut self, n: i64) {
        let total = i64::from(self.current.hour()) + n;
        self.current.set_hour(i8::try_from(total.rem_euclid(24)).unwrap());
        let carry = total.div_euclid(24);
        if carry > 0 {
            self.current = self.current.add_days(carry);
        }
    }

    /// Whether the given day of the given month is one the rule's day
    /// selecting data picks. BYDAY entries take precedence over month day
    /// stepping; a BYDAY entry's ordinal counts occurrences of its weekday
    /// within the month, from the end when negative. A BYMONTHDAY list the
    /// caller supplied always constrains, even alongside BYDAY.
    fn month_day_matches(&self, year: i32, month: i8, day: i8) -> bool {
        let dim = days_in_month(year, month);
        if !self.by_week_day.is_empty() {
            let weekday = weekday_of(year, month, day);
            let matched = self.by_week_day.iter().any(|entry| {
                entry.weekday == weekday
                    && match entry.nth {
                        None => true,
                        Some(n) if n > 0 => (day - 1) / 7 + 1 == n,
                        Some(n) => (dim - day) / 7 + 1 == -n,
                    }
            });
            if !matched {
                return false;
            }
            let supplied = &self.rule.inner().by_month_day;
            supplied.is_empty() || month_day_member(supplied, day, dim)
        } else {
            month_day_member(&self.by_month_day, day, dim)
        }
    }

    /// Builds the sorted day-of-year list for one calendar year of a
    /// YEARLY rule. Exactly one case applies; the rule validation already
    /// rejected every ambiguous combination. Selections that do not exist
    /// in the target year (February 29, a 53rd week, day 366) are skipped,
    /// never clamped, which is how rules come to skip whole years.
    fn expand_year_days(&self, year: i32) -> Vec<i16> {
        let r = self.rule.inner();
        let mut days: Vec<i16> = Vec::new();
        if !r.by_year_day.is_empty() {
            let diy = days_in_year(year);
            for &yd in r.by_year_day.iter() {
                let resolved = if yd > 0 { yd } else { diy + yd + 1 };
                if 1 <= resolved && resolved <= diy {
                    days.push(resolved);
                }
            }
        } else if !r.by_week.is_empty() {
            // Weeks of the year, narrowed to the listed weekdays when
            // BYDAY is present. A week with no BYDAY expands to all seven
            // of its days; python-dateutil reads the RFC the same way.
            let start = week_start_of_year(self.week_start(), year);
            let in_week_one =
                CalendarTime::date(year, 1, 4).expect("january 4 exists");
            let weeks_in_year =
                WeekDate::from_date(self.week_start(), &in_week_one)
                    .weeks_in_year();
            for &wn in r.by_week.iter() {
                let week = if wn > 0 { wn } else { weeks_in_year + wn + 1 };
                if week < 1 || week > weeks_in_year {
                    continue;
                }
                let first = start.add_days(i64::from(week - 1) * 7);
                for offset in 0..7 {
                    let date = first.add_days(offset);
                    if date.year() != year {
                        continue;
                    }
                    if !r.by_week_day.is_empty()
                        && !r
                            .by_week_day
                            .iter()
                            .any(|e| e.weekday == date.weekday())
                    {
                        continue;
                    }
                    days.push(date.day_of_year());
                }
            }
        } else if !r.by_week_day.is_empty() {
            if !r.by_month.is_empty() {
                // Listed months crossed with BYDAY entries, ordinals
                // counted within each month.
                for &month in r.by_month.iter() {
                    for day in 1..=days_in_month(year, month) {
                        if self.month_day_matches(year, month, day) {
                            days.push(doy_of(year, month, day));
                        }
                    }
                }
            } else {
                // BYDAY across the whole year, ordinals counted within
                // the year.
                let diy = days_in_year(year);
                let first_weekday = weekday_of(year, 1, 1);
                let last_weekday = weekday_of(year, 12, 31);
                for entry in r.by_week_day.iter() {
                    let first_doy =
                        i16::from(entry.weekday.since(first_weekday)) + 1;
                    match entry.nth {
                        None => {
                            let mut doy = first_doy;
                            while doy <= diy {
                                days.push(doy);
                                doy += 7;
                            }
                        }
                        Some(n) if n > 0 => {
                            let doy = first_doy + (i16::from(n) - 1) * 7;
                            if doy <= diy {
                                days.push(doy);
                            }
                        }
                        Some(n) => {
                            let back =
                                i16::from(last_weekday.since(entry.weekday));
                            let doy =
                                diy - back - (i16::from(-n) - 1) * 7;
                            if doy >= 1 {
                                days.push(doy);
                            }
                        }
                    }
                }
                if !r.by_month_day.is_empty() {
                    // An explicit BYMONTHDAY still constrains, which is
                    // what makes "every Friday the 13th" expressible.
                    let template =
                        CalendarTime::date(year, 1, 1).expect("january 1");
                    days.retain(|&doy| {
                        let date = template.with_year_doy(year, doy);
                        month_day_member(
                            &r.by_month_day,
                            date.day(),
                            days_in_month(year, date.month()),
                        )
                    });
                }
            }
        } else if !self.by_month_day.is_empty() {
            // Listed months crossed with listed month days. Thanks to
            // seeding, a plain YEARLY rule lands here with the anchor's
            // month and day as the single entry of each list.
            for &month in self.by_month.iter() {
                let dim = days_in_month(year, month);
                for &md in self.by_month_day.iter() {
                    let day = if md > 0 { md } else { dim + md + 1 };
                    if 1 <= day && day <= dim {
                        days.push(doy_of(year, month, day));
                    }
                }
            }
        } else {
            // Not reachable through the public constructor, which always
            // seeds the month day list at YEARLY frequency. Kept as the
            // fallback: the first day of each listed month.
            for &month in self.by_month.iter() {
                days.push(doy_of(year, month, 1));
            }
        }
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Applies every contracting rule to a generated candidate. The
    /// candidate's derived values (weekday, week number, day of year) are
    /// computed from the candidate itself, so the membership tests are
    /// real ones.
    fn passes_contracting_rules(&self, t: &CalendarTime) -> bool {
        let r = self.rule.inner();
        for field in ByField::ALL {
            match classify(self.freq(), field) {
                Classification::Expand => continue,
                Classification::Illegal => {
                    // Validation left these lists empty; anything else is
                    // a bug worth dying over.
                    assert!(
                        self.rule_list_is_empty(field),
                        "illegal BY-field combination survived validation",
                    );
                    continue;
                }
                Classification::Contract => {}
            }
            let ok = match field {
                ByField::Second => {
                    r.by_second.is_empty()
                        || r.by_second.binary_search(&t.second()).is_ok()
                }
                ByField::Minute => {
                    r.by_minute.is_empty()
                        || r.by_minute.binary_search(&t.minute()).is_ok()
                }
                ByField::Hour => {
                    r.by_hour.is_empty()
                        || r.by_hour.binary_search(&t.hour()).is_ok()
                }
                ByField::WeekDay => {
                    r.by_week_day.is_empty()
                        || r
                            .by_week_day
                            .iter()
                            .any(|e| e.weekday == t.weekday())
                }
                ByField::MonthDay => {
                    r.by_month_day.is_empty()
                        || month_day_member(
                            &r.by_month_day,
                            t.day(),
                            days_in_month(t.year(), t.month()),
                        )
                }
                ByField::YearDay => {
                    r.by_year_day.is_empty() || {
                        let doy = t.day_of_year();
                        let negative = doy - 1 - days_in_year(t.year());
                        r.by_year_day.binary_search(&doy).is_ok()
                            || r.by_year_day.binary_search(&negative).is_ok()
                    }
                }
                ByField::WeekNo => {
                    r.by_week.is_empty() || {
                        let wd = WeekDate::from_date(r.week_start, t);
                        r.by_week.iter().any(|&v| {
                            let resolved = if v > 0 {
                                v
                            } else {
                                wd.weeks_in_year() + v + 1
                            };
                            resolved == wd.week()
                        })
                    }
                }
                ByField::Month => {
                    r.by_month.is_empty()
                        || r.by_month.binary_search(&t.month()).is_ok()
                }
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn rule_list_is_empty(&self, field: ByField) -> bool {
        let r = self.rule.inner();
        match field {
            ByField::Second => r.by_second.is_empty(),
            ByField::Minute => r.by_minute.is_empty(),
            ByField::Hour => r.by_hour.is_empty(),
            ByField::WeekDay => r.by_week_day.is_empty(),
            ByField::MonthDay => r.by_month_day.is_empty(),
            ByField::YearDay => r.by_year_day.is_empty(),
            ByField::WeekNo => r.by_week.is_empty(),
            ByField::Month => r.by_month.is_empty(),
        }
    }

    /// The BYSETPOS grouping key for a candidate: which interval of the
    /// recurrence frequency it falls into.
    fn period_key(&self, t: &CalendarTime) -> PeriodKey {
        match self.freq() {
            Frequency::Yearly => (t.year(), 0, 0, 0, 0, 0),
            Frequency::Monthly => (t.year(), i16::from(t.month()), 0, 0, 0, 0),
            Frequency::Weekly => {
                let wd = WeekDate::from_date(self.week_start(), t);
                (wd.year(), i16::from(wd.week()), 0, 0, 0, 0)
            }
            Frequency::Daily => {
                (t.year(), i16::from(t.month()), t.day(), 0, 0, 0)
            }
            Frequency::Hourly => {
                (t.year(), i16::from(t.month()), t.day(), t.hour(), 0, 0)
            }
            Frequency::Minutely => (
                t.year(),
                i16::from(t.month()),
                t.day(),
                t.hour(),
                t.minute(),
                0,
            ),
            Frequency::Secondly => (
                t.year(),
                i16::from(t.month()),
                t.day(),
                t.hour(),
                t.minute(),
                t.second(),
            ),
        }
    }

    /// Returns true if and only if the given `position` in an ordered set
    /// of length `len` satisfies the BYSETPOS rule.
    fn satisfies_by_set_pos(&self, position: usize, len: usize) -> bool {
        let by_set_pos = &self.rule.inner().by_set_pos;
        let Ok(position) = i32::try_from(position) else { return false };
        let Ok(len) = i32::try_from(len) else { return false };
        let positive = position + 1;
        // Minus 1 because -1 is the last occurrence of a period, and the
        // positions of a set are 1-indexed according to RFC 5545.
        let negative = positive - 1 - len;
        by_set_pos.binary_search(&positive).is_ok()
            || by_set_pos.binary_search(&negative).is_ok()
    }

    /// Drains the finished BYSETPOS batch into the selected occurrences.
    fn select_batch(&mut self) -> Vec<CalendarTime> {
        let len = self.batch.len();
        let selected: Vec<CalendarTime> = self
            .batch
            .iter()
            .copied()
            .enumerate()
            .filter(|&(position, _)| self.satisfies_by_set_pos(position, len))
            .map(|(_, t)| t)
            .collect();
        self.batch.clear();
        selected
    }

    /// Pops queued occurrences, skipping any that iteration has already
    /// moved past. (A BYSETPOS batch counts positions over the whole
    /// period, so it can select occurrences at or before the anchor.)
    fn pop_pending(&mut self) -> Option<CalendarTime> {
        while let Some(queued) = self.pending.pop_front() {
            let stale = match self.last {
                Some(prev) => queued <= prev,
                None => queued < self.dtstart,
            };
            if !stale {
                return Some(queued);
            }
        }
        None
    }

    /// Flushes any in-progress BYSETPOS batch, then either emits a queued
    /// occurrence or ends iteration for good.
    fn drain_or_done(&mut self) -> Option<CalendarTime> {
        if !self.batch.is_empty() {
            let selected = self.select_batch();
            self.pending.extend(selected);
        }
        match self.pop_pending() {
            Some(queued) => self.emit(queued),
            None => {
                self.done = true;
                None
            }
        }
    }

    /// Surfaces one occurrence, applying the UNTIL bound and bumping the
    /// occurrence counter.
    fn emit(&mut self, t: CalendarTime) -> Option<CalendarTime> {
        if let Some(until) = self.rule.inner().until {
            if t > until {
                self.done = true;
                return None;
            }
        }
        self.occurrences += 1;
        self.last = Some(t);
        Some(t)
    }
}

impl Iterator for RecurrenceIter {
    type Item = CalendarTime;

    fn next(&mut self) -> Option<CalendarTime> {
        if self.done {
            return None;
        }
        if let Some(count) = self.rule.inner().count {
            if self.occurrences >= u64::from(count) {
                self.done = true;
                return None;
            }
        }
        if let Some(queued) = self.pop_pending() {
            return self.emit(queued);
        }
        // The anchor is always the first occurrence, whether or not it
        // matches the rule.
        if self.occurrences == 0 {
            let dtstart = self.dtstart;
            return self.emit(dtstart);
        }
        let guard_base = i64::from(self.current.year());
        loop {
            if self.dead {
                return self.drain_or_done();
            }
            let candidate = if self.primed {
                self.primed = false;
                self.current
            } else {
                self.advance();
                if self.dead {
                    return self.drain_or_done();
                }
                self.current
            };
            if i64::from(candidate.year()) - guard_base
                > GREGORIAN_CYCLE_YEARS
            {
                // One full Gregorian cycle with nothing accepted: the rule
                // selects nothing, ever again.
                self.dead = true;
                return self.drain_or_done();
            }
            if !self.passes_contracting_rules(&candidate) {
                continue;
            }
            if self.rule.inner().by_set_pos.is_empty() {
                // Nothing at or before the last surfaced occurrence is
                // ever surfaced again.
                let stale = match self.last {
                    Some(prev) => candidate <= prev,
                    None => candidate < self.dtstart,
                };
                if stale {
                    continue;
                }
                return self.emit(candidate);
            }
            // BYSETPOS: hold every candidate until its period completes,
            // then select by position within the period.
            let key = self.period_key(&candidate);
            if self.batch.is_empty() || self.batch_key == Some(key) {
                self.batch_key = Some(key);
                self.batch.push(candidate);
                continue;
            }
            let selected = self.select_batch();
            self.batch_key = Some(key);
            self.batch.push(candidate);
            self.pending.extend(selected);
            if let Some(queued) = self.pop_pending() {
                return self.emit(queued);
            }
        }
    }
}

impl std::iter::FusedIterator for RecurrenceIter {}

/// Whether `day` (of a month with `dim` days) appears in a BYMONTHDAY
/// list, which may name it positively or as a negative offset from the
/// month's end.
fn month_day_member(list: &[i8], day: i8, dim: i8) -> bool {
    // Minus 1 because -1 is the last day of the month, and the days of
    // the month are 1-indexed.
    let negative = day - 1 - dim;
    list.binary_search(&day).is_ok()
        || list.binary_search(&negative).is_ok()
}

/// Day-of-year of a known-valid date.
fn doy_of(year: i32, month: i8, day: i8) -> i16 {
    CalendarTime::date(year, month, day)
        .expect("caller validated the date")
        .day_of_year()
}
