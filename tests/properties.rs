use recur::{CalendarTime, Frequency, RecurrenceRule, Weekday};

fn dt(
    year: i32,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
) -> CalendarTime {
    CalendarTime::new(year, month, day, hour, minute, second).unwrap()
}

/// A spread of rules across every frequency and BY-field shape, each with
/// its anchor. Used to check properties that must hold for any rule.
fn zoo() -> Vec<(RecurrenceRule, CalendarTime)> {
    let anchor = dt(2024, 1, 2, 9, 30, 15);
    vec![
        (
            RecurrenceRule::builder(Frequency::Daily).build().unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Daily)
                .interval(7)
                .build()
                .unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Daily)
                .by_week_day([Weekday::Monday, Weekday::Thursday])
                .build()
                .unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Weekly)
                .interval(2)
                .week_start(Weekday::Sunday)
                .by_week_day([Weekday::Tuesday, Weekday::Saturday])
                .build()
                .unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Monthly)
                .by_month_day([1, 15, -1])
                .build()
                .unwrap(),
            dt(2024, 1, 1, 9, 30, 15),
        ),
        (
            RecurrenceRule::builder(Frequency::Monthly)
                .by_week_day([(2, Weekday::Tuesday), (-1, Weekday::Friday)])
                .build()
                .unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Monthly)
                .by_week_day(Weekday::Monday..=Weekday::Friday)
                .by_set_position([1, -1])
                .build()
                .unwrap(),
            dt(2024, 1, 1, 9, 30, 15),
        ),
        (
            RecurrenceRule::builder(Frequency::Yearly)
                .by_month([2, 8])
                .by_month_day([29, -1])
                .build()
                .unwrap(),
            dt(2024, 2, 29, 9, 30, 15),
        ),
        (
            RecurrenceRule::builder(Frequency::Yearly)
                .by_year_day([1, 180, -1])
                .build()
                .unwrap(),
            dt(2024, 1, 1, 9, 30, 15),
        ),
        (
            RecurrenceRule::builder(Frequency::Yearly)
                .by_week([20, -1])
                .build()
                .unwrap(),
            dt(2024, 5, 13, 9, 30, 15),
        ),
        (
            RecurrenceRule::builder(Frequency::Hourly)
                .interval(5)
                .build()
                .unwrap(),
            anchor,
        ),
        (
            RecurrenceRule::builder(Frequency::Minutely)
                .interval(20)
                .by_hour([9, 10, 11])
                .build()
                .unwrap(),
            dt(2024, 1, 2, 9, 0, 0),
        ),
        (
            RecurrenceRule::builder(Frequency::Secondly)
                .interval(40)
                .build()
                .unwrap(),
            anchor,
        ),
    ]
}

#[test]
fn occurrences_never_precede_the_anchor() {
    for (rule, anchor) in zoo() {
        for time in rule.iter_from(anchor).unwrap().take(60) {
            assert!(
                time >= anchor,
                "occurrence {time} precedes anchor {anchor}",
            );
        }
    }
}

#[test]
fn occurrences_strictly_increase() {
    for (rule, anchor) in zoo() {
        let times: Vec<CalendarTime> =
            rule.iter_from(anchor).unwrap().take(60).collect();
        for pair in times.windows(2) {
            assert!(
                pair[0] < pair[1],
                "{} does not precede {} (rule {rule:?})",
                pair[0],
                pair[1],
            );
        }
    }
}

#[test]
fn five_daily_occurrences_then_exhaustion() {
    let rule =
        RecurrenceRule::builder(Frequency::Daily).count(5).build().unwrap();
    let mut it = rule.iter_from(dt(2024, 1, 1, 9, 0, 0)).unwrap();
    for day in 1..=5 {
        assert_eq!(it.next(), Some(dt(2024, 1, day, 9, 0, 0)));
    }
    assert_eq!(it.next(), None);
}

#[test]
fn count_yields_exactly_count_occurrences() {
    for count in [1u32, 2, 7, 29] {
        let rule = RecurrenceRule::builder(Frequency::Daily)
            .count(count)
            .build()
            .unwrap();
        let mut it = rule.iter_from(dt(2024, 1, 2, 9, 30, 15)).unwrap();
        let times: Vec<CalendarTime> = it.by_ref().collect();
        assert_eq!(times.len(), usize::try_from(count).unwrap());
        assert_eq!(it.next(), None);
    }
}

#[test]
fn until_bounds_every_occurrence() {
    let until = dt(2024, 3, 1, 0, 0, 0);
    for (rule_builder, anchor) in [
        (RecurrenceRule::builder(Frequency::Daily), dt(2024, 1, 2, 9, 0, 0)),
        (RecurrenceRule::builder(Frequency::Weekly), dt(2024, 1, 2, 9, 0, 0)),
        (RecurrenceRule::builder(Frequency::Hourly), dt(2024, 2, 28, 9, 0, 0)),
    ] {
        let mut builder = rule_builder;
        let rule = builder.until(until).build().unwrap();
        let times: Vec<CalendarTime> =
            rule.iter_from(anchor).unwrap().collect();
        assert!(!times.is_empty());
        assert!(times.iter().all(|t| *t <= until));
    }
}

/// Every yielded occurrence is a real calendar date: converting through
/// Jiff succeeds, and the weekday-selecting rules agree with Jiff's
/// weekday computation.
#[test]
fn weekday_rules_agree_with_jiff() {
    let rule = RecurrenceRule::builder(Frequency::Daily)
        .by_week_day([Weekday::Monday, Weekday::Thursday])
        .build()
        .unwrap();
    for time in rule.iter_from(dt(2024, 1, 4, 9, 0, 0)).unwrap().take(120) {
        let civil = jiff::civil::DateTime::try_from(time).unwrap();
        assert!(
            matches!(
                civil.weekday(),
                jiff::civil::Weekday::Monday | jiff::civil::Weekday::Thursday,
            ),
            "{time} is not a Monday or Thursday",
        );
    }
}

#[test]
fn last_day_of_month_agrees_with_jiff() {
    let rule = RecurrenceRule::builder(Frequency::Monthly)
        .by_month_day(-1)
        .build()
        .unwrap();
    for time in rule.iter_from(dt(2023, 1, 31, 12, 0, 0)).unwrap().take(100) {
        let civil = jiff::civil::DateTime::try_from(time).unwrap();
        assert_eq!(
            civil.day(),
            civil.days_in_month(),
            "{time} is not the last day of its month",
        );
    }
}

#[test]
fn leap_day_rule_yields_only_leap_years() {
    let rule = RecurrenceRule::builder(Frequency::Yearly)
        .by_month(2)
        .by_month_day(29)
        .build()
        .unwrap();
    let times: Vec<CalendarTime> = rule
        .iter_from(dt(2024, 2, 29, 9, 0, 0))
        .unwrap()
        .take(25)
        .collect();
    assert_eq!(times.len(), 25);
    for time in &times {
        // Every yielded date must exist in Jiff's calendar too.
        let civil = jiff::civil::DateTime::try_from(*time).unwrap();
        assert_eq!((civil.month(), civil.day()), (2, 29));
    }
    // 2100 is not a leap year; the rule must step straight over it.
    assert!(times.iter().all(|t| t.year() != 2100));
    assert!(times.iter().any(|t| t.year() == 2096));
    assert!(times.iter().any(|t| t.year() == 2104));
}

#[test]
fn week_number_rules_agree_with_jiff_iso_weeks() {
    // With weeks starting on Monday, our week numbers are ISO week
    // numbers, which Jiff can check directly.
    let rule = RecurrenceRule::builder(Frequency::Yearly)
        .by_week([20, -1])
        .build()
        .unwrap();
    for time in rule.iter_from(dt(2024, 5, 13, 9, 0, 0)).unwrap().take(60) {
        let civil = jiff::civil::DateTime::try_from(time).unwrap();
        let iso = civil.date().iso_week_date();
        // December 28 always falls in the last ISO week of its year.
        let last_week = jiff::civil::date(iso.year(), 12, 28)
            .iso_week_date()
            .week();
        assert!(
            iso.week() == 20 || iso.week() == last_week,
            "{time} falls in ISO week {week}, expected 20 or the last",
            week = iso.week(),
        );
    }
}
