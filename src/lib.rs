/*!
An RFC 5545 recurrence rule expansion engine.

Given a recurrence rule (RRULE) and an anchor datetime (DTSTART), this
crate produces the lazy, ordered sequence of occurrence datetimes the rule
describes:

```
use recur::{CalendarTime, Frequency, RecurrenceRule};

fn example() -> anyhow::Result<()> {
    let rule = RecurrenceRule::builder(Frequency::Weekly)
        .interval(2)
        .by_week_day(recur::Weekday::Tuesday)
        .build()?;
    let dtstart = CalendarTime::new(2024, 1, 2, 9, 0, 0)?;
    for occurrence in rule.iter_from(dtstart)?.take(3) {
        println!("{occurrence}");
    }
    Ok(())
}
```

Everything operates on naive local time over the proleptic Gregorian
calendar. The pieces RFC 5545 builds around this engine are deliberately
out of scope: parsing content lines into rules belongs to a parser layer,
attaching meaning to time zones belongs to a VTIMEZONE layer (which is
itself a *consumer* of this engine, expanding STANDARD/DAYLIGHT
sub-components like any other recurring component), and the calendar
object model owns neither of them.

Rules that name neither `count` nor `until` describe infinite sequences;
bound them with [`Iterator::take`] or similar. Iteration never imposes a
hidden cutoff year: the only built-in stop besides COUNT/UNTIL is a proof
that a rule selects nothing ever again (the Gregorian calendar repeats
every 400 years, so 400 empty years settle it).
*/

pub use crate::{
    datetime::{
        CalendarTime, Weekday, days_in_month, days_in_year, is_leap_year,
    },
    iter::RecurrenceIter,
    rule::{
        ByWeekday, Frequency, IntoByWeekdayIter, IntoI8Iter, IntoI16Iter,
        IntoI32Iter, RecurrenceRule, RecurrenceRuleBuilder,
    },
    weekdate::{WeekDate, first_of_week},
};

mod classify;
mod datetime;
mod iter;
mod rule;
mod weekdate;
