use crate::rule::Frequency;

/// The eight date/time BY-fields that participate in candidate generation
/// and filtering. BYSETPOS is absent on purpose: it selects among already
/// generated occurrences of a period and never classifies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ByField {
    Second,
    Minute,
    Hour,
    WeekDay,
    MonthDay,
    YearDay,
    WeekNo,
    Month,
}

impl ByField {
    pub(crate) const ALL: [ByField; 8] = [
        ByField::Second,
        ByField::Minute,
        ByField::Hour,
        ByField::WeekDay,
        ByField::MonthDay,
        ByField::YearDay,
        ByField::WeekNo,
        ByField::Month,
    ];
}

/// How a BY-field behaves at a given frequency.
///
/// An `Expand` field *generates* candidates: values come from enumerating
/// its list rather than from DTSTART/interval stepping. A `Contract` field
/// *filters*: the generated candidate's value for that unit must appear in
/// the list. `Illegal` combinations are rejected before iteration starts,
/// so hitting one during iteration is a bug.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Classification {
    Contract,
    Expand,
    Illegal,
}

/// The fixed classification table.
///
/// The rule of thumb: a field whose unit is finer than the frequency
/// expands, a field at or above the frequency contracts. The exceptions
/// are all in the middle rows. WEEKLY has no way to generate month days or
/// year days, so those are illegal. MONTHLY generates by week day and
/// month day, but week numbers and year days make no sense in a month.
/// YEARLY expands everything, which is what makes it the hard case.
pub(crate) fn classify(freq: Frequency, field: ByField) -> Classification {
    use self::{ByField::*, Classification::*};

    match freq {
        Frequency::Secondly => Contract,
        Frequency::Minutely => match field {
            Second => Expand,
            _ => Contract,
        },
        Frequency::Hourly => match field {
            Second | Minute => Expand,
            _ => Contract,
        },
        Frequency::Daily => match field {
            Second | Minute | Hour => Expand,
            _ => Contract,
        },
        Frequency::Weekly => match field {
            Second | Minute | Hour | WeekDay => Expand,
            MonthDay | YearDay => Illegal,
            WeekNo | Month => Contract,
        },
        Frequency::Monthly => match field {
            Second | Minute | Hour | WeekDay | MonthDay => Expand,
            YearDay | WeekNo => Illegal,
            Month => Contract,
        },
        Frequency::Yearly => Expand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQUENCIES: [Frequency; 7] = [
        Frequency::Secondly,
        Frequency::Minutely,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Every (frequency, field) pair must classify. The exhaustive match
    /// already guarantees this at compile time; this pins the shape of the
    /// table itself.
    #[test]
    fn table_shape() {
        for freq in FREQUENCIES {
            for field in ByField::ALL {
                let class = classify(freq, field);
                match freq {
                    // At YEARLY everything generates.
                    Frequency::Yearly => {
                        assert_eq!(class, Classification::Expand)
                    }
                    // At SECONDLY everything filters.
                    Frequency::Secondly => {
                        assert_eq!(class, Classification::Contract)
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn finer_units_expand() {
        assert_eq!(
            classify(Frequency::Daily, ByField::Hour),
            Classification::Expand,
        );
        assert_eq!(
            classify(Frequency::Hourly, ByField::Minute),
            Classification::Expand,
        );
        assert_eq!(
            classify(Frequency::Weekly, ByField::WeekDay),
            Classification::Expand,
        );
        assert_eq!(
            classify(Frequency::Monthly, ByField::MonthDay),
            Classification::Expand,
        );
    }

    #[test]
    fn coarser_units_contract() {
        assert_eq!(
            classify(Frequency::Daily, ByField::Month),
            Classification::Contract,
        );
        assert_eq!(
            classify(Frequency::Daily, ByField::WeekDay),
            Classification::Contract,
        );
        assert_eq!(
            classify(Frequency::Weekly, ByField::WeekNo),
            Classification::Contract,
        );
        assert_eq!(
            classify(Frequency::Hourly, ByField::Hour),
            Classification::Contract,
        );
    }

    #[test]
    fn impossible_generators_are_illegal() {
        assert_eq!(
            classify(Frequency::Weekly, ByField::MonthDay),
            Classification::Illegal,
        );
        assert_eq!(
            classify(Frequency::Weekly, ByField::YearDay),
            Classification::Illegal,
        );
        assert_eq!(
            classify(Frequency::Monthly, ByField::WeekNo),
            Classification::Illegal,
        );
        assert_eq!(
            classify(Frequency::Monthly, ByField::YearDay),
            Classification::Illegal,
        );
    }
}
