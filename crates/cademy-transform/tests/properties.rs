//! Property tests for age derivation and literal parsing.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

use cademy_model::AddressPolicy;
use cademy_transform::{age_group, age_on, parse_literal, split_address};

fn date() -> impl Strategy<Value = NaiveDate> {
    // 1900-01-01 through roughly 2099
    (0u64..72_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1900, 1, 1)
            .and_then(|base| base.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

proptest! {
    #[test]
    fn age_group_brackets_age(age in 0i64..150) {
        let group = age_group(age);
        prop_assert_eq!(group % 10, 0);
        prop_assert!(group <= age && age < group + 10);
    }

    #[test]
    fn age_increments_on_birthday(dob in date(), years in 0i32..100) {
        // Feb 29 birthdays have no anniversary in most years.
        prop_assume!(!(dob.month() == 2 && dob.day() == 29));
        let birthday = dob.with_year(dob.year() + years).unwrap();
        prop_assert_eq!(age_on(dob, birthday), i64::from(years));
        if let Some(eve) = birthday.pred_opt() {
            if eve >= dob {
                prop_assert_eq!(age_on(dob, eve), i64::from(years) - 1);
            }
        }
    }

    #[test]
    fn age_is_never_negative(dob in date(), later in 0u64..40_000) {
        let reference = dob.checked_add_days(Days::new(later)).unwrap();
        prop_assert!(age_on(dob, reference) >= 0);
    }

    #[test]
    fn literal_parser_never_panics(text in "\\PC{0,64}") {
        let _ = parse_literal(&text);
    }

    #[test]
    fn lenient_split_always_yields_four_parts(text in "[a-z ,]{0,40}") {
        let split = split_address(&text, AddressPolicy::Lenient).unwrap();
        prop_assert_eq!(split.parts.len(), 4);
        prop_assert_eq!(split.segments, text.split(',').count());
    }
}
