// Property tests for week ranges

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use skej::utils::date::{in_week, week_dates, week_start, ViewRange};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset))
}

proptest! {
    /// Property: every week starts on a Sunday no more than six days earlier
    #[test]
    fn prop_week_starts_on_sunday(date in any_date()) {
        let start = week_start(date);
        prop_assert_eq!(start.weekday(), Weekday::Sun);
        prop_assert!(start <= date);
        prop_assert!(date - start <= Duration::days(6));
    }

    /// Property: a week has seven consecutive dates, all inside the week
    #[test]
    fn prop_week_dates_are_consecutive(date in any_date()) {
        let start = week_start(date);
        let dates = week_dates(start);
        prop_assert_eq!(dates.len(), 7);
        for (i, d) in dates.iter().enumerate() {
            prop_assert_eq!(*d, start + Duration::days(i as i64));
            prop_assert!(in_week(*d, start));
        }
        prop_assert!(!in_week(start + Duration::days(7), start));
        prop_assert!(!in_week(start - Duration::days(1), start));
    }

    /// Property: next then previous returns to the same range
    #[test]
    fn prop_navigation_round_trips(date in any_date(), week in any::<bool>()) {
        let range = if week { ViewRange::week_of(date) } else { ViewRange::day(date) };
        prop_assert_eq!(range.next().previous(), range);
        prop_assert!(range.contains(range.default_target()));
    }
}
