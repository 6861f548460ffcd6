// Property tests for drag-and-drop minute snapping

use proptest::prelude::*;
use skej::services::placement::{snap_minute, DAY_SLOT_HEIGHT, WEEK_SLOT_HEIGHT};

proptest! {
    /// Property: the snapped minute is always a quarter hour between 0 and 45
    #[test]
    fn prop_snap_is_quarter_hour(
        y in -200.0f32..400.0,
        slot in prop_oneof![Just(DAY_SLOT_HEIGHT), Just(WEEK_SLOT_HEIGHT), 1.0f32..200.0],
    ) {
        let minute = snap_minute(y, slot);
        prop_assert!(minute <= 45);
        prop_assert_eq!(minute % 15, 0);
    }

    /// Property: dropping lower in the slot never moves the task earlier
    #[test]
    fn prop_snap_is_monotonic(a in 0.0f32..60.0, b in 0.0f32..60.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(snap_minute(low, DAY_SLOT_HEIGHT) <= snap_minute(high, DAY_SLOT_HEIGHT));
    }

    /// Property: in the day view one pixel is one minute, so the snap is
    /// within 7 minutes of the pointer until the clamp at 45
    #[test]
    fn prop_day_snap_is_nearest_quarter(y in 0u32..53) {
        let minute = snap_minute(y as f32, DAY_SLOT_HEIGHT) as i64;
        prop_assert!((minute - y as i64).abs() <= 7);
    }
}
