//! Time-of-day classifier
//!
//! Boundaries:
//! - overnight: `[00:00:00, 08:00:00)`
//! - daytime: `[08:00:00, 16:00:00]`
//! - nighttime: `(16:00:00, 24:00:00)`

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::models::Category;

/// First daytime instant, seconds after midnight
pub const DAYTIME_START_SECS: u32 = 8 * 3600;
/// Last daytime instant, seconds after midnight
pub const DAYTIME_END_SECS: u32 = 16 * 3600;

/// Map a time of day to its category
pub fn classify(time: NaiveTime) -> Category {
    let secs = time.num_seconds_from_midnight();

    if secs < DAYTIME_START_SECS {
        Category::Overnight
    } else if secs < DAYTIME_END_SECS || (secs == DAYTIME_END_SECS && time.nanosecond() == 0) {
        Category::Daytime
    } else {
        Category::Nighttime
    }
}

/// Map a timestamp to its category, ignoring the date
pub fn classify_datetime(timestamp: &NaiveDateTime) -> Category {
    classify(timestamp.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(at(0, 0, 0)), Category::Overnight);
        assert_eq!(classify(at(7, 59, 59)), Category::Overnight);
        assert_eq!(classify(at(8, 0, 0)), Category::Daytime);
        assert_eq!(classify(at(8, 1, 0)), Category::Daytime);
        assert_eq!(classify(at(16, 0, 0)), Category::Daytime);
        assert_eq!(classify(at(16, 0, 1)), Category::Nighttime);
        assert_eq!(classify(at(23, 59, 59)), Category::Nighttime);
    }

    #[test]
    fn test_sub_second_after_daytime_end() {
        let time = NaiveTime::from_hms_milli_opt(16, 0, 0, 500).unwrap();
        assert_eq!(classify(time), Category::Nighttime);
    }

    #[test]
    fn test_partition_covers_whole_day() {
        let mut counts = [0usize; 3];
        let mut previous = Category::Overnight;

        for secs in 0..86_400u32 {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
            let category = classify(time);
            // categories only ever advance through the day
            assert!(category >= previous);
            previous = category;

            let idx = <Category as crate::models::Bucket>::ALL.iter().position(|c| *c == category).unwrap();
            counts[idx] += 1;
        }

        assert_eq!(counts, [8 * 3600, 8 * 3600 + 1, 8 * 3600 - 1]);
        assert_eq!(counts.iter().sum::<usize>(), 86_400);
    }

    #[test]
    fn test_independent_of_date() {
        let a = NaiveDate::from_ymd_opt(2017, 3, 5).unwrap().and_hms_opt(2, 15, 0).unwrap();
        let b = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap().and_hms_opt(2, 15, 0).unwrap();
        assert_eq!(classify_datetime(&a), classify_datetime(&b));
        assert_eq!(classify_datetime(&a), Category::Overnight);
    }
}
