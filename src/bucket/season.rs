//! Season classifier

use chrono::Datelike;

use crate::models::Season;

/// Season of a date, grouped by calendar quarter
pub fn season<D: Datelike>(date: &D) -> Season {
    match date.month() {
        1..=3 => Season::Winter,
        4..=6 => Season::Spring,
        7..=9 => Season::Summer,
        _ => Season::Autumn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, m, 15).unwrap()
    }

    #[test]
    fn test_every_month_has_a_season() {
        let expected = [
            Season::Winter,
            Season::Winter,
            Season::Winter,
            Season::Spring,
            Season::Spring,
            Season::Spring,
            Season::Summer,
            Season::Summer,
            Season::Summer,
            Season::Autumn,
            Season::Autumn,
            Season::Autumn,
        ];

        for (idx, season_for_month) in expected.iter().enumerate() {
            assert_eq!(season(&month(idx as u32 + 1)), *season_for_month);
        }
    }

    #[test]
    fn test_datetime_input() {
        let ts = NaiveDate::from_ymd_opt(2019, 7, 4).unwrap().and_hms_opt(20, 0, 0).unwrap();
        assert_eq!(season(&ts), Season::Summer);
    }
}
