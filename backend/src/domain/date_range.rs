//! Date-range expansion for the planner's day columns.
//!
//! Works purely on calendar dates; time-of-day and offsets are stripped
//! before any comparison so two values naming the same day are identical.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::{parse_calendar_date, Trip};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Every calendar day from `start` to `end`, both inclusive
///
/// An inverted range (`end < start`) yields an empty list.
pub fn expand_date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Same as [`expand_date_range`] for date or date-time strings
///
/// Unparseable input yields an empty list.
pub fn expand_date_strings(start: &str, end: &str) -> Vec<NaiveDate> {
    match (parse_calendar_date(start), parse_calendar_date(end)) {
        (Some(start), Some(end)) => expand_date_range(start, end),
        _ => Vec::new(),
    }
}

/// Parse a date-time as entered in forms or stored by the app
///
/// Offsets are normalised to UTC; a bare date reads as midnight.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| parse_calendar_date(value).and_then(|day| day.and_hms_opt(0, 0, 0)))
}

/// Planner columns for a trip
pub fn trip_days(trip: &Trip) -> Vec<NaiveDate> {
    expand_date_range(trip.start_date, trip.end_date)
}

/// Whole days from `start` to `end` (negative when inverted)
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_range_is_inclusive_and_contiguous() {
        let start = date("2024-02-27");
        let end = date("2024-03-02");

        let days = expand_date_range(start, end);

        assert_eq!(days.len() as i64, days_between(start, end) + 1);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        // Leap day included
        assert!(days.contains(&date("2024-02-29")));
        for pair in days.windows(2) {
            assert_eq!(days_between(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn test_single_day_range() {
        let day = date("2024-06-01");
        assert_eq!(expand_date_range(day, day), vec![day]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(expand_date_range(date("2024-06-02"), date("2024-06-01")).is_empty());
    }

    #[test]
    fn test_strings_with_time_component_land_on_same_days() {
        let from_dates = expand_date_strings("2024-01-01", "2024-01-03");
        let from_times = expand_date_strings("2024-01-01T23:00:00+02:00", "2024-01-03T00:30");

        assert_eq!(from_dates, from_times);
        assert_eq!(from_dates.len(), 3);
    }

    #[test]
    fn test_parse_date_time_formats() {
        let expected = date("2024-01-01").and_hms_opt(8, 30, 0);

        assert_eq!(parse_date_time("2024-01-01T08:30"), expected);
        assert_eq!(parse_date_time("2024-01-01T08:30:00"), expected);
        assert_eq!(parse_date_time("2024-01-01 08:30"), expected);
        assert_eq!(parse_date_time("2024-01-01T10:30:00+02:00"), expected);
        assert_eq!(parse_date_time("2024-01-01"), date("2024-01-01").and_hms_opt(0, 0, 0));
        assert_eq!(parse_date_time("tomorrow"), None);
    }

    #[test]
    fn test_unparseable_strings_yield_empty() {
        assert!(expand_date_strings("soon", "2024-01-03").is_empty());
    }
}
