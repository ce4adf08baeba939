//! Calendar arithmetic for rate requests: parsing, range validation and
//! business-day enumeration.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::RatesError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(text: &str) -> Result<NaiveDate, RatesError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| RatesError::MalformedDate {
        input: text.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Every Monday..Friday date within `start..=end`, ascending.
///
/// Public holidays are not excluded; the upstream simply publishes no rate
/// for them. Empty when `start > end`.
pub fn business_days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if !is_weekend(current) {
            days.push(current);
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn validate_range(start: NaiveDate, end: NaiveDate, max_days: i64) -> Result<(), RatesError> {
    if start > end {
        return Err(RatesError::InvertedRange { start, end });
    }
    let days = (end - start).num_days();
    if days > max_days {
        return Err(RatesError::RangeTooLarge { days, max_days });
    }
    Ok(())
}

/// Wall-clock seam so date defaults stay testable.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn yesterday(&self) -> NaiveDate {
        self.today() - Duration::days(1)
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn parse_and_format_round_trip() {
        for text in ["2021-01-01", "2024-02-29", "1999-12-31"] {
            assert_eq!(format_date(date(text)), text);
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["", "2021/01/01", "01-01-2021", "2021-13-01", "2021-02-30", "yesterday"] {
            assert!(matches!(
                parse_date(bad),
                Err(RatesError::MalformedDate { .. })
            ));
        }
    }

    #[test]
    fn business_days_skip_weekends_inclusive_both_ends() {
        // 2021-01-01 is a Friday, 01-09/01-10 the trailing weekend.
        let days = business_days_in_range(date("2021-01-01"), date("2021-01-10"));
        let expected: Vec<NaiveDate> = [
            "2021-01-01",
            "2021-01-04",
            "2021-01-05",
            "2021-01-06",
            "2021-01-07",
            "2021-01-08",
        ]
        .iter()
        .map(|d| date(d))
        .collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn business_days_empty_for_inverted_range() {
        assert!(business_days_in_range(date("2021-01-10"), date("2021-01-01")).is_empty());
    }

    #[test]
    fn weekend_only_range_has_no_business_days() {
        assert!(business_days_in_range(date("2021-01-02"), date("2021-01-03")).is_empty());
    }

    #[test]
    fn single_weekday_range_contains_itself() {
        assert_eq!(
            business_days_in_range(date("2021-01-04"), date("2021-01-04")),
            vec![date("2021-01-04")]
        );
    }

    #[test]
    fn validate_range_accepts_full_window() {
        let start = date("2021-01-01");
        assert!(validate_range(start, start, 93).is_ok());
        assert!(validate_range(start, start + Duration::days(93), 93).is_ok());
    }

    #[test]
    fn validate_range_rejects_inverted() {
        assert!(matches!(
            validate_range(date("2021-01-02"), date("2021-01-01"), 93),
            Err(RatesError::InvertedRange { .. })
        ));
    }

    #[test]
    fn validate_range_rejects_oversized() {
        let start = date("2021-01-01");
        assert!(matches!(
            validate_range(start, start + Duration::days(94), 93),
            Err(RatesError::RangeTooLarge { days: 94, max_days: 93 })
        ));
    }

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    #[test]
    fn yesterday_is_the_day_before_today() {
        let clock = FixedClock(date("2021-01-04"));
        assert_eq!(clock.yesterday(), date("2021-01-03"));
    }
}
