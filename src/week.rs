use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekError {
    #[error("invalid year-week '{0}', expected YYYY-Www")]
    InvalidFormat(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("date {0} falls outside ISO years 0000..=9999")]
    OutOfRange(NaiveDate),
}

/// ISO 8601 week identifier, rendered as `YYYY-Www`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearWeek {
    year: i32,
    week: u32,
}

impl YearWeek {
    pub fn new(year: i32, week: u32) -> Result<Self, WeekError> {
        if !(0..=9999).contains(&year) || !(1..=53).contains(&week) {
            return Err(WeekError::InvalidFormat(format!("{year}-W{week}")));
        }
        Ok(Self { year, week })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for YearWeek {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeekError::InvalidFormat(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        if year.len() != 4
            || week.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !week.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let week = week.parse().map_err(|_| invalid())?;
        Self::new(year, week).map_err(|_| invalid())
    }
}

impl Serialize for YearWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn current_year_week() -> Result<YearWeek, WeekError> {
    year_week_of(Local::now().date_naive())
}

/// The ISO year is the calendar year of the week's Thursday.
pub fn year_week_of(date: NaiveDate) -> Result<YearWeek, WeekError> {
    let iso = date.iso_week();
    YearWeek::new(iso.year(), iso.week()).map_err(|_| WeekError::OutOfRange(date))
}

/// Monday through Sunday of `week`.
pub fn dates_in_week(week: YearWeek) -> [NaiveDate; 7] {
    let jan1 = NaiveDate::from_ymd_opt(week.year, 1, 1).unwrap_or(NaiveDate::MIN);
    let simple = jan1 + Duration::days(i64::from(week.week - 1) * 7);
    let monday = match simple.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => {
            simple - Duration::days(i64::from(simple.weekday().num_days_from_monday()))
        }
        _ => simple + Duration::days(i64::from(7 - simple.weekday().num_days_from_monday())),
    };
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(raw: &str) -> Result<NaiveDate, WeekError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| WeekError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_years_day_2021_belongs_to_2020_w53() {
        assert_eq!(year_week_of(ymd(2021, 1, 1)).unwrap().to_string(), "2020-W53");
    }

    #[test]
    fn late_december_rolls_into_next_iso_year() {
        assert_eq!(year_week_of(ymd(2024, 12, 30)).unwrap().to_string(), "2025-W01");
        assert_eq!(year_week_of(ymd(2026, 1, 5)).unwrap().to_string(), "2026-W02");
    }

    #[test]
    fn dates_in_week_start_monday_and_are_consecutive() {
        let week: YearWeek = "2020-W53".parse().unwrap();
        let dates = dates_in_week(week);
        assert_eq!(dates[0], ymd(2020, 12, 28));
        assert_eq!(dates[6], ymd(2021, 1, 3));
        assert_eq!(dates[0].weekday(), Weekday::Mon);
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn dates_in_week_contains_the_date_it_came_from() {
        let mut date = ymd(2018, 12, 20);
        while date < ymd(2027, 1, 15) {
            let week = year_week_of(date).unwrap();
            assert!(dates_in_week(week).contains(&date), "{date} not in {week}");
            date += Duration::days(1);
        }
    }

    #[test]
    fn week_one_when_jan_first_is_friday_starts_next_monday() {
        let dates = dates_in_week("2021-W01".parse().unwrap());
        assert_eq!(date_key(dates[0]), "2021-01-04");
        assert_eq!(date_key(dates[6]), "2021-01-10");
    }

    #[test]
    fn year_week_of_rejects_years_that_cannot_round_trip() {
        let far = ymd(12000, 6, 15);
        assert_eq!(year_week_of(far), Err(WeekError::OutOfRange(far)));
        let edge = year_week_of(ymd(9999, 6, 15)).unwrap();
        assert_eq!(edge.to_string().parse::<YearWeek>(), Ok(edge));
    }

    #[test]
    fn parse_rejects_malformed_year_weeks() {
        for raw in ["2021-W1", "2021W01", "21-W01", "2021-W00", "2021-W54", "2021-Wab", "", "2021-W01x"] {
            assert!(
                matches!(raw.parse::<YearWeek>(), Err(WeekError::InvalidFormat(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn year_week_serializes_as_string() {
        let week: YearWeek = "2026-W07".parse().unwrap();
        assert_eq!(serde_json::to_string(&week).unwrap(), "\"2026-W07\"");
        let back: YearWeek = serde_json::from_str("\"2026-W07\"").unwrap();
        assert_eq!(back, week);
    }

    #[test]
    fn date_key_round_trip_and_rejection() {
        assert_eq!(parse_date_key("2023-10-27").unwrap(), ymd(2023, 10, 27));
        assert!(matches!(parse_date_key("2023-13-01"), Err(WeekError::InvalidDate(_))));
    }
}
