use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::goals::normalize::same_label;
use crate::plan::WeekKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("unknown week: {0}")]
    UnknownWeek(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarWeek {
    pub key: WeekKey,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Monday-to-Sunday weeks of one month, clipped to the month's first and last day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekCalendar {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<CalendarWeek>,
}

impl WeekCalendar {
    pub fn for_month(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last = next_first - Duration::days(1);

        let mut weeks = Vec::new();
        let mut start = first;
        while start <= last {
            let to_sunday = 6 - i64::from(start.weekday().num_days_from_monday());
            let end = (start + Duration::days(to_sunday)).min(last);
            let n = weeks.len() + 1;
            weeks.push(CalendarWeek {
                key: WeekKey::nth(n),
                label: format!(
                    "{n}주차 ({}/{}~{}/{})",
                    start.month(),
                    start.day(),
                    end.month(),
                    end.day()
                ),
                start,
                end,
            });
            start = end + Duration::days(1);
        }

        Ok(Self { year, month, weeks })
    }

    pub fn keys(&self) -> Vec<WeekKey> {
        self.weeks.iter().map(|w| w.key.clone()).collect()
    }

    pub fn contains(&self, key: &WeekKey) -> bool {
        self.weeks.iter().any(|w| &w.key == key)
    }

    pub fn label_for(&self, key: &WeekKey) -> Option<&str> {
        self.weeks
            .iter()
            .find(|w| &w.key == key)
            .map(|w| w.label.as_str())
    }

    pub fn key_for_label(&self, label: &str) -> Option<&WeekKey> {
        self.weeks
            .iter()
            .find(|w| same_label(&w.label, label))
            .map(|w| &w.key)
    }

    /// Accepts a week key (`week2`), its display label, or an ISO date
    /// (`2024-10-16`) falling inside the month.
    pub fn resolve(&self, input: &str) -> Result<WeekKey, CalendarError> {
        if let Ok(key) = input.parse::<WeekKey>() {
            if self.contains(&key) {
                return Ok(key);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
            if let Some(week) = self.week_containing(date) {
                return Ok(week.key.clone());
            }
        }
        self.key_for_label(input)
            .cloned()
            .ok_or_else(|| CalendarError::UnknownWeek(input.to_string()))
    }

    pub fn week_containing(&self, date: NaiveDate) -> Option<&CalendarWeek> {
        self.weeks.iter().find(|w| w.start <= date && date <= w.end)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::plan::calendar::{CalendarError, WeekCalendar};
    use crate::plan::WeekKey;

    #[test]
    fn october_2024_matches_sheet_labels() {
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let labels: Vec<_> = calendar.weeks.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "1주차 (10/1~10/6)",
                "2주차 (10/7~10/13)",
                "3주차 (10/14~10/20)",
                "4주차 (10/21~10/27)",
                "5주차 (10/28~10/31)",
            ]
        );
        assert_eq!(calendar.keys().last(), Some(&WeekKey::nth(5)));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let calendar = WeekCalendar::for_month(2025, 12).expect("valid month");
        let last = calendar.weeks.last().expect("at least one week");
        assert_eq!(last.end, NaiveDate::from_ymd_opt(2025, 12, 31).expect("date"));
    }

    #[test]
    fn labels_and_keys_map_both_ways() {
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let key = calendar
            .key_for_label("3주차  (10/14~10/20)")
            .expect("label resolves");
        assert_eq!(key, &WeekKey::nth(3));
        assert_eq!(calendar.label_for(key), Some("3주차 (10/14~10/20)"));
        assert_eq!(calendar.resolve("WEEK2").expect("key"), WeekKey::nth(2));
        assert_eq!(
            calendar.resolve("week9"),
            Err(CalendarError::UnknownWeek("week9".to_string()))
        );
        let day = NaiveDate::from_ymd_opt(2024, 10, 16).expect("date");
        assert_eq!(
            calendar.week_containing(day).map(|w| w.key.clone()),
            Some(WeekKey::nth(3))
        );
    }

    #[test]
    fn resolves_dates_inside_the_month() {
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        assert_eq!(calendar.resolve("2024-10-28").expect("date"), WeekKey::nth(5));
        assert_eq!(calendar.resolve(" 2024-10-01 ").expect("date"), WeekKey::nth(1));
        assert_eq!(
            calendar.resolve("2024-11-01"),
            Err(CalendarError::UnknownWeek("2024-11-01".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_months() {
        assert_eq!(
            WeekCalendar::for_month(2024, 13),
            Err(CalendarError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
    }
}
