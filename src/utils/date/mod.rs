// Date utility functions
// Week boundaries, range membership and display formatting for date keys

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Format used for schedule bucket keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns the Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_back = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(days_back)
}

/// Returns the seven consecutive dates beginning at `week_start`.
pub fn week_dates(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| week_start + Duration::days(i)).collect()
}

/// True iff `date` lies in `[week_start, week_start + 7 days)`.
pub fn in_week(date: NaiveDate, week_start: NaiveDate) -> bool {
    date >= week_start && date < week_start + Duration::days(7)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).ok()
}

/// Full English weekday name, e.g. "Monday".
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Long form used for day headers: "Monday, January 1, 2024".
pub fn format_date_display(date: NaiveDate) -> String {
    format!("{}, {} {}, {}", date.format("%A"), date.format("%B"), date.day(), date.year())
}

/// Week header: "Jan 7 - Jan 13, 2024".
pub fn format_week_display(week_start: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    format!(
        "{} {} - {} {}, {}",
        week_start.format("%b"),
        week_start.day(),
        week_end.format("%b"),
        week_end.day(),
        week_end.year()
    )
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

pub fn is_tomorrow(date: NaiveDate, today: NaiveDate) -> bool {
    today.succ_opt() == Some(date)
}

/// The span of dates a view is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "date", rename_all = "lowercase")]
pub enum ViewRange {
    Day(NaiveDate),
    /// Always holds a Sunday; build with [`ViewRange::week_of`].
    Week(NaiveDate),
}

impl ViewRange {
    pub fn day(date: NaiveDate) -> Self {
        ViewRange::Day(date)
    }

    /// The week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        ViewRange::Week(week_start(date))
    }

    pub fn is_week(&self) -> bool {
        matches!(self, ViewRange::Week(_))
    }

    /// Date used when an operation does not name one.
    pub fn default_target(&self) -> NaiveDate {
        match *self {
            ViewRange::Day(date) => date,
            ViewRange::Week(start) => start,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            ViewRange::Day(day) => day == date,
            ViewRange::Week(start) => in_week(date, start),
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        match *self {
            ViewRange::Day(day) => vec![day],
            ViewRange::Week(start) => week_dates(start),
        }
    }

    pub fn next(&self) -> Self {
        match *self {
            ViewRange::Day(day) => ViewRange::Day(day + Duration::days(1)),
            ViewRange::Week(start) => ViewRange::Week(start + Duration::days(7)),
        }
    }

    pub fn previous(&self) -> Self {
        match *self {
            ViewRange::Day(day) => ViewRange::Day(day - Duration::days(1)),
            ViewRange::Week(start) => ViewRange::Week(start - Duration::days(7)),
        }
    }

    /// Human readable label for headers and interpretation requests.
    pub fn describe(&self) -> String {
        match *self {
            ViewRange::Day(day) => format_date_display(day),
            ViewRange::Week(start) => format!("Week of {}", format_week_display(start)),
        }
    }
}
