use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::pattern::{HistoricalTask, PatternCandidate, RangeTask};
use crate::models::schedule::Schedule;
use crate::services::pattern::{collect_current, collect_history, extract_patterns};
use crate::utils::date::{week_dates, weekday_name, ViewRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestViewMode {
    Daily,
    Weekly,
}

/// A calendar date paired with its weekday, so the service can resolve
/// phrases like "on Thursday" without date arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDate {
    pub date: NaiveDate,
    pub day_name: String,
}

/// Everything the interpretation service sees for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    pub text: String,
    pub context: String,
    pub existing_tasks: Vec<RangeTask>,
    pub historical_tasks: Vec<HistoricalTask>,
    pub patterns: Vec<PatternCandidate>,
    /// Human readable label of the range being edited.
    #[serde(rename = "date")]
    pub date_descriptor: String,
    pub view_mode: RequestViewMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_dates: Option<Vec<WeekDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_week_dates: Option<Vec<WeekDate>>,
}

/// Assemble the request for `text` against the range being edited.
///
/// Tasks inside `range` are sent with their ids so the service can update
/// or delete them. Tasks from the fortnight before `today` outside `range`
/// are sent as history along with the recurring patterns found in them.
pub fn build_request(
    schedule: &Schedule,
    range: &ViewRange,
    context: &str,
    text: &str,
    today: NaiveDate,
) -> InterpretRequest {
    let historical_tasks = collect_history(schedule, range, today);
    let patterns = extract_patterns(&historical_tasks);

    let (view_mode, week, next_week) = match *range {
        ViewRange::Day(_) => (RequestViewMode::Daily, None, None),
        ViewRange::Week(start) => (
            RequestViewMode::Weekly,
            Some(named_week(start)),
            Some(named_week(start + Duration::days(7))),
        ),
    };

    InterpretRequest {
        text: text.to_string(),
        context: context.to_string(),
        existing_tasks: collect_current(schedule, range),
        historical_tasks,
        patterns,
        date_descriptor: range.describe(),
        view_mode,
        week_dates: week,
        next_week_dates: next_week,
    }
}

fn named_week(start: NaiveDate) -> Vec<WeekDate> {
    week_dates(start)
        .into_iter()
        .map(|date| WeekDate {
            date,
            day_name: weekday_name(date),
        })
        .collect()
}

#[cfg(test)]
impl InterpretRequest {
    pub(crate) fn for_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            context: String::new(),
            existing_tasks: Vec::new(),
            historical_tasks: Vec::new(),
            patterns: Vec::new(),
            date_descriptor: String::new(),
            view_mode: RequestViewMode::Daily,
            week_dates: None,
            next_week_dates: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::task::TaskService;
    use pretty_assertions::assert_eq;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sample_schedule() -> Schedule {
        let mut schedule = Schedule::new();
        let mut tasks = TaskService::new(&mut schedule);
        // Mondays inside the two-week window before the 18th
        for day in [8, 15] {
            tasks.add_task(date(1, day), "School", 9, 0, 60, Vec::new());
        }
        tasks.add_task(date(1, 17), "Dentist", 14, 30, 45, Vec::new());
        schedule
    }

    #[test]
    fn test_day_request_shape() {
        let schedule = sample_schedule();
        let request = build_request(
            &schedule,
            &ViewRange::day(date(1, 17)),
            "Vegetarian",
            "lunch at noon",
            date(1, 18),
        );

        assert_eq!(request.view_mode, RequestViewMode::Daily);
        assert_eq!(request.date_descriptor, "Wednesday, January 17, 2024");
        assert_eq!(request.existing_tasks.len(), 1);
        assert_eq!(request.existing_tasks[0].text, "Dentist");
        assert_eq!(request.historical_tasks.len(), 2);
        assert_eq!(request.patterns.len(), 1);
        assert_eq!(request.patterns[0].occurrence_count, 2);
        assert_eq!(request.patterns[0].representative_hour, 9);
        assert!(request.week_dates.is_none());
        assert!(request.next_week_dates.is_none());
    }

    #[test]
    fn test_week_request_lists_both_weeks() {
        let schedule = sample_schedule();
        let request = build_request(
            &schedule,
            &ViewRange::week_of(date(1, 17)),
            "",
            "gym every morning",
            date(1, 18),
        );

        assert_eq!(request.view_mode, RequestViewMode::Weekly);
        assert_eq!(request.date_descriptor, "Week of Jan 14 - Jan 20, 2024");

        let week = request.week_dates.unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(1, 14));
        assert_eq!(week[0].day_name, "Sunday");

        let next = request.next_week_dates.unwrap();
        assert_eq!(next[0].date, date(1, 21));
        assert_eq!(next[6].date, date(1, 27));

        // Monday the 15th is in range, so it is current rather than history
        assert_eq!(request.existing_tasks.len(), 2);
        assert_eq!(request.historical_tasks.len(), 1);
        assert_eq!(request.historical_tasks[0].date, date(1, 8));
    }

    #[test]
    fn test_serialized_field_names() {
        let schedule = sample_schedule();
        let request = build_request(
            &schedule,
            &ViewRange::day(date(1, 17)),
            "ctx",
            "hello",
            date(1, 18),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["date"], "Wednesday, January 17, 2024");
        assert_eq!(json["viewMode"], "daily");
        assert_eq!(json["existingTasks"][0]["dayName"], "Wednesday");
        assert_eq!(json["historicalTasks"][0]["dayOfWeek"], "Monday");
        assert!(json.get("weekDates").is_none());
    }
}
