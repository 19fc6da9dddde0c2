//! Derived view state for a generated study plan: calendar-day bucketing and
//! session time labels. Everything here is a pure function of the plan the
//! backend returned. Buckets are recomputed on demand and never cached, so
//! the plan stays the single source of truth.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{StudyPlan, StudyPlanSession};
use crate::utils::{format_clock_time, parse_timestamp};

/// Number of empty placeholder days shown when a plan has no dated sessions,
/// so the calendar grid is never blank.
pub const FALLBACK_DAY_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanDay {
    pub date: NaiveDate,
    pub sessions: Vec<StudyPlanSession>,
}

/// Sessions grouped by calendar day, plus the bucket for sessions that have
/// neither a start time nor a due date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBuckets {
    pub days: Vec<PlanDay>,
    pub unscheduled: Vec<StudyPlanSession>,
}

/// The calendar day a session belongs to: the date part of its start time if
/// present, else of its due date, else none (unscheduled).
fn session_date(session: &StudyPlanSession) -> Option<NaiveDate> {
    optional_timestamp(session.start_time.as_deref())
        .or_else(|| parse_timestamp(&session.timedue))
        .map(|dt| dt.date())
}

fn optional_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_timestamp)
}

/// Group a plan's sessions into day buckets. Days are ordered by date; within
/// a day, sessions keep the order the backend returned. When no session has a
/// date at all, `FALLBACK_DAY_COUNT` empty days starting at `today` are
/// produced instead.
pub fn bucket_sessions(plan: &StudyPlan, today: NaiveDate) -> DayBuckets {
    let mut days: Vec<PlanDay> = Vec::new();
    let mut unscheduled = Vec::new();

    for session in &plan.schedule {
        match session_date(session) {
            Some(date) => match days.iter_mut().find(|day| day.date == date) {
                Some(day) => day.sessions.push(session.clone()),
                None => days.push(PlanDay {
                    date,
                    sessions: vec![session.clone()],
                }),
            },
            None => unscheduled.push(session.clone()),
        }
    }

    days.sort_by_key(|day| day.date);

    if days.is_empty() {
        days = (0..FALLBACK_DAY_COUNT)
            .map(|offset| PlanDay {
                date: today + Duration::days(offset as i64),
                sessions: Vec::new(),
            })
            .collect();
    }

    DayBuckets { days, unscheduled }
}

/// Human label for a session's time slot:
/// start and end → "9:00 AM - 10:00 AM";
/// start only → "9:00 AM • 1.5h";
/// neither → "1.5h block".
pub fn session_time_label(session: &StudyPlanSession) -> String {
    let start = optional_timestamp(session.start_time.as_deref());
    let end = optional_timestamp(session.end_time.as_deref());
    match (start, end) {
        (Some(start), Some(end)) => {
            format!("{} - {}", format_clock_time(start), format_clock_time(end))
        }
        (Some(start), None) => format!(
            "{} • {}h",
            format_clock_time(start),
            format_hours(session.duration)
        ),
        _ => format!("{}h block", format_hours(session.duration)),
    }
}

/// Render a duration in hours without a trailing ".0".
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{}", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn session(name: &str, start: Option<&str>, end: Option<&str>, due: &str) -> StudyPlanSession {
        StudyPlanSession {
            task_name: name.to_string(),
            priority_score: 5.0,
            difficulty: 3,
            priority: Priority::Pending,
            timedue: due.to_string(),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            duration: 1.5,
            note: None,
        }
    }

    fn plan(schedule: Vec<StudyPlanSession>) -> StudyPlan {
        StudyPlan {
            schedule,
            total_tasks: 0,
            total_study_hours: 0.0,
            available_hours_per_day: 4.0,
            study_session_duration: 1.0,
            adjustment_reason: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_start_date_lands_in_one_bucket() {
        let plan = plan(vec![
            session("morning", Some("2025-06-01T09:00:00"), None, ""),
            session("evening", Some("2025-06-01T19:00:00"), None, ""),
        ]);
        let buckets = bucket_sessions(&plan, date(2025, 6, 1));
        assert_eq!(buckets.days.len(), 1);
        assert_eq!(buckets.days[0].date, date(2025, 6, 1));
        assert_eq!(buckets.days[0].sessions.len(), 2);
        assert!(buckets.unscheduled.is_empty());
    }

    #[test]
    fn test_due_date_is_the_fallback_key() {
        let plan = plan(vec![session("essay", None, None, "2025-06-03T23:59:00Z")]);
        let buckets = bucket_sessions(&plan, date(2025, 6, 1));
        assert_eq!(buckets.days.len(), 1);
        assert_eq!(buckets.days[0].date, date(2025, 6, 3));
    }

    #[test]
    fn test_dateless_session_is_unscheduled_never_bucketed() {
        let plan = plan(vec![
            session("anchored", Some("2025-06-02T10:00:00"), None, ""),
            session("floating", None, None, ""),
            // Empty-string timestamps count as absent.
            session("blank", Some(""), None, ""),
        ]);
        let buckets = bucket_sessions(&plan, date(2025, 6, 1));
        let bucketed: Vec<_> = buckets
            .days
            .iter()
            .flat_map(|d| &d.sessions)
            .map(|s| s.task_name.as_str())
            .collect();
        assert_eq!(bucketed, vec!["anchored"]);
        let unscheduled: Vec<_> = buckets
            .unscheduled
            .iter()
            .map(|s| s.task_name.as_str())
            .collect();
        assert_eq!(unscheduled, vec!["floating", "blank"]);
    }

    #[test]
    fn test_days_sorted_but_backend_order_kept_within_a_day() {
        let plan = plan(vec![
            session("later-day", Some("2025-06-05T09:00:00"), None, ""),
            session("first", Some("2025-06-02T15:00:00"), None, ""),
            session("second", Some("2025-06-02T09:00:00"), None, ""),
        ]);
        let buckets = bucket_sessions(&plan, date(2025, 6, 1));
        assert_eq!(buckets.days[0].date, date(2025, 6, 2));
        assert_eq!(buckets.days[1].date, date(2025, 6, 5));
        // "first" arrived before "second", so it stays first even though it
        // starts later in the day.
        let names: Vec<_> = buckets.days[0]
            .sessions
            .iter()
            .map(|s| s.task_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_zero_dated_sessions_yields_five_empty_days_from_today() {
        let today = date(2025, 6, 10);
        let plan = plan(vec![session("floating", None, None, "")]);
        let buckets = bucket_sessions(&plan, today);
        assert_eq!(buckets.days.len(), FALLBACK_DAY_COUNT);
        for (offset, day) in buckets.days.iter().enumerate() {
            assert_eq!(day.date, today + Duration::days(offset as i64));
            assert!(day.sessions.is_empty());
        }
        assert_eq!(buckets.unscheduled.len(), 1);
    }

    #[test]
    fn test_time_label_with_start_and_end() {
        let s = session(
            "read",
            Some("2025-06-01T09:00:00"),
            Some("2025-06-01T10:00:00"),
            "",
        );
        assert_eq!(session_time_label(&s), "9:00 AM - 10:00 AM");
    }

    #[test]
    fn test_time_label_with_start_only() {
        let s = session("read", Some("2025-06-01T09:00:00"), None, "");
        assert_eq!(session_time_label(&s), "9:00 AM • 1.5h");
    }

    #[test]
    fn test_time_label_unanchored() {
        let s = session("read", None, None, "");
        assert_eq!(session_time_label(&s), "1.5h block");
    }

    #[test]
    fn test_format_hours_trims_trailing_zero() {
        assert_eq!(format_hours(1.0), "1");
        assert_eq!(format_hours(1.5), "1.5");
        assert_eq!(format_hours(0.25), "0.25");
    }
}
