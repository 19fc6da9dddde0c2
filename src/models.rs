use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Workflow state of a task. The backend calls this field `priority`,
/// but it tracks progress, not urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Pending,
    Ongoing,
    Completed,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Pending, Priority::Ongoing, Priority::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Pending => "Pending",
            Priority::Ongoing => "Ongoing",
            Priority::Completed => "Completed",
        }
    }

    /// Next status in the Pending → Ongoing → Completed → Pending cycle.
    pub fn next(self) -> Self {
        match self {
            Priority::Pending => Priority::Ongoing,
            Priority::Ongoing => Priority::Completed,
            Priority::Completed => Priority::Pending,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Priority::Pending),
            "ongoing" => Some(Priority::Ongoing),
            "completed" => Some(Priority::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A study task as the backend returns it. `task_name` is the identity key:
/// updates and deletes are addressed by name, there is no separate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_name: String,
    pub scale_difficulty: u8, // 1-5
    pub priority: Priority,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    pub timedue: String,
}

/// Body of POST /post_task. The backend stamps `createdAt` itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub task_name: String,
    pub scale_difficulty: u8,
    pub priority: Priority,
    pub timedue: String,
}

/// Due timestamp used when the user leaves the due field empty:
/// exactly one week from now.
pub fn default_timedue(now: DateTime<Utc>) -> String {
    (now + Duration::days(7)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Server-computed priority ranking for a task. Read-only on this side.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskScore {
    pub task_name: String,
    pub score: f64,
    pub difficulty: u8,
    pub priority: Priority,
    pub timedue: String,
}

/// One scheduled block within a generated plan. `start_time`/`end_time`
/// may be absent or empty when the backend could not anchor the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanSession {
    pub task_name: String,
    pub priority_score: f64,
    pub difficulty: u8,
    pub priority: Priority,
    #[serde(default)]
    pub timedue: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub duration: f64, // hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A generated schedule. Regenerated wholesale on each request; the client
/// never patches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub schedule: Vec<StudyPlanSession>,
    pub total_tasks: u32,
    pub total_study_hours: f64,
    pub available_hours_per_day: f64,
    pub study_session_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
}

/// Aggregate counts from GET /stats.
#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    pub total_tasks: u32,
    pub pending: u32,
    pub ongoing: u32,
    pub completed: u32,
    pub overdue: u32,
    pub completion_rate: f64,
    pub average_difficulty: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Generic `{status, message}` acknowledgement for mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest {
    pub task_name: String,
    pub new_status: Priority,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratePlanRequest {
    pub available_hours_per_day: f64,
    pub study_session_duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksByStatusResponse {
    pub status: Priority,
    pub count: u32,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoresResponse {
    pub scores: Vec<TaskScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkMissedResponse {
    pub status: String,
    pub missed_task: String,
    pub updated_plan: StudyPlan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpcomingTasksResponse {
    pub days_ahead: u32,
    pub count: u32,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverdueTasksResponse {
    pub count: u32,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_timedue_is_exactly_one_week_out() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap();
        let due = default_timedue(now);
        let parsed = DateTime::parse_from_rfc3339(&due).unwrap().with_timezone(&Utc);
        assert_eq!(parsed - now, Duration::days(7));
    }

    #[test]
    fn test_priority_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Priority::Ongoing).unwrap(), "\"Ongoing\"");
        let back: Priority = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(back, Priority::Completed);
    }

    #[test]
    fn test_priority_cycle_covers_all_states() {
        assert_eq!(Priority::Pending.next(), Priority::Ongoing);
        assert_eq!(Priority::Ongoing.next(), Priority::Completed);
        assert_eq!(Priority::Completed.next(), Priority::Pending);
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("pending"), Some(Priority::Pending));
        assert_eq!(Priority::parse("ONGOING"), Some(Priority::Ongoing));
        assert_eq!(Priority::parse("done"), None);
    }

    #[test]
    fn test_session_tolerates_missing_optional_fields() {
        let raw = r#"{
            "task_name": "Read Chapter 3",
            "priority_score": 7.5,
            "difficulty": 4,
            "priority": "Pending",
            "duration": 1.5
        }"#;
        let session: StudyPlanSession = serde_json::from_str(raw).unwrap();
        assert_eq!(session.start_time, None);
        assert_eq!(session.end_time, None);
        assert_eq!(session.note, None);
        assert_eq!(session.timedue, "");
    }
}
