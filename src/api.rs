use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    Ack, GeneratePlanRequest, HealthResponse, MarkMissedResponse, NewTask, OverdueTasksResponse,
    Priority, ScoresResponse, Stats, StudyPlan, Task, TasksByStatusResponse,
    UpcomingTasksResponse, UpdateStatusRequest,
};

/// Uniform error for every backend operation. `Backend` carries the server's
/// `message` field when the error body has one, so `Display` can be shown to
/// the user verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Backend { status: StatusCode, message: String },
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Message for a non-success response: the structured `message` field if the
/// body parses, otherwise a generic fallback naming the status code.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP error, status {}", status.as_u16()))
}

/// Typed client for the study-planner backend. One method per endpoint; no
/// retries, no caching, every call is a fresh round-trip. Cloning is cheap
/// (the underlying connection pool is shared), so each in-flight request can
/// run on its own thread.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    /// Endpoint built by segment push, so a base URL with a path prefix
    /// (`http://host/api`) or a trailing slash keeps working.
    /// `pop_if_empty` drops the empty segment a trailing slash leaves
    /// behind; `Url::join` is avoided because it discards the prefix for
    /// absolute paths.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    /// Endpoint with the task name as a trailing path segment.
    /// `path_segments_mut` percent-encodes the name, so names with spaces or
    /// slashes address the right resource.
    fn named_endpoint(&self, path: &str, task_name: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(path)
            .push(task_name);
        Ok(url)
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes()?;
            return Err(ApiError::Backend {
                status,
                message: error_message(status, &body),
            });
        }
        Ok(response.json()?)
    }

    pub fn health(&self) -> Result<HealthResponse, ApiError> {
        self.execute(self.http.get(self.endpoint("health")?))
    }

    pub fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.execute(self.http.get(self.endpoint("get_tasks")?))
    }

    pub fn create_task(&self, task: &NewTask) -> Result<Ack, ApiError> {
        self.execute(self.http.post(self.endpoint("post_task")?).json(task))
    }

    pub fn update_task_status(&self, task_name: &str, new_status: Priority) -> Result<Ack, ApiError> {
        let body = UpdateStatusRequest {
            task_name: task_name.to_string(),
            new_status,
        };
        self.execute(self.http.put(self.endpoint("update_task_status")?).json(&body))
    }

    pub fn delete_task(&self, task_name: &str) -> Result<Ack, ApiError> {
        self.execute(self.http.delete(self.named_endpoint("delete_task", task_name)?))
    }

    pub fn tasks_by_status(&self, status: Priority) -> Result<TasksByStatusResponse, ApiError> {
        self.execute(self.http.get(self.named_endpoint("tasks_by_status", status.as_str())?))
    }

    pub fn score_tasks(&self) -> Result<ScoresResponse, ApiError> {
        self.execute(self.http.get(self.endpoint("score_tasks")?))
    }

    pub fn generate_plan(
        &self,
        available_hours_per_day: f64,
        study_session_duration: f64,
    ) -> Result<StudyPlan, ApiError> {
        let body = GeneratePlanRequest {
            available_hours_per_day,
            study_session_duration,
        };
        self.execute(self.http.post(self.endpoint("generate_plan")?).json(&body))
    }

    pub fn mark_missed(&self, task_name: &str) -> Result<MarkMissedResponse, ApiError> {
        self.execute(self.http.post(self.named_endpoint("mark_missed", task_name)?))
    }

    pub fn upcoming_tasks(&self, days_ahead: u32) -> Result<UpcomingTasksResponse, ApiError> {
        let mut url = self.endpoint("upcoming_tasks")?;
        url.query_pairs_mut()
            .append_pair("days_ahead", &days_ahead.to_string());
        self.execute(self.http.get(url))
    }

    pub fn overdue_tasks(&self) -> Result<OverdueTasksResponse, ApiError> {
        self.execute(self.http.get(self.endpoint("overdue_tasks")?))
    }

    pub fn stats(&self) -> Result<Stats, ApiError> {
        self.execute(self.http.get(self.endpoint("stats")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_structured_body() {
        let status = StatusCode::BAD_REQUEST;
        let body = br#"{"message": "Task 'Algebra' already exists"}"#;
        assert_eq!(error_message(status, body), "Task 'Algebra' already exists");
    }

    #[test]
    fn test_error_message_falls_back_on_unparseable_body() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(
            error_message(status, b"<html>oops</html>"),
            "HTTP error, status 500"
        );
        // Parseable JSON without a message field also falls back.
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, b"{\"detail\": \"gone\"}"),
            "HTTP error, status 404"
        );
    }

    #[test]
    fn test_named_endpoint_escapes_task_name() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client
            .named_endpoint("delete_task", "Read Chapter 3 / Part 2")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/delete_task/Read%20Chapter%203%20%2F%20Part%202"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix_is_preserved() {
        let client = ApiClient::new("http://localhost:5000/api").unwrap();
        let url = client.endpoint("health").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/health");

        let url = client.named_endpoint("mark_missed", "a b").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/mark_missed/a%20b");
    }

    #[test]
    fn test_trailing_slash_base_yields_no_double_slash() {
        let client = ApiClient::new("http://localhost:5000/api/").unwrap();
        let url = client.endpoint("get_tasks").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/get_tasks");

        let url = client.named_endpoint("mark_missed", "a b").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/mark_missed/a%20b");

        // A bare host with trailing slash is the default shape; still clean.
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        let url = client.endpoint("stats").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/stats");
    }

    #[test]
    fn test_upcoming_tasks_query_parameter() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let mut url = client.endpoint("upcoming_tasks").unwrap();
        url.query_pairs_mut().append_pair("days_ahead", "14");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/upcoming_tasks?days_ahead=14"
        );
    }

    #[test]
    fn test_backend_error_displays_message_verbatim() {
        let err = ApiError::Backend {
            status: StatusCode::CONFLICT,
            message: "Task already scheduled".to_string(),
        };
        assert_eq!(err.to_string(), "Task already scheduled");
    }
}
