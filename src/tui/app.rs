//! All TUI state lives here, in one container, with no handle to the
//! network. Input handling and API completions are funneled through
//! methods that mutate state and return an [`Action`] for the event loop
//! to carry out, which keeps every interaction testable without a
//! backend.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::Config;
use crate::models::{NewTask, Priority, Stats, StudyPlan, Task, default_timedue};
use crate::tui::bridge::ApiEvent;
use crate::tui::widgets::input::InputField;
use crate::utils;

const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Create,
    Plan,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tasks, Tab::Create, Tab::Plan];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Create => "New Task",
            Tab::Plan => "Study Plan",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Tasks => 0,
            Tab::Create => 1,
            Tab::Plan => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Tasks => Tab::Create,
            Tab::Create => Tab::Plan,
            Tab::Plan => Tab::Tasks,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Tab::Tasks => Tab::Plan,
            Tab::Create => Tab::Tasks,
            Tab::Plan => Tab::Create,
        }
    }
}

/// Last known reachability of the backend, driven by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn is_error(self) -> bool {
        self == ConnectionStatus::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormField {
    Name,
    Difficulty,
    Status,
    Due,
}

impl TaskFormField {
    pub fn next(self) -> Self {
        match self {
            TaskFormField::Name => TaskFormField::Difficulty,
            TaskFormField::Difficulty => TaskFormField::Status,
            TaskFormField::Status => TaskFormField::Due,
            TaskFormField::Due => TaskFormField::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            TaskFormField::Name => TaskFormField::Due,
            TaskFormField::Difficulty => TaskFormField::Name,
            TaskFormField::Status => TaskFormField::Difficulty,
            TaskFormField::Due => TaskFormField::Status,
        }
    }
}

/// State of the task creation form. Difficulty and status are selectors,
/// not free text, so they can never hold an invalid value.
#[derive(Debug, Clone)]
pub struct TaskFormState {
    pub name: InputField,
    pub difficulty: u8,
    pub status: Priority,
    pub due: InputField,
    pub focused: TaskFormField,
    pub submitting: bool,
}

impl Default for TaskFormState {
    fn default() -> Self {
        Self {
            name: InputField::new(),
            difficulty: 3,
            status: Priority::Pending,
            due: InputField::new(),
            focused: TaskFormField::Name,
            submitting: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFocus {
    Hours,
    Duration,
    Sessions,
}

impl PlanFocus {
    pub fn next(self) -> Self {
        match self {
            PlanFocus::Hours => PlanFocus::Duration,
            PlanFocus::Duration => PlanFocus::Sessions,
            PlanFocus::Sessions => PlanFocus::Hours,
        }
    }
}

/// State of the study plan tab: the two generation parameters, the last
/// plan the backend returned, and the session list selection.
#[derive(Debug)]
pub struct PlanViewState {
    pub hours: InputField,
    pub duration: InputField,
    pub focus: PlanFocus,
    pub plan: Option<StudyPlan>,
    pub generating: bool,
    pub session_state: ListState,
}

impl Default for PlanViewState {
    fn default() -> Self {
        Self {
            hours: InputField::with_value("4"),
            duration: InputField::with_value("1"),
            focus: PlanFocus::Hours,
            plan: None,
            generating: false,
            session_state: ListState::default(),
        }
    }
}

/// Transient status bar message, cleared after a few seconds.
#[derive(Debug, Default)]
pub struct StatusState {
    pub message: Option<String>,
    set_at: Option<Instant>,
}

impl StatusState {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.set_at = Some(Instant::now());
    }

    pub fn check_timeout(&mut self) {
        if let Some(set_at) = self.set_at {
            if set_at.elapsed() >= STATUS_MESSAGE_DURATION {
                self.message = None;
                self.set_at = None;
            }
        }
    }
}

/// Modal asking the user to confirm a delete. `selection` is 0 for
/// Delete, 1 for Cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub task_name: String,
    pub selection: usize,
}

/// What the event loop should do after a state change. Every variant
/// except `None` and `Quit` maps to exactly one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    CreateTask(NewTask),
    UpdateStatus { name: String, status: Priority },
    DeleteTask(String),
    GeneratePlan { hours: f64, duration: f64 },
    MarkMissed(String),
}

pub struct App {
    pub config: Config,
    pub active_tab: Tab,
    pub mode: Mode,
    pub connection: ConnectionStatus,
    pub tasks: Vec<Task>,
    pub tasks_loading: bool,
    pub stats: Option<Stats>,
    pub task_list_state: ListState,
    pub form: TaskFormState,
    pub plan: PlanViewState,
    pub status: StatusState,
    pub delete_confirmation: Option<DeleteConfirmation>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active_tab: Tab::Tasks,
            mode: Mode::Normal,
            connection: ConnectionStatus::Checking,
            tasks: Vec::new(),
            tasks_loading: true,
            stats: None,
            task_list_state: ListState::default(),
            form: TaskFormState::default(),
            plan: PlanViewState::default(),
            status: StatusState::default(),
            delete_confirmation: None,
        }
    }

    // ---- task list ----

    pub fn selected_task(&self) -> Option<&Task> {
        self.task_list_state
            .selected()
            .and_then(|i| self.tasks.get(i))
    }

    pub fn select_next_task(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let next = match self.task_list_state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.task_list_state.select(Some(next));
    }

    pub fn select_previous_task(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let previous = match self.task_list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.task_list_state.select(Some(previous));
    }

    fn sync_task_selection(&mut self) {
        if self.tasks.is_empty() {
            self.task_list_state.select(None);
            return;
        }
        let selected = self.task_list_state.selected().unwrap_or(0);
        self.task_list_state
            .select(Some(selected.min(self.tasks.len() - 1)));
    }

    /// Advance the selected task one step in the status cycle.
    pub fn cycle_selected_status(&mut self) -> Action {
        match self.selected_task() {
            Some(task) => Action::UpdateStatus {
                name: task.task_name.clone(),
                status: task.priority.next(),
            },
            None => Action::None,
        }
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.delete_confirmation = Some(DeleteConfirmation {
                task_name: task.task_name.clone(),
                selection: 0,
            });
        }
    }

    /// Resolve the delete modal. Cancel performs no call at all.
    pub fn confirm_delete_selection(&mut self) -> Action {
        match self.delete_confirmation.take() {
            Some(confirmation) if confirmation.selection == 0 => {
                Action::DeleteTask(confirmation.task_name)
            }
            _ => Action::None,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = None;
    }

    pub fn toggle_delete_selection(&mut self) {
        if let Some(confirmation) = self.delete_confirmation.as_mut() {
            confirmation.selection = 1 - confirmation.selection;
        }
    }

    // ---- creation form ----

    pub fn adjust_form_difficulty(&mut self, delta: i8) {
        let adjusted = (self.form.difficulty as i8 + delta).clamp(1, 5);
        self.form.difficulty = adjusted as u8;
    }

    pub fn cycle_form_status(&mut self) {
        self.form.status = self.form.status.next();
    }

    /// Validate and submit the creation form. An empty due date means one
    /// week from `now`. Returns `Action::None` and a status message when
    /// validation fails, leaving the typed values in place.
    pub fn submit_task_form(&mut self, now: DateTime<Utc>) -> Action {
        if self.form.submitting {
            return Action::None;
        }
        let name = self.form.name.value().trim().to_string();
        if name.is_empty() {
            self.status.set("Task name is required");
            self.form.focused = TaskFormField::Name;
            return Action::None;
        }
        let due_raw = self.form.due.value().trim();
        let timedue = if due_raw.is_empty() {
            default_timedue(now)
        } else {
            match utils::parse_due_input(due_raw) {
                Ok(due) => due,
                Err(message) => {
                    self.status.set(message);
                    self.form.focused = TaskFormField::Due;
                    return Action::None;
                }
            }
        };
        self.form.submitting = true;
        Action::CreateTask(NewTask {
            task_name: name,
            scale_difficulty: self.form.difficulty,
            priority: self.form.status,
            timedue,
        })
    }

    // ---- study plan ----

    pub fn submit_plan_form(&mut self) -> Action {
        if self.plan.generating {
            return Action::None;
        }
        let hours: f64 = match self.plan.hours.value().trim().parse() {
            Ok(value) => value,
            Err(_) => {
                self.status.set("Hours per day must be a number");
                return Action::None;
            }
        };
        if !(0.5..=24.0).contains(&hours) {
            self.status.set("Hours per day must be between 0.5 and 24");
            return Action::None;
        }
        let duration: f64 = match self.plan.duration.value().trim().parse() {
            Ok(value) => value,
            Err(_) => {
                self.status.set("Session length must be a number");
                return Action::None;
            }
        };
        if !(0.25..=8.0).contains(&duration) {
            self.status
                .set("Session length must be between 0.25 and 8 hours");
            return Action::None;
        }
        self.plan.generating = true;
        Action::GeneratePlan { hours, duration }
    }

    pub fn selected_session_name(&self) -> Option<String> {
        let plan = self.plan.plan.as_ref()?;
        let index = self.plan.session_state.selected()?;
        plan.schedule.get(index).map(|s| s.task_name.clone())
    }

    pub fn select_next_session(&mut self) {
        let Some(plan) = self.plan.plan.as_ref() else {
            return;
        };
        if plan.schedule.is_empty() {
            return;
        }
        let next = match self.plan.session_state.selected() {
            Some(i) if i + 1 < plan.schedule.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.plan.session_state.select(Some(next));
    }

    pub fn select_previous_session(&mut self) {
        if self.plan.plan.is_none() {
            return;
        }
        let previous = match self.plan.session_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.plan.session_state.select(Some(previous));
    }

    /// Ask the backend to reschedule around a missed session.
    pub fn mark_selected_session_missed(&mut self) -> Action {
        match self.selected_session_name() {
            Some(name) => Action::MarkMissed(name),
            None => Action::None,
        }
    }

    fn sync_session_selection(&mut self) {
        let count = self
            .plan
            .plan
            .as_ref()
            .map(|p| p.schedule.len())
            .unwrap_or(0);
        if count == 0 {
            self.plan.session_state.select(None);
            return;
        }
        let selected = self.plan.session_state.selected().unwrap_or(0);
        self.plan.session_state.select(Some(selected.min(count - 1)));
    }

    // ---- API completions ----

    /// Fold one backend result into state. A failed fetch keeps whatever
    /// data is already on screen; only mutation successes trigger a
    /// follow-up refresh.
    pub fn handle_api_event(&mut self, event: ApiEvent) -> Action {
        match event {
            ApiEvent::Health(result) => {
                self.connection = match result {
                    Ok(_) => ConnectionStatus::Connected,
                    Err(_) => ConnectionStatus::Error,
                };
                Action::None
            }
            ApiEvent::TasksLoaded(result) => {
                self.tasks_loading = false;
                match result {
                    Ok(tasks) => {
                        self.tasks = tasks;
                        self.sync_task_selection();
                    }
                    Err(e) => {
                        self.status.set(format!("Failed to load tasks: {}", e));
                    }
                }
                Action::None
            }
            ApiEvent::StatsLoaded(result) => {
                if let Ok(stats) = result {
                    self.stats = Some(stats);
                }
                Action::None
            }
            ApiEvent::TaskCreated { name, result } => match result {
                Ok(_) => {
                    self.form = TaskFormState::default();
                    self.status
                        .set(format!("\"{}\" added to your study plan", name));
                    Action::Refresh
                }
                Err(e) => {
                    self.form.submitting = false;
                    self.status.set(format!("Failed to create task: {}", e));
                    Action::None
                }
            },
            ApiEvent::StatusUpdated { status, result } => match result {
                Ok(_) => {
                    self.status
                        .set(format!("Task status changed to {}", status));
                    Action::Refresh
                }
                Err(e) => {
                    self.status.set(format!("Failed to update status: {}", e));
                    Action::None
                }
            },
            ApiEvent::TaskDeleted { name, result } => match result {
                Ok(_) => {
                    self.status.set(format!("\"{}\" removed", name));
                    Action::Refresh
                }
                Err(e) => {
                    self.status.set(format!("Failed to delete task: {}", e));
                    Action::None
                }
            },
            ApiEvent::PlanGenerated(result) => {
                self.plan.generating = false;
                match result {
                    Ok(plan) => {
                        self.status.set(format!(
                            "Study plan ready: {} sessions scheduled",
                            plan.schedule.len()
                        ));
                        self.plan.plan = Some(plan);
                        self.sync_session_selection();
                    }
                    Err(e) => {
                        // The previous plan, if any, stays on screen.
                        self.status.set(format!("Failed to generate plan: {}", e));
                    }
                }
                Action::None
            }
            ApiEvent::SessionMissed(result) => match result {
                Ok(response) => {
                    self.status.set(format!(
                        "\"{}\" marked missed, plan updated",
                        response.missed_task
                    ));
                    self.plan.plan = Some(response.updated_plan);
                    self.sync_session_selection();
                    Action::Refresh
                }
                Err(e) => {
                    self.status.set(format!("Failed to mark session missed: {}", e));
                    Action::None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{Ack, HealthResponse, MarkMissedResponse, StudyPlanSession};
    use chrono::TimeZone;

    fn test_app() -> App {
        App::new(Config::default())
    }

    fn sample_task(name: &str) -> Task {
        Task {
            task_name: name.to_string(),
            scale_difficulty: 3,
            priority: Priority::Pending,
            created_at: "2025-06-01T10:00:00Z".to_string(),
            timedue: "2025-06-08T10:00:00Z".to_string(),
        }
    }

    fn sample_plan(session_names: &[&str]) -> StudyPlan {
        StudyPlan {
            schedule: session_names
                .iter()
                .map(|name| StudyPlanSession {
                    task_name: name.to_string(),
                    priority_score: 5.0,
                    difficulty: 3,
                    priority: Priority::Pending,
                    timedue: "2025-06-08T10:00:00Z".to_string(),
                    start_time: None,
                    end_time: None,
                    duration: 1.0,
                    note: None,
                })
                .collect(),
            total_tasks: session_names.len() as u32,
            total_study_hours: session_names.len() as f64,
            available_hours_per_day: 4.0,
            study_session_duration: 1.0,
            adjustment_reason: None,
        }
    }

    fn backend_error() -> ApiError {
        ApiError::Backend {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        }
    }

    fn ok_ack() -> Result<Ack, ApiError> {
        Ok(Ack {
            status: "success".to_string(),
            message: "done".to_string(),
        })
    }

    #[test]
    fn test_health_result_drives_connection_status() {
        let mut app = test_app();
        assert_eq!(app.connection, ConnectionStatus::Checking);

        let action = app.handle_api_event(ApiEvent::Health(Ok(HealthResponse {
            status: "healthy".to_string(),
            service: "studydesk".to_string(),
        })));
        assert_eq!(action, Action::None);
        assert_eq!(app.connection, ConnectionStatus::Connected);

        app.handle_api_event(ApiEvent::Health(Err(backend_error())));
        assert_eq!(app.connection, ConnectionStatus::Error);
        // Connection failures do not toast; the banner covers it.
        assert_eq!(app.status.message, None);
    }

    #[test]
    fn test_fetch_failure_keeps_stale_tasks_and_toasts() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![sample_task("Read Ch. 3")])));
        assert_eq!(app.tasks.len(), 1);

        app.handle_api_event(ApiEvent::TasksLoaded(Err(backend_error())));
        assert_eq!(app.tasks.len(), 1);
        assert!(app.status.message.as_deref().unwrap().starts_with("Failed to load tasks"));
    }

    #[test]
    fn test_create_success_resets_form_and_refreshes_once() {
        let mut app = test_app();
        app.form.name.set_value("Linear algebra problem set");
        app.form.difficulty = 5;
        app.form.status = Priority::Ongoing;
        app.form.due.set_value("2025-06-20");
        app.form.submitting = true;

        let action = app.handle_api_event(ApiEvent::TaskCreated {
            name: "Linear algebra problem set".to_string(),
            result: ok_ack(),
        });
        assert_eq!(action, Action::Refresh);
        assert_eq!(app.form.name.value(), "");
        assert_eq!(app.form.difficulty, 3);
        assert_eq!(app.form.status, Priority::Pending);
        assert_eq!(app.form.due.value(), "");
        assert!(!app.form.submitting);
        assert!(app.status.message.as_deref().unwrap().contains("added"));
    }

    #[test]
    fn test_create_failure_keeps_typed_values() {
        let mut app = test_app();
        app.form.name.set_value("Essay draft");
        app.form.submitting = true;

        let action = app.handle_api_event(ApiEvent::TaskCreated {
            name: "Essay draft".to_string(),
            result: Err(backend_error()),
        });
        assert_eq!(action, Action::None);
        assert_eq!(app.form.name.value(), "Essay draft");
        assert!(!app.form.submitting);
    }

    #[test]
    fn test_submit_empty_due_defaults_to_one_week_out() {
        let mut app = test_app();
        app.form.name.set_value("Read Chapter 3");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        let action = app.submit_task_form(now);
        match action {
            Action::CreateTask(task) => {
                assert_eq!(task.timedue, default_timedue(now));
            }
            other => panic!("expected CreateTask, got {:?}", other),
        }
        assert!(app.form.submitting);
    }

    #[test]
    fn test_submit_empty_name_is_rejected_locally() {
        let mut app = test_app();
        app.form.name.set_value("   ");
        let action = app.submit_task_form(utils::now_utc());
        assert_eq!(action, Action::None);
        assert!(!app.form.submitting);
        assert_eq!(app.status.message.as_deref(), Some("Task name is required"));
    }

    #[test]
    fn test_cancel_delete_performs_no_call() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![sample_task("Flashcards")])));
        app.request_delete_selected();
        app.toggle_delete_selection();

        let action = app.confirm_delete_selection();
        assert_eq!(action, Action::None);
        assert_eq!(app.delete_confirmation, None);
    }

    #[test]
    fn test_confirm_delete_yields_delete_action() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![sample_task("Flashcards")])));
        app.request_delete_selected();

        let action = app.confirm_delete_selection();
        assert_eq!(action, Action::DeleteTask("Flashcards".to_string()));
    }

    #[test]
    fn test_failed_generation_keeps_previous_plan() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::PlanGenerated(Ok(sample_plan(&["Read Ch. 3"]))));
        assert!(app.plan.plan.is_some());

        app.plan.generating = true;
        app.handle_api_event(ApiEvent::PlanGenerated(Err(backend_error())));
        assert!(!app.plan.generating);
        let plan = app.plan.plan.as_ref().unwrap();
        assert_eq!(plan.schedule[0].task_name, "Read Ch. 3");
    }

    #[test]
    fn test_plan_form_rejects_out_of_range_hours() {
        let mut app = test_app();
        app.plan.hours.set_value("30");
        assert_eq!(app.submit_plan_form(), Action::None);
        assert!(!app.plan.generating);

        app.plan.hours.set_value("4");
        app.plan.duration.set_value("1.5");
        match app.submit_plan_form() {
            Action::GeneratePlan { hours, duration } => {
                assert_eq!(hours, 4.0);
                assert_eq!(duration, 1.5);
            }
            other => panic!("expected GeneratePlan, got {:?}", other),
        }
        assert!(app.plan.generating);
    }

    #[test]
    fn test_mark_missed_swaps_in_updated_plan() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::PlanGenerated(Ok(sample_plan(&["A", "B"]))));

        let action = app.handle_api_event(ApiEvent::SessionMissed(Ok(MarkMissedResponse {
            status: "success".to_string(),
            missed_task: "A".to_string(),
            updated_plan: sample_plan(&["B"]),
        })));
        assert_eq!(action, Action::Refresh);
        assert_eq!(app.plan.plan.as_ref().unwrap().schedule.len(), 1);
    }

    #[test]
    fn test_selection_clamps_when_list_shrinks() {
        let mut app = test_app();
        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![
            sample_task("A"),
            sample_task("B"),
            sample_task("C"),
        ])));
        app.select_next_task();
        app.select_next_task();
        assert_eq!(app.task_list_state.selected(), Some(2));

        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![sample_task("A")])));
        assert_eq!(app.task_list_state.selected(), Some(0));

        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![])));
        assert_eq!(app.task_list_state.selected(), None);
    }

    #[test]
    fn test_cycle_status_targets_selected_task() {
        let mut app = test_app();
        let mut task = sample_task("Read Ch. 3");
        task.priority = Priority::Ongoing;
        app.handle_api_event(ApiEvent::TasksLoaded(Ok(vec![task])));

        let action = app.cycle_selected_status();
        assert_eq!(
            action,
            Action::UpdateStatus {
                name: "Read Ch. 3".to_string(),
                status: Priority::Completed,
            }
        );
    }
}
