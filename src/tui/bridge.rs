//! Worker-thread side of the TUI. The event loop never blocks on the
//! network: each backend call runs on its own thread and reports back over
//! an mpsc channel as a typed [`ApiEvent`]. Requests are independent and
//! carry no ordering: the health probe and the initial task fetch may
//! settle in either order.

use std::sync::mpsc::Sender;
use std::thread;

use crate::api::{ApiClient, ApiError};
use crate::models::{Ack, HealthResponse, MarkMissedResponse, NewTask, Priority, Stats, StudyPlan, Task};

/// Outcome of one backend call, delivered to the event loop.
#[derive(Debug)]
pub enum ApiEvent {
    Health(Result<HealthResponse, ApiError>),
    TasksLoaded(Result<Vec<Task>, ApiError>),
    StatsLoaded(Result<Stats, ApiError>),
    TaskCreated {
        name: String,
        result: Result<Ack, ApiError>,
    },
    StatusUpdated {
        status: Priority,
        result: Result<Ack, ApiError>,
    },
    TaskDeleted {
        name: String,
        result: Result<Ack, ApiError>,
    },
    PlanGenerated(Result<StudyPlan, ApiError>),
    SessionMissed(Result<MarkMissedResponse, ApiError>),
}

pub struct ApiBridge {
    client: ApiClient,
    tx: Sender<ApiEvent>,
}

impl ApiBridge {
    pub fn new(client: ApiClient, tx: Sender<ApiEvent>) -> Self {
        Self { client, tx }
    }

    fn dispatch<F>(&self, call: F)
    where
        F: FnOnce(ApiClient) -> ApiEvent + Send + 'static,
    {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            // The receiver is gone during shutdown; nothing left to report to.
            let _ = tx.send(call(client));
        });
    }

    pub fn check_health(&self) {
        self.dispatch(|client| ApiEvent::Health(client.health()));
    }

    pub fn load_tasks(&self) {
        self.dispatch(|client| ApiEvent::TasksLoaded(client.get_tasks()));
    }

    pub fn load_stats(&self) {
        self.dispatch(|client| ApiEvent::StatsLoaded(client.stats()));
    }

    pub fn create_task(&self, task: NewTask) {
        self.dispatch(move |client| ApiEvent::TaskCreated {
            name: task.task_name.clone(),
            result: client.create_task(&task),
        });
    }

    pub fn update_status(&self, name: String, status: Priority) {
        self.dispatch(move |client| ApiEvent::StatusUpdated {
            status,
            result: client.update_task_status(&name, status),
        });
    }

    pub fn delete_task(&self, name: String) {
        self.dispatch(move |client| ApiEvent::TaskDeleted {
            result: client.delete_task(&name),
            name,
        });
    }

    pub fn generate_plan(&self, hours: f64, duration: f64) {
        self.dispatch(move |client| ApiEvent::PlanGenerated(client.generate_plan(hours, duration)));
    }

    pub fn mark_missed(&self, name: String) {
        self.dispatch(move |client| ApiEvent::SessionMissed(client.mark_missed(&name)));
    }
}
