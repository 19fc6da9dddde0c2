pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod plan;
pub mod tui;
pub mod utils;

pub use api::ApiClient;
pub use config::Config;
pub use models::{Priority, Stats, StudyPlan, Task};
pub use utils::Profile;
