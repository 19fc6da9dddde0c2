pub mod app;
pub mod bridge;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod widgets;

pub use app::{Action, App, ConnectionStatus, Mode, Tab};
pub use bridge::{ApiBridge, ApiEvent};
pub use error::TuiError;
pub use events::run_event_loop;
pub use layout::Layout;
pub use render::render;
