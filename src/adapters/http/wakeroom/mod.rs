//! HTTP adapter for WakeRoom endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{WakeRoomApiError, WakeRoomAppState};
pub use routes::wakeroom_routes;
