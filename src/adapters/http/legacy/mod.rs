//! HTTP adapter for legacy license endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{LegacyAppState, LicenseApiError};
pub use routes::legacy_routes;
