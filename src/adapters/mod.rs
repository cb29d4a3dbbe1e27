//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-memory event bus
//! - `http` - Axum REST API
//! - `memory` - In-memory stores for tests and database-less runs
//! - `postgres` - PostgreSQL persistence via sqlx

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::InMemoryEventBus;
pub use memory::{InMemoryLicenseStore, InMemoryWakeRoomStore};
