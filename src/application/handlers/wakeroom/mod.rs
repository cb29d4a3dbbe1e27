//! WakeRoom handlers.
//!
//! ## Commands
//! - Creating an experience (admin)
//! - Starting and ending a session
//!
//! ## Queries
//! - Experience and session views
//! - Experience catalogue and the caller's session history
//! - Session statistics

mod create_experience;
mod end_session;
mod get_experience;
mod get_my_sessions;
mod get_session;
mod get_session_statistics;
mod list_experiences;
mod start_session;

// Commands
pub use create_experience::{CreateExperienceCommand, CreateExperienceHandler};
pub use end_session::{EndSessionCommand, EndSessionHandler, EndSessionResult};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};

// Queries
pub use get_experience::GetExperienceHandler;
pub use get_my_sessions::GetMySessionsHandler;
pub use get_session::GetSessionHandler;
pub use get_session_statistics::GetSessionStatisticsHandler;
pub use list_experiences::ListExperiencesHandler;
