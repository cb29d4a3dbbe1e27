//! WakeRoom domain module.
//!
//! AR/VR experiences and the timed sessions visitors run against them.

mod errors;
mod events;
mod experience;
mod session;

pub use errors::WakeRoomError;
pub use events::{ExperienceCreated, SessionEnded, SessionStarted};
pub use experience::{ExperienceStatus, ExperienceType, WakeRoomExperience, DEFAULT_DURATION_MINUTES};
pub use session::{DeviceInfo, SessionOutcome, WakeRoomSession};
