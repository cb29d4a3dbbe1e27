//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers, errors and event plumbing shared by the
//! legacy-license and WakeRoom modules.

mod errors;
mod events;
mod ids;
mod money;
mod percentage;
mod rating;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{ExperienceId, LicenseId, MemorialId, PurchaseId, SessionId, UserId};
pub use money::Money;
pub(crate) use money::div_round_half_even;
pub use percentage::Percentage;
pub use rating::Rating;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
