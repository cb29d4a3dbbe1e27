//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Legacy licenses
//!
//! - `LicenseRepository` - Writes, including compare-and-set transitions
//! - `LicenseReader` - Views, counts and statistics
//!
//! ## WakeRoom
//!
//! - `SessionRepository` / `SessionReader` - Session lifecycle persistence
//! - `ExperienceRepository` / `ExperienceReader` - Experience catalogue
//!
//! ## Events
//!
//! - `EventPublisher` - Outbound domain events

mod event_publisher;
mod experience_reader;
mod experience_repository;
mod license_reader;
mod license_repository;
mod session_reader;
mod session_repository;

pub use event_publisher::EventPublisher;
pub use experience_reader::{ExperienceFilter, ExperienceReader};
pub use experience_repository::ExperienceRepository;
pub use license_reader::{
    LicenseFilter, LicenseReader, LicenseStatistics, LicenseSummary, LicenseView, PurchaseView,
    TypeCount,
};
pub use license_repository::{LicenseRepository, RecordedSale};
pub use session_reader::{SessionReader, SessionStatistics, SessionView};
pub use session_repository::SessionRepository;
