//! In-memory adapters.
//!
//! Process-local implementations of the persistence ports. They keep the
//! same compare-and-set guarantees as the PostgreSQL adapters by holding
//! one write lock across the status check and the write.
//!
//! - `InMemoryLicenseStore` - `LicenseRepository` + `LicenseReader`
//! - `InMemoryWakeRoomStore` - `SessionRepository` + `SessionReader` + `ExperienceRepository`

mod license_store;
mod wakeroom_store;

pub use license_store::InMemoryLicenseStore;
pub use wakeroom_store::InMemoryWakeRoomStore;
