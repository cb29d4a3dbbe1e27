//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresLicenseRepository` - License writes and the purchase ledger
//! - `PostgresLicenseReader` - License views, counts and statistics
//! - `PostgresSessionRepository` / `PostgresSessionReader` - WakeRoom sessions
//! - `PostgresExperienceRepository` - WakeRoom experience catalogue

mod experience_repository;
mod license_reader;
mod license_repository;
mod session_reader;
mod session_repository;

pub use experience_repository::PostgresExperienceRepository;
pub use license_reader::PostgresLicenseReader;
pub use license_repository::PostgresLicenseRepository;
pub use session_reader::PostgresSessionReader;
pub use session_repository::PostgresSessionRepository;
