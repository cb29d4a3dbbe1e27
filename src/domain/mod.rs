//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared value objects, IDs, errors and events
//! - `legacy` - Legacy license lifecycle and purchase ledger
//! - `wakeroom` - WakeRoom experiences and session lifecycle

pub mod foundation;
pub mod legacy;
pub mod wakeroom;
