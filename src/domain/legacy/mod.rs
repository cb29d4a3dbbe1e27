//! Legacy license domain module.
//!
//! Numbered, purchasable entitlements and their sales ledger.
//!
//! # Module Structure
//!
//! - `license` - License aggregate and its lifecycle transitions
//! - `status` - LicenseStatus state machine
//! - `pricing` - Discount arithmetic and pre-persist derivation
//! - `purchase` - Payment details and ledger entries

mod errors;
mod events;
mod license;
mod license_number;
mod license_type;
pub mod pricing;
mod purchase;
mod status;

pub use errors::{LicenseError, INVALID_DISCOUNT_MESSAGE};
pub use events::{
    LicenseCreated, LicenseExpired, LicenseForcedAvailable, LicensePurchased, LicenseReleased,
    LicenseRepriced, LicenseReserved,
};
pub use license::{License, DEFAULT_FAMILY_MEMBERS_LIMIT, DEFAULT_STORAGE_LIMIT_GB};
pub use license_number::LicenseNumber;
pub use license_type::LicenseType;
pub use purchase::{LicensePurchase, PaymentDetails};
pub use status::LicenseStatus;
