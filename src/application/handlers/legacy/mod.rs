//! Legacy license handlers.
//!
//! ## Commands
//! - Creating a license (admin)
//! - Reserving, releasing and purchasing
//! - Bulk discount, expiry and forced reset (admin)
//!
//! ## Queries
//! - License view and catalogue listing
//! - Remaining availability count
//! - Statistics (admin)
//! - The caller's purchase ledger

mod apply_discount;
mod create_license;
mod expire_license;
mod force_available;
mod get_license;
mod get_license_statistics;
mod get_my_purchases;
mod get_remaining_count;
mod list_licenses;
mod purchase_license;
mod release_license;
mod reserve_license;

// Commands
pub use apply_discount::{ApplyDiscountCommand, ApplyDiscountHandler, ApplyDiscountResult};
pub use create_license::{CreateLicenseCommand, CreateLicenseHandler, CreateLicenseResult};
pub use expire_license::{ExpireLicenseCommand, ExpireLicenseHandler, ExpireLicenseResult};
pub use force_available::{ForceAvailableCommand, ForceAvailableHandler, ForceAvailableResult};
pub use purchase_license::{PurchaseLicenseCommand, PurchaseLicenseHandler, PurchaseLicenseResult};
pub use release_license::{ReleaseLicenseCommand, ReleaseLicenseHandler, ReleaseLicenseResult};
pub use reserve_license::{ReserveLicenseCommand, ReserveLicenseHandler, ReserveLicenseResult};

// Queries
pub use get_license::{GetLicenseHandler, GetLicenseQuery};
pub use get_license_statistics::GetLicenseStatisticsHandler;
pub use get_my_purchases::GetMyPurchasesHandler;
pub use get_remaining_count::GetRemainingCountHandler;
pub use list_licenses::ListLicensesHandler;
