//! License status state machine.
//!
//! ```text
//! available ──reserve──▶ reserved ──purchase──▶ sold
//!     │  ◀──release──────────┘                   ▲
//!     └─────────────────purchase─────────────────┘
//! any non-expired ──expire──▶ expired
//! ```
//!
//! Administrative force-reset to `available` bypasses the
//! state machine; see `License::force_available`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Listed and free to be reserved or bought.
    Available,

    /// Held by one user pending purchase.
    Reserved,

    /// Bought. Final for the normal lifecycle.
    Sold,

    /// Withdrawn from sale.
    Expired,
}

impl LicenseStatus {
    /// Starting states from which a purchase may complete.
    pub const PURCHASABLE: [LicenseStatus; 2] = [LicenseStatus::Available, LicenseStatus::Reserved];

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Available => "available",
            LicenseStatus::Reserved => "reserved",
            LicenseStatus::Sold => "sold",
            LicenseStatus::Expired => "expired",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LicenseStatus::Available => "Available",
            LicenseStatus::Reserved => "Reserved",
            LicenseStatus::Sold => "Sold",
            LicenseStatus::Expired => "Expired",
        }
    }
}

impl StateMachine for LicenseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LicenseStatus::*;
        matches!(
            (self, target),
            (Available, Reserved)
                | (Available, Sold)
                | (Reserved, Sold)
                | (Reserved, Available)
                | (Available, Expired)
                | (Reserved, Expired)
                | (Sold, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LicenseStatus::*;
        match self {
            Available => vec![Reserved, Sold, Expired],
            Reserved => vec![Sold, Available, Expired],
            Sold => vec![Expired],
            Expired => vec![],
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(LicenseStatus::Available),
            "reserved" => Ok(LicenseStatus::Reserved),
            "sold" => Ok(LicenseStatus::Sold),
            "expired" => Ok(LicenseStatus::Expired),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown license status '{}'", other),
            )),
        }
    }
}
