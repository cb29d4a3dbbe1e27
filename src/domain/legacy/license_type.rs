//! License product tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    /// The numbered launch run of 250 licenses.
    #[default]
    #[serde(rename = "FOMO_250")]
    Fomo250,
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "PREMIUM")]
    Premium,
}

impl LicenseType {
    pub const ALL: [LicenseType; 3] = [LicenseType::Fomo250, LicenseType::Standard, LicenseType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Fomo250 => "FOMO_250",
            LicenseType::Standard => "STANDARD",
            LicenseType::Premium => "PREMIUM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LicenseType::Fomo250 => "FOMO 250 License",
            LicenseType::Standard => "Standard License",
            LicenseType::Premium => "Premium License",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LicenseType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("license_type", format!("unknown license type '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_launch_run() {
        assert_eq!(LicenseType::default(), LicenseType::Fomo250);
    }

    #[test]
    fn wire_names_are_upper_case() {
        assert_eq!(serde_json::to_string(&LicenseType::Fomo250).unwrap(), "\"FOMO_250\"");
        assert_eq!(
            serde_json::from_str::<LicenseType>("\"PREMIUM\"").unwrap(),
            LicenseType::Premium
        );
    }

    #[test]
    fn from_str_matches_as_str() {
        for t in LicenseType::ALL {
            assert_eq!(t.as_str().parse::<LicenseType>().unwrap(), t);
        }
        assert!("premium".parse::<LicenseType>().is_err());
    }
}
