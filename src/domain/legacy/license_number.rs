//! Public license number within the fixed 1..=250 run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct LicenseNumber(u16);

impl LicenseNumber {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 250;

    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(ValidationError::out_of_range(
                "license_number",
                i32::from(Self::MIN),
                i32::from(Self::MAX),
                i32::try_from(value).unwrap_or(i32::MAX),
            ));
        }
        Ok(Self(value as u16))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for LicenseNumber {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<LicenseNumber> for u16 {
    fn from(n: LicenseNumber) -> Self {
        n.0
    }
}

impl fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(LicenseNumber::try_new(1).unwrap().value(), 1);
        assert_eq!(LicenseNumber::try_new(250).unwrap().value(), 250);
    }

    #[test]
    fn rejects_outside_run() {
        assert!(LicenseNumber::try_new(0).is_err());
        assert!(LicenseNumber::try_new(251).is_err());
        assert!(LicenseNumber::try_new(-3).is_err());
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(LicenseNumber::try_new(7).unwrap().to_string(), "#007");
    }
}
