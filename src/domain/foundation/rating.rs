//! Star rating left at the end of a WakeRoom session (1 to 5).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
#[repr(u8)]
pub enum Rating {
    Poor = 1,
    Fair = 2,
    Good = 3,
    VeryGood = 4,
    Excellent = 5,
}

impl Rating {
    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_from_int(value: i64) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Rating::Poor),
            2 => Ok(Rating::Fair),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::VeryGood),
            5 => Ok(Rating::Excellent),
            _ => Err(ValidationError::out_of_range(
                "rating",
                1,
                5,
                i32::try_from(value).unwrap_or(i32::MAX),
            )),
        }
    }

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Fair => "Fair",
            Rating::Good => "Good",
            Rating::VeryGood => "Very Good",
            Rating::Excellent => "Excellent",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from_int(value)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self {
        r.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_through_five() {
        for v in 1..=5 {
            assert_eq!(Rating::try_from_int(v).unwrap().value() as i64, v);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for v in [0, 6, -1, 100] {
            assert!(Rating::try_from_int(v).is_err(), "accepted {}", v);
        }
    }

    #[test]
    fn labels_and_display() {
        assert_eq!(Rating::VeryGood.label(), "Very Good");
        assert_eq!(Rating::Excellent.to_string(), "5/5");
    }

    #[test]
    fn deserialization_validates_range() {
        assert_eq!(serde_json::from_str::<Rating>("4").unwrap(), Rating::VeryGood);
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("7").is_err());
        assert_eq!(serde_json::to_string(&Rating::Fair).unwrap(), "2");
    }
}
