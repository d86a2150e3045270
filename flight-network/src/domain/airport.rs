//! Airport code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirportCode {
    reason: &'static str,
}

/// A valid 4-character ICAO-style airport code.
///
/// Codes are 4 uppercase ASCII letters or digits. Any `AirportCode` value is
/// valid by construction, and the type is `Copy` so graph indexes and search
/// states can hold it by value.
///
/// # Examples
///
/// ```
/// use flight_network::domain::AirportCode;
///
/// let egll = AirportCode::parse("EGLL").unwrap();
/// assert_eq!(egll.as_str(), "EGLL");
///
/// // Lowercase is rejected by the strict parser
/// assert!(AirportCode::parse("egll").is_err());
///
/// // ...but accepted by the normalizing one
/// assert_eq!(AirportCode::parse_normalized(" egll ").unwrap(), egll);
///
/// // Wrong length is rejected
/// assert!(AirportCode::parse("LHR").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportCode([u8; 4]);

impl AirportCode {
    /// Parse an airport code from a string.
    ///
    /// The input must be exactly 4 uppercase ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidAirportCode> {
        let bytes = s.as_bytes();

        if bytes.is_empty() {
            return Err(InvalidAirportCode {
                reason: "must not be blank",
            });
        }

        if bytes.len() != 4 {
            return Err(InvalidAirportCode {
                reason: "must be exactly 4 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidAirportCode {
                    reason: "must be uppercase ASCII letters A-Z or digits",
                });
            }
        }

        Ok(AirportCode([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Parse user-supplied input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirportCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters and digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AirportCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(AirportCode::parse("EGLL").is_ok());
        assert!(AirportCode::parse("LFPG").is_ok());
        assert!(AirportCode::parse("KJFK").is_ok());
        assert!(AirportCode::parse("K2W0").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(AirportCode::parse("egll").is_err());
        assert!(AirportCode::parse("Egll").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(AirportCode::parse("").is_err());
        assert!(AirportCode::parse("EGL").is_err());
        assert!(AirportCode::parse("EGLLX").is_err());
    }

    #[test]
    fn reject_punctuation_and_non_ascii() {
        assert!(AirportCode::parse("EG-L").is_err());
        assert!(AirportCode::parse("EG L").is_err());
        assert!(AirportCode::parse("EGLÖ").is_err());
    }

    #[test]
    fn blank_has_its_own_reason() {
        let err = AirportCode::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid airport code: must not be blank");
    }

    #[test]
    fn normalized_trims_and_uppercases() {
        let code = AirportCode::parse_normalized("  kjfk\n").unwrap();
        assert_eq!(code.as_str(), "KJFK");
        assert!(AirportCode::parse_normalized("   ").is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = AirportCode::parse("LFPG").unwrap();
        assert_eq!(format!("{}", code), "LFPG");
        assert_eq!(format!("{:?}", code), "AirportCode(LFPG)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = AirportCode::parse("EGLL").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EGLL\"");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = AirportCode::parse("EGLL").unwrap();
        let b = AirportCode::parse("KJFK").unwrap();
        assert!(a < b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z0-9]{4}") {
            let code = AirportCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase input is rejected strictly but accepted when normalized
        #[test]
        fn lowercase_needs_normalizing(s in "[a-z]{4}") {
            prop_assert!(AirportCode::parse(&s).is_err());
            let normalized = AirportCode::parse_normalized(&s).unwrap();
            prop_assert_eq!(normalized.as_str(), s.to_ascii_uppercase());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,3}|[A-Z]{5,10}") {
            prop_assert!(AirportCode::parse(&s).is_err());
        }
    }
}
