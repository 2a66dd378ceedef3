use crate::error::{AppError, AppResult};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of hex characters in the external form of an id.
const HEX_WIDTH: usize = 16;

/// 64-bit object identifier. Rendered externally as a fixed-width 16-character
/// lowercase hex string; stored as a BIGINT.
///
/// Every caller-supplied id string must pass [`ObjectId::parse`] before it is
/// embedded in a query. A malformed id is rejected with `InvalidArgument`
/// without touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(i64);

impl ObjectId {
    pub fn new(raw: i64) -> Self {
        ObjectId(raw)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Parse the external hex form. Accepts exactly 16 lowercase or uppercase
    /// hex characters; anything else is an `InvalidArgument`.
    pub fn parse(s: &str) -> AppResult<Self> {
        if s.len() != HEX_WIDTH || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AppError::InvalidArgument(format!(
                "malformed object id: {:?}",
                s
            )));
        }
        let raw = u64::from_str_radix(s, 16)
            .map_err(|e| AppError::InvalidArgument(format!("malformed object id: {}", e)))?;
        Ok(ObjectId(raw as i64))
    }

    /// Identifier validator contract: true only for a well-formed id string.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl From<i64> for ObjectId {
    fn from(raw: i64) -> Self {
        ObjectId(raw)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0 as u64)
    }
}

impl FromStr for ObjectId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectId::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let id = ObjectId::new(0x1234_5678_9abc_def0_u64 as i64);
        let s = id.to_string();
        assert_eq!(s, "123456789abcdef0");
        assert_eq!(ObjectId::parse(&s).unwrap(), id);
    }

    #[test]
    fn rejects_short_and_long_strings() {
        assert!(ObjectId::parse("abc").is_err());
        assert!(ObjectId::parse("123456789abcdef").is_err()); // 15 chars
        assert!(ObjectId::parse("123456789abcdef01").is_err()); // 17 chars
        assert!(ObjectId::parse("").is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!(ObjectId::parse("123456789abcdefg").is_err());
        assert!(ObjectId::parse("0x23456789abcdef").is_err());
        assert!(ObjectId::parse("12 3456789abcdef").is_err());
    }

    #[test]
    fn malformed_id_is_invalid_argument() {
        match ObjectId::parse("abc") {
            Err(AppError::InvalidArgument(_)) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn is_valid_matches_parse() {
        assert!(ObjectId::is_valid("0000000000000001"));
        assert!(ObjectId::is_valid("FFFFFFFFFFFFFFFF"));
        assert!(!ObjectId::is_valid("abc"));
    }

    #[test]
    fn high_bit_ids_survive_the_round_trip() {
        let id = ObjectId::parse("ffffffffffffffff").unwrap();
        assert_eq!(id.as_i64(), -1);
        assert_eq!(id.to_string(), "ffffffffffffffff");
    }
}
