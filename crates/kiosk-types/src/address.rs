//! Validated Sui identifiers.
//!
//! Wallet addresses and object ids share the same encoding (32 bytes, written
//! as `0x` followed by 64 hex characters) but mean different things, so they
//! get distinct newtypes. Both are validated strictly on construction: short
//! forms such as `0x2` are rejected, since every id handed to a lookup must be
//! exactly what the fullnode returns.
//!
//! The stored form is always lowercase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of hex characters after the `0x` prefix.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Trim and lowercase a hex identifier, returning `None` unless it is exactly
/// `0x` + 64 hex characters.
///
/// # Examples
///
/// ```
/// use sui_kiosk_types::normalize_hex;
///
/// let full = format!("0x{}", "AB".repeat(32));
/// assert_eq!(normalize_hex(&full), Some(format!("0x{}", "ab".repeat(32))));
/// assert_eq!(normalize_hex("0x2"), None);
/// assert_eq!(normalize_hex("not-hex"), None);
/// ```
pub fn normalize_hex(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    if hex_part.len() != ADDRESS_HEX_LEN {
        return None;
    }
    let bytes = hex::decode(hex_part).ok()?;
    Some(format!("0x{}", hex::encode(bytes)))
}

macro_rules! hex_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and normalize a raw identifier.
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                normalize_hex(raw)
                    .map(Self)
                    .ok_or_else(|| ValidationError::new($kind, raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Abbreviated form for log lines: `0x1234…abcd`.
            pub fn short(&self) -> String {
                format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

hex_identifier!(
    /// A wallet address.
    Address,
    "address"
);

hex_identifier!(
    /// Any on-chain object id (capabilities, kiosks, items).
    ObjectId,
    "object id"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn full(byte: &str) -> String {
        format!("0x{}", byte.repeat(32))
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let raw = format!("  {}  ", full("Ab"));
        let addr = Address::parse(&raw).unwrap();
        assert_eq!(addr.as_str(), full("ab"));
    }

    #[test]
    fn test_parse_rejects_short_and_malformed() {
        assert!(Address::parse("0x2").is_err());
        assert!(Address::parse(&"ab".repeat(32)).is_err(), "missing 0x prefix");
        assert!(Address::parse(&format!("0x{}", "zz".repeat(32))).is_err());
        assert!(ObjectId::parse(&format!("{}00", full("11"))).is_err());
        assert!(ObjectId::parse("").is_err());
    }

    #[test]
    fn test_validation_error_names_kind() {
        let err = ObjectId::parse("0xnope").unwrap_err();
        assert_eq!(err.kind, "object id");
        assert_eq!(err.value, "0xnope");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let id = ObjectId::parse(&full("0f")).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", full("0f")));

        let bad: Result<ObjectId, _> = serde_json::from_str("\"0x1\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_short_form() {
        let id = ObjectId::parse(&full("12")).unwrap();
        assert_eq!(id.short(), "0x1212…1212");
    }
}
