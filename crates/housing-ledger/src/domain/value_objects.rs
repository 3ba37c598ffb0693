//! # Value Objects
//!
//! Immutable primitives shared by every ledger component. These types are
//! defined by their value, not identity.

use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in the smallest currency unit.
///
/// u128 keeps accumulation far away from overflow; every addition on the
/// ledger is still checked.
pub type Amount = u128;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account address, as resolved by the transport layer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address. Never a valid caller.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parses a hex address, with or without a `0x` prefix.
    pub fn from_hex(value: &str) -> Result<Self, LedgerError> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| LedgerError::InvalidInput {
            reason: format!("address {value:?} is not hex: {e}"),
        })?;
        let array: [u8; 20] = bytes.try_into().map_err(|_| LedgerError::InvalidInput {
            reason: format!("address {value:?} must be 20 bytes"),
        })?;
        Ok(Self(array))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Full lowercase hex form with `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// REFERENCE IDENTIFIER (32 bytes)
// =============================================================================

/// A fixed-width 32-byte opaque reference.
///
/// Used for national identity numbers, project and unit references.
/// The all-zero value means "absent".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RefId(pub [u8; 32]);

impl RefId {
    /// The empty reference.
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Creates a reference from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Encodes a short UTF-8 label, right-padded with zero bytes.
    ///
    /// `"1234567890"` becomes `0x3132..3930` followed by 22 zero bytes.
    pub fn from_label(label: &str) -> Result<Self, LedgerError> {
        let raw = label.as_bytes();
        if raw.len() > 32 {
            return Err(LedgerError::InvalidInput {
                reason: format!("label {label:?} is longer than 32 bytes"),
            });
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    /// Returns true if every byte is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decodes the label form back, if the bytes are printable UTF-8.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let text = std::str::from_utf8(&self.0[..end]).ok()?;
        if text.chars().all(|c| !c.is_control()) {
            Some(text.to_string())
        } else {
            None
        }
    }
}

impl fmt::Debug for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) if !label.is_empty() => write!(f, "{label}"),
            _ => write!(f, "0x{}", hex::encode(&self.0[..4])),
        }
    }
}

impl From<[u8; 32]> for RefId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// UNIT TYPE
// =============================================================================

/// Category of a housing unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Single room with kitchenette.
    #[default]
    Bedsitter,
    /// One bedroom.
    OneBedroom,
    /// Two bedrooms.
    TwoBedroom,
    /// Three bedrooms.
    ThreeBedroom,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bedsitter => "bedsitter",
            Self::OneBedroom => "one_bedroom",
            Self::TwoBedroom => "two_bedroom",
            Self::ThreeBedroom => "three_bedroom",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_from_label_pads_with_zeros() {
        let id = RefId::from_label("1234567890").unwrap();
        assert_eq!(&id.0[..10], b"1234567890");
        assert!(id.0[10..].iter().all(|b| *b == 0));
        assert_eq!(id.label().as_deref(), Some("1234567890"));
        assert_eq!(id.to_string(), "1234567890");
    }

    #[test]
    fn test_ref_label_too_long() {
        let long = "x".repeat(33);
        assert!(RefId::from_label(&long).is_err());
        assert!(RefId::from_label(&"y".repeat(32)).is_ok());
    }

    #[test]
    fn test_empty_label_is_empty_ref() {
        let id = RefId::from_label("").unwrap();
        assert!(id.is_empty());
        assert_eq!(id, RefId::EMPTY);
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::new([0xAB; 20]);
        let parsed = Address::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(parsed, addr);
        assert_eq!(Address::from_hex(&hex::encode([0xAB; 20])).unwrap(), addr);
    }

    #[test]
    fn test_address_hex_rejects_bad_input() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("not-hex").is_err());
    }

    #[test]
    fn test_unit_type_names() {
        assert_eq!(UnitType::TwoBedroom.to_string(), "two_bedroom");
        assert_eq!(UnitType::default(), UnitType::Bedsitter);
    }
}
