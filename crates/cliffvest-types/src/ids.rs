//! Ledger addresses.
//!
//! An [`Address`] is a 20-byte account identifier. Recipients, the issuer and
//! every schedule's custodial account share the same address space; schedule
//! addresses are derived deterministically from `(issuer, recipient)`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::CliffvestError;

/// Number of bytes in an address.
pub const ADDRESS_BYTES: usize = 20;

/// A 20-byte ledger address, displayed as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// The zero address. Used as the "absent" sentinel and the default issuer.
    pub const ZERO: Self = Self([0u8; ADDRESS_BYTES]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Custodial address of the release schedule that `issuer` creates for
    /// `recipient`.
    ///
    /// Every node computes the same address for the same pair, and two
    /// recipients never share one.
    #[must_use]
    pub fn schedule_for(issuer: Address, recipient: Address) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"cliffvest:schedule:v1:");
        hasher.update(issuer.0);
        hasher.update(recipient.0);
        let hash = hasher.finalize();
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&hash[..ADDRESS_BYTES]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = CliffvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| CliffvestError::Configuration(format!("invalid address {s:?}: {e}")))?;
        let bytes: [u8; ADDRESS_BYTES] = raw.try_into().map_err(|raw: Vec<u8>| {
            CliffvestError::Configuration(format!(
                "invalid address {s:?}: expected {ADDRESS_BYTES} bytes, got {}",
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Random address for tests and fixtures. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Address whose last byte is `n`; handy for readable fixtures.
    #[must_use]
    pub fn from_low_u8(n: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes[ADDRESS_BYTES - 1] = n;
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_hex() {
        let addr = Address::from_low_u8(0xab);
        assert_eq!(
            addr.to_string(),
            "0x00000000000000000000000000000000000000ab"
        );
    }

    #[test]
    fn parse_accepts_with_and_without_prefix() {
        let addr = Address::random();
        let with: Address = addr.to_string().parse().unwrap();
        let without: Address = hex::encode(addr.0).parse().unwrap();
        assert_eq!(addr, with);
        assert_eq!(addr, without);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert!(matches!(err, CliffvestError::Configuration(_)));
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!("0xzz00000000000000000000000000000000000000"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn schedule_address_is_deterministic() {
        let issuer = Address::random();
        let recipient = Address::random();
        assert_eq!(
            Address::schedule_for(issuer, recipient),
            Address::schedule_for(issuer, recipient)
        );
        assert_ne!(
            Address::schedule_for(issuer, recipient),
            Address::schedule_for(issuer, Address::random())
        );
        assert_ne!(Address::schedule_for(issuer, recipient), recipient);
        assert!(!Address::schedule_for(issuer, recipient).is_zero());
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::from_low_u8(1);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000001\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn zero_is_default() {
        assert!(Address::default().is_zero());
        assert!(!Address::from_low_u8(1).is_zero());
    }
}
