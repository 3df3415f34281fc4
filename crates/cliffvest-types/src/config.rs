//! Distribution configuration.
//!
//! A distribution is described in JSON with human-readable token amounts:
//!
//! ```json
//! {
//!   "issuer": "0x0000000000000000000000000000000000000000",
//!   "allocations": [
//!     { "recipient": "0x…01", "lock_days": 10, "tokens": "10" },
//!     { "recipient": "0x…02", "tokens": "10000000" }
//!   ]
//! }
//! ```
//!
//! Loading only parses; the table invariants are checked at construction.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, CliffvestError, Quantity, Result, amount};

/// A full distribution: who issues, and who gets what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// `from` address on construction transfers. Defaults to the zero address.
    #[serde(default)]
    pub issuer: Address,
    /// Allocations in table order.
    pub allocations: Vec<AllocationSpec>,
}

/// One allocation, in whole-token units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSpec {
    pub recipient: Address,
    #[serde(default)]
    pub lock_days: u64,
    pub tokens: Decimal,
}

/// Parallel input columns in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationColumns {
    pub recipients: Vec<Address>,
    pub lock_days: Vec<u64>,
    pub amounts: Vec<Quantity>,
}

impl DistributionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|e| match e {
            CliffvestError::Serialization(msg) => {
                CliffvestError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Split into the three construction columns, converting tokens to base
    /// units.
    ///
    /// # Errors
    /// `Configuration` or `ArithmeticOverflow` if a token amount cannot be
    /// expressed in base units.
    pub fn to_columns(&self) -> Result<AllocationColumns> {
        let mut columns = AllocationColumns {
            recipients: Vec::with_capacity(self.allocations.len()),
            lock_days: Vec::with_capacity(self.allocations.len()),
            amounts: Vec::with_capacity(self.allocations.len()),
        };
        for spec in &self.allocations {
            columns.recipients.push(spec.recipient);
            columns.lock_days.push(spec.lock_days);
            columns.amounts.push(amount::tokens_to_units(spec.tokens)?);
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNITS_PER_TOKEN;

    const SAMPLE: &str = r#"{
        "issuer": "0x00000000000000000000000000000000000000ff",
        "allocations": [
            { "recipient": "0x0000000000000000000000000000000000000001", "lock_days": 10, "tokens": "10" },
            { "recipient": "0x0000000000000000000000000000000000000002", "tokens": "0.5" }
        ]
    }"#;

    #[test]
    fn parses_sample() {
        let cfg = DistributionConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(cfg.issuer, Address::from_low_u8(0xff));
        assert_eq!(cfg.allocations.len(), 2);
        assert_eq!(cfg.allocations[1].lock_days, 0);
    }

    #[test]
    fn columns_are_in_base_units() {
        let cols = DistributionConfig::from_json_str(SAMPLE)
            .unwrap()
            .to_columns()
            .unwrap();
        assert_eq!(
            cols.recipients,
            vec![Address::from_low_u8(1), Address::from_low_u8(2)]
        );
        assert_eq!(cols.lock_days, vec![10, 0]);
        assert_eq!(cols.amounts, vec![10 * UNITS_PER_TOKEN, UNITS_PER_TOKEN / 2]);
    }

    #[test]
    fn issuer_defaults_to_zero() {
        let cfg = DistributionConfig::from_json_str(r#"{ "allocations": [] }"#).unwrap();
        assert!(cfg.issuer.is_zero());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = DistributionConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.reason(), "SERIALIZATION");
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = DistributionConfig::from_json_str(
            r#"{ "allocations": [ { "recipient": "0x12", "tokens": "1" } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.reason(), "SERIALIZATION");
    }

    #[test]
    fn negative_tokens_fail_conversion() {
        let cfg = DistributionConfig::from_json_str(
            r#"{ "allocations": [ { "recipient": "0x0000000000000000000000000000000000000001", "tokens": "-1" } ] }"#,
        )
        .unwrap();
        assert_eq!(cfg.to_columns().unwrap_err().reason(), "CONFIGURATION");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DistributionConfig::from_path("/nonexistent/cliffvest.json").unwrap_err();
        assert_eq!(err.reason(), "IO");
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("cliffvest-{}.json", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = DistributionConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.allocations.len(), 2);
    }
}
