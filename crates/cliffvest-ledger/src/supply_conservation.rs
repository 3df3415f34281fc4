//! Supply conservation invariant checker.
//!
//! Invariant enforced after construction and after every release:
//! ```text
//! Σ balance(address) == Σ credits
//! ```
//!
//! Transfers move units between addresses and never change the sum. Only a
//! credit (issuance) does, and the tracker records every one.

use cliffvest_types::{CliffvestError, Quantity, Result};

/// Tracks issued supply and validates conservation.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    /// Total credited since genesis.
    issued: Quantity,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self { issued: 0 }
    }

    /// Record an issuance.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if issuance would exceed `u128::MAX`.
    pub fn record_issuance(&mut self, amount: Quantity) -> Result<()> {
        self.issued = self
            .issued
            .checked_add(amount)
            .ok_or(CliffvestError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Total issued so far.
    #[must_use]
    pub fn issued(&self) -> Quantity {
        self.issued
    }

    /// Verify that the actual supply (sum of all balances) matches issuance.
    ///
    /// # Errors
    /// Returns [`CliffvestError::SupplyInvariantViolation`] if actual ≠ issued.
    pub fn verify(&self, actual_supply: Quantity) -> Result<()> {
        if actual_supply != self.issued {
            return Err(CliffvestError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != issued {}",
                    self.issued
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.issued(), 0);
        assert!(sc.verify(0).is_ok());
    }

    #[test]
    fn issuance_accumulates() {
        let mut sc = SupplyConservation::new();
        sc.record_issuance(1000).unwrap();
        sc.record_issuance(500).unwrap();
        assert_eq!(sc.issued(), 1500);
        assert!(sc.verify(1500).is_ok());
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_issuance(10).unwrap();
        let err = sc.verify(11).unwrap_err();
        assert!(matches!(
            err,
            CliffvestError::SupplyInvariantViolation { .. }
        ));
    }

    #[test]
    fn issuance_overflow_is_rejected() {
        let mut sc = SupplyConservation::new();
        sc.record_issuance(u128::MAX).unwrap();
        assert!(matches!(
            sc.record_issuance(1),
            Err(CliffvestError::ArithmeticOverflow)
        ));
        assert_eq!(sc.issued(), u128::MAX);
    }
}
