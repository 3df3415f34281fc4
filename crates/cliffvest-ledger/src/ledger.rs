//! Balance bookkeeping for the fungible unit.
//!
//! Tracks per-address balances and per-(owner, spender) allowances.
//! All mutations are atomic: either the full operation succeeds or
//! the ledger is unchanged.

use std::collections::HashMap;

use cliffvest_types::{Address, CliffvestError, LedgerEvent, Quantity, Result};

use crate::supply_conservation::SupplyConservation;

/// The ledger primitive consumed by the allocation engine.
pub trait Ledger {
    /// Issue `amount` new units to `to`. Does not emit an event; the issuing
    /// component decides how issuance is reported.
    ///
    /// A credit may only fail when `to`'s balance or the issued supply would
    /// exceed `Quantity::MAX`, and a failed credit must leave the ledger
    /// unchanged. Allocation issuance relies on this: it credits a fresh
    /// ledger with amounts summing to the total supply and never rolls back.
    fn credit(&mut self, to: Address, amount: Quantity) -> Result<()>;

    /// Current balance of `holder`. Unknown addresses hold zero.
    fn balance_of(&self, holder: Address) -> Quantity;

    /// Move `amount` from `from` to `to` and emit a `Transfer` event.
    fn transfer(&mut self, from: Address, to: Address, amount: Quantity) -> Result<()>;

    /// Total units ever credited.
    fn total_supply(&self) -> Quantity;

    /// Append an event to the ordered stream.
    fn emit(&mut self, event: LedgerEvent);
}

/// In-memory ledger with an ordered event log.
///
/// The source of truth for all balance state in tests and single-process
/// deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    /// Per-address balances.
    balances: HashMap<Address, Quantity>,
    /// Per-(owner, spender) allowances.
    allowances: HashMap<(Address, Address), Quantity>,
    /// Ordered event stream.
    events: Vec<LedgerEvent>,
    /// Issued-supply tracker.
    supply: SupplyConservation,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `spender` to move up to `value` of `owner`'s units. Overwrites any
    /// previous allowance.
    pub fn approve(&mut self, owner: Address, spender: Address, value: Quantity) {
        self.allowances.insert((owner, spender), value);
        self.emit(LedgerEvent::Approval {
            owner,
            spender,
            value,
        });
    }

    /// Remaining allowance of `spender` over `owner`'s units.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> Quantity {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Move `amount` from `owner` to `to` on behalf of `spender`, consuming
    /// allowance.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if `spender` may not move `amount`
    /// - `InsufficientBalance` if `owner` holds less than `amount`
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Quantity,
    ) -> Result<()> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(CliffvestError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(owner, to, amount)?;
        self.allowances.insert((owner, spender), allowed - amount);
        Ok(())
    }

    /// The ordered event stream.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Verify Σ balances == issued supply.
    pub fn verify_supply(&self) -> Result<()> {
        let actual = cliffvest_types::amount::checked_sum(self.balances.values().copied())?;
        self.supply.verify(actual)
    }
}

impl Ledger for InMemoryLedger {
    fn credit(&mut self, to: Address, amount: Quantity) -> Result<()> {
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(CliffvestError::ArithmeticOverflow)?;
        self.supply.record_issuance(amount)?;
        self.balances.insert(to, balance);
        Ok(())
    }

    fn balance_of(&self, holder: Address) -> Quantity {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Quantity) -> Result<()> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(CliffvestError::InsufficientBalance {
                holder: from,
                needed: amount,
                available: from_balance,
            });
        }
        if from != to {
            let to_balance = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(CliffvestError::ArithmeticOverflow)?;
            self.balances.insert(from, from_balance - amount);
            self.balances.insert(to, to_balance);
        }

        tracing::trace!(%from, %to, value = amount, "Transfer");
        self.emit(LedgerEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }

    fn total_supply(&self) -> Quantity {
        self.supply.issued()
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_low_u8(n)
    }

    #[test]
    fn credit_increases_balance_and_supply() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 1000).unwrap();
        ledger.credit(addr(1), 500).unwrap();
        assert_eq!(ledger.balance_of(addr(1)), 1500);
        assert_eq!(ledger.total_supply(), 1500);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn credit_is_silent() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 1).unwrap();
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn transfer_moves_balance_and_emits() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 1000).unwrap();
        ledger.transfer(addr(1), addr(2), 400).unwrap();
        assert_eq!(ledger.balance_of(addr(1)), 600);
        assert_eq!(ledger.balance_of(addr(2)), 400);
        assert_eq!(
            ledger.events(),
            &[LedgerEvent::Transfer {
                from: addr(1),
                to: addr(2),
                value: 400
            }]
        );
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn transfer_insufficient_fails_unchanged() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 100).unwrap();
        let err = ledger.transfer(addr(1), addr(2), 200).unwrap_err();
        assert!(matches!(
            err,
            CliffvestError::InsufficientBalance {
                needed: 200,
                available: 100,
                ..
            }
        ));
        assert_eq!(ledger.balance_of(addr(1)), 100);
        assert_eq!(ledger.balance_of(addr(2)), 0);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 100).unwrap();
        ledger.transfer(addr(1), addr(1), 60).unwrap();
        assert_eq!(ledger.balance_of(addr(1)), 100);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn approve_and_transfer_from() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 1000).unwrap();
        ledger.approve(addr(1), addr(9), 300);
        assert_eq!(ledger.allowance(addr(1), addr(9)), 300);

        ledger.transfer_from(addr(9), addr(1), addr(2), 200).unwrap();
        assert_eq!(ledger.balance_of(addr(2)), 200);
        assert_eq!(ledger.allowance(addr(1), addr(9)), 100);

        let err = ledger
            .transfer_from(addr(9), addr(1), addr(2), 101)
            .unwrap_err();
        assert!(matches!(err, CliffvestError::InsufficientAllowance { .. }));
        assert_eq!(ledger.allowance(addr(1), addr(9)), 100);
    }

    #[test]
    fn transfer_from_keeps_allowance_when_balance_short() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), 10).unwrap();
        ledger.approve(addr(1), addr(9), 50);
        let err = ledger
            .transfer_from(addr(9), addr(1), addr(2), 50)
            .unwrap_err();
        assert_eq!(err.reason(), "INSUFFICIENT_BALANCE");
        assert_eq!(ledger.allowance(addr(1), addr(9)), 50);
    }

    #[test]
    fn approval_event_recorded() {
        let mut ledger = InMemoryLedger::new();
        ledger.approve(addr(1), addr(2), 7);
        assert_eq!(ledger.events()[0].name(), "APPROVAL");
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(addr(42)), 0);
    }

    #[test]
    fn credit_overflow_rejected_unchanged() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(1), u128::MAX).unwrap();
        assert!(matches!(
            ledger.credit(addr(1), 1),
            Err(CliffvestError::ArithmeticOverflow)
        ));
        assert_eq!(ledger.balance_of(addr(1)), u128::MAX);
        ledger.verify_supply().unwrap();
    }
}
