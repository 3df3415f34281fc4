//! Allocation table: the one-time input describing how total supply splits
//! across recipients.
//!
//! The table arrives as three parallel columns and is validated as a whole
//! before anything else happens. Checks run in a fixed order and the first
//! failure wins:
//!
//! 1. column lengths agree and are nonzero → `ArityMismatch`
//! 2. no zero amount, and Σ amounts == `TOTAL_SUPPLY` → `SupplyMismatch`
//! 3. recipients are distinct → `DuplicateRecipient`

use std::collections::HashSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    Address, CliffvestError, Quantity, Result, amount,
    constants::{SECONDS_PER_DAY, TOTAL_SUPPLY},
};

/// One row of the allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Who receives the allocation.
    pub recipient: Address,
    /// Whole days until the allocation unlocks. Zero means "credit now".
    pub lock_days: u64,
    /// Allocation in base units. Never zero in a validated table.
    pub amount: Quantity,
}

impl AllocationEntry {
    /// Whether this entry is paid through a release schedule.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_days > 0
    }

    /// Lock period as a duration, or `None` if it cannot be represented.
    #[must_use]
    pub fn lock_duration(&self) -> Option<Duration> {
        i64::try_from(self.lock_days)
            .ok()
            .and_then(|days| days.checked_mul(SECONDS_PER_DAY))
            .and_then(Duration::try_seconds)
    }
}

/// A validated, ordered allocation table.
///
/// The only way to obtain one is [`AllocationTable::from_columns`], so holding
/// an `AllocationTable` proves the global invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationTable {
    entries: Vec<AllocationEntry>,
}

impl AllocationTable {
    /// Zip and validate the three input columns.
    ///
    /// # Errors
    /// `ArityMismatch`, `SupplyMismatch` or `DuplicateRecipient`, in that
    /// order of precedence.
    pub fn from_columns(
        recipients: &[Address],
        lock_days: &[u64],
        amounts: &[Quantity],
    ) -> Result<Self> {
        if recipients.len() != lock_days.len()
            || lock_days.len() != amounts.len()
            || recipients.is_empty()
        {
            return Err(CliffvestError::ArityMismatch {
                recipients: recipients.len(),
                lock_days: lock_days.len(),
                amounts: amounts.len(),
            });
        }

        if let Some(index) = amounts.iter().position(|a| *a == 0) {
            return Err(CliffvestError::SupplyMismatch {
                reason: format!("allocation #{index} for {} is zero", recipients[index]),
            });
        }
        match amount::checked_sum(amounts.iter().copied()) {
            Ok(total) if total == TOTAL_SUPPLY => {}
            Ok(total) => {
                return Err(CliffvestError::SupplyMismatch {
                    reason: format!("allocations sum to {total}, expected {TOTAL_SUPPLY}"),
                });
            }
            Err(_) => {
                return Err(CliffvestError::SupplyMismatch {
                    reason: format!("allocations overflow, expected {TOTAL_SUPPLY}"),
                });
            }
        }

        let mut seen = HashSet::with_capacity(recipients.len());
        for recipient in recipients {
            if !seen.insert(*recipient) {
                return Err(CliffvestError::DuplicateRecipient(*recipient));
            }
        }

        let entries = recipients
            .iter()
            .zip(lock_days)
            .zip(amounts)
            .map(|((&recipient, &lock_days), &amount)| AllocationEntry {
                recipient,
                lock_days,
                amount,
            })
            .collect();
        Ok(Self { entries })
    }

    /// Entries in input order.
    #[must_use]
    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated table; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that get a release schedule.
    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_locked()).count()
    }
}

impl<'a> IntoIterator for &'a AllocationTable {
    type Item = &'a AllocationEntry;
    type IntoIter = std::slice::Iter<'a, AllocationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fixture builder for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures {
    use crate::{Address, Quantity, constants::{TOTAL_SUPPLY, UNITS_PER_TOKEN}};

    /// Parallel input columns, as handed to construction.
    #[derive(Debug, Clone)]
    pub struct Columns {
        pub recipients: Vec<Address>,
        pub lock_days: Vec<u64>,
        pub amounts: Vec<Quantity>,
    }

    /// The canonical three-recipient table: lock days `[10, 0, 20]`,
    /// amounts `[10, 10_000_000, REMAINDER]` whole tokens.
    #[must_use]
    pub fn three_recipients(a: Address, b: Address, c: Address) -> Columns {
        let first = 10 * UNITS_PER_TOKEN;
        let second = 10_000_000 * UNITS_PER_TOKEN;
        Columns {
            recipients: vec![a, b, c],
            lock_days: vec![10, 0, 20],
            amounts: vec![first, second, TOTAL_SUPPLY - first - second],
        }
    }

    /// `n` random recipients locked for `lock_days`; the first takes the
    /// remainder, everyone else one token.
    #[must_use]
    pub fn many_recipients(n: usize, lock_days: u64) -> Columns {
        assert!(n > 0, "need at least one recipient");
        let recipients: Vec<Address> = (0..n).map(|_| Address::random()).collect();
        let mut amounts = vec![UNITS_PER_TOKEN; n];
        amounts[0] = TOTAL_SUPPLY - UNITS_PER_TOKEN * (n as Quantity - 1);
        Columns {
            recipients,
            lock_days: vec![lock_days; n],
            amounts,
        }
    }
}
