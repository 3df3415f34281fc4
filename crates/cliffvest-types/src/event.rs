//! Observable notifications.
//!
//! Construction and release produce one ordered stream of [`LedgerEvent`]s.
//! Consumers (indexers, UIs) replay the stream to rebuild balances.

use serde::{Deserialize, Serialize};

use crate::{Address, Quantity};

/// A single entry in the ordered event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Units moved (or were issued) from `from` to `to`.
    Transfer {
        from: Address,
        to: Address,
        value: Quantity,
    },
    /// `owner` allowed `spender` to move up to `value` on its behalf.
    Approval {
        owner: Address,
        spender: Address,
        value: Quantity,
    },
    /// A release schedule was created and funded for `recipient`.
    AllocationCreated {
        recipient: Address,
        amount: Quantity,
        schedule: Address,
    },
}

impl LedgerEvent {
    /// Short event name, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "TRANSFER",
            Self::Approval { .. } => "APPROVAL",
            Self::AllocationCreated { .. } => "ALLOCATION_CREATED",
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transfer { from, to, value } => {
                write!(f, "TRANSFER {from} -> {to}: {value}")
            }
            Self::Approval {
                owner,
                spender,
                value,
            } => write!(f, "APPROVAL {owner} -> {spender}: {value}"),
            Self::AllocationCreated {
                recipient,
                amount,
                schedule,
            } => write!(f, "ALLOCATION_CREATED {recipient} @ {schedule}: {amount}"),
        }
    }
}
