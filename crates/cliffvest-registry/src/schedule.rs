//! # ReleaseSchedule — per-recipient cliff lock
//!
//! A schedule holds one recipient's locked allocation in its own custodial
//! ledger address and pays it out in full once the cliff passes.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  now >= cliff  ┌──────────┐
//!   │ LOCKED ├───────────────▶│ UNLOCKED │
//!   └────────┘                └──────────┘
//! ```
//!
//! Transitions are driven by time alone and never go backwards.
//!
//! ## Release Properties
//!
//! - **Anyone may trigger**: the caller is recorded, never paid
//! - **Bound payee**: units always go to the schedule's recipient
//! - **Single payout**: `released` only grows, and never past `total_locked`
//! - **Not revocable**: no operation moves custody anywhere but the recipient

use chrono::{DateTime, Duration, Utc};
use cliffvest_ledger::Ledger;
use cliffvest_types::{Address, CliffvestError, Quantity, Result};
use serde::Serialize;

/// Observable state of a schedule at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScheduleState {
    /// Before the cliff. Nothing is releasable.
    Locked,
    /// At or after the cliff. Whatever has not been released is releasable.
    Unlocked,
}

impl std::fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "LOCKED"),
            Self::Unlocked => write!(f, "UNLOCKED"),
        }
    }
}

/// One recipient's locked allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSchedule {
    /// Custodial ledger address holding the locked units.
    address: Address,
    /// The only address this schedule ever pays.
    recipient: Address,
    /// Registry construction time, shared by every schedule.
    start: DateTime<Utc>,
    /// `start + duration`.
    cliff: DateTime<Utc>,
    /// Lock length in whole seconds.
    duration_secs: i64,
    /// Allocation moved into custody at construction.
    total_locked: Quantity,
    /// Paid out so far.
    released: Quantity,
}

impl ReleaseSchedule {
    /// Build a schedule whose cliff sits `duration` after `start`.
    ///
    /// Returns `None` if the cliff cannot be represented.
    pub(crate) fn new(
        address: Address,
        recipient: Address,
        start: DateTime<Utc>,
        duration: Duration,
        total_locked: Quantity,
    ) -> Option<Self> {
        let cliff = start.checked_add_signed(duration)?;
        Some(Self {
            address,
            recipient,
            start,
            cliff,
            duration_secs: duration.num_seconds(),
            total_locked,
            released: 0,
        })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn recipient(&self) -> Address {
        self.recipient
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub fn cliff(&self) -> DateTime<Utc> {
        self.cliff
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_secs)
    }

    #[must_use]
    pub fn total_locked(&self) -> Quantity {
        self.total_locked
    }

    #[must_use]
    pub fn released(&self) -> Quantity {
        self.released
    }

    /// Always `false`: locked units can only ever reach the recipient.
    #[must_use]
    pub fn revocable(&self) -> bool {
        false
    }

    #[must_use]
    pub fn state(&self, now: DateTime<Utc>) -> ScheduleState {
        if now < self.cliff {
            ScheduleState::Locked
        } else {
            ScheduleState::Unlocked
        }
    }

    /// Units vested by `now`: nothing before the cliff, everything after.
    #[must_use]
    pub fn vested_amount(&self, now: DateTime<Utc>) -> Quantity {
        match self.state(now) {
            ScheduleState::Locked => 0,
            ScheduleState::Unlocked => self.total_locked,
        }
    }

    /// Units a release at `now` would pay.
    #[must_use]
    pub fn releasable_amount(&self, now: DateTime<Utc>) -> Quantity {
        self.vested_amount(now).saturating_sub(self.released)
    }

    /// Pay everything currently due to the recipient.
    ///
    /// `caller` is whoever triggered the release; it only shows up in logs.
    /// If the ledger transfer fails the schedule is left untouched.
    ///
    /// # Errors
    /// - `NothingDue` before the cliff or after a full release
    /// - any ledger error from moving custody to the recipient
    pub fn release<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        now: DateTime<Utc>,
        caller: Address,
    ) -> Result<Quantity> {
        let due = self.releasable_amount(now);
        if due == 0 {
            tracing::debug!(
                schedule = %self.address,
                recipient = %self.recipient,
                %caller,
                state = %self.state(now),
                "Release rejected: nothing due"
            );
            return Err(CliffvestError::NothingDue {
                recipient: self.recipient,
            });
        }

        ledger.transfer(self.address, self.recipient, due)?;
        self.released += due;

        tracing::info!(
            schedule = %self.address,
            recipient = %self.recipient,
            %caller,
            amount = due,
            released = self.released,
            "Locked allocation released"
        );
        Ok(due)
    }
}
