//! Allocation registry — one-time issuance of the fixed supply.
//!
//! Construction runs in two strictly separated phases:
//!
//! 1. **Check**: validate the whole table, confirm the ledger has never
//!    issued, and plan every schedule (addresses, cliffs). Any failure
//!    returns before the ledger is touched.
//! 2. **Effect**: walk the table in order, crediting recipients directly or
//!    funding their schedule's custody, and emit the matching events.
//!
//! After construction the recipient → schedule mapping never changes. The
//! only mutation left is releasing a schedule.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use cliffvest_ledger::Ledger;
use cliffvest_types::{
    Address, AllocationTable, CliffvestError, Clock, DistributionConfig, LedgerEvent, Quantity,
    Result, constants::TOTAL_SUPPLY,
};

use crate::schedule::ReleaseSchedule;

/// The recipient → schedule mapping created by a single issuance.
#[derive(Debug, Clone)]
pub struct AllocationRegistry {
    /// `from` address on construction transfers.
    issuer: Address,
    /// Construction time; the `start` of every schedule.
    start: DateTime<Utc>,
    /// Schedule arena, in table order.
    schedules: Vec<ReleaseSchedule>,
    /// Recipient → index into `schedules`.
    by_recipient: HashMap<Address, usize>,
    /// Custodial address → index into `schedules`.
    by_address: HashMap<Address, usize>,
}

impl AllocationRegistry {
    /// Validate the allocation table and issue the full supply.
    ///
    /// On success every unit of `TOTAL_SUPPLY` is either in a recipient's
    /// balance or in a schedule's custody. On failure the ledger is unchanged.
    ///
    /// # Errors
    /// - `ArityMismatch`, `SupplyMismatch`, `DuplicateRecipient` (table checks, in that order)
    /// - `AlreadyIssued` if the ledger already carries supply
    /// - `LockPeriodOverflow` if a cliff cannot be represented
    /// - `ScheduleAddressCollision` if a custodial address is also a
    ///   recipient or the issuer
    pub fn construct<L, C>(
        ledger: &mut L,
        clock: &C,
        issuer: Address,
        recipients: &[Address],
        lock_days: &[u64],
        amounts: &[Quantity],
    ) -> Result<Self>
    where
        L: Ledger + ?Sized,
        C: Clock + ?Sized,
    {
        let table = AllocationTable::from_columns(recipients, lock_days, amounts)
            .inspect_err(|err| {
                tracing::warn!(reason = err.reason(), error = %err, "Allocation table rejected");
            })?;

        let issued = ledger.total_supply();
        if issued != 0 {
            tracing::warn!(issued, "Ledger already issued; refusing to construct");
            return Err(CliffvestError::AlreadyIssued { issued });
        }

        let start = clock.now();
        let registry = Self::plan(issuer, start, &table).inspect_err(|err| {
            tracing::warn!(reason = err.reason(), error = %err, "Schedule planning rejected");
        })?;
        registry.issue(ledger, &table)?;

        tracing::info!(
            %issuer,
            start = %start,
            entries = table.len(),
            schedules = registry.schedules.len(),
            total_supply = TOTAL_SUPPLY,
            "Allocation registry constructed"
        );
        Ok(registry)
    }

    /// Construct from a loaded [`DistributionConfig`].
    pub fn from_config<L, C>(ledger: &mut L, clock: &C, config: &DistributionConfig) -> Result<Self>
    where
        L: Ledger + ?Sized,
        C: Clock + ?Sized,
    {
        let columns = config.to_columns()?;
        Self::construct(
            ledger,
            clock,
            config.issuer,
            &columns.recipients,
            &columns.lock_days,
            &columns.amounts,
        )
    }

    /// Check phase: build every schedule without touching the ledger.
    ///
    /// Custody must be a fresh account: a schedule address that is also a
    /// recipient or the issuer would mix direct credits into custody.
    fn plan(issuer: Address, start: DateTime<Utc>, table: &AllocationTable) -> Result<Self> {
        let funded: HashSet<Address> = table
            .entries()
            .iter()
            .map(|e| e.recipient)
            .chain(std::iter::once(issuer))
            .collect();

        let mut registry = Self {
            issuer,
            start,
            schedules: Vec::with_capacity(table.locked_count()),
            by_recipient: HashMap::with_capacity(table.locked_count()),
            by_address: HashMap::with_capacity(table.locked_count()),
        };

        for entry in table.entries().iter().filter(|e| e.is_locked()) {
            let overflow = || CliffvestError::LockPeriodOverflow {
                recipient: entry.recipient,
                lock_days: entry.lock_days,
            };
            let duration = entry.lock_duration().ok_or_else(overflow)?;
            let address = Address::schedule_for(issuer, entry.recipient);
            if funded.contains(&address) {
                return Err(CliffvestError::ScheduleAddressCollision {
                    recipient: entry.recipient,
                    schedule: address,
                });
            }
            let schedule =
                ReleaseSchedule::new(address, entry.recipient, start, duration, entry.amount)
                    .ok_or_else(overflow)?;

            let index = registry.schedules.len();
            registry.schedules.push(schedule);
            registry.by_recipient.insert(entry.recipient, index);
            registry.by_address.insert(address, index);
        }
        Ok(registry)
    }

    /// Effect phase: credit and announce every entry, in table order.
    ///
    /// The ledger starts empty and the table sums to `TOTAL_SUPPLY`, so under
    /// the [`Ledger::credit`] contract no credit here can fail. A failure
    /// means the ledger broke that contract and is reported as an internal
    /// invariant violation.
    fn issue<L: Ledger + ?Sized>(&self, ledger: &mut L, table: &AllocationTable) -> Result<()> {
        for entry in table {
            let to = self
                .by_recipient
                .get(&entry.recipient)
                .map_or(entry.recipient, |&i| self.schedules[i].address());

            ledger.credit(to, entry.amount).map_err(|err| {
                tracing::error!(recipient = %entry.recipient, %to, error = %err, "Issuance credit failed");
                CliffvestError::SupplyInvariantViolation {
                    reason: format!("credit of {} to {to} failed mid-issuance: {err}", entry.amount),
                }
            })?;
            ledger.emit(LedgerEvent::Transfer {
                from: self.issuer,
                to,
                value: entry.amount,
            });

            if entry.is_locked() {
                ledger.emit(LedgerEvent::AllocationCreated {
                    recipient: entry.recipient,
                    amount: entry.amount,
                    schedule: to,
                });
                tracing::debug!(
                    recipient = %entry.recipient,
                    schedule = %to,
                    lock_days = entry.lock_days,
                    amount = entry.amount,
                    "Allocation locked"
                );
            } else {
                tracing::debug!(
                    recipient = %entry.recipient,
                    amount = entry.amount,
                    "Allocation credited"
                );
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[must_use]
    pub fn issuer(&self) -> Address {
        self.issuer
    }

    /// Construction time, shared by every schedule.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// The recipient's schedule, if its allocation was locked.
    #[must_use]
    pub fn schedule_of(&self, recipient: Address) -> Option<&ReleaseSchedule> {
        self.by_recipient
            .get(&recipient)
            .map(|&i| &self.schedules[i])
    }

    /// Custodial address of the recipient's schedule, or [`Address::ZERO`]
    /// when it has none.
    #[must_use]
    pub fn schedule_address_of(&self, recipient: Address) -> Address {
        self.schedule_of(recipient)
            .map_or(Address::ZERO, ReleaseSchedule::address)
    }

    /// The schedule whose custody lives at `address`.
    #[must_use]
    pub fn schedule_at(&self, address: Address) -> Option<&ReleaseSchedule> {
        self.by_address.get(&address).map(|&i| &self.schedules[i])
    }

    /// All schedules, in table order.
    pub fn schedules(&self) -> impl Iterator<Item = &ReleaseSchedule> {
        self.schedules.iter()
    }

    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    // -----------------------------------------------------------------
    // Release
    // -----------------------------------------------------------------

    /// Release the schedule belonging to `recipient`, triggered by the
    /// recipient itself.
    ///
    /// # Errors
    /// - `NoScheduleAssigned` if the recipient's allocation was not locked
    /// - `NothingDue` before the cliff or after a full release
    pub fn release_for<L, C>(&mut self, ledger: &mut L, clock: &C, recipient: Address) -> Result<Quantity>
    where
        L: Ledger + ?Sized,
        C: Clock + ?Sized,
    {
        let &index = self
            .by_recipient
            .get(&recipient)
            .ok_or(CliffvestError::NoScheduleAssigned(recipient))?;
        self.schedules[index].release(ledger, clock.now(), recipient)
    }

    /// Release the schedule at `schedule`, triggered by anyone. The payout
    /// still goes to the schedule's recipient.
    ///
    /// # Errors
    /// - `ScheduleNotFound` if no schedule lives at that address
    /// - `NothingDue` before the cliff or after a full release
    pub fn release_schedule<L, C>(
        &mut self,
        ledger: &mut L,
        clock: &C,
        schedule: Address,
        caller: Address,
    ) -> Result<Quantity>
    where
        L: Ledger + ?Sized,
        C: Clock + ?Sized,
    {
        let &index = self
            .by_address
            .get(&schedule)
            .ok_or(CliffvestError::ScheduleNotFound(schedule))?;
        self.schedules[index].release(ledger, clock.now(), caller)
    }

    // -----------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------

    /// Check that every schedule's custody holds exactly what it has not yet
    /// released, and that the ledger carries exactly `TOTAL_SUPPLY`.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` describing the first mismatch.
    pub fn verify_allocation<L: Ledger + ?Sized>(&self, ledger: &L) -> Result<()> {
        let supply = ledger.total_supply();
        if supply != TOTAL_SUPPLY {
            return Err(CliffvestError::SupplyInvariantViolation {
                reason: format!("ledger supply {supply} != total supply {TOTAL_SUPPLY}"),
            });
        }
        for schedule in &self.schedules {
            let custody = ledger.balance_of(schedule.address());
            let outstanding = schedule.total_locked() - schedule.released();
            if custody != outstanding {
                return Err(CliffvestError::SupplyInvariantViolation {
                    reason: format!(
                        "schedule {} holds {custody}, expected {outstanding}",
                        schedule.address()
                    ),
                });
            }
        }
        Ok(())
    }
}
