//! # cliffvest-registry
//!
//! **Issuance and release**: the one-time allocation of a fixed supply and
//! the per-recipient cliff schedules that hold locked allocations.
//!
//! ## Architecture
//!
//! 1. **AllocationRegistry**: validates the allocation table, credits
//!    unlocked recipients, funds one schedule per locked recipient
//! 2. **ReleaseSchedule**: custody for one recipient's locked units; pays
//!    them out in full once the cliff passes
//!
//! ## Flow
//!
//! ```text
//! columns → AllocationTable (check) → plan schedules (check)
//!         → credit / fund custody + events (effect) → AllocationRegistry
//!
//! anyone → release → ReleaseSchedule → Ledger.transfer(custody → recipient)
//! ```
//!
//! Every mutating call takes `&mut` access to both the registry and the
//! ledger, so operations are serialized by construction.

pub mod registry;
pub mod schedule;

pub use registry::AllocationRegistry;
pub use schedule::{ReleaseSchedule, ScheduleState};
