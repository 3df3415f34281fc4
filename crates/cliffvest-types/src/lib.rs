//! # cliffvest-types
//!
//! Shared types, errors, and configuration for the **Cliffvest** allocation
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Addresses**: [`Address`], including derived schedule custody addresses
//! - **Quantities**: [`Quantity`] and token/base-unit conversion
//! - **Allocation model**: [`AllocationEntry`], [`AllocationTable`]
//! - **Events**: [`LedgerEvent`]
//! - **Time**: [`Clock`], [`SystemClock`]
//! - **Configuration**: [`DistributionConfig`]
//! - **Errors**: [`CliffvestError`] with `CV_ERR_` prefix codes
//! - **Constants**: total supply, decimals, seconds per day

pub mod allocation;
pub mod amount;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use cliffvest_types::{Address, AllocationTable, LedgerEvent, ...};

pub use allocation::*;
pub use amount::Quantity;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `cliffvest_types::constants::FOO`
// (not re-exported to avoid name collisions).
