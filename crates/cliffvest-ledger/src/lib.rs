//! # cliffvest-ledger
//!
//! The fungible-unit ledger the allocation engine pays through.
//!
//! The engine itself only needs the [`Ledger`] primitive: credit an address,
//! move units between addresses, query a balance, and append to the ordered
//! event stream. [`InMemoryLedger`] is the reference implementation and also
//! carries the allowance surface (`approve` / `transfer_from`) that holders
//! use once their units are free.
//!
//! ## Invariants
//!
//! - Every mutation is all-or-nothing: a failed transfer leaves balances,
//!   allowances and the event stream untouched.
//! - [`SupplyConservation`]: Σ balances always equals Σ credits.

pub mod ledger;
pub mod supply_conservation;

pub use ledger::{InMemoryLedger, Ledger};
pub use supply_conservation::SupplyConservation;
