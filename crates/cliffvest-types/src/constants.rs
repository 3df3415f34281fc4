//! System-wide constants for the Cliffvest allocation engine.

use crate::Quantity;

/// Decimal places of the fungible unit (base units per token = 10^18).
pub const DECIMALS: u32 = 18;

/// Base units in one whole token.
pub const UNITS_PER_TOKEN: Quantity = 10u128.pow(DECIMALS);

/// Whole tokens issued at construction.
pub const TOTAL_SUPPLY_TOKENS: Quantity = 12_500_000_000;

/// Fixed total issuance in base units. Every valid allocation table sums to
/// exactly this value.
pub const TOTAL_SUPPLY: Quantity = TOTAL_SUPPLY_TOKENS * UNITS_PER_TOKEN;

/// Seconds in one lock day.
pub const SECONDS_PER_DAY: i64 = 86_400;
