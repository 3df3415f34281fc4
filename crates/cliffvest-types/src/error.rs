//! Error types for the Cliffvest allocation engine.
//!
//! All errors use the `CV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Allocation table / construction errors
//! - 2xx: Ledger errors
//! - 3xx: Release errors
//! - 9xx: General / internal errors
//!
//! Display text is for humans. Orchestration code should branch on
//! [`CliffvestError::reason`], which is stable across releases.

use thiserror::Error;

use crate::{Address, Quantity};

/// Central error enum for all Cliffvest operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliffvestError {
    // =================================================================
    // Allocation Errors (1xx)
    // =================================================================
    /// The three input sequences differ in length, or are empty.
    #[error(
        "CV_ERR_100: Array length does not match: {recipients} recipients, \
         {lock_days} lock periods, {amounts} amounts"
    )]
    ArityMismatch {
        recipients: usize,
        lock_days: usize,
        amounts: usize,
    },

    /// An allocation is zero, or the allocations don't add up to the total supply.
    #[error("CV_ERR_101: Total supply does not match: {reason}")]
    SupplyMismatch { reason: String },

    /// The same recipient appears more than once in the table.
    #[error("CV_ERR_102: Only one allocation per recipient: {0} is repeated")]
    DuplicateRecipient(Address),

    /// The lock period cannot be represented as a cliff timestamp.
    #[error("CV_ERR_103: Lock period of {lock_days} days for {recipient} is out of range")]
    LockPeriodOverflow { recipient: Address, lock_days: u64 },

    /// The ledger already carries issuance; construction runs only once.
    #[error("CV_ERR_104: Ledger already issued {issued} units")]
    AlreadyIssued { issued: Quantity },

    /// A schedule's custodial address is also a table recipient or the issuer.
    #[error("CV_ERR_105: Schedule address {schedule} for {recipient} collides with a funded account")]
    ScheduleAddressCollision { recipient: Address, schedule: Address },

    // =================================================================
    // Ledger Errors (2xx)
    // =================================================================
    /// Not enough balance to perform the transfer.
    #[error("CV_ERR_200: Insufficient balance at {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        holder: Address,
        needed: Quantity,
        available: Quantity,
    },

    /// Not enough allowance granted to the spender.
    #[error("CV_ERR_201: Insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: Quantity, available: Quantity },

    /// Σ balances no longer equals issued supply.
    #[error("CV_ERR_202: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Quantity arithmetic overflowed or underflowed.
    #[error("CV_ERR_203: Arithmetic overflow")]
    ArithmeticOverflow,

    // =================================================================
    // Release Errors (3xx)
    // =================================================================
    /// Nothing is releasable right now: still locked, or fully released.
    #[error("CV_ERR_300: No tokens are due for {recipient}")]
    NothingDue { recipient: Address },

    /// The caller has no release schedule.
    #[error("CV_ERR_301: No tokens vested for {0}")]
    NoScheduleAssigned(Address),

    /// No schedule lives at the given custodial address.
    #[error("CV_ERR_302: Schedule not found: {0}")]
    ScheduleNotFound(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("CV_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("CV_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("CV_ERR_903: I/O error: {0}")]
    Io(String),
}

impl CliffvestError {
    /// Stable, machine-checkable reason tag.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ArityMismatch { .. } => "ARITY_MISMATCH",
            Self::SupplyMismatch { .. } => "SUPPLY_MISMATCH",
            Self::DuplicateRecipient(_) => "DUPLICATE_RECIPIENT",
            Self::LockPeriodOverflow { .. } => "LOCK_PERIOD_OVERFLOW",
            Self::AlreadyIssued { .. } => "ALREADY_ISSUED",
            Self::ScheduleAddressCollision { .. } => "SCHEDULE_ADDRESS_COLLISION",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            Self::SupplyInvariantViolation { .. } => "SUPPLY_INVARIANT_VIOLATION",
            Self::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            Self::NothingDue { .. } => "NOTHING_DUE",
            Self::NoScheduleAssigned(_) => "NO_SCHEDULE_ASSIGNED",
            Self::ScheduleNotFound(_) => "SCHEDULE_NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Io(_) => "IO",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CliffvestError>;

// Conversion from std::io::Error
impl From<std::io::Error> for CliffvestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliffvestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
