//! Errors raised while editing and saving transaction splits.
//!
//! - [`SplitError`]: a split set that cannot be saved. Its `Display` is the
//!   message shown to the user.
//! - [`AmountError`]: text that is not a decimal amount.
//! - [`SessionError`]: anything that stops a session from loading or saving.
use thiserror::Error;

/// Rule violations found in a split set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("All splits must have a valid date")]
    InvalidDate,
    #[error("All splits must have a description with at least 3 characters")]
    ShortDescription,
    #[error("All splits must have a subcategory")]
    MissingSubcategory,
    #[error("Splits must have a non-zero amount")]
    ZeroAmount,
    #[error("Total split amounts cannot exceed the original transaction amount of {base_amount}")]
    ExceedsOriginal { base_amount: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount: empty amount")]
    Empty,
    #[error("Invalid amount: {0:?}")]
    Invalid(String),
    #[error("Invalid amount: amount too large")]
    Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is {0}, expected ready")]
    NotReady(&'static str),
    #[error(transparent)]
    Invalid(#[from] SplitError),
    #[error("Failed to load transaction splits: {0}")]
    Load(String),
    #[error("Failed to save transaction splits: {0}")]
    Commit(String),
}
