//! Save-time checks over a full split set.
//!
//! Rules run in order and the first failure wins; messages are never
//! combined.
use chrono::NaiveDate;

use crate::{Money, Split, SplitError, money, reconcile::check_allocation};

const MIN_DESCRIPTION_CHARS: usize = 3;

type Rule = fn(&[Split], Money) -> Result<(), SplitError>;

const RULES: [Rule; 5] = [
    check_dates,
    check_descriptions,
    check_subcategories,
    check_amounts,
    check_total,
];

pub fn validate(splits: &[Split], base_amount: Money) -> Result<(), SplitError> {
    RULES.iter().try_for_each(|rule| rule(splits, base_amount))
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar-valid and already in zero-padded `YYYY-MM-DD` form.
fn is_valid_date(value: &str) -> bool {
    normalize_date(value).is_some_and(|canonical| canonical == value)
}

/// Zero-padded form of a parseable date, e.g. `2024-5-1` to `2024-05-01`.
pub(crate) fn normalize_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .map(|date| date.format(DATE_FORMAT).to_string())
}

fn has_description(value: &str) -> bool {
    value.trim().chars().count() >= MIN_DESCRIPTION_CHARS
}

fn has_amount(value: &str) -> bool {
    money::parse_amount(value).is_some_and(|amount| !amount.is_zero())
}

fn check_dates(splits: &[Split], _: Money) -> Result<(), SplitError> {
    if splits.iter().all(|split| is_valid_date(&split.transaction_date)) {
        Ok(())
    } else {
        Err(SplitError::InvalidDate)
    }
}

fn check_descriptions(splits: &[Split], _: Money) -> Result<(), SplitError> {
    if splits.iter().all(|split| has_description(&split.description)) {
        Ok(())
    } else {
        Err(SplitError::ShortDescription)
    }
}

fn check_subcategories(splits: &[Split], _: Money) -> Result<(), SplitError> {
    if splits.iter().all(|split| split.subcategory.is_selected()) {
        Ok(())
    } else {
        Err(SplitError::MissingSubcategory)
    }
}

fn check_amounts(splits: &[Split], _: Money) -> Result<(), SplitError> {
    if splits.iter().all(|split| has_amount(&split.amount)) {
        Ok(())
    } else {
        Err(SplitError::ZeroAmount)
    }
}

fn check_total(splits: &[Split], base_amount: Money) -> Result<(), SplitError> {
    let total = money::sum(splits.iter().map(|split| split.amount.as_str()));
    check_allocation(total, base_amount)
}

/// Inline messages for a single split row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitFieldErrors {
    pub date: Option<&'static str>,
    pub description: Option<&'static str>,
    pub subcategory: Option<&'static str>,
    pub amount: Option<&'static str>,
}

impl SplitFieldErrors {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self == &Self::default()
    }
}

pub fn field_errors(split: &Split) -> SplitFieldErrors {
    let date = if split.transaction_date.trim().is_empty() {
        Some("Transaction date is required")
    } else if !is_valid_date(&split.transaction_date) {
        Some("Invalid date format")
    } else {
        None
    };

    SplitFieldErrors {
        date,
        description: (!has_description(&split.description))
            .then_some("Description must be at least 3 characters"),
        subcategory: (!split.subcategory.is_selected()).then_some("Category selection required"),
        amount: (!has_amount(&split.amount)).then_some("Enter a valid, non-zero amount"),
    }
}
