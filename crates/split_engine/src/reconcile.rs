use crate::{Money, SplitError, money::format_currency};

/// Outcome of recomputing the original transaction after a ledger change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub split_total: Money,
    /// `base - split_total`, even when over-allocated.
    pub remainder: Money,
    /// Amount to show on the original line. `"0.00"` when over-allocated.
    pub displayed_amount: String,
    pub over_allocation: Option<SplitError>,
}

/// Fails when the splits claim more than the base amount in absolute value.
///
/// Shared by the live recomputation and the save-time pipeline.
pub fn check_allocation(split_total: Money, base_amount: Money) -> Result<(), SplitError> {
    if split_total.abs() > base_amount.abs() {
        return Err(SplitError::ExceedsOriginal {
            base_amount: format_currency(base_amount),
        });
    }
    Ok(())
}

pub fn reconcile(base_amount: Money, split_total: Money) -> Reconciliation {
    let remainder = base_amount - split_total;
    match check_allocation(split_total, base_amount) {
        Ok(()) => Reconciliation {
            split_total,
            remainder,
            displayed_amount: remainder.to_string(),
            over_allocation: None,
        },
        Err(err) => Reconciliation {
            split_total,
            remainder,
            displayed_amount: Money::ZERO.to_string(),
            over_allocation: Some(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_shrinks_as_splits_grow() {
        let rec = reconcile(Money::new(10000), Money::new(4000));
        assert_eq!(rec.displayed_amount, "60.00");
        assert_eq!(rec.over_allocation, None);

        let rec = reconcile(Money::new(-10000), Money::new(-3000));
        assert_eq!(rec.displayed_amount, "-70.00");
    }

    #[test]
    fn no_splits_shows_base_amount() {
        let rec = reconcile(Money::new(-2599), Money::ZERO);
        assert_eq!(rec.displayed_amount, "-25.99");
        assert_eq!(rec.remainder, Money::new(-2599));
    }

    #[test]
    fn exact_allocation_is_allowed() {
        let rec = reconcile(Money::new(10000), Money::new(10000));
        assert_eq!(rec.displayed_amount, "0.00");
        assert_eq!(rec.over_allocation, None);
    }

    #[test]
    fn over_allocation_clamps_display_and_reports() {
        let rec = reconcile(Money::new(10000), Money::new(15000));
        assert_eq!(rec.displayed_amount, "0.00");
        assert_eq!(rec.remainder, Money::new(-5000));
        assert_eq!(
            rec.over_allocation.unwrap().to_string(),
            "Total split amounts cannot exceed the original transaction amount of $100.00"
        );
    }

    #[test]
    fn opposite_sign_splits_compare_by_magnitude() {
        assert!(check_allocation(Money::new(5000), Money::new(-10000)).is_ok());
        assert!(check_allocation(Money::new(-10001), Money::new(10000)).is_err());
    }
}
