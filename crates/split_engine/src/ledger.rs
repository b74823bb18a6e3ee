//! In-memory split set of one editing session.
//!
//! Pagination is a view only: totals and validation always see the full set.
use crate::{
    CategoryRef, DraftId, Money, Split, SplitKey, SplitPatch,
    ids::DraftIds,
    money::{self, signed_format},
    validation,
};

/// Splits shown per page.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct SplitLedger {
    base_amount: Money,
    splits: Vec<Split>,
    draft_ids: DraftIds,
    current_page: usize,
}

impl SplitLedger {
    /// Creates a ledger whose base amount is fixed for its whole lifetime.
    pub fn new(base_amount: Money, splits: Vec<Split>) -> Self {
        Self {
            base_amount,
            splits,
            draft_ids: DraftIds::default(),
            current_page: 1,
        }
    }

    #[must_use]
    pub fn base_amount(&self) -> Money {
        self.base_amount
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    pub fn get(&self, key: SplitKey) -> Option<&Split> {
        self.splits.iter().find(|split| split.key == key)
    }

    fn get_mut(&mut self, key: SplitKey) -> Option<&mut Split> {
        self.splits.iter_mut().find(|split| split.key == key)
    }

    /// Sum of all split amounts, unparsable ones counting as zero.
    #[must_use]
    pub fn total(&self) -> Money {
        money::sum(self.splits.iter().map(|split| split.amount.as_str()))
    }

    /// Appends an empty draft dated `transaction_date` and shows its page.
    pub fn add_split(&mut self, transaction_date: &str) -> DraftId {
        let id = self.draft_ids.issue();
        self.splits.push(Split::draft(id, transaction_date));
        self.current_page = self.page_count();
        id
    }

    /// Merges `patch` into the split at `key`. Unknown keys are ignored.
    ///
    /// Returns whether a split was found.
    pub fn update_split(&mut self, key: SplitKey, patch: SplitPatch) -> bool {
        match self.get_mut(key) {
            Some(split) => {
                patch.apply(split);
                true
            }
            None => false,
        }
    }

    /// Replaces the subcategory of the split at `key`. Unknown keys are
    /// ignored.
    pub fn update_subcategory(&mut self, key: SplitKey, subcategory: CategoryRef) -> bool {
        match self.get_mut(key) {
            Some(split) => {
                split.subcategory = subcategory;
                true
            }
            None => false,
        }
    }

    /// Rewrites the amount text of `key` in normalized form, carrying the
    /// sign of the base amount.
    pub fn finish_amount_edit(&mut self, key: SplitKey) -> bool {
        let base = self.base_amount;
        match self.get_mut(key) {
            Some(split) => {
                let formatted = signed_format(split.amount.trim(), base);
                if split.amount != formatted {
                    split.amount = formatted;
                }
                true
            }
            None => false,
        }
    }

    /// Rewrites a parseable date of `key` in zero-padded `YYYY-MM-DD` form.
    /// Unparseable text is kept for validation to report.
    pub fn finish_date_edit(&mut self, key: SplitKey) -> bool {
        match self.get_mut(key) {
            Some(split) => {
                if let Some(date) = validation::normalize_date(&split.transaction_date) {
                    split.transaction_date = date;
                }
                true
            }
            None => false,
        }
    }

    /// Removes the split at `key`, stepping back a page if the current one
    /// became empty.
    pub fn remove_split(&mut self, key: SplitKey) -> Option<Split> {
        let idx = self.splits.iter().position(|split| split.key == key)?;
        let removed = self.splits.remove(idx);
        let last_page = self.page_count().max(1);
        if self.current_page > last_page {
            self.current_page = last_page;
        }
        Some(removed)
    }

    pub fn page_count(&self) -> usize {
        self.splits.len().div_ceil(PAGE_SIZE)
    }

    /// 1-indexed.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Splits on page `n` (1-indexed). Out of range pages are empty.
    pub fn page(&self, n: usize) -> &[Split] {
        let start = n.saturating_sub(1).saturating_mul(PAGE_SIZE);
        if n == 0 || start >= self.splits.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.splits.len());
        &self.splits[start..end]
    }

    pub fn current_page_splits(&self) -> &[Split] {
        self.page(self.current_page)
    }

    pub fn set_page(&mut self, n: usize) {
        self.current_page = n.clamp(1, self.page_count().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionId;

    fn stored(id: i64, amount: &str) -> Split {
        Split {
            key: SplitKey::Stored(TransactionId::new(id)),
            transaction_date: "2024-05-01".to_string(),
            amount: amount.to_string(),
            description: format!("split {id}"),
            notes: None,
            category: CategoryRef::new(1, "Food"),
            subcategory: CategoryRef::new(2, "Groceries"),
        }
    }

    #[test]
    fn add_split_appends_draft_on_last_page() {
        let mut ledger = SplitLedger::new(Money::new(10000), Vec::new());

        let first = ledger.add_split("2024-05-01");
        assert_eq!(first.get(), -1);
        for _ in 0..5 {
            ledger.add_split("2024-05-01");
        }

        assert_eq!(ledger.len(), 6);
        assert_eq!(ledger.page_count(), 2);
        assert_eq!(ledger.current_page(), 2);

        let last = &ledger.current_page_splits()[0];
        assert_eq!(last.key.raw(), -6);
        assert_eq!(last.amount, "0.00");
        assert_eq!(last.description, "");
        assert_eq!(last.subcategory, CategoryRef::default());
        assert_eq!(last.transaction_date, "2024-05-01");
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut ledger = SplitLedger::new(Money::new(10000), vec![stored(1, "10.00")]);
        let key = SplitKey::Stored(TransactionId::new(1));

        assert!(ledger.update_split(key, SplitPatch::default().description("Lunch")));
        let split = ledger.get(key).unwrap();
        assert_eq!(split.description, "Lunch");
        assert_eq!(split.amount, "10.00");
    }

    #[test]
    fn empty_patch_and_unknown_key_leave_ledger_unchanged() {
        let mut ledger = SplitLedger::new(Money::new(10000), vec![stored(1, "10.00")]);
        let before = ledger.splits().to_vec();

        assert!(ledger.update_split(SplitKey::Stored(TransactionId::new(1)), SplitPatch::default()));
        assert!(!ledger.update_split(
            SplitKey::Stored(TransactionId::new(99)),
            SplitPatch::default().amount("5")
        ));
        assert!(!ledger.update_subcategory(
            SplitKey::Stored(TransactionId::new(99)),
            CategoryRef::new(3, "Rent")
        ));

        assert_eq!(ledger.splits(), before.as_slice());
    }

    #[test]
    fn finish_amount_edit_matches_base_sign() {
        let mut ledger = SplitLedger::new(Money::new(-10000), Vec::new());
        let key = SplitKey::from(ledger.add_split("2024-05-01"));

        ledger.update_split(key, SplitPatch::default().amount("30"));
        ledger.finish_amount_edit(key);
        assert_eq!(ledger.get(key).unwrap().amount, "-30.00");

        ledger.update_split(key, SplitPatch::default().amount("garbage"));
        ledger.finish_amount_edit(key);
        assert_eq!(ledger.get(key).unwrap().amount, "0.00");
    }

    #[test]
    fn finish_date_edit_pads_parseable_dates() {
        let mut ledger = SplitLedger::new(Money::new(10000), Vec::new());
        let key = SplitKey::from(ledger.add_split("2024-05-01"));

        ledger.update_split(key, SplitPatch::default().transaction_date("2024-6-9 "));
        assert!(ledger.finish_date_edit(key));
        assert_eq!(ledger.get(key).unwrap().transaction_date, "2024-06-09");

        ledger.update_split(key, SplitPatch::default().transaction_date("2024-6-"));
        ledger.finish_date_edit(key);
        assert_eq!(ledger.get(key).unwrap().transaction_date, "2024-6-");
    }

    #[test]
    fn removing_last_split_on_last_page_steps_back_one_page() {
        let splits = (1..=6).map(|id| stored(id, "1.00")).collect();
        let mut ledger = SplitLedger::new(Money::new(10000), splits);
        ledger.set_page(2);

        ledger.remove_split(SplitKey::Stored(TransactionId::new(6)));

        assert_eq!(ledger.current_page(), 1);
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn removing_every_split_keeps_page_one() {
        let mut ledger = SplitLedger::new(Money::new(10000), vec![stored(1, "1.00")]);

        assert!(ledger.remove_split(SplitKey::Stored(TransactionId::new(1))).is_some());
        assert!(ledger.remove_split(SplitKey::Stored(TransactionId::new(1))).is_none());

        assert_eq!(ledger.current_page(), 1);
        assert_eq!(ledger.page_count(), 0);
        assert!(ledger.current_page_splits().is_empty());
    }

    #[test]
    fn totals_cover_every_page() {
        let splits = (1..=7).map(|id| stored(id, "10.00")).collect();
        let mut ledger = SplitLedger::new(Money::new(10000), splits);

        ledger.set_page(1);
        assert_eq!(ledger.current_page_splits().len(), 5);
        assert_eq!(ledger.page(2).len(), 2);
        assert!(ledger.page(3).is_empty());
        assert!(ledger.page(0).is_empty());
        assert_eq!(ledger.total(), Money::new(7000));
    }

    #[test]
    fn page_navigation_is_clamped() {
        let splits = (1..=7).map(|id| stored(id, "1.00")).collect();
        let mut ledger = SplitLedger::new(Money::new(10000), splits);

        ledger.prev_page();
        assert_eq!(ledger.current_page(), 1);
        ledger.next_page();
        ledger.next_page();
        assert_eq!(ledger.current_page(), 2);
        ledger.set_page(0);
        assert_eq!(ledger.current_page(), 1);
    }
}
