use crate::ids::{DraftId, SplitKey, TransactionId};

/// Category or subcategory reference. Id `0` means "unselected".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

impl CategoryRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.id != 0
    }
}

/// A persisted transaction as returned by the remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    /// Signed decimal string with two fraction digits.
    pub amount: String,
    pub description: String,
    pub notes: Option<String>,
    pub pending: bool,
    pub account_id: String,
    pub user_id: String,
    /// `YYYY-MM-DD`.
    pub transaction_date: String,
    pub statement_transaction_date: Option<String>,
    pub statement_description: Option<String>,
    /// The transaction this one was split from. Lookup only.
    pub split_from_id: Option<TransactionId>,
    /// Set on an original that owns splits.
    pub has_splits: bool,
    pub category: CategoryRef,
    pub subcategory: CategoryRef,
}

impl Transaction {
    /// `true` for an original with splits and for any split of one.
    #[must_use]
    pub fn is_part_of_split(&self) -> bool {
        self.has_splits || self.split_from_id.is_some()
    }

    /// Id of the original of the split group this transaction belongs to.
    ///
    /// This is the id a split session must be opened with.
    #[must_use]
    pub fn split_group_id(&self) -> TransactionId {
        self.split_from_id.unwrap_or(self.id)
    }
}

/// One editable line of a split ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub key: SplitKey,
    pub transaction_date: String,
    /// Raw amount text as entered; only normalized by
    /// [`SplitLedger::finish_amount_edit`](crate::SplitLedger::finish_amount_edit).
    pub amount: String,
    pub description: String,
    pub notes: Option<String>,
    pub category: CategoryRef,
    pub subcategory: CategoryRef,
}

impl Split {
    pub(crate) fn draft(id: DraftId, transaction_date: &str) -> Self {
        Self {
            key: SplitKey::Draft(id),
            transaction_date: transaction_date.to_string(),
            amount: "0.00".to_string(),
            description: String::new(),
            notes: None,
            category: CategoryRef::default(),
            subcategory: CategoryRef::default(),
        }
    }
}

impl From<Transaction> for Split {
    fn from(tx: Transaction) -> Self {
        Self {
            key: SplitKey::Stored(tx.id),
            transaction_date: tx.transaction_date,
            amount: tx.amount,
            description: tx.description,
            notes: tx.notes,
            category: tx.category,
            subcategory: tx.subcategory,
        }
    }
}

/// Partial update merged into a split. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitPatch {
    pub transaction_date: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl SplitPatch {
    #[must_use]
    pub fn transaction_date(mut self, value: impl Into<String>) -> Self {
        self.transaction_date = Some(value.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, value: impl Into<String>) -> Self {
        self.amount = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());
        self
    }

    pub(crate) fn apply(self, split: &mut Split) {
        if let Some(date) = self.transaction_date {
            split.transaction_date = date;
        }
        if let Some(amount) = self.amount {
            split.amount = amount;
        }
        if let Some(description) = self.description {
            split.description = description;
        }
        if let Some(notes) = self.notes {
            split.notes = Some(notes);
        }
    }
}

/// One entry of the commit payload sent to the store.
///
/// Drafts carry no id so the store assigns one; stored splits keep theirs
/// and are updated in place. The category is derived by the store from the
/// subcategory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitCommit {
    pub id: Option<TransactionId>,
    pub transaction_date: String,
    pub amount: String,
    pub description: String,
    pub notes: Option<String>,
    pub subcategory_id: i64,
}

impl From<&Split> for SplitCommit {
    fn from(split: &Split) -> Self {
        Self {
            id: split.key.stored(),
            transaction_date: split.transaction_date.clone(),
            amount: split.amount.clone(),
            description: split.description.clone(),
            notes: split.notes.clone(),
            subcategory_id: split.subcategory.id,
        }
    }
}

/// An original transaction together with the splits that reference it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitData {
    pub original: Transaction,
    pub splits: Vec<Transaction>,
}
