use std::fmt;

/// Identifier assigned by the remote store to a persisted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(i64);

impl TransactionId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-local identifier of a split that has not been saved yet.
///
/// Always negative. Only unique within the editing session that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftId(i64);

impl DraftId {
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Hands out draft ids `-1, -2, -3, ...`.
#[derive(Debug, Clone)]
pub(crate) struct DraftIds {
    next: i64,
}

impl Default for DraftIds {
    fn default() -> Self {
        Self { next: -1 }
    }
}

impl DraftIds {
    pub(crate) fn issue(&mut self) -> DraftId {
        let id = DraftId(self.next);
        self.next -= 1;
        id
    }
}

/// Address of one entry in a split ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitKey {
    Draft(DraftId),
    Stored(TransactionId),
}

impl SplitKey {
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft(_))
    }

    /// The durable id, if this split already exists in the store.
    #[must_use]
    pub const fn stored(self) -> Option<TransactionId> {
        match self {
            Self::Stored(id) => Some(id),
            Self::Draft(_) => None,
        }
    }

    /// Wire form: drafts keep their negative value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        match self {
            Self::Draft(id) => id.0,
            Self::Stored(id) => id.0,
        }
    }
}

impl From<TransactionId> for SplitKey {
    fn from(id: TransactionId) -> Self {
        Self::Stored(id)
    }
}

impl From<DraftId> for SplitKey {
    fn from(id: DraftId) -> Self {
        Self::Draft(id)
    }
}
