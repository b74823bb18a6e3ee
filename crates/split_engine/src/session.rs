//! Editing session over the splits of one transaction.
//!
//! [`SplitEditor`] is the synchronous model: every ledger mutation goes
//! through it so the original line and the error state are recomputed.
//! [`SplitSession`] wraps an editor with the remote round trips and the
//! session lifecycle:
//!
//! ```text
//! Loading -> Ready <-> Saving -> Closed { refresh: true }
//!            Ready -> Closed { refresh: false }
//! ```
use std::{fmt, future::Future};

use crate::{
    CategoryRef, DraftId, Money, SessionError, Split, SplitCommit, SplitData, SplitError,
    SplitKey, SplitLedger, SplitPatch, Transaction, TransactionId, money,
    reconcile::{Reconciliation, reconcile},
    validation,
};

/// Remote persistence of splits.
pub trait SplitStore {
    type Error: fmt::Display;

    /// Returns the original transaction and the splits referencing it.
    fn fetch_split_data(
        &self,
        transaction_id: TransactionId,
    ) -> impl Future<Output = Result<SplitData, Self::Error>> + Send;

    /// Atomically creates and updates `items`. Either all persist or none.
    fn commit_splits(
        &self,
        transaction_id: TransactionId,
        items: Vec<SplitCommit>,
    ) -> impl Future<Output = Result<SplitData, Self::Error>> + Send;
}

#[derive(Debug)]
pub struct SplitEditor {
    original: Transaction,
    ledger: SplitLedger,
    error: Option<SessionError>,
    /// A save attempt failed validation; re-run the pipeline on edits.
    recheck: bool,
}

impl SplitEditor {
    /// Builds an editor from freshly fetched data.
    ///
    /// The base amount is the original amount plus every existing split, and
    /// does not change afterwards.
    pub fn new(data: SplitData) -> Self {
        let SplitData { original, splits } = data;
        let original_amount = money::parse_amount(&original.amount).unwrap_or(Money::ZERO);
        let splits: Vec<Split> = splits.into_iter().map(Split::from).collect();
        let existing = money::sum(splits.iter().map(|split| split.amount.as_str()));

        let mut editor = Self {
            original,
            ledger: SplitLedger::new(original_amount + existing, splits),
            error: None,
            recheck: false,
        };
        editor.refresh();
        editor
    }

    /// The original transaction with its displayed remainder.
    pub fn original(&self) -> &Transaction {
        &self.original
    }

    pub fn ledger(&self) -> &SplitLedger {
        &self.ledger
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn base_amount(&self) -> Money {
        self.ledger.base_amount()
    }

    pub fn reconciliation(&self) -> Reconciliation {
        reconcile(self.ledger.base_amount(), self.ledger.total())
    }

    pub fn add_split(&mut self) -> DraftId {
        let id = self.ledger.add_split(&self.original.transaction_date);
        self.refresh();
        id
    }

    pub fn update_split(&mut self, key: SplitKey, patch: SplitPatch) {
        if self.ledger.update_split(key, patch) {
            self.refresh();
        }
    }

    pub fn update_subcategory(&mut self, key: SplitKey, subcategory: CategoryRef) {
        if self.ledger.update_subcategory(key, subcategory) {
            self.refresh();
        }
    }

    pub fn finish_amount_edit(&mut self, key: SplitKey) {
        if self.ledger.finish_amount_edit(key) {
            self.refresh();
        }
    }

    pub fn finish_date_edit(&mut self, key: SplitKey) {
        if self.ledger.finish_date_edit(key) {
            self.refresh();
        }
    }

    pub fn remove_split(&mut self, key: SplitKey) {
        if self.ledger.remove_split(key).is_some() {
            self.refresh();
        }
    }

    pub fn set_page(&mut self, n: usize) {
        self.ledger.set_page(n);
    }

    pub fn next_page(&mut self) {
        self.ledger.next_page();
    }

    pub fn prev_page(&mut self) {
        self.ledger.prev_page();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.recheck = false;
    }

    /// Runs the save pipeline, recording its outcome as the displayed error.
    pub fn validate(&mut self) -> Result<(), SplitError> {
        let result = validation::validate(self.ledger.splits(), self.ledger.base_amount());
        match &result {
            Ok(()) => {
                self.error = None;
                self.recheck = false;
            }
            Err(err) => {
                self.error = Some(err.clone().into());
                self.recheck = true;
            }
        }
        result
    }

    pub fn commit_payload(&self) -> Vec<SplitCommit> {
        self.ledger.splits().iter().map(SplitCommit::from).collect()
    }

    fn refresh(&mut self) {
        let rec = self.reconciliation();
        if self.original.amount != rec.displayed_amount {
            self.original.amount = rec.displayed_amount;
        }

        self.error = match rec.over_allocation {
            Some(err) => Some(err.into()),
            None if self.recheck => {
                validation::validate(self.ledger.splits(), self.ledger.base_amount())
                    .err()
                    .map(SessionError::from)
            }
            None => None,
        };
        if self.error.is_none() {
            self.recheck = false;
        }
    }

    fn set_commit_error(&mut self, err: SessionError) {
        self.error = Some(err);
        self.recheck = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Saving,
    Closed { refresh: bool },
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::Closed { .. } => "closed",
        }
    }
}

/// Holds the session in `Saving` until dropped.
///
/// Any exit path, including a dropped save future, returns the session to
/// `Ready` unless it was closed first.
struct SavingGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> SavingGuard<'a> {
    fn acquire(state: &'a mut SessionState) -> Result<Self, SessionError> {
        if *state != SessionState::Ready {
            return Err(SessionError::NotReady(state.label()));
        }
        *state = SessionState::Saving;
        Ok(Self { state })
    }

    fn close(self, refresh: bool) {
        *self.state = SessionState::Closed { refresh };
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == SessionState::Saving {
            *self.state = SessionState::Ready;
        }
    }
}

type OnClose = Box<dyn FnOnce(bool) + Send>;

pub struct SplitSession<S> {
    store: S,
    transaction_id: TransactionId,
    state: SessionState,
    editor: Option<SplitEditor>,
    load_error: Option<SessionError>,
    on_close: Option<OnClose>,
}

impl<S: SplitStore> SplitSession<S> {
    /// Opens a session and loads the splits of `transaction_id`.
    ///
    /// `on_close` runs exactly once, with `true` when the caller has to
    /// re-fetch its transactions.
    pub async fn open(
        store: S,
        transaction_id: TransactionId,
        on_close: impl FnOnce(bool) + Send + 'static,
    ) -> Self {
        let mut session = Self {
            store,
            transaction_id,
            state: SessionState::Loading,
            editor: None,
            load_error: None,
            on_close: Some(Box::new(on_close)),
        };
        session.load().await;
        session
    }

    /// Repeats a failed initial fetch.
    pub async fn retry_load(&mut self) {
        if self.state == SessionState::Loading {
            self.load().await;
        }
    }

    async fn load(&mut self) {
        tracing::debug!(transaction_id = %self.transaction_id, "loading splits");
        match self.store.fetch_split_data(self.transaction_id).await {
            Ok(data) => {
                tracing::info!(
                    transaction_id = %self.transaction_id,
                    splits = data.splits.len(),
                    "splits loaded"
                );
                self.editor = Some(SplitEditor::new(data));
                self.load_error = None;
                self.state = SessionState::Ready;
            }
            Err(err) => {
                tracing::error!(transaction_id = %self.transaction_id, "failed to fetch split data: {err}");
                self.load_error = Some(SessionError::Load(err.to_string()));
            }
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn load_error(&self) -> Option<&SessionError> {
        self.load_error.as_ref()
    }

    pub fn editor(&self) -> Option<&SplitEditor> {
        self.editor.as_ref()
    }

    /// Mutable access, only while the session is ready for edits.
    pub fn editor_mut(&mut self) -> Option<&mut SplitEditor> {
        match self.state {
            SessionState::Ready => self.editor.as_mut(),
            _ => None,
        }
    }

    /// Validates and commits all splits in one request.
    ///
    /// On success the session closes asking the caller to refresh. On any
    /// failure the ledger is left as it was and the session stays editable.
    pub async fn save(&mut self) -> Result<(), SessionError> {
        let guard = SavingGuard::acquire(&mut self.state)?;
        let Some(editor) = self.editor.as_mut() else {
            return Err(SessionError::NotReady(SessionState::Loading.label()));
        };

        editor.validate()?;

        let items = editor.commit_payload();
        tracing::info!(
            transaction_id = %self.transaction_id,
            items = items.len(),
            "committing splits"
        );

        match self.store.commit_splits(self.transaction_id, items).await {
            Ok(saved) => {
                tracing::info!(
                    transaction_id = %self.transaction_id,
                    splits = saved.splits.len(),
                    "splits committed"
                );
                guard.close(true);
                self.editor = None;
                self.fire_on_close(true);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(transaction_id = %self.transaction_id, "failed to save split data: {err}");
                let err = SessionError::Commit(err.to_string());
                editor.set_commit_error(err.clone());
                Err(err)
            }
        }
    }

    /// Drops every pending change and closes without asking for a refresh.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Saving | SessionState::Closed { .. } => {
                Err(SessionError::NotReady(self.state.label()))
            }
            SessionState::Loading | SessionState::Ready => {
                self.editor = None;
                self.state = SessionState::Closed { refresh: false };
                self.fire_on_close(false);
                Ok(())
            }
        }
    }

    fn fire_on_close(&mut self, refresh: bool) {
        if let Some(on_close) = self.on_close.take() {
            on_close(refresh);
        }
    }
}

impl<S> fmt::Debug for SplitSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitSession")
            .field("transaction_id", &self.transaction_id)
            .field("state", &self.state)
            .field("editor", &self.editor)
            .field("load_error", &self.load_error)
            .finish_non_exhaustive()
    }
}
