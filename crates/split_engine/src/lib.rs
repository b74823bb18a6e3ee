//! Transaction splitting for Tincan.
//!
//! A transaction can be decomposed into splits whose amounts must reconcile
//! with the amount the transaction had when editing started (the *base
//! amount*). The original line shows whatever the splits leave over.
//!
//! ```rust
//! use split_engine::{CategoryRef, SplitData, SplitEditor, SplitKey, SplitPatch, Transaction, TransactionId};
//!
//! let original = Transaction {
//!     id: TransactionId::new(7),
//!     amount: "100.00".to_string(),
//!     description: "Costco".to_string(),
//!     notes: None,
//!     pending: false,
//!     account_id: "1".to_string(),
//!     user_id: "1".to_string(),
//!     transaction_date: "2024-05-01".to_string(),
//!     statement_transaction_date: None,
//!     statement_description: None,
//!     split_from_id: None,
//!     has_splits: false,
//!     category: CategoryRef::new(1, "Shopping"),
//!     subcategory: CategoryRef::new(2, "General"),
//! };
//!
//! let mut editor = SplitEditor::new(SplitData { original, splits: Vec::new() });
//! let key = SplitKey::from(editor.add_split());
//! editor.update_split(key, SplitPatch::default().amount("40"));
//! assert_eq!(editor.original().amount, "60.00");
//! ```
pub use error::{AmountError, SessionError, SplitError};
pub use ids::{DraftId, SplitKey, TransactionId};
pub use ledger::{PAGE_SIZE, SplitLedger};
pub use money::{Money, format_currency, parse_amount, signed_format};
pub use reconcile::{Reconciliation, check_allocation, reconcile};
pub use session::{SessionState, SplitEditor, SplitSession, SplitStore};
pub use transaction::{CategoryRef, Split, SplitCommit, SplitData, SplitPatch, Transaction};
pub use validation::{SplitFieldErrors, field_errors, validate};

mod error;
mod ids;
mod ledger;
pub mod money;
mod reconcile;
mod session;
mod transaction;
mod validation;
