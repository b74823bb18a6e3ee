//! Wire types of the Tincan remote API.
//!
//! All bodies are camelCase JSON. Amounts travel as decimal strings with two
//! fraction digits, dates as `YYYY-MM-DD` strings.
use serde::{Deserialize, Serialize};

/// `{ id, name }` pair used for categories and subcategories.
///
/// An id of `0` means "nothing selected".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: i64,
        /// Signed decimal string, e.g. `"-42.10"`.
        pub amount: String,
        pub description: String,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub pending: bool,
        #[serde(default)]
        pub account_id: String,
        /// `YYYY-MM-DD`.
        pub transaction_date: String,
        #[serde(default)]
        pub statement_transaction_date: Option<String>,
        #[serde(default)]
        pub statement_description: Option<String>,
        /// Id of the transaction this record was split from.
        #[serde(default)]
        pub split_from_id: Option<i64>,
        #[serde(default)]
        pub has_splits: bool,
        #[serde(default)]
        pub user_id: String,
        pub category: CategoryRef,
        pub subcategory: CategoryRef,
    }

    /// Response of both the split fetch and the split sync endpoints.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionSplits {
        pub original: Transaction,
        pub splits: Vec<Transaction>,
    }

    /// One entry of a split sync request.
    ///
    /// Entries without `id` are created; entries with `id` are updated in
    /// place. The category is derived server side from `subcategory_id`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<i64>,
        pub transaction_date: String,
        pub amount: String,
        pub description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
        pub subcategory_id: i64,
    }

    /// Request body for `PATCH /transactions/{id}/sync-splits`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SplitSync {
        pub splits: Vec<SplitUpdate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Subcategory {
        pub id: i64,
        pub name: String,
        pub category_id: i64,
        #[serde(default)]
        pub has_transactions: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Category {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub category_type: String,
        #[serde(default)]
        pub has_transactions: bool,
        #[serde(default)]
        pub subcategories: Vec<Subcategory>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryResponse {
        #[serde(default)]
        pub total_items: u64,
        #[serde(default)]
        pub filtered_items: u64,
        pub categories: Vec<Category>,
    }
}
