use api_types::{
    category::{Category, CategoryResponse},
    transaction::{SplitSync, SplitUpdate, TransactionSplits},
};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use split_engine::{CategoryRef, SplitCommit, SplitData, SplitStore, Transaction, TransactionId};

use crate::error::{AppError, Result};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::builder().build()?,
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Endpoint(err.to_string()))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = request.send().await?;
        let status = res.status();
        tracing::debug!(url = %res.url(), %status, "api response");

        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }

        let text = res.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.error,
            Err(_) if !text.trim().is_empty() => text.trim().to_string(),
            Err(_) => "unknown error".to_string(),
        };

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(message),
            422 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        };
        Err(err)
    }

    pub async fn split_data(
        &self,
        transaction_id: i64,
    ) -> std::result::Result<TransactionSplits, ClientError> {
        let endpoint = self.endpoint(&format!("transactions/{transaction_id}/splits"))?;
        self.send(self.http.get(endpoint)).await
    }

    pub async fn sync_splits(
        &self,
        transaction_id: i64,
        payload: &SplitSync,
    ) -> std::result::Result<TransactionSplits, ClientError> {
        let endpoint = self.endpoint(&format!("transactions/{transaction_id}/sync-splits"))?;
        self.send(self.http.patch(endpoint).json(payload)).await
    }

    pub async fn categories(&self) -> std::result::Result<Vec<Category>, ClientError> {
        let endpoint = self.endpoint("categories")?;
        let res: CategoryResponse = self.send(self.http.get(endpoint)).await?;
        Ok(res.categories)
    }
}

impl SplitStore for Client {
    type Error = ClientError;

    async fn fetch_split_data(
        &self,
        transaction_id: TransactionId,
    ) -> std::result::Result<SplitData, ClientError> {
        self.split_data(transaction_id.get()).await.map(map_splits)
    }

    async fn commit_splits(
        &self,
        transaction_id: TransactionId,
        items: Vec<SplitCommit>,
    ) -> std::result::Result<SplitData, ClientError> {
        let payload = SplitSync {
            splits: items.into_iter().map(map_commit).collect(),
        };
        self.sync_splits(transaction_id.get(), &payload)
            .await
            .map(map_splits)
    }
}

fn map_category(category: api_types::CategoryRef) -> CategoryRef {
    CategoryRef::new(category.id, category.name)
}

fn map_transaction(tx: api_types::transaction::Transaction) -> Transaction {
    Transaction {
        id: TransactionId::new(tx.id),
        amount: tx.amount,
        description: tx.description,
        notes: tx.notes,
        pending: tx.pending,
        account_id: tx.account_id,
        user_id: tx.user_id,
        transaction_date: tx.transaction_date,
        statement_transaction_date: tx.statement_transaction_date,
        statement_description: tx.statement_description,
        split_from_id: tx.split_from_id.map(TransactionId::new),
        has_splits: tx.has_splits,
        category: map_category(tx.category),
        subcategory: map_category(tx.subcategory),
    }
}

fn map_splits(data: TransactionSplits) -> SplitData {
    SplitData {
        original: map_transaction(data.original),
        splits: data.splits.into_iter().map(map_transaction).collect(),
    }
}

fn map_commit(item: SplitCommit) -> SplitUpdate {
    SplitUpdate {
        id: item.id.map(TransactionId::get),
        transaction_date: item.transaction_date,
        amount: item.amount,
        description: item.description,
        notes: item.notes,
        subcategory_id: item.subcategory_id,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use api_types::{CategoryRef as WireCategory, transaction::Transaction as WireTransaction};
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::{get, patch},
    };
    use split_engine::{SessionState, SplitKey, SplitPatch, SplitSession};

    use super::*;

    type Recorded = Arc<Mutex<Vec<serde_json::Value>>>;

    fn wire(id: i64, amount: &str, split_from_id: Option<i64>) -> WireTransaction {
        WireTransaction {
            id,
            amount: amount.to_string(),
            description: format!("transaction {id}"),
            notes: None,
            pending: false,
            account_id: "acc".to_string(),
            transaction_date: "2024-06-10".to_string(),
            statement_transaction_date: None,
            statement_description: None,
            split_from_id,
            has_splits: split_from_id.is_none(),
            user_id: "usr".to_string(),
            category: WireCategory {
                id: 1,
                name: "Food".to_string(),
            },
            subcategory: WireCategory {
                id: 2,
                name: "Groceries".to_string(),
            },
        }
    }

    async fn get_splits(
        Path(id): Path<i64>,
    ) -> std::result::Result<Json<TransactionSplits>, (StatusCode, String)> {
        match id {
            10 => Ok(Json(TransactionSplits {
                original: wire(10, "-75.00", None),
                splits: vec![wire(11, "-25.00", Some(10))],
            })),
            500 => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":"database down"}"#.to_string(),
            )),
            422 => Err((StatusCode::UNPROCESSABLE_ENTITY, "bad id".to_string())),
            _ => Err((StatusCode::NOT_FOUND, String::new())),
        }
    }

    async fn sync_splits(
        State(recorded): State<Recorded>,
        Path(id): Path<i64>,
        Json(body): Json<serde_json::Value>,
    ) -> Json<TransactionSplits> {
        recorded.lock().unwrap().push(body);
        let mut original = wire(id, "-25.00", None);
        original.has_splits = true;
        Json(TransactionSplits {
            original,
            splits: vec![wire(11, "-25.00", Some(id)), wire(12, "-50.00", Some(id))],
        })
    }

    async fn categories() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "totalItems": 1,
            "filteredItems": 1,
            "categories": [{
                "id": 1, "name": "Food", "categoryType": "expense", "hasTransactions": true,
                "subcategories": [
                    {"id": 2, "name": "Groceries", "categoryId": 1, "hasTransactions": true},
                    {"id": 3, "name": "Restaurants", "categoryId": 1, "hasTransactions": false}
                ]
            }]
        }))
    }

    async fn serve(prefix: &str) -> (String, Recorded) {
        let recorded = Recorded::default();
        let api = Router::new()
            .route("/transactions/{id}/splits", get(get_splits))
            .route("/transactions/{id}/sync-splits", patch(sync_splits))
            .route("/categories", get(categories))
            .with_state(Arc::clone(&recorded));
        let router = if prefix.is_empty() {
            api
        } else {
            Router::new().nest(prefix, api)
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{addr}{prefix}"), recorded)
    }

    #[tokio::test]
    async fn fetch_maps_wire_records() {
        let (base_url, _) = serve("").await;
        let client = Client::new(&base_url).unwrap();

        let data = client
            .fetch_split_data(TransactionId::new(10))
            .await
            .unwrap();

        assert_eq!(data.original.id, TransactionId::new(10));
        assert_eq!(data.original.split_from_id, None);
        assert_eq!(data.splits.len(), 1);
        assert_eq!(data.splits[0].split_from_id, Some(TransactionId::new(10)));
        assert_eq!(data.splits[0].subcategory, CategoryRef::new(2, "Groceries"));
        assert_eq!(data.splits[0].split_group_id(), TransactionId::new(10));
    }

    #[tokio::test]
    async fn error_statuses_are_mapped() {
        let (base_url, _) = serve("").await;
        let client = Client::new(&base_url).unwrap();

        let err = client.split_data(404).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));

        let err = client.split_data(422).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref msg) if msg == "bad id"));

        let err = client.split_data(500).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { status, ref message }
                if status == StatusCode::INTERNAL_SERVER_ERROR && message == "database down"
        ));
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let (base_url, _) = serve("/api").await;
        let client = Client::new(&base_url).unwrap();

        let categories = client.categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].subcategories[1].name, "Restaurants");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new(&format!("http://{addr}")).unwrap();
        let err = client.split_data(10).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn session_commits_through_http() {
        let (base_url, recorded) = serve("").await;
        let client = Client::new(&base_url).unwrap();
        let closed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&closed);

        let mut session = SplitSession::open(client, TransactionId::new(10), move |refresh| {
            *sink.lock().unwrap() = Some(refresh);
        })
        .await;
        assert_eq!(session.state(), SessionState::Ready);

        let editor = session.editor_mut().unwrap();
        assert_eq!(editor.original().amount, "-75.00");
        let key = SplitKey::from(editor.add_split());
        editor.update_split(
            key,
            SplitPatch::default().amount("50").description("Snacks"),
        );
        editor.update_subcategory(key, CategoryRef::new(3, "Restaurants"));
        editor.finish_amount_edit(key);
        assert_eq!(editor.original().amount, "-25.00");

        session.save().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed { refresh: true });
        assert_eq!(*closed.lock().unwrap(), Some(true));

        let bodies = recorded.lock().unwrap();
        let splits = bodies[0]["splits"].as_array().unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0]["id"], 11);
        assert!(splits[1].get("id").is_none());
        assert_eq!(splits[1]["amount"], "-50.00");
        assert_eq!(splits[1]["subcategoryId"], 3);
        assert_eq!(splits[1]["transactionDate"], "2024-06-10");
    }
}
