//! reqwest-backed client for the `/transactions` collection.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use tally_domain::{NewTransaction, Transaction, TransactionId};

use crate::{StoreError, StoreOperation, StoreResult, TransactionStore};

const COLLECTION_PATH: &str = "transactions";

/// Talks JSON to `{origin}/transactions`. Sends no auth header and sets no
/// client-side timeout, so a hung backend keeps a call pending.
#[derive(Debug, Clone)]
pub struct HttpTransactionStore {
    client: Client,
    collection: Url,
}

impl HttpTransactionStore {
    /// `origin` is the backend root, e.g. `http://localhost:8080`.
    pub fn new(origin: &str) -> StoreResult<Self> {
        let invalid = || StoreError::InvalidBaseUrl(origin.to_string());
        let mut collection = Url::parse(origin.trim()).map_err(|_| invalid())?;
        if !matches!(collection.scheme(), "http" | "https") {
            return Err(invalid());
        }
        collection
            .path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push(COLLECTION_PATH);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|_| invalid())?;

        Ok(Self { client, collection })
    }

    /// Full URL of the collection, e.g. `http://localhost:8080/transactions`.
    pub fn collection_url(&self) -> &str {
        self.collection.as_str()
    }

    /// Collection URL plus one percent-encoded path segment.
    fn child_url(&self, segment: &str) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(segment);
        }
        url
    }

    fn item_url(&self, id: &TransactionId) -> Url {
        self.child_url(id.as_str())
    }

    async fn send(
        &self,
        operation: StoreOperation,
        request: RequestBuilder,
        id: Option<&TransactionId>,
    ) -> StoreResult<Response> {
        let response = request.send().await.map_err(|source| {
            tracing::warn!(%operation, error = %source, "transaction request failed");
            StoreError::Transport { operation, source }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(%operation, status = status.as_u16(), "backend rejected request");
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(StoreError::NotFound {
                operation,
                id: id.clone(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            operation,
            status: status.as_u16(),
            body,
        })
    }
}

async fn decode<T: DeserializeOwned>(
    operation: StoreOperation,
    response: Response,
) -> StoreResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| StoreError::Transport { operation, source })?;
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode {
        operation,
        message: err.to_string(),
    })
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn list(&self) -> StoreResult<Vec<Transaction>> {
        let operation = StoreOperation::List;
        tracing::debug!(url = %self.collection, "GET transactions");
        let response = self
            .send(operation, self.client.get(self.collection.clone()), None)
            .await?;
        decode(operation, response).await
    }

    async fn create(&self, payload: &NewTransaction) -> StoreResult<Transaction> {
        let operation = StoreOperation::Create;
        tracing::debug!(url = %self.collection, "POST transaction");
        let request = self.client.post(self.collection.clone()).json(payload);
        let response = self.send(operation, request, None).await?;
        decode(operation, response).await
    }

    async fn update(
        &self,
        id: &TransactionId,
        payload: &NewTransaction,
    ) -> StoreResult<Transaction> {
        let operation = StoreOperation::Update;
        let url = self.item_url(id);
        tracing::debug!(%url, "PUT transaction");
        let request = self.client.put(url).json(payload);
        let response = self.send(operation, request, Some(id)).await?;
        decode(operation, response).await
    }

    async fn delete(&self, id: &TransactionId) -> StoreResult<()> {
        let operation = StoreOperation::Delete;
        let url = self.item_url(id);
        tracing::debug!(%url, "DELETE transaction");
        self.send(operation, self.client.delete(url), Some(id))
            .await?;
        Ok(())
    }

    async fn balance(&self) -> StoreResult<f64> {
        let operation = StoreOperation::Balance;
        let url = self.child_url("balance");
        tracing::debug!(%url, "GET balance");
        let response = self.send(operation, self.client.get(url), None).await?;
        decode(operation, response).await
    }
}
