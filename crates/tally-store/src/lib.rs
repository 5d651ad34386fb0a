//! tally-store
//!
//! Access to the `/transactions` REST collection. [`TransactionStore`] is the
//! seam the form controller talks to; [`HttpTransactionStore`] is the real
//! backend client and [`MemoryTransactionStore`] an in-process stand-in.

pub mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use tally_domain::{NewTransaction, Transaction, TransactionId};

pub use error::{StoreError, StoreOperation, StoreResult};
pub use http::HttpTransactionStore;
pub use memory::MemoryTransactionStore;

/// Single-shot operations against the transaction collection.
///
/// No retry, caching, or pagination: every call issues exactly one request and
/// hands failures back to the caller.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions in server-defined order.
    async fn list(&self) -> StoreResult<Vec<Transaction>>;

    async fn create(&self, payload: &NewTransaction) -> StoreResult<Transaction>;

    async fn update(&self, id: &TransactionId, payload: &NewTransaction)
        -> StoreResult<Transaction>;

    async fn delete(&self, id: &TransactionId) -> StoreResult<()>;

    /// Backend-computed balance over all transactions.
    async fn balance(&self) -> StoreResult<f64>;
}
