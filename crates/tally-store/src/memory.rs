//! In-process stand-in for the REST backend.
//!
//! Mirrors the backend contract: sequential numeric ids, insertion order for
//! listing, not-found errors for unknown ids, and a server-side balance sum.
//! Clones share the same underlying collection.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tally_domain::{balance, NewTransaction, Transaction, TransactionId};

use crate::{StoreError, StoreOperation, StoreResult, TransactionStore};

#[derive(Debug)]
struct Inner {
    next_id: u64,
    transactions: Vec<Transaction>,
    requests: usize,
    available: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryTransactionStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                transactions: Vec::new(),
                requests: 0,
                available: true,
            })),
        }
    }

    /// Seeds the collection, assigning ids in order.
    pub fn with_transactions(payloads: impl IntoIterator<Item = NewTransaction>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for payload in payloads {
                let id = inner.allocate_id();
                inner.transactions.push(payload.into_transaction(id));
            }
        }
        store
    }

    /// Number of calls served so far, successful or not.
    pub fn request_count(&self) -> usize {
        self.lock().requests
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    /// When unavailable, every call fails with HTTP 503.
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, operation: StoreOperation) -> StoreResult<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.requests += 1;
        if !inner.available {
            return Err(StoreError::Status {
                operation,
                status: 503,
                body: "backend unavailable".into(),
            });
        }
        Ok(inner)
    }
}

impl Inner {
    fn allocate_id(&mut self) -> TransactionId {
        let id = TransactionId::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|txn| &txn.id == id)
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn list(&self) -> StoreResult<Vec<Transaction>> {
        let inner = self.begin(StoreOperation::List)?;
        Ok(inner.transactions.clone())
    }

    async fn create(&self, payload: &NewTransaction) -> StoreResult<Transaction> {
        let mut inner = self.begin(StoreOperation::Create)?;
        let id = inner.allocate_id();
        let created = payload.clone().into_transaction(id);
        inner.transactions.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &TransactionId,
        payload: &NewTransaction,
    ) -> StoreResult<Transaction> {
        let operation = StoreOperation::Update;
        let mut inner = self.begin(operation)?;
        let index = inner.position(id).ok_or_else(|| StoreError::NotFound {
            operation,
            id: id.clone(),
        })?;
        let updated = payload.clone().into_transaction(id.clone());
        inner.transactions[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &TransactionId) -> StoreResult<()> {
        let operation = StoreOperation::Delete;
        let mut inner = self.begin(operation)?;
        let index = inner.position(id).ok_or_else(|| StoreError::NotFound {
            operation,
            id: id.clone(),
        })?;
        inner.transactions.remove(index);
        Ok(())
    }

    async fn balance(&self) -> StoreResult<f64> {
        let inner = self.begin(StoreOperation::Balance)?;
        Ok(balance(&inner.transactions))
    }
}
