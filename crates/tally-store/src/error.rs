use std::fmt;

use tally_domain::TransactionId;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Names the store call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Create,
    Update,
    Delete,
    Balance,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreOperation::List => "list",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
            StoreOperation::Balance => "balance",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: StoreOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed: transaction {id} not found")]
    NotFound {
        operation: StoreOperation,
        id: TransactionId,
    },

    #[error("{operation} failed with HTTP {status}: {body}")]
    Status {
        operation: StoreOperation,
        status: u16,
        body: String,
    },

    #[error("{operation} returned an unreadable body: {message}")]
    Decode {
        operation: StoreOperation,
        message: String,
    },

    #[error("invalid backend URL `{0}`")]
    InvalidBaseUrl(String),
}

impl StoreError {
    /// The operation that triggered the failure, when there is one.
    pub fn operation(&self) -> Option<StoreOperation> {
        match self {
            StoreError::Transport { operation, .. }
            | StoreError::NotFound { operation, .. }
            | StoreError::Status { operation, .. }
            | StoreError::Decode { operation, .. } => Some(*operation),
            StoreError::InvalidBaseUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
