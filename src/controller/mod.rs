//! Transaction form controller.
//!
//! Owns everything the screen shows: the fetched list, the balance, the
//! editable draft with its field errors, and the busy flag. User actions come
//! in as [`Command`]s; mutations go through the [`TransactionStore`] and are
//! always followed by a refresh of both the list and the balance.

pub mod validation;


use serde::Serialize;
use tally_config::BalanceSource;
use tally_domain::{balance, Transaction, TransactionDraft, TransactionId, TransactionKind};
use tally_store::{StoreError, StoreOperation, TransactionStore};
use thiserror::Error;

pub use validation::{validate_draft, FieldError, FieldErrors};

/// Whether the form creates a new row or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(TransactionId),
}

/// Everything the client displays, in one serializable value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub transactions: Vec<Transaction>,
    pub balance: f64,
    pub draft: TransactionDraft,
    pub errors: FieldErrors,
    pub busy: bool,
}

impl AppState {
    pub fn mode(&self) -> Mode {
        match &self.draft.editing_id {
            Some(id) => Mode::Edit(id.clone()),
            None => Mode::Create,
        }
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| &txn.id == id)
    }
}

/// Discrete user actions accepted by [`FormController::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh,
    Edit(TransactionId),
    Cancel,
    Submit,
    Delete(TransactionId),
    SetDescription(String),
    SetKind(TransactionKind),
    SetAmount(String),
    SetDate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Refreshed,
    DraftUpdated,
    Editing(TransactionId),
    Cancelled,
    /// Validation failed; nothing was sent.
    Rejected(FieldErrors),
    Created(Transaction),
    Updated(Transaction),
    Deleted(TransactionId),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("another request is still in progress")]
    Busy,

    #[error("transaction {0} is not in the current list")]
    UnknownTransaction(TransactionId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{operation} succeeded but the list could not be refreshed: {source}")]
    StaleView {
        operation: StoreOperation,
        #[source]
        source: StoreError,
    },
}

pub type ControllerResult<T> = Result<T, ControllerError>;

pub struct FormController {
    store: Box<dyn TransactionStore>,
    balance_source: BalanceSource,
    state: AppState,
}

impl FormController {
    pub fn new(store: Box<dyn TransactionStore>, balance_source: BalanceSource) -> Self {
        Self {
            store,
            balance_source,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub async fn apply(&mut self, command: Command) -> ControllerResult<Outcome> {
        match command {
            Command::Refresh => self.refresh().await.map(|()| Outcome::Refreshed),
            Command::Edit(id) => self.edit(&id).map(|()| Outcome::Editing(id)),
            Command::Cancel => {
                self.cancel();
                Ok(Outcome::Cancelled)
            }
            Command::Submit => self.submit().await,
            Command::Delete(id) => self.delete(&id).await.map(|()| Outcome::Deleted(id)),
            Command::SetDescription(value) => {
                self.set_description(value);
                Ok(Outcome::DraftUpdated)
            }
            Command::SetKind(kind) => {
                self.set_kind(kind);
                Ok(Outcome::DraftUpdated)
            }
            Command::SetAmount(value) => {
                self.set_amount(value);
                Ok(Outcome::DraftUpdated)
            }
            Command::SetDate(value) => {
                self.set_date(value);
                Ok(Outcome::DraftUpdated)
            }
        }
    }

    /// Stores the text and re-validates it immediately.
    pub fn set_description(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.state.errors.description = validation::validate_description(&value).err();
        self.state.draft.description = value;
    }

    pub fn set_kind(&mut self, kind: TransactionKind) {
        self.state.draft.kind = kind;
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.state.errors.amount = validation::validate_amount(&value).err();
        self.state.draft.amount = value;
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.state.errors.date = validation::validate_date(&value).err();
        self.state.draft.date = value;
    }

    /// Loads a displayed row into the draft and switches to edit mode.
    pub fn edit(&mut self, id: &TransactionId) -> ControllerResult<()> {
        self.ensure_idle()?;
        let draft = TransactionDraft::from_transaction(
            self.state
                .find(id)
                .ok_or_else(|| ControllerError::UnknownTransaction(id.clone()))?,
        );
        self.state.draft = draft;
        self.state.errors.clear();
        Ok(())
    }

    /// Drops the draft and returns to create mode.
    pub fn cancel(&mut self) {
        self.reset_draft();
    }

    /// Fetches the list (and, for a remote balance, the aggregate).
    ///
    /// On failure the previously displayed list and balance stay in place.
    pub async fn refresh(&mut self) -> ControllerResult<()> {
        self.ensure_idle()?;
        self.state.busy = true;
        let result = self.reload().await;
        self.state.busy = false;
        result.map_err(|err| {
            tracing::error!(error = %err, "failed to fetch transactions");
            ControllerError::Store(err)
        })
    }

    /// Validates the draft, then creates or updates depending on the mode.
    ///
    /// Invalid drafts are kept as typed with their errors recorded, and no
    /// request is made. A failed save also keeps the draft for another try.
    pub async fn submit(&mut self) -> ControllerResult<Outcome> {
        self.ensure_idle()?;
        let payload = match validate_draft(&self.state.draft) {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!(?errors, "draft rejected by validation");
                self.state.errors = errors.clone();
                return Ok(Outcome::Rejected(errors));
            }
        };
        self.state.errors.clear();

        let editing = self.state.draft.editing_id.clone();
        self.state.busy = true;
        let saved = match &editing {
            Some(id) => self.store.update(id, &payload).await,
            None => self.store.create(&payload).await,
        };
        let saved = match saved {
            Ok(saved) => saved,
            Err(err) => {
                self.state.busy = false;
                tracing::error!(error = %err, "failed to save transaction");
                return Err(err.into());
            }
        };

        self.reset_draft();
        let refreshed = self.reload().await;
        self.state.busy = false;

        let (operation, outcome) = match editing {
            Some(_) => (StoreOperation::Update, Outcome::Updated(saved)),
            None => (StoreOperation::Create, Outcome::Created(saved)),
        };
        refreshed.map(|()| outcome).map_err(|source| {
            tracing::error!(%operation, error = %source, "failed to refresh after save");
            ControllerError::StaleView { operation, source }
        })
    }

    /// Deletes a row, then refreshes. A failed delete leaves the list as is.
    pub async fn delete(&mut self, id: &TransactionId) -> ControllerResult<()> {
        self.ensure_idle()?;
        self.state.busy = true;
        if let Err(err) = self.store.delete(id).await {
            self.state.busy = false;
            tracing::error!(%id, error = %err, "failed to delete transaction");
            return Err(err.into());
        }

        if self.state.draft.editing_id.as_ref() == Some(id) {
            self.reset_draft();
        }
        let refreshed = self.reload().await;
        self.state.busy = false;
        refreshed.map_err(|source| {
            tracing::error!(%id, error = %source, "failed to refresh after delete");
            ControllerError::StaleView {
                operation: StoreOperation::Delete,
                source,
            }
        })
    }

    fn ensure_idle(&self) -> ControllerResult<()> {
        if self.state.busy {
            Err(ControllerError::Busy)
        } else {
            Ok(())
        }
    }

    fn reset_draft(&mut self) {
        self.state.draft = TransactionDraft::default();
        self.state.errors.clear();
    }

    /// Replaces list and balance together, or neither.
    async fn reload(&mut self) -> Result<(), StoreError> {
        let transactions = self.store.list().await?;
        let total = match self.balance_source {
            BalanceSource::Local => balance(&transactions),
            BalanceSource::Remote => self.store.balance().await?,
        };
        tracing::debug!(count = transactions.len(), balance = total, "transactions refreshed");
        self.state.transactions = transactions;
        self.state.balance = total;
        Ok(())
    }
}
