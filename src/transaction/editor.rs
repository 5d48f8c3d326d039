//! Validates form input and writes transactions to the document store.

use time::OffsetDateTime;

use crate::{
    store::{CollectionPath, DocumentStore, StoreError},
    transaction::{TransactionDocument, TransactionId, TransactionType},
};

/// The reasons a submitted transaction is rejected before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The description was empty or only whitespace.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The amount is not a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount is zero or negative.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,
}

/// A validated transaction that is ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    description: String,
    amount: f64,
    transaction_type: TransactionType,
}

impl TransactionDraft {
    /// Validate raw form input.
    ///
    /// The description is trimmed and must not be empty. The amount must parse
    /// as a finite number greater than zero.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking the description
    /// before the amount.
    pub fn parse(
        description: &str,
        amount: &str,
        transaction_type: TransactionType,
    ) -> Result<Self, ValidationError> {
        let description = description.trim();

        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = match amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => return Err(ValidationError::InvalidAmount(amount.to_owned())),
        };

        if amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }

        Ok(Self {
            description: description.to_owned(),
            amount,
            transaction_type,
        })
    }

    /// The trimmed description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount, always greater than zero.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }
}

/// Write `draft` to `collection`.
///
/// If `editing_id` is set the existing transaction is overwritten, otherwise
/// a new transaction is created and stamped with `now`.
///
/// # Errors
/// Returns a [StoreError] if the write fails, including
/// [StoreError::NotFound] when the transaction being edited no longer exists.
pub async fn submit(
    store: &dyn DocumentStore,
    collection: &CollectionPath,
    draft: TransactionDraft,
    editing_id: Option<&TransactionId>,
    now: OffsetDateTime,
) -> Result<TransactionId, StoreError> {
    match editing_id {
        Some(id) => {
            update_transaction(store, collection, id, draft).await?;
            Ok(id.clone())
        }
        None => create_transaction(store, collection, draft, now).await,
    }
}

/// Add a new transaction dated `now`.
///
/// `now` should be in the local timezone so that the stored date is the
/// local date.
pub async fn create_transaction(
    store: &dyn DocumentStore,
    collection: &CollectionPath,
    draft: TransactionDraft,
    now: OffsetDateTime,
) -> Result<TransactionId, StoreError> {
    let document = TransactionDocument {
        description: draft.description,
        amount: draft.amount,
        transaction_type: draft.transaction_type,
        date: now.date(),
        timestamp: unix_millis(now),
    };

    let id = store.add(collection, document.into_value()?).await?;
    tracing::info!("Created transaction {id} in {collection}");

    Ok(id)
}

/// Overwrite the transaction with `id`, keeping the date and timestamp it
/// was created with.
pub async fn update_transaction(
    store: &dyn DocumentStore,
    collection: &CollectionPath,
    id: &TransactionId,
    draft: TransactionDraft,
) -> Result<(), StoreError> {
    let existing = store.get(collection, id).await?;
    let existing = TransactionDocument::from_value(existing.data)?;

    let document = TransactionDocument {
        description: draft.description,
        amount: draft.amount,
        transaction_type: draft.transaction_type,
        date: existing.date,
        timestamp: existing.timestamp,
    };

    store.update(collection, id, document.into_value()?).await?;
    tracing::info!("Updated transaction {id} in {collection}");

    Ok(())
}

/// Remove the transaction with `id`.
pub async fn delete_transaction(
    store: &dyn DocumentStore,
    collection: &CollectionPath,
    id: &TransactionId,
) -> Result<(), StoreError> {
    store.delete(collection, id).await?;
    tracing::info!("Deleted transaction {id} from {collection}");

    Ok(())
}

fn unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

/// The transaction waiting for the user to confirm its deletion.
///
/// Requesting a delete only records the transaction, it is removed once
/// the request is confirmed with [DeleteConfirmation::take_confirmed].
#[derive(Debug, Default)]
pub struct DeleteConfirmation {
    pending: Option<TransactionId>,
}

impl DeleteConfirmation {
    /// Ask to delete `id`, replacing any earlier request.
    pub fn request(&mut self, id: TransactionId) {
        self.pending = Some(id);
    }

    /// Forget the pending request.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Confirm the pending request and return the transaction to delete.
    pub fn take_confirmed(&mut self) -> Option<TransactionId> {
        self.pending.take()
    }

    /// The transaction awaiting confirmation.
    pub fn pending(&self) -> Option<&TransactionId> {
        self.pending.as_ref()
    }
}
