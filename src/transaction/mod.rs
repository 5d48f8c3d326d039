//! Transactions and the ledger built from them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and how it is stored as a document
//! - The feed that keeps the ledger in sync with the document store
//! - Validating and writing transactions, including the two-step delete
//! - The transaction form and the endpoints behind it

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod editor;
mod feed;
mod form;
mod model;
mod totals;

#[cfg(test)]
mod test_utils;

pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{
    DeleteTransactionState, cancel_delete_endpoint, confirm_delete_endpoint,
    request_delete_endpoint,
};
pub use edit_endpoint::edit_transaction_endpoint;
pub use editor::{
    DeleteConfirmation, TransactionDraft, ValidationError, create_transaction, delete_transaction,
    submit, update_transaction,
};
pub use feed::{Ledger, TransactionFeed};
pub use form::{
    TRANSACTION_FORM_ID, TransactionFormState, blank_transaction_form, get_edit_transaction_form,
    get_new_transaction_form,
};
pub use model::{
    Transaction, TransactionDocument, TransactionId, TransactionType, sort_newest_first,
};
pub use totals::Totals;
