//! Deleting a transaction takes two requests: one to ask for confirmation and
//! one to confirm or cancel.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    endpoints,
    html::{BUTTON_DANGER_STYLE, BUTTON_SECONDARY_STYLE, card_style},
    identity::IdentityBinding,
    preferences::{Preferences, SharedPreferences, Text, read_preferences},
    store::{CollectionPath, DocumentStore},
    transaction::{DeleteConfirmation, TransactionId, editor::delete_transaction},
};

/// The element ID of the confirmation modal.
const DELETE_MODAL_ID: &str = "delete-modal";

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    pub store: Arc<dyn DocumentStore>,
    pub app_id: String,
    pub identity: IdentityBinding,
    pub preferences: SharedPreferences,
    /// The delete waiting for confirmation, shared across requests.
    pub delete_confirmation: Arc<Mutex<DeleteConfirmation>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            app_id: state.app_id.clone(),
            identity: state.identity.clone(),
            preferences: state.preferences.clone(),
            delete_confirmation: state.delete_confirmation.clone(),
        }
    }
}

impl DeleteTransactionState {
    fn collection(&self) -> Result<CollectionPath, Error> {
        self.identity
            .current()
            .bound()
            .map(|identity| CollectionPath::transactions(&self.app_id, &identity.user_id))
            .ok_or(Error::IdentityNotReady)
    }
}

fn confirm_delete_modal(preferences: &Preferences) -> Markup {
    html! {
        div
            id=(DELETE_MODAL_ID)
            role="dialog"
            aria-modal="true"
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50"
        {
            div class={ "max-w-sm w-full space-y-4 " (card_style(preferences)) }
            {
                p class="text-lg" { (preferences.text(Text::ConfirmDelete)) }

                div class="flex justify-end gap-x-3"
                {
                    button
                        type="button"
                        hx-post=(endpoints::DELETE_TRANSACTION_CANCEL)
                        hx-target={ "#" (DELETE_MODAL_ID) }
                        hx-swap="outerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        (preferences.text(Text::Cancel))
                    }

                    button
                        type="button"
                        hx-post=(endpoints::DELETE_TRANSACTION_CONFIRM)
                        hx-target={ "#" (DELETE_MODAL_ID) }
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DANGER_STYLE)
                    {
                        (preferences.text(Text::Delete))
                    }
                }
            }
        }
    }
}

/// A route handler that remembers `transaction_id` as the pending delete and
/// responds with a confirmation modal. Nothing is removed yet.
pub async fn request_delete_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let preferences = read_preferences(&state.preferences);

    match state.delete_confirmation.lock() {
        Ok(mut confirmation) => confirmation.request(transaction_id),
        Err(error) => {
            tracing::error!("could not acquire delete confirmation lock: {error}");
            return Error::LockError("delete confirmation").into_alert_response();
        }
    }

    confirm_delete_modal(&preferences).into_response()
}

/// A route handler that removes the pending transaction and closes the modal.
///
/// Confirming with nothing pending just closes the modal.
pub async fn confirm_delete_endpoint(State(state): State<DeleteTransactionState>) -> Response {
    // Resolved first so a confirm during sign-in keeps the pending delete.
    let collection = match state.collection() {
        Ok(collection) => collection,
        Err(error) => return error.into_alert_response(),
    };

    let transaction_id = match state.delete_confirmation.lock() {
        Ok(mut confirmation) => confirmation.take_confirmed(),
        Err(error) => {
            tracing::error!("could not acquire delete confirmation lock: {error}");
            return Error::LockError("delete confirmation").into_alert_response();
        }
    };

    let Some(transaction_id) = transaction_id else {
        tracing::debug!("delete confirmed with no pending request");
        return "".into_response();
    };

    match delete_transaction(state.store.as_ref(), &collection, &transaction_id).await {
        // The ledger removes the row when the feed publishes the change.
        Ok(()) => "".into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            Error::from(error).into_alert_response()
        }
    }
}

/// A route handler that forgets the pending delete and closes the modal.
pub async fn cancel_delete_endpoint(State(state): State<DeleteTransactionState>) -> Response {
    match state.delete_confirmation.lock() {
        Ok(mut confirmation) => confirmation.cancel(),
        Err(error) => {
            tracing::error!("could not acquire delete confirmation lock: {error}");
            return Error::LockError("delete confirmation").into_alert_response();
        }
    }

    "".into_response()
}
