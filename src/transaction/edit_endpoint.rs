//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error,
    preferences::{Text, read_preferences},
    store::StoreError,
    transaction::{
        TransactionDraft, TransactionId,
        create_endpoint::{TransactionFormData, form_with_errors},
        editor::update_transaction,
        form::{FormErrors, FormMode, TransactionFormState, blank_transaction_form},
    },
};

/// A route handler for overwriting the transaction at `transaction_id`.
///
/// The date and timestamp the transaction was created with are kept. On
/// success the form leaves edit mode and is returned blank.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let preferences = read_preferences(&state.preferences);
    let mode = FormMode::Edit(&transaction_id);

    let draft =
        match TransactionDraft::parse(&form.description, &form.amount, form.transaction_type) {
            Ok(draft) => draft,
            Err(error) => {
                tracing::debug!("rejected update to transaction {transaction_id}: {error}");
                let errors = FormErrors::from_validation(&error, &preferences);
                return form_with_errors(&preferences, mode, &form, errors);
            }
        };

    let collection = match state.collection() {
        Ok(collection) => collection,
        Err(error) => return error.into_alert_response(),
    };

    match update_transaction(state.store.as_ref(), &collection, &transaction_id, draft).await {
        Ok(()) => blank_transaction_form(&preferences).into_response(),
        Err(StoreError::NotFound) => {
            tracing::warn!("tried to update missing transaction {transaction_id}");
            Error::from(StoreError::NotFound).into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            let errors = FormErrors {
                submit: Some(preferences.text(Text::InternalError)),
                ..Default::default()
            };
            form_with_errors(&preferences, mode, &form, errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use scraper::Selector;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        store::DocumentId,
        test_utils::{assert_hx_endpoint, must_get_form, parse_html_fragment},
        transaction::{
            TransactionType,
            create_endpoint::TransactionFormData,
            test_utils::{assert_field_error, get_form_state, get_transactions, insert_transaction},
        },
    };

    use super::edit_transaction_endpoint;

    fn form_data(description: &str, amount: &str) -> TransactionFormData {
        TransactionFormData {
            description: description.to_owned(),
            amount: amount.to_owned(),
            transaction_type: TransactionType::Income,
        }
    }

    #[tokio::test]
    async fn updates_fields_and_keeps_date() {
        let state = get_form_state();
        let id = insert_transaction(
            &state,
            json!({
                "description": "Chai",
                "amount": 10.0,
                "type": "expense",
                "date": "2024-06-01",
                "timestamp": 1717200000000_i64
            }),
        )
        .await;

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(id.clone()),
            Form(form_data("Chai aur samosa", "35")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");

        let transactions = get_transactions(state.store.as_ref()).await;
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.id, id);
        assert_eq!(transaction.description, "Chai aur samosa");
        assert_eq!(transaction.amount, 35.0);
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.date, date!(2024 - 06 - 01));
        assert_eq!(transaction.timestamp, 1717200000000);
    }

    #[tokio::test]
    async fn invalid_input_stays_in_edit_mode() {
        let state = get_form_state();
        let id = insert_transaction(
            &state,
            json!({
                "description": "Chai",
                "amount": 10.0,
                "type": "expense",
                "date": "2024-06-01",
                "timestamp": 1717200000000_i64
            }),
        )
        .await;

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(id.clone()),
            Form(form_data("", "35")),
        )
        .await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::TRANSACTION, &id), "hx-put");
        assert_field_error(&html, "description", "Please enter a description.");

        let transactions = get_transactions(state.store.as_ref()).await;
        assert_eq!(transactions[0].description, "Chai");
        assert!(
            html.select(&Selector::parse("button[type=button]").unwrap())
                .next()
                .is_some(),
            "want cancel button"
        );
    }

    #[tokio::test]
    async fn edit_does_not_need_the_local_time() {
        let mut state = get_form_state();
        state.local_timezone = "Middle/Earth".to_owned();
        let id = insert_transaction(
            &state,
            json!({
                "description": "Chai",
                "amount": 10.0,
                "type": "expense",
                "date": "2024-06-01",
                "timestamp": 1717200000000_i64
            }),
        )
        .await;

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(id),
            Form(form_data("Lassi", "40")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let transactions = get_transactions(state.store.as_ref()).await;
        assert_eq!(transactions[0].description, "Lassi");
        assert_eq!(transactions[0].date, date!(2024 - 06 - 01));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = get_form_state();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(DocumentId::new("missing")),
            Form(form_data("Chai", "10")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(get_transactions(state.store.as_ref()).await.is_empty());
    }
}
