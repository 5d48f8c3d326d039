//! Defines the endpoint for adding a transaction.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
// axum_extra's Form reads an empty string as an empty value instead of
// rejecting the request.
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    preferences::{Preferences, Text, read_preferences},
    timezone::local_now,
    transaction::{
        TransactionDraft, TransactionType,
        editor::submit,
        form::{
            FormErrors, FormMode, FormValues, TransactionFormState, blank_transaction_form,
            transaction_form,
        },
    },
};

/// The raw form data for a transaction. The amount is kept as text so that
/// bad input can be shown back to the user with an error message.
#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    pub description: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl TransactionFormData {
    pub(super) fn values(&self) -> FormValues<'_> {
        FormValues {
            description: &self.description,
            amount: &self.amount,
            transaction_type: self.transaction_type,
        }
    }
}

/// Re-render the form with the user's input and `errors`.
pub(super) fn form_with_errors(
    preferences: &Preferences,
    mode: FormMode<'_>,
    form: &TransactionFormData,
    errors: FormErrors<'_>,
) -> Response {
    transaction_form(preferences, mode, form.values(), errors).into_response()
}

/// A route handler for adding a transaction.
///
/// Responds with a blank form on success, the ledger itself is updated by
/// the transaction feed. Invalid input is returned in the form with the
/// error shown under the field.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let preferences = read_preferences(&state.preferences);

    let draft =
        match TransactionDraft::parse(&form.description, &form.amount, form.transaction_type) {
            Ok(draft) => draft,
            Err(error) => {
                tracing::debug!("rejected new transaction: {error}");
                let errors = FormErrors::from_validation(&error, &preferences);
                return form_with_errors(&preferences, FormMode::Create, &form, errors);
            }
        };

    let collection = match state.collection() {
        Ok(collection) => collection,
        Err(error) => return error.into_alert_response(),
    };

    let now = match local_now(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    match submit(state.store.as_ref(), &collection, draft, None, now).await {
        Ok(_) => blank_transaction_form(&preferences).into_response(),
        Err(error) => {
            tracing::error!("could not add transaction to {collection}: {error}");
            let errors = FormErrors {
                submit: Some(preferences.text(Text::InternalError)),
                ..Default::default()
            };
            form_with_errors(&preferences, FormMode::Create, &form, errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        identity::{BoundIdentity, IdentityBinding, IdentityState},
        test_utils::parse_html_fragment,
        transaction::{
            TransactionType,
            test_utils::{assert_field_error, get_form_state, get_transactions},
        },
    };

    use super::{TransactionFormData, create_transaction_endpoint};

    fn form_data(description: &str, amount: &str) -> TransactionFormData {
        TransactionFormData {
            description: description.to_owned(),
            amount: amount.to_owned(),
            transaction_type: TransactionType::Income,
        }
    }

    #[tokio::test]
    async fn creates_transaction_and_clears_form() {
        let state = get_form_state();

        let response =
            create_transaction_endpoint(State(state.clone()), Form(form_data(" Sale ", "250.75")))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let description = html
            .select(&Selector::parse("input#description").unwrap())
            .next()
            .unwrap();
        assert_eq!(description.value().attr("value"), Some(""));

        let transactions = get_transactions(state.store.as_ref()).await;
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.description, "Sale");
        assert_eq!(transaction.amount, 250.75);
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.date, OffsetDateTime::now_utc().date());
    }

    #[tokio::test]
    async fn empty_description_is_rejected() {
        let state = get_form_state();

        let response =
            create_transaction_endpoint(State(state.clone()), Form(form_data("   ", "10"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_field_error(&html, "description", "Please enter a description.");
        assert!(get_transactions(state.store.as_ref()).await.is_empty());
    }

    #[tokio::test]
    async fn bad_amounts_are_rejected() {
        let cases = [
            ("", "Please enter a valid amount."),
            ("abc", "Please enter a valid amount."),
            ("NaN", "Please enter a valid amount."),
            ("0", "The amount must be greater than zero."),
            ("-5", "The amount must be greater than zero."),
        ];

        for (amount, want_error) in cases {
            let state = get_form_state();

            let response =
                create_transaction_endpoint(State(state.clone()), Form(form_data("Chai", amount)))
                    .await;

            let html = parse_html_fragment(response).await;
            assert_field_error(&html, "amount", want_error);

            let description = html
                .select(&Selector::parse("input#description").unwrap())
                .next()
                .unwrap();
            assert_eq!(description.value().attr("value"), Some("Chai"));
            assert!(get_transactions(state.store.as_ref()).await.is_empty());
        }
    }

    #[tokio::test]
    async fn pending_identity_is_an_error() {
        let mut state = get_form_state();
        state.identity = IdentityBinding::pending();
        assert_eq!(state.identity.current(), IdentityState::Pending);

        let response =
            create_transaction_endpoint(State(state), Form(form_data("Chai", "10"))).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn store_error_keeps_input() {
        let mut state = get_form_state();
        state.identity = IdentityBinding::fixed(BoundIdentity::detached());

        let response =
            create_transaction_endpoint(State(state), Form(form_data("Chai", "10"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("#alert").unwrap())
            .next()
            .expect("want an error alert in the form");
        assert!(
            alert
                .text()
                .collect::<String>()
                .contains("Something went wrong")
        );
        let amount = html
            .select(&Selector::parse("input#amount").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.value().attr("value"), Some("10"));
    }
}
