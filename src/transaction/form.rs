//! The form for adding a transaction or editing an existing one, and the
//! endpoints that hand out a fresh copy of it.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, card_style,
    },
    identity::IdentityBinding,
    preferences::{Preferences, SharedPreferences, Text, read_preferences},
    store::{CollectionPath, DocumentStore},
    transaction::{Transaction, TransactionId, TransactionType, ValidationError},
};

/// The element ID that edit buttons target to swap the form.
pub const TRANSACTION_FORM_ID: &str = "transaction-form";

/// The state needed to show and submit the transaction form.
#[derive(Debug, Clone)]
pub struct TransactionFormState {
    pub store: Arc<dyn DocumentStore>,
    /// Namespaces the transaction collection, see [CollectionPath::transactions].
    pub app_id: String,
    pub identity: IdentityBinding,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    pub preferences: SharedPreferences,
}

impl FromRef<AppState> for TransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            app_id: state.app_id.clone(),
            identity: state.identity.clone(),
            local_timezone: state.local_timezone.clone(),
            preferences: state.preferences.clone(),
        }
    }
}

impl TransactionFormState {
    /// The collection of the bound identity.
    ///
    /// # Errors
    ///
    /// Returns [Error::IdentityNotReady] while sign-in is still running.
    pub fn collection(&self) -> Result<CollectionPath, Error> {
        self.identity
            .current()
            .bound()
            .map(|identity| CollectionPath::transactions(&self.app_id, &identity.user_id))
            .ok_or(Error::IdentityNotReady)
    }
}

/// Whether the form adds a new transaction or overwrites an existing one.
#[derive(Debug, Clone, Copy)]
pub enum FormMode<'a> {
    Create,
    Edit(&'a TransactionId),
}

/// What the form fields are filled in with.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValues<'a> {
    pub description: &'a str,
    pub amount: &'a str,
    pub transaction_type: TransactionType,
}

/// Messages shown in the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormErrors<'a> {
    pub description: Option<&'a str>,
    pub amount: Option<&'a str>,
    /// Shown above the fields when a valid form could not be saved.
    pub submit: Option<&'a str>,
}

impl<'a> FormErrors<'a> {
    /// Place the message for `error` under the field it is about.
    pub fn from_validation(error: &ValidationError, preferences: &'a Preferences) -> Self {
        match error {
            ValidationError::EmptyDescription => Self {
                description: Some(preferences.text(Text::EmptyDescription)),
                ..Default::default()
            },
            ValidationError::InvalidAmount(_) => Self {
                amount: Some(preferences.text(Text::InvalidAmount)),
                ..Default::default()
            },
            ValidationError::NonPositiveAmount => Self {
                amount: Some(preferences.text(Text::NonPositiveAmount)),
                ..Default::default()
            },
        }
    }
}

pub fn transaction_form(
    preferences: &Preferences,
    mode: FormMode<'_>,
    values: FormValues<'_>,
    errors: FormErrors<'_>,
) -> Markup {
    let (title, submit_text, update_url) = match mode {
        FormMode::Create => (Text::AddEntry, Text::Add, None),
        FormMode::Edit(id) => (
            Text::EditEntry,
            Text::Update,
            Some(format_endpoint(endpoints::TRANSACTION, id)),
        ),
    };
    let create_url = update_url.is_none().then_some(endpoints::TRANSACTIONS_API);

    html! {
        form
            id=(TRANSACTION_FORM_ID)
            hx-post=[create_url]
            hx-put=[update_url.as_deref()]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class={ "space-y-4 " (card_style(preferences)) }
        {
            h2 class="text-xl font-semibold" { (preferences.text(title)) }

            @if let Some(message) = errors.submit {
                (Alert::error(preferences.text(Text::Error), message).into_html())
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::Description))
                }

                input
                    type="text"
                    name="description"
                    id="description"
                    value=(values.description)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(message) = errors.description {
                    p class=(FORM_ERROR_STYLE) { (message) }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::Amount))
                }

                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    min="0.01"
                    value=(values.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(message) = errors.amount {
                    p class=(FORM_ERROR_STYLE) { (message) }
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::Type))
                }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (transaction_type, label) in [
                        (TransactionType::Income, Text::Income),
                        (TransactionType::Expense, Text::Expense),
                    ] {
                        option
                            value=(transaction_type.as_str())
                            selected[transaction_type == values.transaction_type]
                        {
                            (preferences.text(label))
                        }
                    }
                }
            }

            div class="flex gap-x-3"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    (preferences.text(submit_text))
                }

                @if update_url.is_some() {
                    button
                        type="button"
                        hx-get=(endpoints::NEW_TRANSACTION_FORM)
                        hx-target={ "#" (TRANSACTION_FORM_ID) }
                        hx-swap="outerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        (preferences.text(Text::Cancel))
                    }
                }
            }
        }
    }
}

/// An empty form for adding a transaction.
pub fn blank_transaction_form(preferences: &Preferences) -> Markup {
    transaction_form(
        preferences,
        FormMode::Create,
        FormValues::default(),
        FormErrors::default(),
    )
}

/// Get an empty form, e.g. to leave edit mode.
pub async fn get_new_transaction_form(State(state): State<TransactionFormState>) -> Response {
    let preferences = read_preferences(&state.preferences);

    blank_transaction_form(&preferences).into_response()
}

/// Get the form filled in with the transaction to edit.
pub async fn get_edit_transaction_form(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let preferences = read_preferences(&state.preferences);

    let collection = match state.collection() {
        Ok(collection) => collection,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = match state.store.get(&collection, &transaction_id).await {
        Ok(document) => Transaction::from_document(&document),
        Err(error) => Err(error),
    };

    let transaction = match transaction {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("could not load transaction {transaction_id} for editing: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    let amount = transaction.amount.to_string();

    transaction_form(
        &preferences,
        FormMode::Edit(&transaction.id),
        FormValues {
            description: &transaction.description,
            amount: &amount,
            transaction_type: transaction.transaction_type,
        },
        FormErrors::default(),
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        preferences::{Language, Preferences, Theme},
        store::DocumentId,
        test_utils::{assert_form_input, assert_hx_endpoint, must_get_form, parse_html_fragment},
        transaction::{
            TransactionType, ValidationError,
            test_utils::{get_form_state, insert_transaction},
        },
    };

    use super::{
        FormErrors, FormMode, FormValues, blank_transaction_form, get_edit_transaction_form,
        get_new_transaction_form, transaction_form,
    };

    fn render(markup: maud::Markup) -> Html {
        Html::parse_fragment(&markup.into_string())
    }

    fn selected_type(html: &Html) -> Option<String> {
        html.select(&Selector::parse("select[name=type] option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value").map(str::to_owned))
    }

    #[test]
    fn blank_form_posts_new_transaction() {
        let html = render(blank_transaction_form(&Preferences::default()));

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert!(form.value().attr("hx-put").is_none());
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_eq!(selected_type(&html).as_deref(), Some("expense"));
    }

    #[test]
    fn edit_form_puts_to_transaction() {
        let id = DocumentId::new("abc123");
        let html = render(transaction_form(
            &Preferences::default(),
            FormMode::Edit(&id),
            FormValues {
                description: "Chai",
                amount: "12.5",
                transaction_type: TransactionType::Income,
            },
            FormErrors::default(),
        ));

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::TRANSACTION, "abc123"), "hx-put");
        assert!(form.value().attr("hx-post").is_none());
        assert_eq!(selected_type(&html).as_deref(), Some("income"));

        let cancel = html
            .select(&Selector::parse("button[type=button]").unwrap())
            .next()
            .expect("want cancel button in edit mode");
        assert_eq!(
            cancel.value().attr("hx-get"),
            Some(endpoints::NEW_TRANSACTION_FORM)
        );
    }

    #[test]
    fn shows_validation_error_under_field() {
        let preferences = Preferences::default();
        let errors = FormErrors::from_validation(&ValidationError::NonPositiveAmount, &preferences);

        let html = render(transaction_form(
            &preferences,
            FormMode::Create,
            FormValues {
                description: "Atta",
                amount: "0",
                transaction_type: TransactionType::Expense,
            },
            errors,
        ));

        let message = html
            .select(&Selector::parse("input#amount + p").unwrap())
            .next()
            .expect("want error under amount")
            .text()
            .collect::<String>();
        assert_eq!(message, "The amount must be greater than zero.");
        assert!(
            html.select(&Selector::parse("input#description + p").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn labels_follow_language() {
        let preferences = Preferences {
            language: Language::Hinglish,
            theme: Theme::Light,
        };

        let html = render(blank_transaction_form(&preferences));

        let labels: Vec<String> = html
            .select(&Selector::parse("label").unwrap())
            .map(|label| label.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(labels, ["Vivaran", "Rashi", "Prakar"]);
    }

    #[tokio::test]
    async fn new_form_endpoint_returns_blank_form() {
        let state = get_form_state();

        let response = get_new_transaction_form(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let description = html
            .select(&Selector::parse("input#description").unwrap())
            .next()
            .unwrap();
        assert_eq!(description.value().attr("value"), Some(""));
    }

    #[tokio::test]
    async fn edit_form_endpoint_fills_in_transaction() {
        let state = get_form_state();
        let id = insert_transaction(
            &state,
            json!({
                "description": "Doodh",
                "amount": 45.5,
                "type": "expense",
                "date": "2024-06-01",
                "timestamp": 1717200000000_i64
            }),
        )
        .await;

        let response = get_edit_transaction_form(State(state), Path(id.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::TRANSACTION, &id), "hx-put");

        let value_of = |selector: &str| {
            html.select(&Selector::parse(selector).unwrap())
                .next()
                .and_then(|input| input.value().attr("value").map(str::to_owned))
        };
        assert_eq!(value_of("input#description").as_deref(), Some("Doodh"));
        assert_eq!(value_of("input#amount").as_deref(), Some("45.5"));
    }

    #[tokio::test]
    async fn edit_form_for_missing_transaction_is_not_found() {
        let state = get_form_state();

        let response =
            get_edit_transaction_form(State(state), Path(DocumentId::new("missing"))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
