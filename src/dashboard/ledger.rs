//! The ledger view: summary cards and the transaction table.

use maud::{Markup, html};

use crate::{
    dashboard::cards::summary_cards,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_BUTTON_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, card_style, format_currency,
    },
    preferences::{Preferences, Text},
    transaction::{Ledger, TRANSACTION_FORM_ID, Transaction, TransactionType},
};

/// The element ID the ledger stream swaps into.
pub(super) const LEDGER_ID: &str = "ledger";

fn amount_cell(transaction: &Transaction) -> Markup {
    let (sign, style) = match transaction.transaction_type {
        TransactionType::Income => ("+", "text-green-600 dark:text-green-400"),
        TransactionType::Expense => ("-", "text-red-600 dark:text-red-400"),
    };

    html! {
        td class={ (TABLE_CELL_STYLE) " text-right font-medium whitespace-nowrap " (style) }
        {
            (sign) (format_currency(transaction.amount))
        }
    }
}

fn transaction_row(transaction: &Transaction, preferences: &Preferences) -> Markup {
    let type_text = match transaction.transaction_type {
        TransactionType::Income => Text::Income,
        TransactionType::Expense => Text::Expense,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id.as_str())
        {
            td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" } { (transaction.date.to_string()) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (preferences.text(type_text)) }
            (amount_cell(transaction))
            td class={ (TABLE_CELL_STYLE) " flex gap-x-4" }
            {
                button
                    type="button"
                    hx-get=(format_endpoint(endpoints::EDIT_TRANSACTION_FORM, &transaction.id))
                    hx-target={ "#" (TRANSACTION_FORM_ID) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class=(LINK_BUTTON_STYLE)
                {
                    (preferences.text(Text::Edit))
                }

                button
                    type="button"
                    hx-get=(format_endpoint(endpoints::DELETE_TRANSACTION_REQUEST, &transaction.id))
                    hx-target="#alert-container"
                    hx-swap="innerHTML"
                    class=(BUTTON_DELETE_STYLE)
                {
                    (preferences.text(Text::Delete))
                }
            }
        }
    }
}

fn transaction_table(transactions: &[Transaction], preferences: &Preferences) -> Markup {
    html! {
        section class={ "overflow-x-auto " (card_style(preferences)) }
        {
            @if transactions.is_empty() {
                p id="no-entries" class="text-center opacity-75"
                {
                    (preferences.text(Text::NoEntries))
                }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { (preferences.text(Text::Date)) }
                            th scope="col" class=(TABLE_CELL_STYLE) { (preferences.text(Text::Description)) }
                            th scope="col" class=(TABLE_CELL_STYLE) { (preferences.text(Text::Type)) }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { (preferences.text(Text::Amount)) }
                            th scope="col" class=(TABLE_CELL_STYLE) {}
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction, preferences))
                        }
                    }
                }
            }
        }
    }
}

/// The contents of the ledger element, re-rendered whenever the feed
/// publishes a new ledger.
pub(super) fn ledger_view(ledger: &Ledger, preferences: &Preferences) -> Markup {
    html! {
        div class="space-y-4"
        {
            (summary_cards(&ledger.totals, preferences))
            (transaction_table(&ledger.transactions, preferences))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        preferences::{Language, Preferences, Theme},
        store::DocumentId,
        transaction::{Ledger, Totals, Transaction, TransactionType},
    };

    use super::ledger_view;

    fn render(ledger: &Ledger, preferences: &Preferences) -> Html {
        Html::parse_fragment(&ledger_view(ledger, preferences).into_string())
    }

    fn transaction(id: &str, description: &str, amount: f64, transaction_type: TransactionType) -> Transaction {
        Transaction {
            id: DocumentId::new(id),
            description: description.to_owned(),
            amount,
            transaction_type,
            date: date!(2025 - 03 - 09),
            timestamp: 0,
        }
    }

    #[test]
    fn empty_ledger_shows_message() {
        let html = render(&Ledger::default(), &Preferences::default());

        let message: String = html
            .select(&Selector::parse("#no-entries").unwrap())
            .next()
            .expect("want empty ledger message")
            .text()
            .collect();
        assert_eq!(message, "No entries yet. Add some to get started!");
        assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());
    }

    #[test]
    fn empty_ledger_message_follows_language() {
        let preferences = Preferences {
            language: Language::Hinglish,
            theme: Theme::Blue,
        };

        let html = render(&Ledger::default(), &preferences);

        let message: String = html
            .select(&Selector::parse("#no-entries").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(
            message,
            "Abhi tak koi entry nahi hai. Shuru karne ke liye kuch jodein!"
        );
    }

    #[test]
    fn rows_keep_ledger_order_with_actions() {
        let transactions = vec![
            transaction("b", "Sale", 500.0, TransactionType::Income),
            transaction("a", "Chai", 20.0, TransactionType::Expense),
        ];
        let ledger = Ledger {
            totals: Totals::from_transactions(&transactions),
            transactions: Arc::from(transactions),
        };

        let html = render(&ledger, &Preferences::default());

        let rows: Vec<_> = html.select(&Selector::parse("tbody tr").unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value().attr("data-transaction-id"), Some("b"));
        assert_eq!(rows[1].value().attr("data-transaction-id"), Some("a"));

        let cells: Vec<String> = rows[1]
            .select(&Selector::parse("td").unwrap())
            .take(4)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(cells, ["2025-03-09", "Chai", "Expense", "-₹20.00"]);

        let buttons: Vec<_> = rows[1].select(&Selector::parse("button").unwrap()).collect();
        assert_eq!(
            buttons[0].value().attr("hx-get"),
            Some(format_endpoint(endpoints::EDIT_TRANSACTION_FORM, "a").as_str())
        );
        assert_eq!(
            buttons[1].value().attr("hx-get"),
            Some(format_endpoint(endpoints::DELETE_TRANSACTION_REQUEST, "a").as_str())
        );
    }

    #[test]
    fn shows_totals_above_table() {
        let transactions = vec![
            transaction("a", "Sale", 500.0, TransactionType::Income),
            transaction("b", "Chai", 20.0, TransactionType::Expense),
        ];
        let ledger = Ledger {
            totals: Totals::from_transactions(&transactions),
            transactions: Arc::from(transactions),
        };

        let html = render(&ledger, &Preferences::default());

        let balance: String = html
            .select(&Selector::parse("#net-balance p").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(balance, "₹480.00");
    }
}
