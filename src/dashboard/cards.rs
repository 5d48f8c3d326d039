//! Summary cards for the ledger totals.

use maud::{Markup, html};

use crate::{
    html::{card_style, format_currency},
    preferences::{Preferences, Text},
    transaction::Totals,
};

const INCOME_STYLE: &str = "text-green-600 dark:text-green-400";
const EXPENSE_STYLE: &str = "text-red-600 dark:text-red-400";

fn balance_style(balance: f64) -> &'static str {
    if balance >= 0.0 {
        INCOME_STYLE
    } else {
        EXPENSE_STYLE
    }
}

fn summary_card(preferences: &Preferences, id: &str, title: Text, amount: f64, style: &str) -> Markup {
    html! {
        div id=(id) class=(card_style(preferences))
        {
            h3 class="text-sm font-medium opacity-75" { (preferences.text(title)) }
            p class={ "text-2xl font-bold " (style) } { (format_currency(amount)) }
        }
    }
}

/// Cards for total income, total expense and the net balance.
pub(super) fn summary_cards(totals: &Totals, preferences: &Preferences) -> Markup {
    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            (summary_card(preferences, "total-income", Text::TotalIncome, totals.total_income, INCOME_STYLE))
            (summary_card(preferences, "total-expense", Text::TotalExpense, totals.total_expense, EXPENSE_STYLE))
            (summary_card(
                preferences,
                "net-balance",
                Text::NetBalance,
                totals.net_balance,
                balance_style(totals.net_balance),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        preferences::{Language, Preferences, Theme},
        transaction::Totals,
    };

    use super::summary_cards;

    fn card_text(html: &Html, id: &str) -> (String, String) {
        let title = html
            .select(&Selector::parse(&format!("#{id} h3")).unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        let amount = html
            .select(&Selector::parse(&format!("#{id} p")).unwrap())
            .next()
            .unwrap()
            .text()
            .collect();

        (title, amount)
    }

    #[test]
    fn shows_totals_as_rupees() {
        let totals = Totals {
            total_income: 1234.5,
            total_expense: 50.0,
            net_balance: 1184.5,
        };

        let html = Html::parse_fragment(
            &summary_cards(&totals, &Preferences::default()).into_string(),
        );

        assert_eq!(
            card_text(&html, "total-income"),
            ("Total Income".to_owned(), "₹1,234.50".to_owned())
        );
        assert_eq!(
            card_text(&html, "total-expense"),
            ("Total Expense".to_owned(), "₹50.00".to_owned())
        );
        assert_eq!(
            card_text(&html, "net-balance"),
            ("Net Balance".to_owned(), "₹1,184.50".to_owned())
        );
    }

    #[test]
    fn negative_balance_is_red() {
        let totals = Totals {
            total_income: 10.0,
            total_expense: 30.0,
            net_balance: -20.0,
        };
        let preferences = Preferences {
            language: Language::Hinglish,
            theme: Theme::Dark,
        };

        let html = Html::parse_fragment(&summary_cards(&totals, &preferences).into_string());

        let (title, amount) = card_text(&html, "net-balance");
        assert_eq!(title, "Shuddh Balance");
        assert_eq!(amount, "-₹20.00");
        let balance = html
            .select(&Selector::parse("#net-balance p").unwrap())
            .next()
            .unwrap();
        assert!(
            balance
                .value()
                .attr("class")
                .unwrap()
                .contains("text-red-600")
        );
    }
}
