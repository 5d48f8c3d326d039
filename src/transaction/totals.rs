//! Sums over the transaction list for the summary cards.

use crate::transaction::{Transaction, TransactionType};

/// Income, expenses and the balance between them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses.
    pub net_balance: f64,
}

impl Totals {
    /// Add up `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (total_income, total_expense) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, expense), transaction| {
                    match transaction.transaction_type {
                        TransactionType::Income => (income + transaction.amount, expense),
                        TransactionType::Expense => (income, expense + transaction.amount),
                    }
                });

        Self {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
        }
    }
}
