//! Defines the core data models for transactions and how they are stored as documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::store::{Document, DocumentId, StoreError};

/// The store-assigned ID of a transaction.
pub type TransactionId = DocumentId;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that came in.
    Income,
    /// Money that went out.
    #[default]
    Expense,
}

impl TransactionType {
    /// The value used for the transaction type in documents and forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// An income or expense entry in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// What the money was for.
    pub description: String,
    /// How much money moved, always greater than zero.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The local date the transaction was recorded.
    pub date: Date,
    /// When the transaction was recorded in Unix milliseconds.
    pub timestamp: i64,
}

impl Transaction {
    /// Decode a transaction from a stored document.
    ///
    /// # Errors
    /// Returns [StoreError::Serialization] if the document is missing fields
    /// or has fields of the wrong type.
    pub fn from_document(document: &Document) -> Result<Self, StoreError> {
        let TransactionDocument {
            description,
            amount,
            transaction_type,
            date,
            timestamp,
        } = TransactionDocument::from_value(document.data.clone())?;

        Ok(Self {
            id: document.id.clone(),
            description,
            amount,
            transaction_type,
            date,
            timestamp,
        })
    }
}

mod date_format {
    //! Stores dates as "YYYY-MM-DD".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The fields of a transaction as they are kept in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDocument {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(
        serialize_with = "date_format::serialize",
        deserialize_with = "date_format::deserialize"
    )]
    pub date: Date,
    pub timestamp: i64,
}

impl TransactionDocument {
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        serde_json::from_value(value).map_err(StoreError::from)
    }

    pub fn into_value(self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(StoreError::from)
    }
}

/// Sort `transactions` so the most recent come first.
///
/// Transactions are ordered by date, then by timestamp, both descending.
/// Any remaining ties are broken by ID so the order is stable across
/// snapshots.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.timestamp.cmp(&a.timestamp))
            .then(a.id.cmp(&b.id))
    });
}
