use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::{
    db::initialize,
    identity::{BoundIdentity, IdentityBinding, UserId},
    preferences::Preferences,
    store::{CollectionPath, DocumentStore, SqliteDocumentStore},
    transaction::{
        DeleteConfirmation, DeleteTransactionState, Transaction, TransactionFormState,
        TransactionId,
    },
};

pub const TEST_APP_ID: &str = "test-app";
pub const TEST_OWNER: &str = "owner";

fn get_test_store() -> Arc<SqliteDocumentStore> {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn.execute(
        "INSERT INTO identity (uid, kind) VALUES (?1, 'anonymous')",
        [TEST_OWNER],
    )
    .unwrap();

    Arc::new(SqliteDocumentStore::new(Arc::new(Mutex::new(conn))))
}

pub fn test_collection() -> CollectionPath {
    CollectionPath::transactions(TEST_APP_ID, &UserId::new(TEST_OWNER))
}

fn owner_binding() -> IdentityBinding {
    IdentityBinding::fixed(BoundIdentity::backed(UserId::new(TEST_OWNER)))
}

pub fn get_form_state() -> TransactionFormState {
    TransactionFormState {
        store: get_test_store(),
        app_id: TEST_APP_ID.to_owned(),
        identity: owner_binding(),
        local_timezone: "Etc/UTC".to_owned(),
        preferences: Arc::new(Mutex::new(Preferences::default())),
    }
}

pub fn get_delete_state() -> DeleteTransactionState {
    DeleteTransactionState {
        store: get_test_store(),
        app_id: TEST_APP_ID.to_owned(),
        identity: owner_binding(),
        preferences: Arc::new(Mutex::new(Preferences::default())),
        delete_confirmation: Arc::new(Mutex::new(DeleteConfirmation::default())),
    }
}

pub async fn insert_transaction(state: &TransactionFormState, data: Value) -> TransactionId {
    state.store.add(&test_collection(), data).await.unwrap()
}

pub async fn get_transactions(store: &dyn DocumentStore) -> Vec<Transaction> {
    let mut subscription = store.subscribe(&test_collection());
    let documents = subscription.next().await.unwrap().unwrap();

    documents
        .iter()
        .map(|document| Transaction::from_document(document).unwrap())
        .collect()
}

#[track_caller]
pub fn assert_field_error(html: &Html, field: &str, want: &str) {
    let selector = Selector::parse(&format!("input#{field} + p")).unwrap();
    let got = html
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("want an error message under {field}"))
        .text()
        .collect::<String>();

    assert_eq!(got.trim(), want);
}
