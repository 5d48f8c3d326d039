/*! Sets up the SQLite database that backs the identity provider and the document store. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{identity::create_identity_table, store::create_document_table};

/// Create the tables used by the application if they do not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_identity_table(&transaction)?;
    create_document_table(&transaction)?;

    transaction.commit()
}
