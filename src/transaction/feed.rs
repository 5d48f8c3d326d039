//! Keeps the ledger in sync with the bound user's transaction collection.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    background_task::BackgroundTask,
    identity::IdentityState,
    store::{CollectionPath, Document, DocumentStore},
    transaction::{Totals, Transaction, sort_newest_first},
};

/// The transactions of the bound user, newest first, and their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    /// The transactions sorted with [sort_newest_first].
    pub transactions: Arc<[Transaction]>,
    /// The totals of `transactions`.
    pub totals: Totals,
}

impl Ledger {
    /// Build a ledger from a collection snapshot.
    ///
    /// Documents that are not valid transactions are logged and left out.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut transactions: Vec<Transaction> = documents
            .iter()
            .filter_map(|document| match Transaction::from_document(document) {
                Ok(transaction) => Some(transaction),
                Err(error) => {
                    tracing::warn!("Skipping document {}: {error}", document.id);
                    None
                }
            })
            .collect();

        sort_newest_first(&mut transactions);
        let totals = Totals::from_transactions(&transactions);

        Self {
            transactions: Arc::from(transactions),
            totals,
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            transactions: Arc::from(Vec::new()),
            totals: Totals::default(),
        }
    }
}

/// A background subscription to the transactions of the bound user.
///
/// Nothing is loaded until the identity is ready. Every snapshot from the
/// store replaces the whole ledger. The subscription is dropped and reopened
/// whenever the identity changes, and dropping the last clone of the feed
/// stops it.
#[derive(Debug, Clone)]
pub struct TransactionFeed {
    ledger: watch::Receiver<Ledger>,
    _task: BackgroundTask,
}

impl TransactionFeed {
    /// Start following the transactions of the identity in `identity`.
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        app_id: String,
        identity: watch::Receiver<IdentityState>,
    ) -> Self {
        let (sender, ledger) = watch::channel(Ledger::default());
        let task = BackgroundTask::spawn(follow_transactions(store, app_id, identity, sender));

        Self {
            ledger,
            _task: task,
        }
    }

    /// The latest ledger.
    pub fn current(&self) -> Ledger {
        self.ledger.borrow().clone()
    }

    /// A receiver that is notified every time the ledger is replaced.
    pub fn subscribe(&self) -> watch::Receiver<Ledger> {
        self.ledger.clone()
    }
}

async fn follow_transactions(
    store: Arc<dyn DocumentStore>,
    app_id: String,
    mut identity: watch::Receiver<IdentityState>,
    ledger: watch::Sender<Ledger>,
) {
    loop {
        let bound = identity.borrow_and_update().bound().cloned();

        let Some(bound) = bound else {
            if identity.changed().await.is_err() {
                break;
            }
            continue;
        };

        let collection = CollectionPath::transactions(&app_id, &bound.user_id);
        tracing::info!("Subscribing to transactions in {collection}");
        ledger.send_replace(Ledger::default());
        let mut subscription = store.subscribe(&collection);

        loop {
            tokio::select! {
                changed = identity.changed() => {
                    if changed.is_err() {
                        return;
                    }

                    tracing::info!("Identity changed, unsubscribing from {collection}");
                    break;
                }
                snapshot = subscription.next() => match snapshot {
                    Some(Ok(documents)) => {
                        tracing::debug!("Received {} documents from {collection}", documents.len());
                        ledger.send_replace(Ledger::from_documents(&documents));
                    }
                    Some(Err(error)) => {
                        tracing::error!("Error receiving transactions from {collection}: {error}");
                    }
                    None => {
                        tracing::warn!("Subscription to {collection} closed");
                        if identity.changed().await.is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("Identity binding closed, stopping transaction feed");
}
