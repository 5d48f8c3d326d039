//! The addressing types for documents and collections.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::identity::UserId;

/// The store-assigned ID of a document, unique within its collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an existing document ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn new_random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The document ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document and its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The ID of the document within its collection.
    pub id: DocumentId,
    /// The document contents.
    pub data: Value,
}

/// The location of a collection and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    path: String,
    owner: UserId,
}

impl CollectionPath {
    /// The transaction collection of `owner`, i.e.
    /// `artifacts/{app_id}/users/{owner}/transactions`.
    pub fn transactions(app_id: &str, owner: &UserId) -> Self {
        Self {
            path: format!("artifacts/{app_id}/users/{owner}/transactions"),
            owner: owner.clone(),
        }
    }

    /// The user that owns the collection.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// The full path of the collection.
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
