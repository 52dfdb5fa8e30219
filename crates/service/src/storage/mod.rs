//! Storage abstractions for the service layer.
//!
//! `DocumentStore` is the only seam to the database: every route issues
//! exactly one call on it. `MongoStore` is the production implementation,
//! `MemoryStore` backs tests and local runs without a database.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;

use crate::errors::ServiceError;

pub mod filter;
pub mod memory;
pub mod mongo;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Sort and limit for `find`. The default is store order, unbounded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FindSpec {
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<i64>,
}

impl FindSpec {
    pub fn limit(n: i64) -> Self {
        Self { sort: None, limit: Some(n) }
    }

    pub fn sorted_by(field: &str, order: SortOrder) -> Self {
        Self { sort: Some((field.to_string(), order)), limit: None }
    }

    pub fn sort_document(&self) -> Option<Document> {
        self.sort.as_ref().map(|(field, order)| {
            let mut doc = Document::new();
            doc.insert(field.as_str(), order.as_i32());
            doc
        })
    }
}

/// Counts reported by a single-document update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document; the store assigns `_id`.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, ServiceError>;
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, ServiceError>;
    async fn find(&self, collection: &str, filter: &Filter, spec: &FindSpec) -> Result<Vec<Document>, ServiceError>;
    /// Field-level `$set` on the first matching document.
    async fn update_one(&self, collection: &str, filter: &Filter, set: Document) -> Result<UpdateOutcome, ServiceError>;
    /// Returns the number of removed documents (0 or 1).
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, ServiceError>;
    /// Distinct values of `field` across the collection, in no particular order.
    /// Documents missing the field contribute `Null`.
    async fn group_values(&self, collection: &str, field: &str) -> Result<Vec<Bson>, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Insert acknowledgement, shaped like the driver's `insertOne` result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResult {
    pub fn new(id: ObjectId) -> Self {
        Self { acknowledged: true, inserted_id: id.to_hex() }
    }
}

/// Update acknowledgement, shaped like the driver's `updateOne` result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

impl From<UpdateOutcome> for UpdateResult {
    fn from(o: UpdateOutcome) -> Self {
        Self {
            acknowledged: true,
            matched_count: o.matched,
            modified_count: o.modified,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}
