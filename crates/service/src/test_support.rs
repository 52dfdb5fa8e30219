#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::errors::ServiceError;
use crate::storage::{DocumentStore, Filter, FindSpec, UpdateOutcome};

/// Store whose every call fails, as if the database were unreachable.
pub struct FailingStore;

fn unreachable_store() -> ServiceError {
    ServiceError::Db("server selection timeout".into())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_one(&self, _: &str, _: Document) -> Result<ObjectId, ServiceError> { Err(unreachable_store()) }
    async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, ServiceError> { Err(unreachable_store()) }
    async fn find(&self, _: &str, _: &Filter, _: &FindSpec) -> Result<Vec<Document>, ServiceError> { Err(unreachable_store()) }
    async fn update_one(&self, _: &str, _: &Filter, _: Document) -> Result<UpdateOutcome, ServiceError> { Err(unreachable_store()) }
    async fn delete_one(&self, _: &str, _: &Filter) -> Result<u64, ServiceError> { Err(unreachable_store()) }
    async fn group_values(&self, _: &str, _: &str) -> Result<Vec<Bson>, ServiceError> { Err(unreachable_store()) }
    async fn ping(&self) -> Result<(), ServiceError> { Err(unreachable_store()) }
}

/// Counts calls and otherwise answers with empty results.
#[derive(Default)]
pub struct CountingStore {
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn insert_one(&self, _: &str, _: Document) -> Result<ObjectId, ServiceError> { self.hit(); Ok(ObjectId::new()) }
    async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, ServiceError> { self.hit(); Ok(None) }
    async fn find(&self, _: &str, _: &Filter, _: &FindSpec) -> Result<Vec<Document>, ServiceError> { self.hit(); Ok(vec![]) }
    async fn update_one(&self, _: &str, _: &Filter, _: Document) -> Result<UpdateOutcome, ServiceError> { self.hit(); Ok(UpdateOutcome::default()) }
    async fn delete_one(&self, _: &str, _: &Filter) -> Result<u64, ServiceError> { self.hit(); Ok(0) }
    async fn group_values(&self, _: &str, _: &str) -> Result<Vec<Bson>, ServiceError> { self.hit(); Ok(vec![]) }
    async fn ping(&self) -> Result<(), ServiceError> { self.hit(); Ok(()) }
}
