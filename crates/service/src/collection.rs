use std::marker::PhantomData;
use std::sync::Arc;

use models::{Record, RecordId};
use mongodb::bson::{Bson, Document};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::{DeleteResult, DocumentStore, Filter, FindSpec, InsertResult, UpdateResult};

/// The five request shapes every resource route reduces to, over one
/// collection of `T` records. Each method issues at most one store call.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), name: self.name.clone(), _record: PhantomData }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self { store, name: name.into(), _record: PhantomData }
    }

    /// Parse a path identifier for this collection's entity.
    pub fn parse_id(raw: &str) -> Result<RecordId, ServiceError> {
        Ok(RecordId::parse(T::ENTITY, raw)?)
    }

    /// Insert the document as given; the store assigns the identifier.
    #[instrument(skip(self, document), fields(collection = %self.name))]
    pub async fn create(&self, document: Document) -> Result<InsertResult, ServiceError> {
        let id = self.store.insert_one(&self.name, document).await?;
        info!(id = %id, entity = T::ENTITY, "record created");
        Ok(InsertResult::new(id))
    }

    pub async fn get(&self, id: &RecordId) -> Result<Option<T>, ServiceError> {
        self.store
            .find_one(&self.name, &Filter::Id(*id))
            .await?
            .map(T::from_document)
            .transpose()
            .map_err(ServiceError::from)
    }

    pub async fn find(&self, filter: &Filter, spec: &FindSpec) -> Result<Vec<T>, ServiceError> {
        let docs = self.store.find(&self.name, filter, spec).await?;
        docs.into_iter()
            .map(|d| T::from_document(d).map_err(ServiceError::from))
            .collect()
    }

    /// Merge `set` into the stored record. `_id` is never written; zero
    /// matched records is `NotFound`.
    #[instrument(skip(self, id, set), fields(collection = %self.name, id = %id))]
    pub async fn update_partial(&self, id: &RecordId, mut set: Document) -> Result<UpdateResult, ServiceError> {
        set.remove("_id");
        if set.is_empty() {
            return Err(ServiceError::Validation("no fields to update".into()));
        }
        let outcome = self.store.update_one(&self.name, &Filter::Id(*id), set).await?;
        if outcome.matched == 0 {
            return Err(ServiceError::not_found(T::ENTITY));
        }
        info!(modified = outcome.modified, entity = T::ENTITY, "record updated");
        Ok(outcome.into())
    }

    #[instrument(skip(self, id), fields(collection = %self.name, id = %id))]
    pub async fn delete(&self, id: &RecordId) -> Result<DeleteResult, ServiceError> {
        let deleted = self.store.delete_one(&self.name, &Filter::Id(*id)).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found(T::ENTITY));
        }
        info!(entity = T::ENTITY, "record deleted");
        Ok(DeleteResult::new(deleted))
    }

    pub async fn group_values(&self, field: &str) -> Result<Vec<Bson>, ServiceError> {
        self.store.group_values(&self.name, field).await
    }
}
