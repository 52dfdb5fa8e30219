use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::FindOptions,
    Collection, Database,
};
use tracing::debug;

use super::{DocumentStore, Filter, FindSpec, UpdateOutcome};
use crate::errors::ServiceError;

/// MongoDB-backed store. Holds the long-lived database handle created at
/// startup; cloning it is cheap and shares the connection pool.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, ServiceError> {
        let res = self.collection(collection).insert_one(doc, None).await?;
        match res.inserted_id {
            Bson::ObjectId(oid) => Ok(oid),
            other => Err(ServiceError::Db(format!("unexpected inserted id type: {other}"))),
        }
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, ServiceError> {
        Ok(self.collection(collection).find_one(filter.to_document(), None).await?)
    }

    async fn find(&self, collection: &str, filter: &Filter, spec: &FindSpec) -> Result<Vec<Document>, ServiceError> {
        let query = filter.to_document();
        debug!(collection, filter = %query, "find");
        let options = FindOptions::builder().sort(spec.sort_document()).limit(spec.limit).build();
        let cursor = self.collection(collection).find(query, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_one(&self, collection: &str, filter: &Filter, set: Document) -> Result<UpdateOutcome, ServiceError> {
        let res = self
            .collection(collection)
            .update_one(filter.to_document(), doc! { "$set": set }, None)
            .await?;
        Ok(UpdateOutcome { matched: res.matched_count, modified: res.modified_count })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, ServiceError> {
        let res = self.collection(collection).delete_one(filter.to_document(), None).await?;
        Ok(res.deleted_count)
    }

    async fn group_values(&self, collection: &str, field: &str) -> Result<Vec<Bson>, ServiceError> {
        let pipeline = vec![
            doc! { "$group": { "_id": format!("${field}") } },
            doc! { "$project": { "value": "$_id", "_id": 0 } },
        ];
        let cursor = self.collection(collection).aggregate(pipeline, None).await?;
        let groups: Vec<Document> = cursor.try_collect().await?;
        Ok(groups
            .into_iter()
            .map(|mut g| g.remove("value").unwrap_or(Bson::Null))
            .collect())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
