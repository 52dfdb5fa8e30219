use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{DocumentStore, Filter, FindSpec, SortOrder, UpdateOutcome};
use crate::errors::ServiceError;

/// In-process store keeping each collection as a vector in insertion order.
///
/// Evaluates [`Filter`] directly and mirrors MongoDB's ordering rules closely
/// enough for the queries this service issues.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        let map = self.collections.read().await;
        map.get(collection).map_or(0, Vec::len)
    }
}

/// Rank of a BSON type in MongoDB's cross-type comparison order.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) | Some(Bson::Decimal128(_)) => 1,
        Some(Bson::String(_)) | Some(Bson::Symbol(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Binary(_)) => 5,
        Some(Bson::ObjectId(_)) => 6,
        Some(Bson::Boolean(_)) => 7,
        Some(Bson::DateTime(_)) => 8,
        Some(Bson::Timestamp(_)) => 9,
        Some(_) => 10,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, ServiceError> {
        let id = ObjectId::new();
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        let mut map = self.collections.write().await;
        map.entry(collection.to_string()).or_default().push(stored);
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, ServiceError> {
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter, spec: &FindSpec) -> Result<Vec<Document>, ServiceError> {
        let map = self.collections.read().await;
        let mut found: Vec<Document> = map
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        drop(map);

        if let Some((field, order)) = &spec.sort {
            found.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        // MongoDB treats a limit of 0 as "no limit" and a negative one as its absolute value.
        if let Some(limit) = spec.limit.filter(|n| *n != 0) {
            found.truncate(limit.unsigned_abs() as usize);
        }
        Ok(found)
    }

    async fn update_one(&self, collection: &str, filter: &Filter, set: Document) -> Result<UpdateOutcome, ServiceError> {
        if set.is_empty() {
            return Err(ServiceError::Db("'$set' is empty".into()));
        }
        let mut map = self.collections.write().await;
        let Some(target) = map
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(UpdateOutcome::default());
        };
        let mut modified = false;
        for (key, value) in set {
            if key == "_id" {
                return Err(ServiceError::Db("performing an update on the path '_id' would modify the immutable field '_id'".into()));
            }
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateOutcome { matched: 1, modified: u64::from(modified) })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, ServiceError> {
        let mut map = self.collections.write().await;
        let Some(docs) = map.get_mut(collection) else { return Ok(0) };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn group_values(&self, collection: &str, field: &str) -> Result<Vec<Bson>, ServiceError> {
        let map = self.collections.read().await;
        let mut values: Vec<Bson> = Vec::new();
        for doc in map.get(collection).into_iter().flatten() {
            let value = doc.get(field).cloned().unwrap_or(Bson::Null);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
