use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;

use crate::errors::ModelError;

/// A document type living in one collection.
pub trait Record: DeserializeOwned + Send + Sync + 'static {
    /// Human readable name used in log fields and error messages.
    const ENTITY: &'static str;

    fn from_document(doc: Document) -> Result<Self, ModelError> {
        bson::from_document(doc).map_err(|e| ModelError::Decode(format!("{}: {e}", Self::ENTITY)))
    }
}

/// Serialize a client payload into a BSON document, dropping any `_id` so the
/// store stays in charge of identifiers.
pub fn to_document_without_id<T: serde::Serialize>(value: &T) -> Result<Document, ModelError> {
    let mut doc = bson::to_document(value).map_err(|e| ModelError::Encode(e.to_string()))?;
    doc.remove("_id");
    Ok(doc)
}

/// String view of a client-supplied field. Any other BSON type reads as absent;
/// the value itself is still stored and returned as written.
pub fn as_str(value: &Option<Bson>) -> Option<&str> {
    match value {
        Some(Bson::String(s)) => Some(s.as_str()),
        _ => None,
    }
}
