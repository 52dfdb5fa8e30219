use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{as_str, to_document_without_id, Record};

pub mod fields {
    pub const SERVICE_ID: &str = "serviceId";
    pub const EMAIL: &str = "email";
    pub const TEXT: &str = "text";
    pub const RATING: &str = "rating";
    pub const CREATED_AT: &str = "createdAt";
}

/// A review as stored in the `reviews` collection. `service_id` is the hex id
/// of a service, kept as a plain string; nothing checks that it resolves.
///
/// Every field comes straight from clients, so each keeps whatever BSON
/// type was submitted; the accessors give the string view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(rename = "serviceId", default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Bson>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Record for Review {
    const ENTITY: &'static str = "review";
}

impl Review {
    pub fn service_id(&self) -> Option<&str> {
        as_str(&self.service_id)
    }

    pub fn email(&self) -> Option<&str> {
        as_str(&self.email)
    }

    pub fn text(&self) -> Option<&str> {
        as_str(&self.text)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(rename = "serviceId", default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Bson>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewReview {
    pub fn to_document(&self) -> Result<Document, ModelError> {
        to_document_without_id(self)
    }
}

/// Body of `PUT /reviews/:id`. Only `text` and `rating` are editable; other
/// keys in the payload are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ReviewPatch {
    #[serde(default)]
    pub text: Option<Bson>,
    #[serde(default)]
    pub rating: Option<Bson>,
}

impl ReviewPatch {
    pub fn to_set_document(&self) -> Result<Document, ModelError> {
        let mut set = Document::new();
        if let Some(text) = &self.text {
            set.insert(fields::TEXT, text.clone());
        }
        if let Some(rating) = &self.rating {
            set.insert(fields::RATING, rating.clone());
        }
        if set.is_empty() {
            return Err(ModelError::Validation("nothing to update; send text and/or rating".into()));
        }
        Ok(set)
    }
}
