use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{as_str, to_document_without_id, Record};

/// Field names the router filters on.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "category";
    pub const COMPANY: &str = "company";
    pub const USER_EMAIL: &str = "userEmail";
}

/// A service listing as stored in the `services` collection.
///
/// Only the fields the API filters on are named; everything else the author
/// submitted is carried through `extra` untouched. Named fields keep whatever
/// BSON type was stored, so a legacy record (say, a category array) still lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Bson>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Record for Service {
    const ENTITY: &'static str = "service";
}

impl Service {
    pub fn title(&self) -> Option<&str> {
        as_str(&self.title)
    }

    pub fn category(&self) -> Option<&str> {
        as_str(&self.category)
    }

    pub fn company(&self) -> Option<&str> {
        as_str(&self.company)
    }

    pub fn user_email(&self) -> Option<&str> {
        as_str(&self.user_email)
    }
}

/// Body of `POST /services`. Never carries an identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Bson>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewService {
    pub fn to_document(&self) -> Result<Document, ModelError> {
        to_document_without_id(self)
    }
}

/// Body of `PUT /services/:id`: a merge patch. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Bson>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl ServicePatch {
    /// Fields for `$set`. `_id` is dropped; an empty patch is rejected.
    pub fn to_set_document(&self) -> Result<Document, ModelError> {
        let doc = to_document_without_id(self)?;
        if doc.is_empty() {
            return Err(ModelError::Validation("no fields to update".into()));
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn new_service_keeps_unknown_fields_and_drops_id() {
        let input: NewService = serde_json::from_value(json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "title": "Plumbing",
            "category": "Home",
            "company": "Acme",
            "price": 40,
            "photo": "https://img.example/p.png"
        }))
        .unwrap();
        let doc = input.to_document().unwrap();
        assert!(doc.get("_id").is_none());
        assert_eq!(doc.get_str("title").unwrap(), "Plumbing");
        assert_eq!(doc.get_str("photo").unwrap(), "https://img.example/p.png");
        assert!(doc.get("price").is_some());
    }

    #[test]
    fn stored_service_serializes_id_as_hex() {
        let oid = ObjectId::new();
        let stored = doc! {
            "_id": oid,
            "title": "Plumbing",
            "userEmail": "owner@example.com",
            "description": "Fixes leaks",
        };
        let service = Service::from_document(stored).unwrap();
        assert_eq!(service.user_email(), Some("owner@example.com"));
        assert_eq!(service.extra.get_str("description").unwrap(), "Fixes leaks");

        let body = serde_json::to_value(&service).unwrap();
        assert_eq!(body["_id"], json!(oid.to_hex()));
        assert_eq!(body["title"], json!("Plumbing"));
        assert_eq!(body["description"], json!("Fixes leaks"));
        assert!(body.get("category").is_none());
    }

    #[test]
    fn patch_strips_identifier() {
        let patch: ServicePatch = serde_json::from_value(json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "category": "Repair"
        }))
        .unwrap();
        let set = patch.to_set_document().unwrap();
        assert_eq!(set, doc! { "category": "Repair" });
    }

    #[test]
    fn patch_with_only_identifier_is_empty() {
        let patch: ServicePatch = serde_json::from_value(json!({ "_id": "x" })).unwrap();
        assert!(matches!(patch.to_set_document(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn named_fields_of_other_types_survive_decode() {
        let oid = ObjectId::new();
        let stored = doc! { "_id": oid, "title": "Legacy", "category": ["Home", "Auto"], "company": 7 };
        let service = Service::from_document(stored).unwrap();
        assert_eq!(service.title(), Some("Legacy"));
        assert_eq!(service.category(), None);

        let body = serde_json::to_value(&service).unwrap();
        assert_eq!(body["category"], json!(["Home", "Auto"]));
        assert_eq!(body["company"], json!(7));
    }

    #[test]
    fn input_accepts_any_json_type() {
        let input: NewService = serde_json::from_value(json!({ "title": 123, "category": null })).unwrap();
        let doc = input.to_document().unwrap();
        assert!(matches!(doc.get("title"), Some(Bson::Int32(123)) | Some(Bson::Int64(123))));
        assert!(doc.get("category").is_none());
    }

    #[test]
    fn missing_typed_fields_decode_as_none() {
        let service = Service::from_document(doc! { "_id": ObjectId::new() }).unwrap();
        assert_eq!(service.title, None);
        assert!(service.extra.is_empty());
    }
}
