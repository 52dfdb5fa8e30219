use std::fmt;
use std::str::FromStr;

use mongodb::bson::{oid::ObjectId, Bson};

use crate::errors::ModelError;

/// Store-generated record identifier (a 12-byte ObjectId, 24 hex chars on the wire).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Parse a path parameter. `entity` only feeds the error message.
    pub fn parse(entity: &'static str, raw: &str) -> Result<Self, ModelError> {
        ObjectId::parse_str(raw)
            .map(RecordId)
            .map_err(|_| ModelError::InvalidId { entity, value: raw.to_string() })
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        RecordId(oid)
    }
}

impl From<RecordId> for Bson {
    fn from(id: RecordId) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl FromStr for RecordId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse("record", s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
