use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid {entity} id: `{value}`")]
    InvalidId { entity: &'static str, value: String },
    #[error("{0} is required")]
    MissingParam(&'static str),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidId { entity, value } => Self::InvalidId { entity, value },
            ModelError::Validation(msg) | ModelError::Encode(msg) => Self::Validation(msg),
            // A stored document that no longer matches its type is a store-side problem.
            ModelError::Decode(msg) => Self::Db(msg),
        }
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Db(e.to_string())
    }
}
