use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid {entity} id: `{value}`")]
    InvalidId { entity: &'static str, value: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
}
