//! Typed records stored in the `services` and `reviews` collections, the
//! identifier type used to address them, and the MongoDB connector.

pub mod errors;
pub mod id;
pub mod record;
pub mod service;
pub mod review;
pub mod db;

pub use id::RecordId;
pub use record::Record;
