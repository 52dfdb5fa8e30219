//! Service layer: CRUD over document collections.
//! - `storage` hides the document database behind the `DocumentStore` trait.
//! - `collection` is the generic create/get/find/update/delete contract.
//! - `services` builds the query documents for services and reviews.

pub mod errors;
pub mod storage;
pub mod collection;
pub mod services;
#[cfg(test)]
pub mod test_support;

pub use collection::Collection;
pub use errors::ServiceError;
