pub mod service_catalog;
pub mod review_book;

pub use review_book::ReviewBook;
pub use service_catalog::{CategoryFilter, ServiceCatalog, ServiceQuery};
