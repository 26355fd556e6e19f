pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod pricing;
pub mod telemetry;

pub use catalog::{Catalog, CatalogProvider, CatalogStore, HttpCatalogProvider};
pub use error::{QuoteError, Result};
pub use pricing::{InverterSelection, QuoteResult, QuoteSession, SortField};
