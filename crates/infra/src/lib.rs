//! Infrastructure layer: product storage, catalog, live countdowns, config.

pub mod catalog;
pub mod config;
pub mod countdown;
pub mod store;

pub use catalog::{CatalogError, ProductCatalog, ProductFilter, ProductOverview, TierCounts};
pub use config::{ConfigError, TrackerConfig};
pub use countdown::{CountdownScheduler, CountdownWatch};
pub use store::{InMemoryProductStore, JsonFileProductStore, ProductStore, StoreError};
