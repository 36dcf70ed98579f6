//! Product persistence abstractions.
//!
//! The tracker core never touches storage; the surrounding app routes product
//! mutations through a [`ProductStore`].

pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use shelflife_core::{Entity, ProductId};
use shelflife_products::Product;

pub use in_memory::InMemoryProductStore;
pub use json_file::JsonFileProductStore;

/// Product store abstraction.
pub trait ProductStore: Send + Sync {
    /// All products, most recently added first.
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Get a product by id.
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert the product, or replace the stored one with the same id.
    fn save(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a product. Removing an unknown id is `NotFound`.
    fn delete(&self, id: ProductId) -> Result<(), StoreError>;
}

/// Product store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("product not found: {0}")]
    NotFound(ProductId),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize products: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn save(&self, product: Product) -> Result<(), StoreError> {
        (**self).save(product)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}

/// Order products newest first; ids break ties so the order is total.
pub(crate) fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.date_added()
            .cmp(&a.date_added())
            .then_with(|| b.id().cmp(a.id()))
    });
}
