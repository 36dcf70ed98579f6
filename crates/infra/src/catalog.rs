//! Product catalog: the app-facing mutation API over a [`ProductStore`].
//!
//! Replaces ambient global list state with an explicit object that owns its
//! store and clock. Expiration rules do not depend on it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use shelflife_core::{Clock, ProductId};
use shelflife_products::{Category, ExpirationSummary, FreshnessTier, Product, ProductDetails};

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Search criteria. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the display name.
    pub query: Option<String>,
    pub category: Option<Category>,
}

impl ProductFilter {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category() != category {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => product
                .display_name()
                .to_lowercase()
                .contains(&q.to_lowercase()),
        }
    }
}

/// A product paired with its derived status at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOverview {
    pub product: Product,
    pub summary: ExpirationSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub fresh: usize,
    pub expiry_soon: usize,
    pub expired: usize,
}

impl TierCounts {
    fn record(&mut self, tier: FreshnessTier) {
        match tier {
            FreshnessTier::Fresh => self.fresh += 1,
            FreshnessTier::ExpirySoon => self.expiry_soon += 1,
            FreshnessTier::Expired => self.expired += 1,
        }
    }
}

pub struct ProductCatalog<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: core::fmt::Debug> core::fmt::Debug for ProductCatalog<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductCatalog")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<S: ProductStore> ProductCatalog<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start tracking a product. `id` and `date_added` are assigned here.
    pub fn add(&self, details: ProductDetails) -> Result<Product, CatalogError> {
        let product = Product::new(ProductId::new(), details, self.clock.now());
        self.store.save(product.clone())?;
        info!(product_id = %product.id_typed(), name = product.display_name(), "product added");
        Ok(product)
    }

    /// Replace a product's editable fields.
    pub fn update(&self, id: ProductId, details: ProductDetails) -> Result<Product, CatalogError> {
        let existing = self.store.get(id)?.ok_or(CatalogError::NotFound(id))?;
        let updated = existing.with_details(details);
        self.store.save(updated.clone())?;
        info!(product_id = %id, "product updated");
        Ok(updated)
    }

    pub fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        match self.store.delete(id) {
            Ok(()) => {
                info!(product_id = %id, "product deleted");
                Ok(())
            }
            Err(StoreError::NotFound(id)) => Err(CatalogError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.store.get(id)?)
    }

    /// All products, most recently added first.
    pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list()?)
    }

    pub fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.store.list()?;
        products.retain(|p| filter.matches(p));
        Ok(products)
    }

    /// Matching products with their status as of the catalog clock.
    pub fn overview(&self, filter: &ProductFilter) -> Result<Vec<ProductOverview>, CatalogError> {
        let now = self.clock.now();
        Ok(self
            .search(filter)?
            .into_iter()
            .map(|product| {
                let summary = ExpirationSummary::evaluate(&product, now);
                ProductOverview { product, summary }
            })
            .collect())
    }

    pub fn tier_counts(&self) -> Result<TierCounts, CatalogError> {
        let mut counts = TierCounts::default();
        for entry in self.overview(&ProductFilter::default())? {
            counts.record(entry.summary.tier);
        }
        Ok(counts)
    }
}
