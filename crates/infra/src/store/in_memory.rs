use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shelflife_core::ProductId;
use shelflife_products::Product;

use super::{ProductStore, StoreError, sort_newest_first};

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store seeded with existing records.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| (p.id_typed(), p))
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        let mut result: Vec<_> = products.values().cloned().collect();
        sort_newest_first(&mut result);
        Ok(result)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(products.get(&id).cloned())
    }

    fn save(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        products.insert(product.id_typed(), product);
        Ok(())
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use shelflife_products::{Category, ProductDetails};

    fn added(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap()
    }

    fn product(name: &str, day: u32) -> Product {
        Product::new(ProductId::new(), ProductDetails::new(name, Category::Face), added(day))
    }

    #[test]
    fn lists_newest_first() {
        let store = InMemoryProductStore::new();
        store.save(product("old", 1)).unwrap();
        store.save(product("newest", 20)).unwrap();
        store.save(product("middle", 10)).unwrap();

        let names: Vec<_> = store.list().unwrap().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["newest", "middle", "old"]);
    }

    #[test]
    fn save_upserts_by_id() {
        let store = InMemoryProductStore::new();
        let original = product("Primer", 3);
        store.save(original.clone()).unwrap();

        let renamed = original.with_details(ProductDetails::new("Setting spray", Category::Face));
        store.save(renamed.clone()).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], renamed);
        assert_eq!(store.get(original.id_typed()).unwrap(), Some(renamed));
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let store = InMemoryProductStore::new();
        let p = product("Gloss", 4);
        store.save(p.clone()).unwrap();

        store.delete(p.id_typed()).unwrap();
        assert!(store.list().unwrap().is_empty());

        match store.delete(p.id_typed()) {
            Err(StoreError::NotFound(id)) => assert_eq!(id, p.id_typed()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn seeded_store_lists_its_records() {
        let store = InMemoryProductStore::with_products([product("a", 1), product("b", 2)]);
        assert_eq!(store.list().unwrap().len(), 2);
    }
}
