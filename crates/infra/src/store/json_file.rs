//! Product store backed by a single JSON file.
//!
//! The whole collection is rewritten on every mutation (write to a sibling
//! temp file, then rename). Product lists are small enough that this is
//! simpler than anything incremental.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shelflife_core::ProductId;
use shelflife_products::Product;

use super::{ProductStore, StoreError, sort_newest_first};

#[derive(Debug)]
pub struct JsonFileProductStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Product>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_all(&self, products: &[Product]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = serde_json::to_vec_pretty(products)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = products.len(), "wrote product file");
        Ok(())
    }

    fn mutate<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<Product>) -> Result<(), StoreError>,
    {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut products = self.read_all()?;
        f(&mut products)?;
        sort_newest_first(&mut products);
        self.write_all(&products)
    }
}

impl ProductStore for JsonFileProductStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self.read_all()?;
        sort_newest_first(&mut products);
        Ok(products)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read_all()?.into_iter().find(|p| p.id_typed() == id))
    }

    fn save(&self, product: Product) -> Result<(), StoreError> {
        self.mutate(|products| {
            match products.iter_mut().find(|p| p.id_typed() == product.id_typed()) {
                Some(existing) => *existing = product,
                None => products.push(product),
            }
            Ok(())
        })
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        self.mutate(|products| {
            let before = products.len();
            products.retain(|p| p.id_typed() != id);
            if products.len() == before {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shelflife_products::{Category, PaoMonths, ProductDetails};

    fn product(name: &str, day: u32) -> Product {
        Product::new(
            ProductId::new(),
            ProductDetails::new(name, Category::Eyes).with_pao_months(PaoMonths::new(6).unwrap()),
            Utc.with_ymd_and_hms(2024, 2, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProductStore::new(dir.path().join("products.json"));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.get(ProductId::new()).unwrap(), None);
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("products.json");

        let first = product("Eyeliner", 1);
        let second = product("Mascara", 2);
        {
            let store = JsonFileProductStore::new(&path);
            store.save(first.clone()).unwrap();
            store.save(second.clone()).unwrap();
        }

        let reopened = JsonFileProductStore::new(&path);
        assert_eq!(reopened.list().unwrap(), vec![second, first]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_replaces_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProductStore::new(dir.path().join("products.json"));

        let p = product("Brow gel", 5);
        store.save(p.clone()).unwrap();
        let edited = p.with_details(ProductDetails::new("Brow pomade", Category::Eyes));
        store.save(edited.clone()).unwrap();

        assert_eq!(store.list().unwrap(), vec![edited]);
    }

    #[test]
    fn delete_unknown_id_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProductStore::new(dir.path().join("products.json"));
        let p = product("Concealer", 7);
        store.save(p.clone()).unwrap();

        let missing = ProductId::new();
        assert!(matches!(store.delete(missing), Err(StoreError::NotFound(id)) if id == missing));
        assert_eq!(store.list().unwrap(), vec![p.clone()]);

        store.delete(p.id_typed()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = JsonFileProductStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::Serialization(_))));
    }
}
