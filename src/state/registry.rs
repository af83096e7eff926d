// ============================================================================
// STORE REGISTRY - Una sola instancia en memoria por clave
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::state::persisted::{Migration, PersistedStore};
use crate::utils::storage::SharedStorage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("la clave '{key}' ya está registrada con otro tipo")]
    TypeMismatch { key: String },
}

/// Vista sin tipo de un store, para despachar eventos por clave
trait RegisteredStore {
    fn as_any(&self) -> &dyn Any;
    fn apply_external_change(&self, raw: Option<&str>);
    fn reset(&self);
}

impl<T> RegisteredStore for PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn apply_external_change(&self, raw: Option<&str>) {
        PersistedStore::apply_external_change(self, raw)
    }

    fn reset(&self) {
        PersistedStore::reset(self)
    }
}

/// Registro de stores persistidos sobre un mismo medio de almacenamiento
pub struct StoreRegistry {
    storage: SharedStorage,
    stores: RefCell<HashMap<String, Rc<dyn RegisteredStore>>>,
}

impl StoreRegistry {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            stores: RefCell::new(HashMap::new()),
        }
    }

    pub fn storage(&self) -> SharedStorage {
        self.storage.clone()
    }

    /// Obtener (o crear) el store de `key`
    pub fn store<T>(
        &self,
        key: &str,
        version: u32,
        migrate: Option<Migration>,
    ) -> Result<PersistedStore<T>, StoreError>
    where
        T: Serialize + DeserializeOwned + Default + 'static,
    {
        if let Some(existing) = self.stores.borrow().get(key) {
            let store = existing
                .as_any()
                .downcast_ref::<PersistedStore<T>>()
                .ok_or_else(|| StoreError::TypeMismatch {
                    key: key.to_string(),
                })?;
            if store.version() != version {
                log::debug!(
                    "'{}' ya registrado con versión {}, se ignora la versión {}",
                    key,
                    store.version(),
                    version
                );
            }
            return Ok(store.clone());
        }

        let store = PersistedStore::with_migration(key, version, self.storage.clone(), migrate);
        self.stores
            .borrow_mut()
            .insert(key.to_string(), Rc::new(store.clone()));
        Ok(store)
    }

    /// Despachar un evento `storage` de otra pestaña. Devuelve si la clave es nuestra.
    pub fn apply_external_change(&self, key: &str, raw: Option<&str>) -> bool {
        // Sin borrow activo: los listeners pueden registrar stores nuevos
        let store = self.stores.borrow().get(key).cloned();
        match store {
            Some(store) => {
                store.apply_external_change(raw);
                true
            }
            None => false,
        }
    }

    /// Volver todos los stores al valor por defecto
    pub fn reset_all(&self) {
        let stores: Vec<Rc<dyn RegisteredStore>> = self.stores.borrow().values().cloned().collect();
        for store in stores {
            store.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryStorage;

    #[test]
    fn test_same_key_returns_same_instance() {
        let registry = StoreRegistry::new(Rc::new(MemoryStorage::new()));
        let a: PersistedStore<Vec<String>> = registry.store("k", 1, None).unwrap();
        let b: PersistedStore<Vec<String>> = registry.store("k", 1, None).unwrap();

        a.set(|_| vec!["x".to_string()]);
        assert_eq!(*b.get(), vec!["x".to_string()]);
        assert!(Rc::ptr_eq(&a.get(), &b.get()));
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let registry = StoreRegistry::new(Rc::new(MemoryStorage::new()));
        let _a: PersistedStore<Vec<String>> = registry.store("k", 1, None).unwrap();
        let b = registry.store::<bool>("k", 1, None);
        assert_eq!(
            b.err(),
            Some(StoreError::TypeMismatch {
                key: "k".to_string()
            })
        );
    }

    #[test]
    fn test_external_change_only_for_known_keys() {
        let registry = StoreRegistry::new(Rc::new(MemoryStorage::new()));
        let flag: PersistedStore<bool> = registry.store("flag", 1, None).unwrap();

        assert!(registry.apply_external_change("flag", Some(r#"{"state":true,"version":1}"#)));
        assert!(*flag.get());
        assert!(!registry.apply_external_change("other", None));
    }

    #[test]
    fn test_listener_can_register_store_during_dispatch() {
        let registry = Rc::new(StoreRegistry::new(Rc::new(MemoryStorage::new())));
        let flag: PersistedStore<bool> = registry.store("flag", 1, None).unwrap();

        let inner = registry.clone();
        let _sub = flag.subscribe(move |_| {
            let _late: PersistedStore<Vec<String>> = inner.store("late", 1, None).unwrap();
        });

        assert!(registry.apply_external_change("flag", Some(r#"{"state":true,"version":1}"#)));
        registry.reset_all();
        assert!(registry.apply_external_change("late", None));
    }

    #[test]
    fn test_reset_all() {
        let storage = MemoryStorage::new();
        let registry = StoreRegistry::new(Rc::new(storage.clone()));
        let flag: PersistedStore<bool> = registry.store("flag", 1, None).unwrap();
        flag.set(|_| true);

        registry.reset_all();
        assert!(!*flag.get());
        assert!(storage.is_empty());
    }
}
