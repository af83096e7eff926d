// ============================================================================
// STORAGE - Medio de persistencia clave/valor (localStorage o memoria)
// ============================================================================
// Los stores nunca tocan web_sys directamente: pasan por StorageBackend para
// poder ejecutarse igual en el navegador y en los tests nativos.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("No se pudo acceder al almacenamiento")]
    Unavailable,
    #[error("Error leyendo '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("Error guardando '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Medio de persistencia síncrono (misma semántica que localStorage)
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Rc<dyn StorageBackend>;

/// Almacenamiento en memoria.
///
/// Los clones comparten el mismo mapa, así que un clone entregado a un
/// `AppContext` nuevo se comporta como "la misma pestaña tras recargar".
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simular cuota excedida / almacenamiento deshabilitado
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Valor crudo guardado bajo `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    /// Escribir un valor crudo saltándose la inyección de fallos
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "QuotaExceededError".to_string(),
            });
        }
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "storage disabled".to_string(),
            });
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{StorageBackend, StorageError};
    use web_sys::{window, Storage};

    fn get_local_storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }

    /// localStorage del navegador
    #[derive(Clone, Copy, Default)]
    pub struct LocalStorageBackend;

    impl StorageBackend for LocalStorageBackend {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            let storage = get_local_storage().ok_or(StorageError::Unavailable)?;
            storage.get_item(key).map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = get_local_storage().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            let storage = get_local_storage().ok_or(StorageError::Unavailable)?;
            storage.remove_item(key).map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
        }
    }
}
