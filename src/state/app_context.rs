// ============================================================================
// APP CONTEXT - Stores de la aplicación construidos en el arranque
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::state::query_state::QueryOptions;
use crate::state::registry::{StoreError, StoreRegistry};
use crate::stores::{AuthStore, FavoritesStore};
use crate::utils::storage::SharedStorage;

/// Estado global de la aplicación (se pasa explícitamente, no hay globals de stores)
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub favorites: FavoritesStore,
    pub auth: AuthStore,
    registry: Rc<StoreRegistry>,
}

impl AppContext {
    pub fn new(config: AppConfig, storage: SharedStorage) -> Result<Self, StoreError> {
        let registry = Rc::new(StoreRegistry::new(storage));
        let favorites = FavoritesStore::from_registry(&registry, &config.favorites_storage_key())?;
        let auth = AuthStore::from_registry(&registry, &config.auth_storage_key())?;

        Ok(Self {
            config: Rc::new(config),
            favorites,
            auth,
            registry,
        })
    }

    /// Contexto del navegador (localStorage + CONFIG)
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Result<Self, StoreError> {
        use crate::utils::storage::LocalStorageBackend;
        Self::new(crate::config::CONFIG.clone(), Rc::new(LocalStorageBackend))
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Opciones de serialización por defecto para los listados
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::new(&self.config.list_config.sentinels)
    }

    /// Evento `storage` de otra pestaña. `None` como clave = `localStorage.clear()`.
    pub fn apply_storage_event(&self, key: Option<&str>, new_value: Option<&str>) -> bool {
        match key {
            Some(key) => self.registry.apply_external_change(key, new_value),
            None => {
                log::debug!("🔄 localStorage vaciado en otra pestaña");
                self.registry.reset_all();
                true
            }
        }
    }

    /// Volver todos los stores al estado inicial (tests / "borrar datos")
    pub fn reset(&self) {
        self.registry.reset_all();
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductSnapshot;
    use crate::utils::storage::MemoryStorage;

    fn context(storage: &MemoryStorage) -> AppContext {
        AppContext::new(AppConfig::default(), Rc::new(storage.clone())).unwrap()
    }

    #[test]
    fn test_favorites_survive_reload() {
        let storage = MemoryStorage::new();
        let first = context(&storage);
        first
            .favorites
            .add(&ProductSnapshot::new("p1", "Lámpara", 25.0))
            .unwrap();
        drop(first);

        let reloaded = context(&storage);
        assert!(reloaded.favorites.is_favorite("p1"));
        assert_eq!(reloaded.favorites.count(), 1);
    }

    #[test]
    fn test_storage_event_updates_matching_store() {
        let storage = MemoryStorage::new();
        let ctx = context(&storage);
        let raw = r#"{"state":{"isAuthenticated":true,"role":"ADMIN"},"version":1}"#;

        assert!(ctx.apply_storage_event(Some("storefront.auth"), Some(raw)));
        assert!(ctx.auth.has_role("ADMIN"));
        assert!(!ctx.apply_storage_event(Some("unrelated"), Some("x")));

        ctx.apply_storage_event(None, None);
        assert!(!ctx.auth.is_authenticated());
    }

    #[test]
    fn test_stale_role_is_dropped_on_hydrate_and_storage_event() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            "storefront.auth",
            r#"{"state":{"isAuthenticated":false,"role":"ADMIN"},"version":1}"#,
        );
        let ctx = context(&storage);
        assert!(!ctx.auth.is_authenticated());
        assert_eq!(ctx.auth.role(), None);

        let raw = r#"{"state":{"isAuthenticated":false,"role":"SUPER_ADMIN"},"version":1}"#;
        assert!(ctx.apply_storage_event(Some("storefront.auth"), Some(raw)));
        assert_eq!(ctx.auth.session(), crate::models::AuthSession::anonymous());
    }

    #[test]
    fn test_reset_clears_everything() {
        let storage = MemoryStorage::new();
        let ctx = context(&storage);
        ctx.favorites
            .add(&ProductSnapshot::new("p1", "Lámpara", 25.0))
            .unwrap();
        ctx.auth.set_authenticated(true);

        ctx.reset();
        assert_eq!(ctx.favorites.count(), 0);
        assert!(!ctx.auth.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_contexts_compare_by_identity() {
        let storage = MemoryStorage::new();
        let a = context(&storage);
        let b = context(&storage);
        assert!(a == a.clone());
        assert!(a != b);
    }
}
