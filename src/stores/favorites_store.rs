// ============================================================================
// FAVORITES STORE - Conjunto de productos favoritos persistido
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::favorite::FavoriteEntry;
use crate::models::product::ProductSnapshot;
use crate::models::validation::FieldErrors;
use crate::state::persisted::{PersistedStore, Subscription};
use crate::state::registry::{StoreError, StoreRegistry};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesState {
    #[serde(default)]
    pub items: Vec<FavoriteEntry>,
}

impl FavoritesState {
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|entry| entry.product_id == product_id)
    }
}

#[derive(Clone)]
pub struct FavoritesStore {
    store: PersistedStore<FavoritesState>,
}

impl FavoritesStore {
    pub const VERSION: u32 = 1;

    pub fn from_registry(registry: &StoreRegistry, key: &str) -> Result<Self, StoreError> {
        let store = registry.store::<FavoritesState>(key, Self::VERSION, None)?;
        Ok(Self { store })
    }

    /// Añadir un producto. `Ok(false)` si ya estaba.
    pub fn add(&self, product: &ProductSnapshot) -> Result<bool, FieldErrors> {
        self.add_at(product, Utc::now())
    }

    pub fn add_at(&self, product: &ProductSnapshot, added_at: DateTime<Utc>) -> Result<bool, FieldErrors> {
        product.validate()?;
        if self.is_favorite(&product.id) {
            return Ok(false);
        }

        let entry = FavoriteEntry::from_product(product, added_at);
        self.store.set(move |current| {
            let mut items = current.items.clone();
            items.push(entry);
            FavoritesState { items }
        });
        log::debug!("⭐ Favorito añadido: {}", product.id);
        Ok(true)
    }

    /// Quitar un producto. `false` si no estaba.
    pub fn remove(&self, product_id: &str) -> bool {
        if !self.is_favorite(product_id) {
            return false;
        }
        self.store.set(|current| FavoritesState {
            items: current
                .items
                .iter()
                .filter(|entry| entry.product_id != product_id)
                .cloned()
                .collect(),
        });
        log::debug!("🗑️ Favorito eliminado: {}", product_id);
        true
    }

    /// Devuelve si el producto queda como favorito
    pub fn toggle(&self, product: &ProductSnapshot) -> Result<bool, FieldErrors> {
        if self.is_favorite(&product.id) {
            self.remove(&product.id);
            Ok(false)
        } else {
            self.add(product).map(|_| true)
        }
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.store.with(|state| state.contains(product_id))
    }

    pub fn clear(&self) {
        if self.count() == 0 {
            return;
        }
        self.store.set(|_| FavoritesState::default());
    }

    pub fn count(&self) -> usize {
        self.store.with(|state| state.items.len())
    }

    /// Favoritos en orden de inserción
    pub fn items(&self) -> Vec<FavoriteEntry> {
        self.store.with(|state| state.items.clone())
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FavoritesState) + 'static,
    {
        self.store.subscribe(listener)
    }
}
