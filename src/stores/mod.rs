pub mod auth_store;
pub mod favorites_store;

pub use auth_store::{AuthStore, AuthStoreError};
pub use favorites_store::{FavoritesState, FavoritesStore};
