pub mod api;
pub mod auth;
pub mod favorite;
pub mod product;
pub mod validation;

pub use api::{ApiError, ApiResponse, PageMeta};
pub use auth::{AuthSession, RemoteSession, SessionProfile, TokenClaims};
pub use favorite::FavoriteEntry;
pub use product::ProductSnapshot;
pub use validation::FieldErrors;
