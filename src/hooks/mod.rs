pub mod use_auth;
pub mod use_favorites;
pub mod use_list;
pub mod use_list_query;

pub use use_auth::{use_auth, UseAuthHandle};
pub use use_favorites::{use_favorites, UseFavoritesHandle};
pub use use_list::use_list;
pub use use_list_query::{use_list_query, UseListQueryHandle};
