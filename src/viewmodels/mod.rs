pub mod list_query_viewmodel;
pub mod list_viewmodel;

pub use list_query_viewmodel::{ListQueryViewModel, SyncPhase};
pub use list_viewmodel::{FetchGeneration, ListViewModel};
