// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod app_context;
pub mod persisted;
pub mod query_state;
pub mod registry;

pub use app_context::AppContext;
pub use persisted::{DecodeError, Migration, PersistedStore, Subscription};
pub use query_state::{QueryOptions, QueryState, QueryValue};
pub use registry::{StoreError, StoreRegistry};
