// Utils compartidos

pub mod constants;
pub mod debounce;
pub mod storage;

pub use constants::*;
pub use debounce::{Debouncer, ManualScheduler, Scheduler, TimerHandle};
pub use storage::{MemoryStorage, SharedStorage, StorageBackend, StorageError};

#[cfg(target_arch = "wasm32")]
pub use debounce::BrowserScheduler;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageBackend;
