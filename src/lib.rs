// ============================================================================
// STOREFRONT PWA - CAPA DE ESTADO DEL CLIENTE (RUST PURO)
// ============================================================================
// - Models: Estructuras compartidas con backend
// - State: Stores persistidos con Rc<RefCell> + notificaciones
// - Stores: Favoritos y sesión
// - ViewModels: Estado + Lógica UI (sin DOM)
// - Services: SOLO comunicación (API, URL, cookies, eventos)
// - Hooks: Adaptadores yew (solo wasm)
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
pub mod hooks;

pub use config::{AppConfig, CONFIG};
pub use state::AppContext;

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;

    use crate::config::CONFIG;
    use crate::services::storage_events;
    use crate::state::AppContext;

    // Contexto de la app, creado una vez en el arranque
    thread_local! {
        static CONTEXT: RefCell<Option<AppContext>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        if CONFIG.is_logging_enabled() {
            wasm_logger::init(Config::default());
        }
        log::info!("🚀 Storefront PWA ({})", CONFIG.environment);

        let context = AppContext::browser().map_err(|e| JsValue::from_str(&e.to_string()))?;
        storage_events::listen(context.clone())?;

        CONTEXT.with(|cell| {
            *cell.borrow_mut() = Some(context);
        });
        Ok(())
    }

    /// Contexto para los componentes (None antes de `start`)
    pub fn app_context() -> Option<AppContext> {
        CONTEXT.with(|cell| cell.borrow().clone())
    }
}

#[cfg(target_arch = "wasm32")]
pub use entry::app_context;
