// ============================================================================
// STORAGE EVENTS - Cambios de localStorage hechos en otras pestañas
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::StorageEvent;

use crate::state::AppContext;

/// Registrar el listener `storage` en window. Se llama una sola vez en el arranque.
pub fn listen(context: AppContext) -> Result<(), JsValue> {
    let Some(win) = web_sys::window() else {
        log::warn!("⚠️ [STORAGE] window no disponible, sin sincronización entre pestañas");
        return Ok(());
    };

    let closure = Closure::wrap(Box::new(move |event: StorageEvent| {
        let key = event.key();
        let new_value = event.new_value();
        if context.apply_storage_event(key.as_deref(), new_value.as_deref()) {
            log::debug!("🔄 [STORAGE] {:?} sincronizado desde otra pestaña", key);
        }
    }) as Box<dyn FnMut(StorageEvent)>);

    win.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())?;
    // Listener de vida igual a la de la app
    closure.forget();
    Ok(())
}
