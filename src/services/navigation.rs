// ============================================================================
// NAVIGATION - Empujar el query string de una lista a la URL
// ============================================================================

use std::cell::RefCell;

pub trait Navigator {
    /// `query` sin `?` inicial
    fn push_query(&self, query: &str);
}

/// Navigator que solo registra las URLs empujadas (tests / SSR)
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pushes: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.pushes.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.pushes.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push_query(&self, query: &str) {
        self.pushes.borrow_mut().push(query.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserNavigator;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::Navigator;
    use crate::utils::constants::QUERY_CHANGE_EVENT;
    use wasm_bindgen::JsValue;
    use web_sys::{window, CustomEvent};

    /// history.pushState + evento "querychange" para que la vista vuelva a pedir datos
    #[derive(Clone, Copy, Default)]
    pub struct BrowserNavigator;

    impl Navigator for BrowserNavigator {
        fn push_query(&self, query: &str) {
            let Some(win) = window() else {
                log::warn!("⚠️ [NAV] window no disponible");
                return;
            };
            let pathname = win.location().pathname().unwrap_or_default();
            let url = format!("{}?{}", pathname, query);

            match win.history() {
                Ok(history) => {
                    if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(&url)) {
                        log::error!("❌ [NAV] pushState falló: {:?}", e);
                        return;
                    }
                }
                Err(e) => {
                    log::error!("❌ [NAV] history no disponible: {:?}", e);
                    return;
                }
            }

            log::debug!("🧭 [NAV] {}", url);
            if let Ok(event) = CustomEvent::new(QUERY_CHANGE_EVENT) {
                let _ = win.dispatch_event(&event);
            }
        }
    }
}
