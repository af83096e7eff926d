// ============================================================================
// LIST VIEWMODEL - Página actual de un listado + estado vacío
// ============================================================================
// Devuelve valores, los hooks actualizan el estado
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::models::api::{ApiResponse, PageMeta};

/// Numeración de peticiones de un listado: solo la última puede aplicarse
#[derive(Debug, Clone, Default)]
pub struct FetchGeneration(Rc<Cell<u64>>);

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nueva petición; las anteriores quedan obsoletas
    pub fn next(&self) -> u64 {
        let generation = self.0.get() + 1;
        self.0.set(generation);
        generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.get() == generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel<T> {
    items: Vec<T>,
    meta: Option<PageMeta>,
    loading: bool,
    last_error: Option<String>,
}

impl<T> Default for ListViewModel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
            loading: false,
            last_error: None,
        }
    }
}

impl<T> ListViewModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Incorporar la respuesta del backend. Un fallo deja la lista vacía y el mensaje para el toast.
    pub fn apply(&mut self, response: ApiResponse<Vec<T>>) {
        self.loading = false;
        if response.success {
            self.items = response.data.unwrap_or_default();
            self.meta = response.meta;
            self.last_error = None;
        } else {
            let message = response
                .message
                .unwrap_or_else(|| "Request failed".to_string());
            log::warn!("⚠️ Listado vacío por error: {}", message);
            self.items.clear();
            self.meta = None;
            self.last_error = Some(message);
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// "No hay resultados" (no se muestra mientras carga)
    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.meta.map(|m| m.has_next_page()).unwrap_or(false)
    }

    pub fn has_previous_page(&self) -> bool {
        self.meta.map(|m| m.has_previous_page()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, total_pages: u32) -> PageMeta {
        PageMeta {
            page,
            limit: 10,
            total: u64::from(total_pages) * 10,
            total_pages,
        }
    }

    #[test]
    fn test_success_replaces_items() {
        let mut vm = ListViewModel::new();
        vm.begin_fetch();
        assert!(vm.is_loading());
        assert!(!vm.is_empty_state());

        let mut response = ApiResponse::ok(vec!["a", "b"]);
        response.meta = Some(page(1, 3));
        vm.apply(response);

        assert_eq!(vm.items(), &["a", "b"]);
        assert!(vm.has_next_page());
        assert!(!vm.has_previous_page());
        assert!(!vm.is_empty_state());
    }

    #[test]
    fn test_only_latest_fetch_is_current() {
        let generation = FetchGeneration::new();
        let slow = generation.next();
        let fast = generation.clone().next();

        assert!(!generation.is_current(slow));
        assert!(generation.is_current(fast));
    }

    #[test]
    fn test_failure_shows_empty_list_and_message() {
        let mut vm = ListViewModel::new();
        vm.apply(ApiResponse::ok(vec![1, 2, 3]));

        vm.begin_fetch();
        vm.apply(ApiResponse::<Vec<i32>>::failure("HTTP 500: Request failed"));

        assert!(vm.items().is_empty());
        assert!(vm.is_empty_state());
        assert!(!vm.has_next_page());
        assert_eq!(vm.last_error(), Some("HTTP 500: Request failed"));

        vm.apply(ApiResponse::ok(vec![4]));
        assert_eq!(vm.last_error(), None);
    }
}
