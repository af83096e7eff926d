// ============================================================================
// LIST QUERY VIEWMODEL - Sincroniza controles de filtro, URL y búsqueda
// ============================================================================
// Idle  --(control no textual)-->  Dirty --(push URL)--> Idle
// Idle  --(tecla en buscador)--->  Typing --(silencio)--> Dirty --> Idle
// Idle  --(cambio de ruta con búsqueda activa)--> limpiar búsqueda --> Idle
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::services::navigation::Navigator;
use crate::state::query_state::{QueryOptions, QueryState};
use crate::utils::constants::QUERY_SEARCH_TERM;
use crate::utils::debounce::{Debouncer, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// URL y controles coinciden
    Idle,
    /// El usuario escribe; la URL aún no cambia
    Typing,
    /// Cambios pendientes de serializar
    Dirty,
}

struct ListQueryState {
    query: QueryState,
    search_input: String,
    phase: SyncPhase,
    pathname: String,
    last_pushed: String,
    options: QueryOptions,
    navigator: Rc<dyn Navigator>,
}

/// ViewModel de una vista de lista (admin o tienda)
pub struct ListQueryViewModel {
    state: Rc<RefCell<ListQueryState>>,
    debouncer: Debouncer<String>,
}

impl ListQueryViewModel {
    pub fn new(
        pathname: &str,
        search: &str,
        options: QueryOptions,
        navigator: Rc<dyn Navigator>,
        scheduler: Rc<dyn Scheduler>,
        quiet_period_ms: u32,
    ) -> Self {
        let query = QueryState::parse(search, &options);
        let search_input = query
            .get_single(QUERY_SEARCH_TERM)
            .unwrap_or_default()
            .to_string();
        let last_pushed = query.to_query_string(&options);

        let state = Rc::new(RefCell::new(ListQueryState {
            query,
            search_input,
            phase: SyncPhase::Idle,
            pathname: pathname.to_string(),
            last_pushed,
            options,
            navigator,
        }));

        let committed = state.clone();
        let debouncer = Debouncer::new(scheduler, quiet_period_ms, move |term: String| {
            commit(&committed, |query| {
                query.set(QUERY_SEARCH_TERM, term.trim());
            });
        });

        Self { state, debouncer }
    }

    pub fn query(&self) -> QueryState {
        self.state.borrow().query.clone()
    }

    pub fn query_string(&self) -> String {
        let state = self.state.borrow();
        state.query.to_query_string(&state.options)
    }

    /// Texto del buscador (se actualiza en cada tecla)
    pub fn search_input(&self) -> String {
        self.state.borrow().search_input.clone()
    }

    pub fn phase(&self) -> SyncPhase {
        self.state.borrow().phase
    }

    pub fn pathname(&self) -> String {
        self.state.borrow().pathname.clone()
    }

    /// Control no textual (select, checkbox, orden...): se confirma ya
    pub fn set_field(&self, name: &str, value: &str) -> bool {
        commit(&self.state, |query| {
            query.set(name, value);
        })
    }

    pub fn set_multi_field(&self, name: &str, values: &[String]) -> bool {
        commit(&self.state, |query| {
            query.set_multi(name, values);
        })
    }

    pub fn clear_field(&self, name: &str) -> bool {
        commit(&self.state, |query| {
            query.remove(name);
        })
    }

    pub fn set_page(&self, page: u32) -> bool {
        commit(&self.state, |query| {
            query.set_page(page);
        })
    }

    /// Tecla en el buscador: solo cambia el campo local y reinicia el debounce
    pub fn on_search_input(&self, text: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.search_input = text.to_string();
            state.phase = SyncPhase::Typing;
        }
        self.debouncer.call(text.to_string());
    }

    /// Confirmar la búsqueda sin esperar (tecla Enter)
    pub fn submit_search(&self) {
        if self.debouncer.is_pending() {
            self.debouncer.flush();
        } else {
            let term = self.search_input();
            commit(&self.state, |query| {
                query.set(QUERY_SEARCH_TERM, term.trim());
            });
        }
    }

    /// Cambio de ruta: si había búsqueda activa se limpia campo local y URL
    pub fn on_route_change(&self, pathname: &str) {
        let has_search = {
            let mut state = self.state.borrow_mut();
            if state.pathname == pathname {
                return;
            }
            state.pathname = pathname.to_string();
            !state.search_input.is_empty() || state.query.get(QUERY_SEARCH_TERM).is_some()
        };
        if !has_search {
            return;
        }

        log::debug!("🧹 Ruta {} -> búsqueda limpiada", pathname);
        self.debouncer.cancel();
        self.state.borrow_mut().search_input.clear();
        commit(&self.state, |query| {
            query.remove(QUERY_SEARCH_TERM);
        });
    }

    /// La URL cambió desde fuera (atrás / adelante): adoptarla sin volver a empujarla
    pub fn sync_from_url(&self, search: &str) {
        self.debouncer.cancel();
        let mut state = self.state.borrow_mut();
        let query = QueryState::parse(search, &state.options);
        state.search_input = query
            .get_single(QUERY_SEARCH_TERM)
            .unwrap_or_default()
            .to_string();
        state.last_pushed = query.to_query_string(&state.options);
        state.query = query;
        state.phase = SyncPhase::Idle;
    }
}

/// Aplicar un cambio y empujar la URL si el query string resultante es distinto
fn commit<F>(state: &Rc<RefCell<ListQueryState>>, mutate: F) -> bool
where
    F: FnOnce(&mut QueryState),
{
    let (navigator, next) = {
        let mut current = state.borrow_mut();
        mutate(&mut current.query);
        current.phase = SyncPhase::Dirty;

        let next = current.query.to_query_string(&current.options);
        current.phase = SyncPhase::Idle;
        if next == current.last_pushed {
            return false;
        }
        current.last_pushed = next.clone();
        (current.navigator.clone(), next)
    };

    // Fuera del borrow: el navigator puede disparar un refetch que lea este estado
    navigator.push_query(&next);
    true
}
