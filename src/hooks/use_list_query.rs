use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::services::BrowserNavigator;
use crate::state::{AppContext, QueryState};
use crate::utils::constants::QUERY_CHANGE_EVENT;
use crate::utils::debounce::BrowserScheduler;
use crate::viewmodels::ListQueryViewModel;

pub struct UseListQueryHandle {
    pub query: UseStateHandle<QueryState>,
    pub search_input: UseStateHandle<String>,
    pub on_search: Callback<String>,
    pub submit_search: Callback<()>,
    pub set_field: Callback<(String, String)>,
    pub set_page: Callback<u32>,
    view_model: Rc<ListQueryViewModel>,
}

impl UseListQueryHandle {
    /// Query string actual (para pedir la lista al backend)
    pub fn query_string(&self) -> String {
        self.view_model.query_string()
    }
}

fn current_location() -> (String, String) {
    web_sys::window()
        .map(|w| w.location())
        .map(|l| (l.pathname().unwrap_or_default(), l.search().unwrap_or_default()))
        .unwrap_or_default()
}

#[hook]
pub fn use_list_query(context: AppContext, pathname: String) -> UseListQueryHandle {
    let view_model = {
        let context = context.clone();
        use_memo((), move |_| {
            let (path, search) = current_location();
            ListQueryViewModel::new(
                &path,
                &search,
                context.query_options(),
                Rc::new(BrowserNavigator),
                Rc::new(BrowserScheduler),
                context.config.list_config.search_debounce_ms,
            )
        })
    };

    let query = {
        let view_model = view_model.clone();
        use_state(move || view_model.query())
    };
    let search_input = {
        let view_model = view_model.clone();
        use_state(move || view_model.search_input())
    };

    // URL empujada por nosotros (querychange) o por el navegador (popstate)
    {
        let view_model = view_model.clone();
        let query = query.clone();
        let search_input = search_input.clone();
        use_effect_with((), move |_| {
            let win = web_sys::window();

            let on_push = {
                let view_model = view_model.clone();
                let query = query.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    query.set(view_model.query());
                }) as Box<dyn FnMut(web_sys::Event)>)
            };
            let on_pop = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let (_, search) = current_location();
                view_model.sync_from_url(&search);
                query.set(view_model.query());
                search_input.set(view_model.search_input());
            }) as Box<dyn FnMut(web_sys::Event)>);

            if let Some(win) = &win {
                let _ = win.add_event_listener_with_callback(QUERY_CHANGE_EVENT, on_push.as_ref().unchecked_ref());
                let _ = win.add_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref());
            }

            move || {
                if let Some(win) = win {
                    let _ = win.remove_event_listener_with_callback(QUERY_CHANGE_EVENT, on_push.as_ref().unchecked_ref());
                    let _ = win.remove_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref());
                }
            }
        });
    }

    // Cambio de ruta: limpiar búsqueda activa
    {
        let view_model = view_model.clone();
        let search_input = search_input.clone();
        use_effect_with(pathname, move |pathname| {
            view_model.on_route_change(pathname);
            search_input.set(view_model.search_input());
            || ()
        });
    }

    let on_search = {
        let view_model = view_model.clone();
        let search_input = search_input.clone();
        Callback::from(move |text: String| {
            view_model.on_search_input(&text);
            search_input.set(text);
        })
    };

    let submit_search = {
        let view_model = view_model.clone();
        Callback::from(move |_| view_model.submit_search())
    };

    let set_field = {
        let view_model = view_model.clone();
        Callback::from(move |(name, value): (String, String)| {
            view_model.set_field(&name, &value);
        })
    };

    let set_page = {
        let view_model = view_model.clone();
        Callback::from(move |page: u32| {
            view_model.set_page(page);
        })
    };

    UseListQueryHandle {
        query,
        search_input,
        on_search,
        submit_search,
        set_field,
        set_page,
        view_model,
    }
}
