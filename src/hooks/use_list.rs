use serde::de::DeserializeOwned;
use yew::prelude::*;

use crate::services::ApiClient;
use crate::state::{AppContext, QueryState};
use crate::viewmodels::{FetchGeneration, ListViewModel};

/// Pedir `path` con el query de la vista cada vez que cambia
#[hook]
pub fn use_list<T>(context: AppContext, path: String, query: QueryState) -> UseStateHandle<ListViewModel<T>>
where
    T: DeserializeOwned + Clone + 'static,
{
    let list = use_state(ListViewModel::<T>::new);
    let generation = use_memo((), |_| FetchGeneration::new());

    {
        let list = list.clone();
        use_effect_with((path, query), move |(path, query)| {
            let generation = (*generation).clone();
            let current = generation.next();

            let mut next = (*list).clone();
            next.begin_fetch();
            list.set(next.clone());

            let path = path.clone();
            let query = query.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let client = ApiClient::browser();
                let response = client
                    .get_list::<T>(&path, &query, &context.query_options())
                    .await;

                if !generation.is_current(current) {
                    log::debug!("[LIST] Respuesta obsoleta descartada: {}", path);
                    return;
                }
                next.apply(response);
                if let Some(message) = next.last_error() {
                    log::warn!("⚠️ [LIST] {}", message);
                }
                list.set(next);
            });
            || ()
        });
    }

    list
}
