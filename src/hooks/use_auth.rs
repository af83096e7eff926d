use yew::prelude::*;

use crate::models::AuthSession;
use crate::services::{read_cookie, ApiClient};
use crate::state::AppContext;
use crate::utils::constants::SESSION_ENDPOINT;

pub struct UseAuthHandle {
    pub session: UseStateHandle<AuthSession>,
    pub logout: Callback<()>,
}

#[hook]
pub fn use_auth(context: AppContext) -> UseAuthHandle {
    let session = {
        let auth = context.auth.clone();
        use_state(move || auth.session())
    };

    // Suscripción + reconciliación al montar (la pista guardada se pinta mientras tanto)
    {
        let session = session.clone();
        let auth = context.auth.clone();
        let cookie_name = context.config.auth_cookie_name.clone();
        use_effect_with((), move |_| {
            let subscription = auth.subscribe(move |s| session.set(s.clone()));

            match read_cookie(&cookie_name) {
                Some(token) => {
                    let reconciled = auth.reconcile(Some(&token));
                    log::info!(
                        "🔐 [AUTH] Sesión reconciliada con la cookie (autenticado: {}, rol: {:?})",
                        reconciled.is_authenticated,
                        reconciled.role
                    );
                }
                // Cookie HttpOnly o ausente: decide el backend
                None => wasm_bindgen_futures::spawn_local(async move {
                    let remote = ApiClient::browser().fetch_session(SESSION_ENDPOINT).await;
                    let reconciled = auth.apply_remote(&remote);
                    log::info!(
                        "🔐 [AUTH] Sesión reconciliada con el backend (autenticado: {}, rol: {:?})",
                        reconciled.is_authenticated,
                        reconciled.role
                    );
                }),
            }

            move || drop(subscription)
        });
    }

    let logout = {
        let auth = context.auth.clone();
        Callback::from(move |_| auth.logout())
    };

    UseAuthHandle { session, logout }
}
