// ============================================================================
// AUTH STORE - Flags de sesión persistidos (proyección del backend)
// ============================================================================
// El backend es la fuente de verdad. Este store solo recuerda "hay sesión /
// qué rol" para pintar la UI antes de que llegue su respuesta:
// - cookie legible   -> reconcile(token)
// - cookie HttpOnly  -> apply_remote(GET auth/me)
// ============================================================================

use chrono::Utc;
use thiserror::Error;

use crate::models::auth::{AuthSession, RemoteSession, TokenClaims};
use crate::state::persisted::{PersistedStore, Subscription};
use crate::state::registry::{StoreError, StoreRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthStoreError {
    #[error("no se puede asignar un rol sin sesión iniciada")]
    RoleWithoutSession,
    #[error("el rol no puede estar vacío")]
    EmptyRole,
}

#[derive(Clone)]
pub struct AuthStore {
    store: PersistedStore<AuthSession>,
}

impl AuthStore {
    pub const VERSION: u32 = 1;

    pub fn from_registry(registry: &StoreRegistry, key: &str) -> Result<Self, StoreError> {
        let store = registry.store::<AuthSession>(key, Self::VERSION, None)?;
        Ok(Self { store })
    }

    pub fn session(&self) -> AuthSession {
        self.store.with(AuthSession::clone)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.with(|s| s.is_authenticated)
    }

    pub fn role(&self) -> Option<String> {
        self.store.with(|s| s.role.clone())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.store.with(|s| s.has_role(role))
    }

    /// `false` equivale a logout (el rol nunca sobrevive sin sesión)
    pub fn set_authenticated(&self, authenticated: bool) {
        if !authenticated {
            self.logout();
            return;
        }
        if self.is_authenticated() {
            return;
        }
        self.store.set(|current| AuthSession {
            is_authenticated: true,
            role: current.role.clone(),
        });
    }

    pub fn set_role(&self, role: &str) -> Result<(), AuthStoreError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(AuthStoreError::EmptyRole);
        }
        if !self.is_authenticated() {
            log::warn!("⚠️ [AUTH] Rol '{}' ignorado: no hay sesión", role);
            return Err(AuthStoreError::RoleWithoutSession);
        }
        if self.role().as_deref() == Some(role) {
            return Ok(());
        }
        let role = role.to_string();
        self.store
            .set(move |_| AuthSession::authenticated(Some(role)));
        Ok(())
    }

    /// Una sola escritura: nadie observa `{false, Some(rol)}`
    pub fn logout(&self) {
        if self.session() == AuthSession::anonymous() {
            return;
        }
        self.store.set(|_| AuthSession::anonymous());
        log::info!("👋 [AUTH] Sesión cerrada");
    }

    /// Reconciliar con la cookie de acceso al montar la app
    pub fn reconcile(&self, token: Option<&str>) -> AuthSession {
        self.reconcile_at(token, Utc::now().timestamp())
    }

    pub fn reconcile_at(&self, token: Option<&str>, now_timestamp: i64) -> AuthSession {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let next = match token {
            None => AuthSession::anonymous(),
            Some(token) => match TokenClaims::decode_unverified(token) {
                Some(claims) if claims.is_expired(now_timestamp) => {
                    log::debug!("[AUTH] Token expirado");
                    AuthSession::anonymous()
                }
                Some(claims) => {
                    let role = claims.role.filter(|r| !r.trim().is_empty());
                    AuthSession::authenticated(role)
                }
                None => {
                    log::debug!("[AUTH] Payload del token ilegible, sesión sin rol");
                    AuthSession::authenticated(None)
                }
            },
        };

        self.replace_session(next)
    }

    /// Reconciliar con la respuesta del backend cuando la cookie es HttpOnly.
    /// `Unknown` conserva la pista guardada.
    pub fn apply_remote(&self, remote: &RemoteSession) -> AuthSession {
        let next = match remote {
            RemoteSession::Active(profile) => {
                AuthSession::authenticated(profile.role.clone().filter(|r| !r.trim().is_empty()))
            }
            RemoteSession::Anonymous => AuthSession::anonymous(),
            RemoteSession::Unknown => {
                log::debug!("[AUTH] Backend sin respuesta, se conserva la sesión local");
                return self.session();
            }
        };
        self.replace_session(next)
    }

    fn replace_session(&self, next: AuthSession) -> AuthSession {
        let current = self.session();
        if current != next {
            if current.is_authenticated && next.is_authenticated && current.role != next.role {
                log::warn!(
                    "⚠️ [AUTH] Rol local {:?} no coincide con el servidor {:?}",
                    current.role,
                    next.role
                );
            }
            let value = next.clone();
            self.store.set(move |_| value);
        }
        next
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthSession) + 'static,
    {
        self.store.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::encode_test_token;
    use crate::utils::storage::MemoryStorage;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn auth_store() -> AuthStore {
        let registry = StoreRegistry::new(Rc::new(MemoryStorage::new()));
        AuthStore::from_registry(&registry, "storefront.auth").unwrap()
    }

    #[test]
    fn test_role_requires_session() {
        let store = auth_store();
        assert_eq!(store.set_role("ADMIN"), Err(AuthStoreError::RoleWithoutSession));
        assert_eq!(store.role(), None);

        store.set_authenticated(true);
        assert_eq!(store.set_role("  "), Err(AuthStoreError::EmptyRole));
        assert_eq!(store.set_role("ADMIN"), Ok(()));
        assert!(store.has_role("ADMIN"));
    }

    #[test]
    fn test_set_authenticated_false_clears_role() {
        let store = auth_store();
        store.set_authenticated(true);
        store.set_role("CUSTOMER").unwrap();

        store.set_authenticated(false);
        assert_eq!(store.session(), AuthSession::anonymous());
    }

    #[test]
    fn test_logout_is_a_single_observed_write() {
        let store = auth_store();
        store.set_authenticated(true);
        store.set_role("ADMIN").unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = store.subscribe(move |s| sink.borrow_mut().push(s.clone()));

        store.logout();
        assert_eq!(*seen.borrow(), vec![AuthSession::anonymous()]);

        store.logout();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_reconcile_without_cookie_logs_out() {
        let store = auth_store();
        store.set_authenticated(true);
        store.set_role("ADMIN").unwrap();

        assert_eq!(store.reconcile(None), AuthSession::anonymous());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_reconcile_takes_role_from_token() {
        let store = auth_store();
        store.set_authenticated(true);
        store.set_role("CUSTOMER").unwrap();

        let token = encode_test_token(&json!({"userId": "u1", "role": "ADMIN", "exp": 2_000}));
        let session = store.reconcile_at(Some(&token), 1_000);
        assert_eq!(session, AuthSession::authenticated(Some("ADMIN".to_string())));
        assert!(store.has_role("ADMIN"));
    }

    #[test]
    fn test_remote_session_keeps_hint_until_backend_answers() {
        use crate::models::auth::SessionProfile;

        let store = auth_store();
        store.set_authenticated(true);
        store.set_role("ADMIN").unwrap();

        store.apply_remote(&RemoteSession::Unknown);
        assert!(store.has_role("ADMIN"));

        let profile = SessionProfile {
            role: Some("CUSTOMER".to_string()),
            ..SessionProfile::default()
        };
        store.apply_remote(&RemoteSession::Active(profile));
        assert!(store.has_role("CUSTOMER"));

        assert_eq!(store.apply_remote(&RemoteSession::Anonymous), AuthSession::anonymous());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_reconcile_expired_and_opaque_tokens() {
        let store = auth_store();
        let expired = encode_test_token(&json!({"role": "ADMIN", "exp": 500}));
        assert!(!store.reconcile_at(Some(&expired), 1_000).is_authenticated);

        let session = store.reconcile_at(Some("opaque-session-id"), 1_000);
        assert_eq!(session, AuthSession::authenticated(None));
    }
}
