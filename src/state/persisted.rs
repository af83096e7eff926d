// ============================================================================
// PERSISTED STORE - Estado reactivo persistido en el almacenamiento local
// ============================================================================
// - Hidratación perezosa en el primer acceso
// - Sobre versionado {"state": T, "version": n} con migración opcional
// - Fallos de escritura: se registran y se ignoran (memoria = autoridad)
// - Suscriptores notificados de forma síncrona en cada escritura
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::storage::SharedStorage;

/// Migración de un estado persistido con versión antigua.
/// Devuelve `None` si no sabe convertirlo.
pub type Migration = fn(serde_json::Value, u32) -> Option<serde_json::Value>;

type Listener<T> = Rc<dyn Fn(&T)>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error("versión {found} más nueva que la soportada ({supported})")]
    FutureVersion { found: u32, supported: u32 },
    #[error("sin migración desde la versión {found}")]
    NoMigration { found: u32 },
    #[error("la migración desde la versión {found} falló")]
    MigrationFailed { found: u32 },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct RawEnvelope {
    state: serde_json::Value,
    version: u32,
}

struct StoreInner<T> {
    key: String,
    version: u32,
    migrate: Option<Migration>,
    storage: SharedStorage,
    value: RefCell<Option<Rc<T>>>,
    subscribers: RefCell<Vec<(u64, Listener<T>)>>,
    next_subscriber_id: Cell<u64>,
}

/// Store persistido. Los clones comparten el mismo valor y suscriptores.
pub struct PersistedStore<T> {
    inner: Rc<StoreInner<T>>,
}

impl<T> Clone for PersistedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Suscripción activa. Se cancela con `unsubscribe()` o al hacer drop.
#[must_use = "la suscripción se cancela al hacer drop"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default + 'static,
{
    /// Crear store (no lee el almacenamiento hasta el primer acceso)
    pub fn new(key: &str, version: u32, storage: SharedStorage) -> Self {
        Self::with_migration(key, version, storage, None)
    }

    pub fn with_migration(
        key: &str,
        version: u32,
        storage: SharedStorage,
        migrate: Option<Migration>,
    ) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                key: key.to_string(),
                version,
                migrate,
                storage,
                value: RefCell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber_id: Cell::new(0),
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Valor actual (hidrata desde el almacenamiento la primera vez)
    pub fn get(&self) -> Rc<T> {
        if let Some(value) = self.inner.value.borrow().as_ref() {
            return value.clone();
        }
        let hydrated = Rc::new(self.hydrate());
        *self.inner.value.borrow_mut() = Some(hydrated.clone());
        hydrated
    }

    /// Leer el valor sin clonarlo
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        let value = self.get();
        read(&*value)
    }

    /// Aplicar `updater`, guardar en memoria y en el almacenamiento, notificar
    pub fn set<F>(&self, updater: F)
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.get();
        let next = Rc::new(updater(&*current));
        *self.inner.value.borrow_mut() = Some(next.clone());
        self.persist(&next);
        self.notify(&next);
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_subscriber_id.get();
        self.inner.next_subscriber_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<StoreInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Volver al valor por defecto y borrar la clave persistida
    pub fn reset(&self) {
        let value = Rc::new(T::default());
        *self.inner.value.borrow_mut() = Some(value.clone());
        if let Err(e) = self.inner.storage.remove_item(&self.inner.key) {
            log::warn!("⚠️ No se pudo borrar '{}': {}", self.inner.key, e);
        }
        self.notify(&value);
    }

    /// Otra pestaña escribió la clave (evento `storage`): última escritura gana
    pub fn apply_external_change(&self, raw: Option<&str>) {
        let value = match raw {
            Some(raw) => self.decode_or_default(raw),
            None => T::default(),
        };
        let value = Rc::new(value);
        *self.inner.value.borrow_mut() = Some(value.clone());
        log::debug!("🔄 '{}' actualizado desde otra pestaña", self.inner.key);
        self.notify(&value);
    }

    fn hydrate(&self) -> T {
        match self.inner.storage.get_item(&self.inner.key) {
            Ok(Some(raw)) => self.decode_or_default(&raw),
            Ok(None) => T::default(),
            Err(e) => {
                log::debug!("'{}' sin hidratar: {}", self.inner.key, e);
                T::default()
            }
        }
    }

    fn decode_or_default(&self, raw: &str) -> T {
        self.decode(raw).unwrap_or_else(|e| {
            log::debug!("'{}' descartado, se usa el valor por defecto: {}", self.inner.key, e);
            T::default()
        })
    }

    fn decode(&self, raw: &str) -> Result<T, DecodeError> {
        let envelope: RawEnvelope = serde_json::from_str(raw)?;
        let supported = self.inner.version;
        let state = if envelope.version == supported {
            envelope.state
        } else if envelope.version > supported {
            return Err(DecodeError::FutureVersion {
                found: envelope.version,
                supported,
            });
        } else {
            let migrate = self.inner.migrate.ok_or(DecodeError::NoMigration {
                found: envelope.version,
            })?;
            migrate(envelope.state, envelope.version).ok_or(DecodeError::MigrationFailed {
                found: envelope.version,
            })?
        };
        Ok(serde_json::from_value(state)?)
    }

    fn persist(&self, value: &T) {
        let envelope = EnvelopeRef {
            state: value,
            version: self.inner.version,
        };
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("⚠️ Error serializando '{}': {}", self.inner.key, e);
                return;
            }
        };
        if let Err(e) = self.inner.storage.set_item(&self.inner.key, &json) {
            // Solo memoria durante esta sesión
            log::warn!("⚠️ '{}' no persistido: {}", self.inner.key, e);
        }
    }

    fn notify(&self, value: &T) {
        // Copia de la lista: un listener puede suscribirse o cancelar
        let listeners: Vec<Listener<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}
