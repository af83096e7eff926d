/// URL base del backend
/// Configurada en tiempo de compilación:
/// - Desarrollo: http://localhost:5000/api/v1 (por defecto)
/// - Producción: via BACKEND_URL env var
pub const BACKEND_URL: &str = match option_env!("BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:5000/api/v1",
};

// Claves de persistencia (se les antepone el prefijo configurado)
pub const STORAGE_KEY_AUTH: &str = "auth";
pub const STORAGE_KEY_FAVORITES: &str = "favorites";
pub const DEFAULT_STORAGE_PREFIX: &str = "storefront";

// Campos del query string de las listas
pub const QUERY_PAGE: &str = "page";
pub const QUERY_LIMIT: &str = "limit";
pub const QUERY_SEARCH_TERM: &str = "searchTerm";

/// Valores de selector que significan "sin filtro"
pub const DEFAULT_QUERY_SENTINELS: &[&str] = &["all", "none"];

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u32 = 500;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const DEFAULT_AUTH_COOKIE: &str = "accessToken";

/// Endpoint que devuelve el usuario de la cookie de sesión
pub const SESSION_ENDPOINT: &str = "auth/me";

/// Evento del navegador emitido al empujar una nueva URL de lista
pub const QUERY_CHANGE_EVENT: &str = "querychange";
