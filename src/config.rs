use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    BACKEND_URL, DEFAULT_AUTH_COOKIE, DEFAULT_PAGE_LIMIT, DEFAULT_QUERY_SENTINELS, DEFAULT_SEARCH_DEBOUNCE_MS,
    DEFAULT_STORAGE_PREFIX, STORAGE_KEY_AUTH, STORAGE_KEY_FAVORITES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub storage_config: StorageConfig,
    pub list_config: ListConfig,
    pub auth_cookie_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: BACKEND_URL.to_string(),
            backend_url_production: "https://api.storefront.example/api/v1".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            storage_config: StorageConfig::default(),
            list_config: ListConfig::default(),
            auth_cookie_name: DEFAULT_AUTH_COOKIE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    pub search_debounce_ms: u32,
    pub default_page_limit: u32,
    pub sentinels: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            sentinels: DEFAULT_QUERY_SENTINELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .unwrap_or(BACKEND_URL).to_string(),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .unwrap_or("https://api.storefront.example/api/v1").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            storage_config: StorageConfig {
                key_prefix: option_env!("STORAGE_KEY_PREFIX")
                    .unwrap_or(DEFAULT_STORAGE_PREFIX).to_string(),
            },
            list_config: ListConfig {
                search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
                default_page_limit: option_env!("DEFAULT_PAGE_LIMIT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PAGE_LIMIT),
                sentinels: option_env!("QUERY_SENTINELS")
                    .map(parse_list)
                    .unwrap_or(defaults.list_config.sentinels),
            },
            auth_cookie_name: option_env!("AUTH_COOKIE_NAME")
                .unwrap_or(DEFAULT_AUTH_COOKIE).to_string(),
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn auth_storage_key(&self) -> String {
        self.storage_key(STORAGE_KEY_AUTH)
    }

    pub fn favorites_storage_key(&self) -> String {
        self.storage_key(STORAGE_KEY_FAVORITES)
    }

    fn storage_key(&self, name: &str) -> String {
        if self.storage_config.key_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.storage_config.key_prefix, name)
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
