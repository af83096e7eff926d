use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadatos de paginación que devuelve el backend en los listados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl PageMeta {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// Sobre uniforme `{success, data, message, meta}` de todas las respuestas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            meta: None,
        }
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self::failure(error.to_string())
    }

    /// Convertir el sobre en un Result (para código que prefiere `?`)
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Parse("missing data".to_string()))
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Traducir una respuesta HTTP cruda al sobre; nunca falla
    pub fn from_http(status: u16, body: &str) -> Self {
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Request failed".to_string());
            log::warn!("⚠️ Respuesta HTTP {}: {}", status, message);
            return Self::from_error(&ApiError::Http { status, message });
        }

        match serde_json::from_str::<ApiResponse<T>>(body) {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ Error parseando respuesta: {}", e);
                Self::from_error(&ApiError::Parse(e.to_string()))
            }
        }
    }
}
