// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Todo termina en el sobre `ApiResponse`: ni los errores de red ni los
// códigos no-2xx salen de aquí como error.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::api::{ApiError, ApiResponse};
use crate::models::auth::{RemoteSession, SessionProfile};
use crate::state::query_state::{QueryOptions, QueryState};
use crate::utils::constants::QUERY_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// Respuesta HTTP cruda (status + cuerpo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Capa de transporte. En el navegador: gloo_net con cookies.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, method: Method, url: &str, body: Option<String>) -> Result<HttpReply, ApiError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::GlooTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{HttpReply, Method, Transport};
    use crate::models::api::ApiError;
    use gloo_net::http::Request;
    use web_sys::RequestCredentials;

    #[derive(Clone, Copy, Default)]
    pub struct GlooTransport;

    impl Transport for GlooTransport {
        async fn execute(&self, method: Method, url: &str, body: Option<String>) -> Result<HttpReply, ApiError> {
            let builder = match method {
                Method::Get => Request::get(url),
                Method::Post => Request::post(url),
                Method::Delete => Request::delete(url),
            }
            .credentials(RequestCredentials::Include);

            let response = match body {
                Some(body) => builder
                    .header("Content-Type", "application/json")
                    .body(body)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| ApiError::Network(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(HttpReply { status, body })
        }
    }
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient<Tr> {
    base_url: String,
    transport: Tr,
    default_page_limit: Option<u32>,
}

#[cfg(target_arch = "wasm32")]
impl ApiClient<GlooTransport> {
    /// Cliente contra el backend configurado
    pub fn browser() -> Self {
        let config = &*crate::config::CONFIG;
        Self::new(config.backend_url(), GlooTransport)
            .with_default_page_limit(config.list_config.default_page_limit)
    }
}

impl<Tr: Transport> ApiClient<Tr> {
    pub fn new(base_url: &str, transport: Tr) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            default_page_limit: None,
        }
    }

    /// `limit` que se envía cuando la URL de la vista no trae uno
    pub fn with_default_page_limit(mut self, limit: u32) -> Self {
        self.default_page_limit = Some(limit).filter(|l| *l > 0);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Listado paginado: el query string es el mismo que el de la URL de la vista
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryState,
        options: &QueryOptions,
    ) -> ApiResponse<Vec<T>> {
        let mut query = query.clone();
        if let Some(limit) = self.default_page_limit {
            query.set_default(QUERY_LIMIT, &limit.to_string());
        }
        let url = format!("{}?{}", self.url(path), query.to_query_string(options));
        log::debug!("📋 GET {}", url);
        self.send(Method::Get, &url, None).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        let url = self.url(path);
        self.send(Method::Get, &url, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResponse<T> {
        let body = match serde_json::to_string(body) {
            Ok(body) => body,
            Err(e) => return ApiResponse::from_error(&ApiError::Serialization(e.to_string())),
        };
        let url = self.url(path);
        self.send(Method::Post, &url, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        let url = self.url(path);
        self.send(Method::Delete, &url, None).await
    }

    /// Preguntar al backend por la sesión de la cookie (HttpOnly incluida)
    pub async fn fetch_session(&self, path: &str) -> RemoteSession {
        let url = self.url(path);
        let reply = match self.transport.execute(Method::Get, &url, None).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("⚠️ [AUTH] Sesión no verificada: {}", e);
                return RemoteSession::Unknown;
            }
        };
        match reply.status {
            401 | 403 => RemoteSession::Anonymous,
            _ => match ApiResponse::<SessionProfile>::from_http(reply.status, &reply.body) {
                ApiResponse {
                    success: true,
                    data: Some(profile),
                    ..
                } => RemoteSession::Active(profile),
                _ => RemoteSession::Unknown,
            },
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, url: &str, body: Option<String>) -> ApiResponse<T> {
        match self.transport.execute(method, url, body).await {
            Ok(reply) => ApiResponse::from_http(reply.status, &reply.body),
            Err(e) => {
                log::error!("❌ {:?} {} falló: {}", method, url, e);
                ApiResponse::from_error(&e)
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductSnapshot;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// Transporte falso: devuelve una respuesta fija y registra las peticiones
    struct FakeTransport {
        reply: Result<HttpReply, ApiError>,
        requests: RefCell<Vec<(Method, String, Option<String>)>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(HttpReply {
                    status,
                    body: body.to_string(),
                }),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing(error: ApiError) -> Self {
            Self {
                reply: Err(error),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        async fn execute(&self, method: Method, url: &str, body: Option<String>) -> Result<HttpReply, ApiError> {
            self.requests
                .borrow_mut()
                .push((method, url.to_string(), body));
            self.reply.clone()
        }
    }

    #[test]
    fn test_get_list_sends_view_query() {
        let body = r#"{"success":true,"data":[{"_id":"p1","name":"Mesa","price":120.0}],
            "meta":{"page":2,"limit":10,"total":11,"totalPages":2}}"#;
        let client = ApiClient::new("http://api.test/api/v1/", FakeTransport::replying(200, body));
        let query = QueryState::parse("?page=2&status=all&category=chairs", &QueryOptions::default());

        let response: ApiResponse<Vec<ProductSnapshot>> =
            block_on(client.get_list("/products", &query, &QueryOptions::default()));

        assert!(response.success);
        assert_eq!(response.data.unwrap()[0].id, "p1");
        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].0, Method::Get);
        assert_eq!(requests[0].1, "http://api.test/api/v1/products?category=chairs&page=2");
    }

    #[test]
    fn test_get_list_applies_default_limit_only_when_missing() {
        let body = r#"{"success":true,"data":[]}"#;
        let client = ApiClient::new("http://api.test", FakeTransport::replying(200, body))
            .with_default_page_limit(10);
        let options = QueryOptions::default();

        let query = QueryState::parse("?page=3&status=PENDING", &options);
        let _: ApiResponse<Vec<ProductSnapshot>> = block_on(client.get_list("orders", &query, &options));
        let query = QueryState::parse("?limit=25", &options);
        let _: ApiResponse<Vec<ProductSnapshot>> = block_on(client.get_list("orders", &query, &options));

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].1, "http://api.test/orders?status=PENDING&limit=10&page=3");
        assert_eq!(requests[1].1, "http://api.test/orders?limit=25&page=1");
    }

    #[test]
    fn test_fetch_session_outcomes() {
        let active = ApiClient::new(
            "http://api.test",
            FakeTransport::replying(200, r#"{"success":true,"data":{"_id":"u1","role":"ADMIN"}}"#),
        );
        let remote = block_on(active.fetch_session("auth/me"));
        assert_eq!(
            remote,
            RemoteSession::Active(SessionProfile {
                id: Some("u1".to_string()),
                email: None,
                role: Some("ADMIN".to_string()),
            })
        );
        assert_eq!(active.transport.requests.borrow()[0].1, "http://api.test/auth/me");

        let expired = ApiClient::new("http://api.test", FakeTransport::replying(401, "{}"));
        assert_eq!(block_on(expired.fetch_session("auth/me")), RemoteSession::Anonymous);

        let down = ApiClient::new("http://api.test", FakeTransport::replying(503, ""));
        assert_eq!(block_on(down.fetch_session("auth/me")), RemoteSession::Unknown);

        let offline = ApiClient::new(
            "http://api.test",
            FakeTransport::failing(ApiError::Network("offline".to_string())),
        );
        assert_eq!(block_on(offline.fetch_session("auth/me")), RemoteSession::Unknown);
    }

    #[test]
    fn test_network_error_becomes_failure_envelope() {
        let client = ApiClient::new(
            "http://api.test",
            FakeTransport::failing(ApiError::Network("offline".to_string())),
        );
        let response: ApiResponse<ProductSnapshot> = block_on(client.get("products/p1"));
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Network error: offline"));
        assert!(response.data.is_none());
    }

    #[test]
    fn test_post_serializes_body() {
        let client = ApiClient::new(
            "http://api.test",
            FakeTransport::replying(201, r#"{"success":true,"data":{"_id":"p9","name":"Silla"}}"#),
        );
        let product = ProductSnapshot::new("", "Silla", 30.0);
        let response: ApiResponse<ProductSnapshot> = block_on(client.post("products", &product));

        assert_eq!(response.data.map(|p| p.id), Some("p9".to_string()));
        let requests = client.transport.requests.borrow();
        let sent: serde_json::Value = serde_json::from_str(requests[0].2.as_deref().unwrap()).unwrap();
        assert_eq!(sent["name"], "Silla");
    }

    #[test]
    fn test_http_error_keeps_backend_message() {
        let client = ApiClient::new(
            "http://api.test",
            FakeTransport::replying(403, r#"{"success":false,"message":"Forbidden"}"#),
        );
        let response: ApiResponse<()> = block_on(client.delete("orders/1"));
        assert_eq!(response.message.as_deref(), Some("HTTP 403: Forbidden"));
    }
}
