use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Proyección en cliente del estado de autenticación.
///
/// Solo sirve para pintar rápido: el control de acceso real lo hace el backend.
/// Al decodificar (almacenamiento u otra pestaña) el rol se descarta si no hay sesión.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAuthSession")]
pub struct AuthSession {
    pub is_authenticated: bool,
    pub role: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthSession {
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    role: Option<String>,
}

impl From<RawAuthSession> for AuthSession {
    fn from(raw: RawAuthSession) -> Self {
        if !raw.is_authenticated {
            return Self::anonymous();
        }
        Self::authenticated(raw.role.filter(|r| !r.trim().is_empty()))
    }
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(role: Option<String>) -> Self {
        Self {
            is_authenticated: true,
            role,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.is_authenticated && self.role.as_deref() == Some(role)
    }
}

/// Usuario de la sesión según el backend (`GET /auth/me`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Respuesta del backend al preguntar por la sesión actual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSession {
    Active(SessionProfile),
    /// 401 / 403: la cookie no existe o ya no vale
    Anonymous,
    /// Red caída o respuesta inesperada: no se sabe nada
    Unknown,
}

/// Claims del token de acceso emitido por el backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, alias = "userId", alias = "sub")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Leer el payload de un JWT.
    ///
    /// La firma no se verifica aquí (eso es cosa del backend), solo se
    /// decodifica el segmento central en base64url.
    pub fn decode_unverified(token: &str) -> Option<Self> {
        let mut segments = token.trim().split('.');
        let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
        if segments.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn is_expired(&self, now_timestamp: i64) -> bool {
        matches!(self.exp, Some(exp) if exp <= now_timestamp)
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
