//! HTTP API client for the campus backend.
//!
//! Every request goes through one primitive that attaches the bearer token,
//! serializes JSON bodies, and folds the outcome into a normalized
//! [`ApiResponse`]. Failures never escape this module: a transport error
//! becomes `ok: false` with status 0, and an unparsable body is kept as an
//! explicit [`ResponseBody::Malformed`] instead of an error, so callers can
//! always handle the result locally.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use campusfeed_shared::{error_message, ApiError, LoginRequest, TopicRequest};

/// Normalized request outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Whether the response carried a 2xx status.
    pub ok: bool,
    /// HTTP status code; 0 when the request never reached the server.
    pub status: u16,
    pub body: ResponseBody,
}

/// Decoded response body. "No body" and "unparsable body" stay distinct here
/// even though `data()` degrades both to an empty object.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Empty,
    Malformed(String),
}

impl ApiResponse {
    fn unreachable_server() -> Self {
        Self {
            ok: false,
            status: 0,
            body: ResponseBody::Empty,
        }
    }

    /// Body as JSON. Empty and malformed bodies degrade to `{}`, matching
    /// what callers expect when probing optional fields.
    pub fn data(&self) -> Value {
        match &self.body {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Empty | ResponseBody::Malformed(_) => json!({}),
        }
    }

    /// Deserialize the JSON body into a typed value.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        match &self.body {
            ResponseBody::Json(value) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// Classify a failed response. `None` when the request succeeded.
    pub fn failure(&self) -> Option<ApiError> {
        if self.ok {
            return None;
        }
        if self.status == 0 {
            return Some(ApiError::Network("server unreachable".to_string()));
        }
        match &self.body {
            ResponseBody::Malformed(raw) => Some(ApiError::Decode(raw.clone())),
            ResponseBody::Json(value) => Some(ApiError::Http {
                status: self.status,
                body: error_message(value).unwrap_or_else(|| value.to_string()),
            }),
            ResponseBody::Empty => Some(ApiError::Http {
                status: self.status,
                body: String::new(),
            }),
        }
    }
}

/// Classify a raw response body.
fn classify_body(text: &str) -> ResponseBody {
    if text.trim().is_empty() {
        return ResponseBody::Empty;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Malformed(text.to_string()),
    }
}

/// HTTP client carrying the session's bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the default backend: same-origin relative
    /// paths on web, `CAMPUSFEED_SERVER` (or localhost) on desktop.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: default_base_url(),
            token: None,
        }
    }

    /// Override the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attach the session's bearer token to every subsequent request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Absolute (or same-origin) URL of the server-push channel.
    pub fn events_url(&self) -> String {
        self.url("/events")
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResponse {
        let mut rb = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            rb = rb.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            rb = rb.json(&body);
        }

        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(err) => {
                crate::log_warn!("request to {path} failed before reaching the server: {err}");
                return ApiResponse::unreachable_server();
            }
        };

        let ok = resp.status().is_success();
        let status = resp.status().as_u16();
        let body = match resp.text().await {
            Ok(text) => classify_body(&text),
            Err(err) => {
                crate::log_warn!("failed to read response body from {path}: {err}");
                ResponseBody::Empty
            }
        };

        ApiResponse { ok, status, body }
    }

    fn to_body<T: Serialize>(req: &T) -> Option<Value> {
        // Our request types are plain field structs; serialization cannot
        // fail for them, but degrade to an empty body rather than panic.
        serde_json::to_value(req).ok()
    }

    // --- Backend operations ---

    /// `POST /api/login` — exchange credentials for a token and claims.
    pub async fn login(&self, req: &LoginRequest) -> ApiResponse {
        self.request(Method::POST, "/api/login", Self::to_body(req)).await
    }

    /// `GET /api/materias` — subjects for the authenticated student.
    pub async fn materias(&self) -> ApiResponse {
        self.request(Method::GET, "/api/materias", None).await
    }

    /// `POST /mqtt/connect` — ask the bridge to (re)connect to the broker.
    /// Idempotent; safe to call when already connected.
    pub async fn broker_connect(&self) -> ApiResponse {
        self.request(Method::POST, "/mqtt/connect", None).await
    }

    /// `POST /mqtt/subscribe` — subscribe to a subject's topic.
    pub async fn subscribe(&self, id_materia: &str) -> ApiResponse {
        let req = TopicRequest {
            id_materia: id_materia.to_string(),
        };
        self.request(Method::POST, "/mqtt/subscribe", Self::to_body(&req)).await
    }

    /// `POST /mqtt/unsubscribe` — drop a subject's topic subscription.
    pub async fn unsubscribe(&self, id_materia: &str) -> ApiResponse {
        let req = TopicRequest {
            id_materia: id_materia.to_string(),
        };
        self.request(Method::POST, "/mqtt/unsubscribe", Self::to_body(&req)).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if base.is_empty() {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    } else {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(target_arch = "wasm32")]
fn default_base_url() -> String {
    // Same origin as the page that served the client.
    String::new()
}

#[cfg(not(target_arch = "wasm32"))]
fn default_base_url() -> String {
    std::env::var("CAMPUSFEED_SERVER").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_classification() {
        assert_eq!(classify_body(""), ResponseBody::Empty);
        assert_eq!(classify_body("  \n"), ResponseBody::Empty);
        assert_eq!(
            classify_body(r#"{"materias":[]}"#),
            ResponseBody::Json(json!({"materias": []}))
        );
        assert_eq!(
            classify_body("<html>gateway timeout</html>"),
            ResponseBody::Malformed("<html>gateway timeout</html>".to_string())
        );
    }

    #[test]
    fn data_degrades_to_empty_object() {
        let empty = ApiResponse {
            ok: true,
            status: 204,
            body: ResponseBody::Empty,
        };
        assert_eq!(empty.data(), json!({}));

        let malformed = ApiResponse {
            ok: false,
            status: 502,
            body: ResponseBody::Malformed("<html>".into()),
        };
        assert_eq!(malformed.data(), json!({}));
    }

    #[test]
    fn parse_requires_a_json_body() {
        use campusfeed_shared::SubjectList;

        let res = ApiResponse {
            ok: true,
            status: 200,
            body: classify_body(r#"{"materias":[{"id_materia":"mat_bd2","nombre_materia":"Bases de Datos II"}]}"#),
        };
        let list: SubjectList = res.parse().unwrap();
        assert_eq!(list.materias.len(), 1);

        let empty = ApiResponse {
            ok: true,
            status: 200,
            body: ResponseBody::Empty,
        };
        assert!(empty.parse::<SubjectList>().is_none());
    }

    #[test]
    fn failure_classification() {
        let ok = ApiResponse {
            ok: true,
            status: 200,
            body: ResponseBody::Empty,
        };
        assert_eq!(ok.failure(), None);

        assert_eq!(
            ApiResponse::unreachable_server().failure(),
            Some(ApiError::Network("server unreachable".to_string()))
        );

        let denied = ApiResponse {
            ok: false,
            status: 401,
            body: classify_body(r#"{"error":"token inválido"}"#),
        };
        assert_eq!(
            denied.failure(),
            Some(ApiError::Http {
                status: 401,
                body: "token inválido".to_string(),
            })
        );

        let gateway = ApiResponse {
            ok: false,
            status: 502,
            body: ResponseBody::Malformed("<html>gateway timeout</html>".to_string()),
        };
        assert_eq!(
            gateway.failure(),
            Some(ApiError::Decode("<html>gateway timeout</html>".to_string()))
        );
    }

    #[test]
    fn url_joining() {
        assert_eq!(join_url("", "/api/login"), "/api/login");
        assert_eq!(join_url("", "api/login"), "/api/login");
        assert_eq!(
            join_url("http://127.0.0.1:8080/", "/events"),
            "http://127.0.0.1:8080/events"
        );
        assert_eq!(
            join_url("http://localhost", "https://other/events"),
            "https://other/events"
        );
    }
}
