// Authenticated request gateway - the single path every API call goes through
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::AuthContext;
use crate::config::AppConfig;
use crate::error::ClientError;

/// Per-call options. Defaults to a `GET` with no body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Applied after the defaults, so they win on conflict.
    pub headers: Vec<(String, String)>,
    /// Takes precedence over the credential held by the auth context.
    pub token: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::method(Method::POST)
    }

    pub fn put() -> Self {
        Self::method(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::method(Method::DELETE)
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: Url,
}

impl Gateway {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::validation("base_url", format!("{}: {}", base_url, e)))?;

        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_timeout(
            &config.api.base_url,
            config.api.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let joined = format!("{}/{}", base, path);
        Url::parse(&joined).map_err(|e| ClientError::validation("path", format!("{}: {}", joined, e)))
    }

    /// JSON content headers, the bearer credential when one resolves, then caller overrides.
    pub fn compose_headers(&self, auth: &AuthContext, options: &RequestOptions) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let explicit = options.token.as_deref().filter(|t| !t.is_empty());
        if let Some(token) = explicit.or_else(|| auth.token()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::validation("token", "Credential contains characters not allowed in a header"))?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::validation("headers", format!("Invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::validation("headers", format!("Invalid value for header {}", name)))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Issues one request and returns the decoded body.
    ///
    /// Any status outside 200..300 fails with the server's detail message if it sent one.
    /// Nothing is retried and the credential slot is only read.
    pub async fn request<T: DeserializeOwned>(
        &self,
        auth: &AuthContext,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let headers = self.compose_headers(auth, &options)?;
        let method = options.method.clone();

        tracing::debug!(%method, path, "dispatching request");

        let mut builder = self.client.request(options.method, url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "transport failure");
            ClientError::transport(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::transport(e.to_string()))?;

        if !status.is_success() {
            let err = ClientError::request_failed(status.as_u16(), error_detail(&text));
            tracing::warn!(%method, path, status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        decode_body(&text)
    }
}

/// Server detail from a JSON error body: `message`, else `error`, else `details`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "details"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Empty bodies decode as JSON null so `()` and `Value` callers succeed on 204s.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    if text.trim().is_empty() {
        return serde_json::from_value(Value::Null)
            .map_err(|e| ClientError::decode(format!("Empty response body: {}", e)));
    }
    serde_json::from_str(text).map_err(|e| ClientError::decode(format!("Invalid JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;

    fn gateway() -> Gateway {
        Gateway::new("http://localhost:5000/").unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let gw = gateway();
        assert_eq!(gw.endpoint("/groceries").unwrap().as_str(), "http://localhost:5000/groceries");
        assert_eq!(gw.endpoint("recipes/4").unwrap().as_str(), "http://localhost:5000/recipes/4");

        let prefixed = Gateway::new("https://example.com/api").unwrap();
        assert_eq!(
            prefixed.endpoint("/groceries/check-expirations").unwrap().as_str(),
            "https://example.com/api/groceries/check-expirations"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            Gateway::new("not a url"),
            Err(ClientError::Validation { ref field, .. }) if field == "base_url"
        ));
    }

    #[test]
    fn headers_attach_context_credential() {
        let auth = AuthContext::load(MemoryCredentialStore::with_token("ctx")).unwrap();
        let headers = gateway().compose_headers(&auth, &RequestOptions::get()).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer ctx");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn explicit_token_beats_context() {
        let auth = AuthContext::load(MemoryCredentialStore::with_token("ctx")).unwrap();
        let options = RequestOptions::get().token("explicit");
        let headers = gateway().compose_headers(&auth, &options).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer explicit");
    }

    #[test]
    fn no_credential_means_no_authorization_header() {
        let headers = gateway()
            .compose_headers(&AuthContext::anonymous(), &RequestOptions::get())
            .unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn caller_headers_override_defaults() {
        let options = RequestOptions::post().header("Content-Type", "text/plain").header("X-Trace", "1");
        let headers = gateway().compose_headers(&AuthContext::anonymous(), &options).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["x-trace"], "1");
    }

    #[test]
    fn error_detail_prefers_message_field() {
        assert_eq!(
            error_detail(r#"{"message":"Grocery not found","error":"x"}"#),
            Some("Grocery not found".to_string())
        );
        assert_eq!(error_detail(r#"{"error":"Unauthorized"}"#), Some("Unauthorized".to_string()));
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(r#"{"error":true}"#), None);
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let value: Value = decode_body("").unwrap();
        assert!(value.is_null());
        decode_body::<()>("  ").unwrap();
        assert!(matches!(decode_body::<Value>("{oops"), Err(ClientError::Decode(_))));
    }
}
