//! JSON-RPC 2.0 transport for xapi's `/jsonrpc` endpoint.
//!
//! [`JsonRpcClient`] owns the HTTP client, the target URL, and the two
//! timeouts the bindings expose (request and connection). It knows nothing
//! about sessions or login semantics; it sends `{jsonrpc, method, params,
//! id}` envelopes and hands back the raw `{result, error}` pair for the
//! [`Connection`](crate::Connection) layer to interpret.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use xapi_core::{Result, XapiError};

/// Default reply timeout for JSON-RPC calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Default connection timeout for JSON-RPC calls, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// `User-Agent` sent with every request.
const USER_AGENT: &str = concat!("xapi-client/", env!("CARGO_PKG_VERSION"));

/// A JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u64,
}

/// A JSON-RPC response envelope.
///
/// xapi replies with HTTP 200 even for API faults; success and failure are
/// distinguished by which of these fields is non-null.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    /// The call's result payload. `Null` for void methods.
    #[serde(default)]
    pub result: Option<Value>,
    /// The server's error payload, non-null when the call faulted.
    #[serde(default)]
    pub error: Option<Value>,
}

/// HTTP transport speaking JSON-RPC 2.0 to a single server.
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: Url,
    request_timeout: Duration,
    connect_timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a client for the given server URL with default timeouts.
    ///
    /// The URL may be of the form `http(s)://host` or
    /// `http(s)://host/jsonrpc`; a missing path is filled in.
    pub fn new(url: Url) -> Result<Self> {
        Self::with_timeouts(
            url,
            DEFAULT_REQUEST_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )
    }

    /// Create a client with explicit request/connection timeouts (seconds).
    pub fn with_timeouts(url: Url, request_secs: u64, connect_secs: u64) -> Result<Self> {
        let connect_timeout = Duration::from_secs(connect_secs);
        Ok(Self {
            http: build_http_client(connect_timeout)?,
            url: normalize_url(url),
            request_timeout: Duration::from_secs(request_secs),
            connect_timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// The normalized endpoint URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The reply timeout applied to each request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// The TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Set the reply timeout for subsequent requests, in seconds.
    pub fn set_request_timeout(&mut self, seconds: u64) {
        self.request_timeout = Duration::from_secs(seconds);
    }

    /// Set the TCP connect timeout for subsequent requests, in seconds.
    ///
    /// The connect timeout lives on the pooled HTTP client, so this
    /// rebuilds it; idle connections from the old pool are dropped.
    pub fn set_connection_timeout(&mut self, seconds: u64) -> Result<()> {
        self.connect_timeout = Duration::from_secs(seconds);
        self.http = build_http_client(self.connect_timeout)?;
        Ok(())
    }

    /// Send one JSON-RPC call and return the raw response envelope.
    ///
    /// Fails with [`XapiError::Http`] when the request cannot be sent, the
    /// reply times out, or the server answers with a non-success status,
    /// and with [`XapiError::Json`] when the body is not valid JSON.
    pub async fn send(&self, method: &str, params: &Value) -> Result<RpcResponse> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!(method, id, url = %self.url, "sending JSON-RPC request");

        let response = self
            .http
            .post(self.url.clone())
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(XapiError::Http)?
            .error_for_status()
            .map_err(XapiError::Http)?;

        let body = response.text().await.map_err(XapiError::Http)?;
        let envelope: RpcResponse = serde_json::from_str(&body).map_err(XapiError::Json)?;

        debug!(
            method,
            id,
            has_result = envelope.result.is_some(),
            has_error = envelope.error.is_some(),
            "received JSON-RPC response"
        );

        Ok(envelope)
    }
}

/// Build the pooled HTTP client used for all requests.
fn build_http_client(connect_timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(XapiError::Http)
}

/// Fill in the `/jsonrpc` path when the caller gave a bare host URL.
fn normalize_url(mut url: Url) -> Url {
    if url.path().is_empty() || url.path() == "/" {
        url.set_path("/jsonrpc");
    }
    url
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    // ── URL normalization ────────────────────────────────────────────────

    #[test]
    fn bare_host_gets_jsonrpc_path() {
        let client = JsonRpcClient::new(url("https://xen.example.com")).unwrap();
        assert_eq!(client.url().path(), "/jsonrpc");
    }

    #[test]
    fn explicit_jsonrpc_path_is_kept() {
        let client = JsonRpcClient::new(url("https://xen.example.com/jsonrpc")).unwrap();
        assert_eq!(client.url().path(), "/jsonrpc");
    }

    #[test]
    fn non_empty_path_is_left_alone() {
        let client = JsonRpcClient::new(url("https://xen.example.com/api/v2")).unwrap();
        assert_eq!(client.url().path(), "/api/v2");
    }

    // ── Timeouts ─────────────────────────────────────────────────────────

    #[test]
    fn default_timeouts() {
        let client = JsonRpcClient::new(url("https://xen.example.com")).unwrap();
        assert_eq!(client.request_timeout(), Duration::from_secs(600));
        assert_eq!(client.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn setters_update_timeouts() {
        let mut client = JsonRpcClient::new(url("https://xen.example.com")).unwrap();
        client.set_request_timeout(30);
        client.set_connection_timeout(2).unwrap();
        assert_eq!(client.request_timeout(), Duration::from_secs(30));
        assert_eq!(client.connect_timeout(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn request_timeout_is_applied_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "ok", "error": null}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let mut client = JsonRpcClient::new(url(&server.uri())).unwrap();
        client.set_request_timeout(1);

        let err = client.send("event.next", &json!([])).await.unwrap_err();
        assert_matches!(err, XapiError::Http(e) if e.is_timeout());
    }

    // ── Wire format ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn sends_jsonrpc_envelope_with_incrementing_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jsonrpc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": "", "error": null})),
            )
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(url(&server.uri())).unwrap();
        let _ = client.send("pool.get_all", &json!(["OpaqueRef:s"])).await.unwrap();
        let _ = client.send("pool.get_all", &json!(["OpaqueRef:s"])).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);

        let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(first["jsonrpc"], "2.0");
        assert_eq!(first["method"], "pool.get_all");
        assert_eq!(first["params"], json!(["OpaqueRef:s"]));
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(url(&server.uri())).unwrap();
        let err = client.send("VM.get_all", &json!([])).await.unwrap_err();
        assert_matches!(err, XapiError::Http(_));
    }

    #[tokio::test]
    async fn invalid_json_body_is_codec_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(url(&server.uri())).unwrap();
        let err = client.send("VM.get_all", &json!([])).await.unwrap_err();
        assert_matches!(err, XapiError::Json(_));
    }

    #[tokio::test]
    async fn fault_envelope_passes_through_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": null,
                "error": ["SESSION_INVALID", "OpaqueRef:stale"]
            })))
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(url(&server.uri())).unwrap();
        let envelope = client.send("VM.get_all", &json!([])).await.unwrap();
        assert!(envelope.result.is_none() || envelope.result == Some(Value::Null));
        assert_eq!(
            envelope.error,
            Some(json!(["SESSION_INVALID", "OpaqueRef:stale"]))
        );
    }
}
