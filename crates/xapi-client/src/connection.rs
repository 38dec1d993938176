//! The `Connection` type every binding call funnels through.
//!
//! A [`Connection`] owns a [`JsonRpcClient`] and the session state the
//! generated-style wrappers need: the opaque session reference and the
//! negotiated [`ApiVersion`]. Both are written only as a side effect of a
//! successful dispatch of one of the two login methods; every other call
//! leaves them untouched.
//!
//! Construction never touches the network. Logging in is the caller's job
//! (pass the connection to [`Session::login_with_password`]), and so is
//! logging out — dropping a `Connection` does not end the session.
//!
//! [`Session::login_with_password`]: crate::api::session::Session::login_with_password

use std::collections::HashMap;

use parking_lot::RwLock;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use xapi_core::{ApiVersion, OpaqueRef, Result, XapiError};

use crate::api::host::{self, HostRecord};
use crate::api::pool::{self, PoolRecord};
use crate::api::session::SessionRef;
use crate::config::{ConfigError, ConnectionConfig};
use crate::rpc::JsonRpcClient;

/// Wire name of the primary password login method.
pub const LOGIN_WITH_PASSWORD: &str = "session.login_with_password";

/// Wire name of the slave-local password login method.
pub const SLAVE_LOCAL_LOGIN_WITH_PASSWORD: &str = "session.slave_local_login_with_password";

/// How a dispatched method interacts with session state.
///
/// Resolved once at the dispatch boundary from the exact method-name
/// string, so the login handling below is a closed match rather than
/// string comparisons scattered through the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    /// `session.login_with_password` — stores the session and probes the
    /// pool for the server's API version.
    PrimaryLogin,
    /// `session.slave_local_login_with_password` — stores the session and
    /// assumes the latest known version (a slave cannot be probed).
    SlaveLocalLogin,
    /// Anything else — passes through without touching session state.
    Other,
}

impl CallKind {
    fn classify(method: &str) -> Self {
        match method {
            LOGIN_WITH_PASSWORD => Self::PrimaryLogin,
            SLAVE_LOCAL_LOGIN_WITH_PASSWORD => Self::SlaveLocalLogin,
            _ => Self::Other,
        }
    }
}

/// Session reference and negotiated version, guarded together so a login
/// racing another dispatch can never be observed half-written.
#[derive(Debug, Default)]
struct SessionState {
    session_reference: Option<OpaqueRef>,
    api_version: ApiVersion,
}

/// A connection to a XenServer host.
///
/// Every binding call takes a `Connection`, composes a JSON-RPC method
/// call, and dispatches it on the connection's client via [`dispatch`].
///
/// [`dispatch`]: Connection::dispatch
#[derive(Debug)]
pub struct Connection {
    client: JsonRpcClient,
    state: RwLock<SessionState>,
}

impl Connection {
    /// Connect to the server at `url` with default timeouts.
    ///
    /// The URL should be of the form `http(s)://host` or
    /// `http(s)://host/jsonrpc`. No network activity happens until the
    /// first dispatch.
    pub fn new(url: Url) -> Result<Self> {
        Ok(Self::with_client(JsonRpcClient::new(url)?))
    }

    /// Wrap a pre-built transport client.
    #[must_use]
    pub fn with_client(client: JsonRpcClient) -> Self {
        Self {
            client,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Connect reusing an already-logged-in session reference.
    ///
    /// No login call is made; the caller is responsible for the session
    /// being valid and for logging it out.
    pub fn with_session(url: Url, session_reference: OpaqueRef) -> Result<Self> {
        let conn = Self::new(url)?;
        conn.state.write().session_reference = Some(session_reference);
        Ok(conn)
    }

    /// Build a connection from a deserialized [`ConnectionConfig`].
    pub fn from_config(config: &ConnectionConfig) -> std::result::Result<Self, ConfigError> {
        let url = Url::parse(&config.url).map_err(|e| ConfigError::InvalidUrl {
            url: config.url.clone(),
            detail: e.to_string(),
        })?;
        let client = JsonRpcClient::with_timeouts(
            url,
            config.request_timeout_secs,
            config.connect_timeout_secs,
        )?;
        let conn = Self::with_client(client);
        if let Some(reference) = &config.session_reference {
            conn.state.write().session_reference = Some(OpaqueRef::new(reference.clone()));
        }
        Ok(conn)
    }

    /// The underlying transport client.
    #[must_use]
    pub fn client(&self) -> &JsonRpcClient {
        &self.client
    }

    /// Mutable access to the underlying transport client.
    pub fn client_mut(&mut self) -> &mut JsonRpcClient {
        &mut self.client
    }

    /// Set the reply timeout for subsequent calls, in seconds.
    pub fn set_request_timeout(&mut self, seconds: u64) {
        self.client.set_request_timeout(seconds);
    }

    /// Set the TCP connect timeout for subsequent calls, in seconds.
    pub fn set_connection_timeout(&mut self, seconds: u64) -> Result<()> {
        self.client.set_connection_timeout(seconds)
    }

    /// The opaque reference of the logged-in session, if any.
    #[must_use]
    pub fn session_reference(&self) -> Option<OpaqueRef> {
        self.state.read().session_reference.clone()
    }

    /// The last-known API version.
    ///
    /// [`ApiVersion::Unknown`] until a login has succeeded (and, for
    /// primary logins, until the pool probe has resolved a version).
    #[must_use]
    pub fn api_version(&self) -> ApiVersion {
        self.state.read().api_version
    }

    /// The session reference as a call parameter.
    ///
    /// Binding calls compose their own parameter lists, so they need the
    /// reference directly. An empty string is sent when no login has
    /// happened; the server answers such calls with a `SESSION_INVALID`
    /// fault.
    #[must_use]
    pub(crate) fn session_param(&self) -> Value {
        json!(
            self.state
                .read()
                .session_reference
                .as_ref()
                .map_or("", OpaqueRef::as_str)
        )
    }

    /// Send a method call to the server and decode its result into `T`.
    ///
    /// The two recognized login methods additionally update session state:
    /// the result's opaque reference becomes the session reference, and
    /// the API version is probed (primary login) or assumed latest
    /// (slave-local login). All other methods pass through unmodified.
    ///
    /// Fails with [`XapiError::Fault`] when the server's `error` envelope
    /// is non-null, with [`XapiError::Http`]/[`XapiError::Json`] when the
    /// round trip itself fails, and with [`XapiError::BadServerResponse`]
    /// when the result payload does not decode into `T`.
    #[instrument(skip_all, fields(method = %method))]
    pub async fn dispatch<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let kind = CallKind::classify(method);
        let result = self.call_raw(method, &params).await?;

        match kind {
            CallKind::PrimaryLogin => {
                let reference = session_reference_from(&result)?;
                debug!(session = %reference, "primary login succeeded");
                {
                    let mut state = self.state.write();
                    state.session_reference = Some(reference);
                    state.api_version = ApiVersion::Unknown;
                }
                // Only an unexpected server shape degrades to Unknown;
                // faults and transport errors during probing propagate.
                match self.probe_api_version().await {
                    Ok(version) => {
                        debug!(%version, "negotiated API version");
                        self.state.write().api_version = version;
                    }
                    Err(XapiError::BadServerResponse { detail }) => {
                        warn!(detail = %detail, "version probe got an unexpected response shape");
                    }
                    Err(e) => return Err(e),
                }
            }
            CallKind::SlaveLocalLogin => {
                let reference = session_reference_from(&result)?;
                debug!(session = %reference, "slave-local login succeeded");
                let mut state = self.state.write();
                state.session_reference = Some(reference);
                state.api_version = ApiVersion::latest();
            }
            CallKind::Other => {}
        }

        XapiError::decode(result)
    }

    /// Send a method call whose result the caller does not need.
    pub async fn dispatch_void(&self, method: &str, params: Value) -> Result<()> {
        let _: Value = self.dispatch(method, params).await?;
        Ok(())
    }

    /// One JSON-RPC round trip: send, surface faults, unwrap the result.
    async fn call_raw(&self, method: &str, params: &Value) -> Result<Value> {
        let envelope = self.client.send(method, params).await?;
        if let Some(error) = envelope.error {
            return Err(XapiError::fault(error));
        }
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Ask the pool for the server's API version.
    ///
    /// Enumerates pool records, takes an arbitrary one, and reads the
    /// major/minor pair off its master host record. An empty pool map
    /// resolves to [`ApiVersion::Unknown`].
    ///
    /// Uses the raw call path rather than [`dispatch`]: these are plain
    /// non-login calls, and dispatching them from inside the login arm
    /// would make the dispatch future recursive.
    ///
    /// [`dispatch`]: Connection::dispatch
    async fn probe_api_version(&self) -> Result<ApiVersion> {
        let session = self.session_param();

        let raw = self
            .call_raw(pool::GET_ALL_RECORDS, &json!([&session]))
            .await?;
        let pools: HashMap<OpaqueRef, PoolRecord> = XapiError::decode(raw)?;

        let Some(record) = pools.into_values().next() else {
            return Ok(ApiVersion::Unknown);
        };

        let raw = self
            .call_raw(host::GET_RECORD, &json!([session, record.master]))
            .await?;
        let master: HostRecord = XapiError::decode(raw)?;

        Ok(ApiVersion::from_major_minor(
            master.api_version_major,
            master.api_version_minor,
        ))
    }
}

/// Extract the opaque session reference from a login result payload.
///
/// The live server returns the reference as a bare string; the envelope
/// form `{"ref": …}` is accepted as well.
fn session_reference_from(result: &Value) -> Result<OpaqueRef> {
    let payload: SessionRef = XapiError::decode(result.clone())?;
    Ok(payload.into_reference())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
