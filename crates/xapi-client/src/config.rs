//! Connection configuration.
//!
//! [`ConnectionConfig`] is the serde-friendly surface for wiring a
//! [`Connection`](crate::Connection) from a settings file: target URL,
//! the two timeouts, and an optional pre-existing session reference.
//! Defaults match the transport's (600 s reply, 5 s connect).

use serde::Deserialize;
use thiserror::Error;

use xapi_core::XapiError;

use crate::rpc::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Errors building a connection from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured server URL did not parse.
    #[error("invalid server URL `{url}`: {detail}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Parser error text.
        detail: String,
    },

    /// The transport client could not be built.
    #[error(transparent)]
    Client(#[from] XapiError),
}

/// Declarative connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Server URL, `http(s)://host` or `http(s)://host/jsonrpc`.
    pub url: String,

    /// Reply timeout for JSON-RPC calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Reference to an already-logged-in session to reuse.
    #[serde(default)]
    pub session_reference: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_default_timeouts() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"url": "https://xen.example.com"}"#).unwrap();
        assert_eq!(config.request_timeout_secs, 600);
        assert_eq!(config.connect_timeout_secs, 5);
        assert!(config.session_reference.is_none());
    }

    #[test]
    fn full_config_round_trips() {
        let config: ConnectionConfig = serde_json::from_str(
            r#"{
                "url": "https://xen.example.com/jsonrpc",
                "request_timeout_secs": 60,
                "connect_timeout_secs": 2,
                "session_reference": "OpaqueRef:resumed"
            }"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 2);
        assert_eq!(config.session_reference.as_deref(), Some("OpaqueRef:resumed"));
    }
}
