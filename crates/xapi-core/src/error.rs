//! Error hierarchy for the XAPI bindings.
//!
//! Two broad kinds exist at the dispatch boundary:
//!
//! - [`XapiError::Fault`]: the server answered with a non-null `error`
//!   envelope. The message is the stringified payload, mirroring what the
//!   server sent.
//! - Transport/codec faults ([`XapiError::Http`], [`XapiError::Json`]): the
//!   request or response could not be sent, received, or parsed as JSON.
//!
//! [`XapiError::BadServerResponse`] sits in between: the envelope was valid
//! JSON but did not have the shape the caller asked for. It is the one
//! fault kind that API-version probing recovers from; everywhere else it
//! propagates like any other error.

use serde_json::Value;
use thiserror::Error;

/// Result alias used throughout the bindings.
pub type Result<T> = std::result::Result<T, XapiError>;

/// Errors surfaced by the XAPI bindings.
#[derive(Debug, Error)]
pub enum XapiError {
    /// The server returned a non-null `error` envelope.
    #[error("API fault: {message}")]
    Fault {
        /// Stringified form of the server's error payload.
        message: String,
        /// The raw error payload as the server sent it.
        payload: Value,
    },

    /// The response was valid JSON but not the shape the caller requested.
    #[error("unexpected server response: {detail}")]
    BadServerResponse {
        /// What failed to decode, with the serde error text.
        detail: String,
    },

    /// The request could not be sent or the response not received.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("invalid JSON-RPC payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl XapiError {
    /// Build a [`XapiError::Fault`] from a server error payload.
    ///
    /// Bare JSON strings are unquoted so `"SESSION_INVALID"` faults read
    /// the way xapi prints them; everything else keeps its JSON form.
    #[must_use]
    pub fn fault(payload: Value) -> Self {
        let message = match &payload {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self::Fault { message, payload }
    }

    /// Decode a JSON value into `T`, mapping shape mismatches to
    /// [`XapiError::BadServerResponse`].
    pub fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Self::BadServerResponse {
            detail: e.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
