//! `session` object binding: login and logout.

use serde::Deserialize;
use serde_json::json;

use xapi_core::{OpaqueRef, Result};

use crate::connection::{Connection, LOGIN_WITH_PASSWORD, SLAVE_LOCAL_LOGIN_WITH_PASSWORD};

/// Wire name of the logout method.
const LOGOUT: &str = "session.logout";

/// A login result payload.
///
/// The live server returns the bare opaque reference; some frontends wrap
/// it as `{"ref": …}`. Both decode here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionRef {
    /// Bare opaque-reference string.
    Reference(OpaqueRef),
    /// Object form with a `ref` field.
    Object {
        /// The session's opaque reference.
        #[serde(rename = "ref")]
        reference: OpaqueRef,
    },
}

impl SessionRef {
    /// The opaque reference, whichever form it arrived in.
    #[must_use]
    pub fn into_reference(self) -> OpaqueRef {
        match self {
            Self::Reference(reference) | Self::Object { reference } => reference,
        }
    }
}

/// The `session` class.
pub struct Session;

impl Session {
    /// Log in to the pool master with a username and password.
    ///
    /// On success the connection stores the new session reference and
    /// probes the pool for its API version as a dispatch side effect.
    pub async fn login_with_password(
        conn: &Connection,
        username: &str,
        password: &str,
    ) -> Result<OpaqueRef> {
        let payload: SessionRef = conn
            .dispatch(LOGIN_WITH_PASSWORD, json!([username, password]))
            .await?;
        Ok(payload.into_reference())
    }

    /// Log in to a slave host's local emergency-mode API.
    ///
    /// Slaves cannot be probed, so the connection assumes the latest
    /// known API version.
    pub async fn slave_local_login_with_password(
        conn: &Connection,
        username: &str,
        password: &str,
    ) -> Result<OpaqueRef> {
        let payload: SessionRef = conn
            .dispatch(SLAVE_LOCAL_LOGIN_WITH_PASSWORD, json!([username, password]))
            .await?;
        Ok(payload.into_reference())
    }

    /// Log out the connection's current session.
    ///
    /// The connection keeps its (now stale) reference; this layer does
    /// not track logout.
    pub async fn logout(conn: &Connection) -> Result<()> {
        conn.dispatch_void(LOGOUT, json!([conn.session_param()]))
            .await
    }
}
