//! `host` object binding.

use serde::Deserialize;
use serde_json::json;

use xapi_core::{OpaqueRef, Result};

use crate::connection::Connection;

/// Wire name of the host record fetch method.
pub(crate) const GET_RECORD: &str = "host.get_record";

/// The subset of a host record these bindings consume.
///
/// The API version pair is required — it is the whole point of fetching
/// the master record during probing.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRecord {
    /// Host UUID.
    #[serde(default)]
    pub uuid: String,
    /// Host's own hostname.
    #[serde(default)]
    pub hostname: String,
    /// Human-readable host name.
    #[serde(default)]
    pub name_label: String,
    /// Major component of the host's API version.
    #[serde(rename = "API_version_major")]
    pub api_version_major: i64,
    /// Minor component of the host's API version.
    #[serde(rename = "API_version_minor")]
    pub api_version_minor: i64,
    /// Vendor string accompanying the version pair.
    #[serde(rename = "API_version_vendor", default)]
    pub api_version_vendor: String,
}

/// The `host` class.
pub struct Host;

impl Host {
    /// Fetch one host's record by reference.
    pub async fn get_record(conn: &Connection, host: &OpaqueRef) -> Result<HostRecord> {
        conn.dispatch(GET_RECORD, json!([conn.session_param(), host]))
            .await
    }
}
