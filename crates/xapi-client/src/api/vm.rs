//! `VM` object binding.
//!
//! The representative guest-facing binding; the full generated surface
//! has hundreds of these, all shaped the same way.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use xapi_core::{OpaqueRef, Result};

use crate::connection::Connection;

/// The subset of a VM record these bindings consume.
#[derive(Debug, Clone, Deserialize)]
pub struct VmRecord {
    /// VM UUID.
    #[serde(default)]
    pub uuid: String,
    /// Human-readable VM name.
    #[serde(default)]
    pub name_label: String,
    /// Power state as reported by the server (`Running`, `Halted`, …).
    #[serde(default)]
    pub power_state: String,
    /// Template flag; templates show up in `get_all_records` too.
    #[serde(default)]
    pub is_a_template: bool,
}

/// The `VM` class.
pub struct Vm;

impl Vm {
    /// Fetch references to all VMs known to the server.
    pub async fn get_all(conn: &Connection) -> Result<Vec<OpaqueRef>> {
        conn.dispatch("VM.get_all", json!([conn.session_param()]))
            .await
    }

    /// Fetch all VM records, keyed by opaque reference.
    pub async fn get_all_records(conn: &Connection) -> Result<HashMap<OpaqueRef, VmRecord>> {
        conn.dispatch("VM.get_all_records", json!([conn.session_param()]))
            .await
    }
}
