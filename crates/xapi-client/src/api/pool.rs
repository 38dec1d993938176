//! `pool` object binding.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use xapi_core::{OpaqueRef, Result};

use crate::connection::Connection;

/// Wire name of the pool enumeration method.
pub(crate) const GET_ALL_RECORDS: &str = "pool.get_all_records";

/// The subset of a pool record these bindings consume.
///
/// `master` is required — version probing is meaningless without it — and
/// the rest defaults so partial records still decode.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolRecord {
    /// Pool UUID.
    #[serde(default)]
    pub uuid: String,
    /// Human-readable pool name.
    #[serde(default)]
    pub name_label: String,
    /// Reference to the pool master host.
    pub master: OpaqueRef,
}

/// The `pool` class.
pub struct Pool;

impl Pool {
    /// Fetch all pool records, keyed by opaque reference.
    ///
    /// A pool has exactly one record in practice; the map shape follows
    /// the wire API.
    pub async fn get_all_records(conn: &Connection) -> Result<HashMap<OpaqueRef, PoolRecord>> {
        conn.dispatch(GET_ALL_RECORDS, json!([conn.session_param()]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_decodes_with_unknown_fields_ignored() {
        let record: PoolRecord = serde_json::from_value(json!({
            "uuid": "p",
            "name_label": "prod",
            "master": "OpaqueRef:h",
            "ha_enabled": true,
            "other_config": {}
        }))
        .unwrap();
        assert_eq!(record.master.as_str(), "OpaqueRef:h");
        assert_eq!(record.name_label, "prod");
    }

    #[test]
    fn record_without_master_is_rejected() {
        assert!(serde_json::from_value::<PoolRecord>(json!({"uuid": "p"})).is_err());
    }
}
