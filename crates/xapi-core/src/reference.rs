//! Opaque server-issued references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque reference handed out by the server (`OpaqueRef:…`).
///
/// XAPI identifies every object — sessions included — by one of these.
/// The contents are meaningful only to the server; clients pass them back
/// verbatim as call parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueRef(String);

impl OpaqueRef {
    /// Wrap a raw reference string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper, returning the raw string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OpaqueRef {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for OpaqueRef {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_is_transparent() {
        let r: OpaqueRef = serde_json::from_str("\"OpaqueRef:abc\"").unwrap();
        assert_eq!(r.as_str(), "OpaqueRef:abc");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"OpaqueRef:abc\"");
    }

    #[test]
    fn display_is_raw_string() {
        assert_eq!(OpaqueRef::new("OpaqueRef:x").to_string(), "OpaqueRef:x");
    }
}
