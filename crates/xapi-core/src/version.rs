//! XAPI version constants.
//!
//! Servers report their API version as a major/minor pair on the master
//! host record. The pair gates feature availability in the bindings, so it
//! is modelled as an ordered enum rather than raw integers: comparing two
//! versions follows release order, and [`ApiVersion::Unknown`] is the
//! sentinel used before a login has probed the server (or when probing
//! failed).

use std::fmt;

/// A known XAPI version, or [`ApiVersion::Unknown`].
///
/// Declaration order is release order; `Unknown` is declared last so it
/// compares greater than every known version, matching the original SDK's
/// enum ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    /// API version 1.1.
    V1_1,
    /// API version 1.2.
    V1_2,
    /// API version 1.3.
    V1_3,
    /// API version 1.6.
    V1_6,
    /// API version 1.7.
    V1_7,
    /// API version 1.8.
    V1_8,
    /// API version 1.9.
    V1_9,
    /// API version 1.10.
    V1_10,
    /// API version 2.0.
    V2_0,
    /// API version 2.1.
    V2_1,
    /// API version 2.2.
    V2_2,
    /// API version 2.3.
    V2_3,
    /// API version 2.4.
    V2_4,
    /// API version 2.5.
    V2_5,
    /// API version 2.6.
    V2_6,
    /// API version 2.7.
    V2_7,
    /// API version 2.8.
    V2_8,
    /// API version 2.9.
    V2_9,
    /// API version 2.10.
    V2_10,
    /// API version 2.11.
    V2_11,
    /// API version 2.12.
    V2_12,
    /// API version 2.13.
    V2_13,
    /// API version 2.14.
    V2_14,
    /// API version 2.15.
    V2_15,
    /// API version 2.16.
    V2_16,
    /// API version 2.20.
    V2_20,
    /// API version 2.21.
    V2_21,
    /// No version negotiated yet, or the server's pair was not recognized.
    #[default]
    Unknown,
}

impl ApiVersion {
    /// Map a server-reported major/minor pair to a version constant.
    ///
    /// Unrecognized pairs map to [`ApiVersion::Unknown`].
    #[must_use]
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        match (major, minor) {
            (1, 1) => Self::V1_1,
            (1, 2) => Self::V1_2,
            (1, 3) => Self::V1_3,
            (1, 6) => Self::V1_6,
            (1, 7) => Self::V1_7,
            (1, 8) => Self::V1_8,
            (1, 9) => Self::V1_9,
            (1, 10) => Self::V1_10,
            (2, 0) => Self::V2_0,
            (2, 1) => Self::V2_1,
            (2, 2) => Self::V2_2,
            (2, 3) => Self::V2_3,
            (2, 4) => Self::V2_4,
            (2, 5) => Self::V2_5,
            (2, 6) => Self::V2_6,
            (2, 7) => Self::V2_7,
            (2, 8) => Self::V2_8,
            (2, 9) => Self::V2_9,
            (2, 10) => Self::V2_10,
            (2, 11) => Self::V2_11,
            (2, 12) => Self::V2_12,
            (2, 13) => Self::V2_13,
            (2, 14) => Self::V2_14,
            (2, 15) => Self::V2_15,
            (2, 16) => Self::V2_16,
            (2, 20) => Self::V2_20,
            (2, 21) => Self::V2_21,
            _ => Self::Unknown,
        }
    }

    /// The most recent version these bindings know about.
    ///
    /// Slave-local logins cannot probe the pool, so they assume this.
    #[must_use]
    pub fn latest() -> Self {
        Self::V2_21
    }

    /// The major/minor pair, or `None` for [`ApiVersion::Unknown`].
    #[must_use]
    pub fn major_minor(self) -> Option<(i64, i64)> {
        match self {
            Self::V1_1 => Some((1, 1)),
            Self::V1_2 => Some((1, 2)),
            Self::V1_3 => Some((1, 3)),
            Self::V1_6 => Some((1, 6)),
            Self::V1_7 => Some((1, 7)),
            Self::V1_8 => Some((1, 8)),
            Self::V1_9 => Some((1, 9)),
            Self::V1_10 => Some((1, 10)),
            Self::V2_0 => Some((2, 0)),
            Self::V2_1 => Some((2, 1)),
            Self::V2_2 => Some((2, 2)),
            Self::V2_3 => Some((2, 3)),
            Self::V2_4 => Some((2, 4)),
            Self::V2_5 => Some((2, 5)),
            Self::V2_6 => Some((2, 6)),
            Self::V2_7 => Some((2, 7)),
            Self::V2_8 => Some((2, 8)),
            Self::V2_9 => Some((2, 9)),
            Self::V2_10 => Some((2, 10)),
            Self::V2_11 => Some((2, 11)),
            Self::V2_12 => Some((2, 12)),
            Self::V2_13 => Some((2, 13)),
            Self::V2_14 => Some((2, 14)),
            Self::V2_15 => Some((2, 15)),
            Self::V2_16 => Some((2, 16)),
            Self::V2_20 => Some((2, 20)),
            Self::V2_21 => Some((2, 21)),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.major_minor() {
            Some((major, minor)) => write!(f, "{major}.{minor}"),
            None => f.write_str("unknown"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_minor_known_pair() {
        assert_eq!(ApiVersion::from_major_minor(2, 21), ApiVersion::V2_21);
        assert_eq!(ApiVersion::from_major_minor(1, 1), ApiVersion::V1_1);
    }

    #[test]
    fn from_major_minor_unrecognized_pair_is_unknown() {
        assert_eq!(ApiVersion::from_major_minor(2, 17), ApiVersion::Unknown);
        assert_eq!(ApiVersion::from_major_minor(99, 0), ApiVersion::Unknown);
        assert_eq!(ApiVersion::from_major_minor(-1, 5), ApiVersion::Unknown);
    }

    #[test]
    fn ordering_follows_release_order() {
        assert!(ApiVersion::V1_1 < ApiVersion::V1_10);
        assert!(ApiVersion::V1_10 < ApiVersion::V2_0);
        assert!(ApiVersion::V2_20 < ApiVersion::V2_21);
    }

    #[test]
    fn unknown_sorts_above_every_known_version() {
        assert!(ApiVersion::Unknown > ApiVersion::latest());
    }

    #[test]
    fn latest_is_highest_known() {
        assert_eq!(ApiVersion::latest(), ApiVersion::V2_21);
        assert_eq!(ApiVersion::latest().major_minor(), Some((2, 21)));
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(ApiVersion::default(), ApiVersion::Unknown);
    }

    #[test]
    fn display_forms() {
        assert_eq!(ApiVersion::V2_14.to_string(), "2.14");
        assert_eq!(ApiVersion::Unknown.to_string(), "unknown");
    }

    #[test]
    fn round_trips_through_major_minor() {
        let (major, minor) = ApiVersion::V2_8.major_minor().unwrap();
        assert_eq!(ApiVersion::from_major_minor(major, minor), ApiVersion::V2_8);
    }
}
