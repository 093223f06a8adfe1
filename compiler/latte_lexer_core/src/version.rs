//! Latte language versions.
//!
//! The active version is detected by the host (from `composer.lock` and
//! friends) and passed into every scanner call. It only changes which
//! constructs count as errors, never the shape of the token stream.

use std::fmt;
use std::str::FromStr;

/// A Latte release line the templates are written against.
///
/// Ordered by release: `V2x < V3x < V3_1 < V4_0 < V4x`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum LatteVersion {
    /// Latte 2.x.
    V2x,
    /// Latte 3.0.x.
    #[default]
    V3x,
    /// Latte 3.1.
    V3_1,
    /// Latte 4.0.
    V4_0,
    /// Latte 4.x after 4.0.
    V4x,
}

impl LatteVersion {
    /// All versions, oldest first.
    pub const ALL: [LatteVersion; 5] = [
        LatteVersion::V2x,
        LatteVersion::V3x,
        LatteVersion::V3_1,
        LatteVersion::V4_0,
        LatteVersion::V4x,
    ];

    #[inline]
    pub fn is_at_least(self, other: LatteVersion) -> bool {
        self >= other
    }

    /// Returns `true` for the 2.x line.
    #[inline]
    pub fn is_legacy(self) -> bool {
        self == LatteVersion::V2x
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LatteVersion::V2x => "2.x",
            LatteVersion::V3x => "3.x",
            LatteVersion::V3_1 => "3.1",
            LatteVersion::V4_0 => "4.0",
            LatteVersion::V4x => "4.x",
        }
    }
}

impl fmt::Display for LatteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized version string.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown Latte version `{0}` (expected 2.x, 3.x, 3.1, 4.0 or 4.x)")]
pub struct ParseVersionError(pub String);

impl FromStr for LatteVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" | "2.x" => Ok(LatteVersion::V2x),
            "3" | "3.0" | "3.x" => Ok(LatteVersion::V3x),
            "3.1" => Ok(LatteVersion::V3_1),
            "4.0" => Ok(LatteVersion::V4_0),
            "4" | "4.x" => Ok(LatteVersion::V4x),
            other => Err(ParseVersionError(other.to_owned())),
        }
    }
}
