//! Content-addressed report identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters kept from the digest.
const ID_LEN: usize = 16;

/// Identifier of a generated report.
///
/// Derived from the normalized team name, the report mode and the match
/// window, so regenerating the same report yields the same ID.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Team names are compared case-insensitively, so "sentinels" and
    /// "Sentinels " share an ID for the same mode and window.
    pub fn for_report(team_name: &str, mode: &str, last_n: usize) -> Self {
        let team = team_name.trim().to_lowercase();
        Self(digest(&["report", &team, mode, &last_n.to_string()]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `|`-joined SHA256 of `parts`, truncated to `ID_LEN` hex characters.
fn digest(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    let mut hash = hex::encode(hasher.finalize());
    hash.truncate(ID_LEN);
    hash
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportId({})", self.0)
    }
}
