//! The server version reported by `GET /config/server/version`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::decode::strip_xssi_prefix;

/// Gerrit version string, e.g. `2.13.8` or `3.9.1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ServerVersion(String);

impl ServerVersion {
    /// Parse a raw version response body.
    ///
    /// Newer servers answer with a JSON string (`")]}'\n\"3.9.1\""`), older
    /// ones with plain text. Both forms yield the bare version.
    pub fn from_body(body: &str) -> Self {
        let trimmed = strip_xssi_prefix(body).trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed);
        ServerVersion(unquoted.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ServerVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
