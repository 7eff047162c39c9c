//! HTTP authentication schemes understood by Gerrit.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The authentication scheme a client settled on while probing the server.
///
/// Probing always tries `Basic` first and only falls back to `Digest`
/// (older Gerrit installations) when basic credentials are rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuthMethod {
    Basic,
    Digest,
}

impl AuthMethod {
    /// The order in which schemes are probed.
    pub const PROBE_ORDER: [AuthMethod; 2] = [AuthMethod::Basic, AuthMethod::Digest];
}
