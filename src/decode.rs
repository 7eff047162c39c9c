use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;

use crate::error::GerritError;
use crate::traits::HttpResponse;

/// Gerrit prepends this to every JSON body to defeat cross-site script inclusion.
pub const XSSI_PREFIX: &str = ")]}'\n";

/// Characters left as-is when encoding a project name or group id. Everything
/// else, `/` included, is percent-encoded.
const PATH_SEGMENT_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Remove the anti-XSSI prefix from the start of `body`.
///
/// Only an exact match at position 0 is removed; a body without the prefix,
/// or with it somewhere later, is returned unchanged.
pub fn strip_xssi_prefix(body: &str) -> &str {
    body.strip_prefix(XSSI_PREFIX).unwrap_or(body)
}

/// Strip the prefix from a response fetched from `url` and decode it as JSON.
pub fn decode_json<T: DeserializeOwned>(url: &str, response: &HttpResponse) -> Result<T, GerritError> {
    serde_json::from_str(strip_xssi_prefix(&response.body)).map_err(|e| GerritError::Decode {
        url: url.to_string(),
        status: response.status,
        message: e.to_string(),
    })
}

/// Percent-encode a project name for use as a single URL path segment.
///
/// Example:
/// ```rust
/// use gerrit_tools::encode_project_name;
/// assert_eq!(encode_project_name("webos-pro/audiod"), "webos-pro%2Faudiod");
/// ```
pub fn encode_project_name(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT_SAFE).to_string()
}

/// Percent-encode a group name, UUID or numeric id as a single URL path
/// segment. Pass ids unencoded; they are encoded exactly once.
pub fn encode_group_id(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT_SAFE).to_string()
}
