use serde_json::Value;

use crate::error::GerritError;
use crate::types::{AuthMethod, Credentials};

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx answers are still responses: whether they are errors is decided
/// by the caller, not the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new<S: Into<String>>(status: u16, body: S) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can carry authenticated requests to a Gerrit server.
///
/// Implementations block until the server answers. Only failures to obtain
/// an answer at all (DNS, refused connection, timeout) are errors.
pub trait Transport {
    /// Issue a `GET` for `url`.
    fn get(
        &self,
        url: &str,
        credentials: &Credentials,
        method: AuthMethod,
    ) -> Result<HttpResponse, GerritError>;

    /// Issue a `POST` to `url` with `body` serialised as JSON.
    fn post_json(
        &self,
        url: &str,
        credentials: &Credentials,
        method: AuthMethod,
        body: &Value,
    ) -> Result<HttpResponse, GerritError>;
}
