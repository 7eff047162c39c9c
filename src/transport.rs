//! Blocking HTTP transport built on `reqwest`, speaking Basic and Digest auth.

use std::time::Duration;

use digest_auth::AuthContext;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::GerritError;
use crate::traits::{HttpResponse, Transport};
use crate::types::{AuthMethod, Credentials};

const USER_AGENT: &str = concat!("gerrit-tools/", env!("CARGO_PKG_VERSION"));

/// The default [`Transport`], one blocking `reqwest` client per instance.
///
/// Digest auth is challenge/response: the request is first sent without
/// credentials, and if the server answers `401` with a digest challenge it
/// is answered and the request is sent again.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport. With `timeout` set to `None` requests never time out.
    pub fn new(timeout: Option<Duration>) -> Result<Self, GerritError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpTransport { client })
    }

    fn request(&self, method: Method, url: &str, body: Option<&Value>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        credentials: &Credentials,
        auth: AuthMethod,
        body: Option<&Value>,
    ) -> Result<HttpResponse, GerritError> {
        debug!(event = "Http", phase = "Request", method = %method, url, auth = %auth);

        let response = match auth {
            AuthMethod::Basic => self
                .request(method, url, body)
                .basic_auth(credentials.username(), Some(credentials.password()))
                .send()?,
            AuthMethod::Digest => self.send_digest(method, url, credentials, body)?,
        };

        let response = into_http_response(response)?;
        debug!(event = "Http", phase = "Response", url, status = response.status);
        Ok(response)
    }

    fn send_digest(
        &self,
        method: Method,
        url: &str,
        credentials: &Credentials,
        body: Option<&Value>,
    ) -> Result<Response, GerritError> {
        let first = self.request(method.clone(), url, body).send()?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let Some(challenge) = digest_challenge(&first)? else {
            debug!(event = "Http", phase = "Digest", url, "no digest challenge offered");
            return Ok(first);
        };

        let mut prompt = digest_auth::parse(&challenge)?;
        let uri = request_uri(url)?;
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| GerritError::Transport(e.to_string()))?;
        let context = match &payload {
            Some(bytes) => AuthContext::new_post(
                credentials.username(),
                credentials.password(),
                uri.as_str(),
                Some(bytes.as_slice()),
            ),
            None => AuthContext::new(credentials.username(), credentials.password(), uri.as_str()),
        };
        let answer = prompt.respond(&context)?;

        Ok(self
            .request(method, url, body)
            .header(AUTHORIZATION, answer.to_header_string())
            .send()?)
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        credentials: &Credentials,
        method: AuthMethod,
    ) -> Result<HttpResponse, GerritError> {
        self.send(Method::GET, url, credentials, method, None)
    }

    fn post_json(
        &self,
        url: &str,
        credentials: &Credentials,
        method: AuthMethod,
        body: &Value,
    ) -> Result<HttpResponse, GerritError> {
        self.send(Method::POST, url, credentials, method, Some(body))
    }
}

fn into_http_response(response: Response) -> Result<HttpResponse, GerritError> {
    let status = response.status().as_u16();
    let body = response.text()?;
    Ok(HttpResponse { status, body })
}

/// The first `WWW-Authenticate` value offering the Digest scheme.
fn digest_challenge(response: &Response) -> Result<Option<String>, GerritError> {
    for value in response.headers().get_all(WWW_AUTHENTICATE) {
        let value = value.to_str()?;
        if is_digest_challenge(value) {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn is_digest_challenge(value: &str) -> bool {
    value
        .trim_start()
        .get(..6)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
}

/// Path plus query of `url`, the `uri` a digest response is computed over.
fn request_uri(url: &str) -> Result<String, GerritError> {
    let parsed = Url::parse(url)?;
    let mut uri = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        uri.push('?');
        uri.push_str(query);
    }
    Ok(uri)
}
