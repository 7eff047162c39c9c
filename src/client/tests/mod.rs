use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use yare::parameterized;

use super::*;
use crate::decode::XSSI_PREFIX;
use crate::traits::HttpResponse;
use crate::types::Credentials;

const ROOT_URL: &str = "https://review.example.com/";
const VERSION_URL: &str = "https://review.example.com/a/config/server/version";
const GROUPS_URL: &str = "https://review.example.com/a/groups/";
const PROJECTS_URL: &str = "https://review.example.com/a/projects/";

#[derive(Debug, Clone, PartialEq)]
struct RecordedRequest {
    method: &'static str,
    url: String,
    auth: AuthMethod,
    username: String,
    body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Unreachable,
}

/// In-memory Gerrit: answers the version probe for the accepted schemes and
/// serves canned bodies by URL. Unknown URLs get Gerrit's plain-text 404.
#[derive(Debug, Default)]
struct MockTransport {
    accepted: Vec<AuthMethod>,
    unreachable: bool,
    routes: HashMap<String, Reply>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockTransport {
    fn accepting(methods: &[AuthMethod]) -> Self {
        MockTransport {
            accepted: methods.to_vec(),
            ..Default::default()
        }
    }

    fn unreachable() -> Self {
        MockTransport {
            unreachable: true,
            ..Default::default()
        }
    }

    /// Serve `body` as Gerrit JSON (prefixed) at `url`.
    fn with_json(mut self, url: &str, body: Value) -> Self {
        self.routes.insert(
            url.to_string(),
            Reply::Respond(HttpResponse::new(200, format!("{XSSI_PREFIX}{body}"))),
        );
        self
    }

    fn with_raw(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Reply::Respond(HttpResponse::new(status, body)));
        self
    }

    fn with_unreachable(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Reply::Unreachable);
        self
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        credentials: &Credentials,
        auth: AuthMethod,
        body: Option<&Value>,
    ) {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: url.to_string(),
            auth,
            username: credentials.username().to_string(),
            body: body.cloned(),
        });
    }

    fn reply(&self, url: &str, auth: AuthMethod) -> Result<HttpResponse> {
        if self.unreachable {
            return Err(GerritError::Transport("connection refused".to_string()));
        }
        if url == VERSION_URL {
            return Ok(if self.accepted.contains(&auth) {
                HttpResponse::new(200, format!("{XSSI_PREFIX}\"3.9.1\""))
            } else {
                HttpResponse::new(401, "Unauthorized")
            });
        }
        match self.routes.get(url) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Unreachable) => Err(GerritError::Transport("connection reset".to_string())),
            None => Ok(HttpResponse::new(404, "Not found\n")),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }

    /// Requests issued after the auth probe.
    fn calls(&self) -> Vec<RecordedRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url != VERSION_URL)
            .cloned()
            .collect()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, credentials: &Credentials, method: AuthMethod) -> Result<HttpResponse> {
        self.record("GET", url, credentials, method, None);
        self.reply(url, method)
    }

    fn post_json(
        &self,
        url: &str,
        credentials: &Credentials,
        method: AuthMethod,
        body: &Value,
    ) -> Result<HttpResponse> {
        self.record("POST", url, credentials, method, Some(body));
        self.reply(url, method)
    }
}

#[derive(Clone)]
struct SharedLogBuffer(Arc<Mutex<Vec<u8>>>);

struct SharedLogWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(Arc::clone(&self.0))
    }
}

impl std::io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let sink = SharedLogBuffer(Arc::new(Mutex::new(Vec::new())));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(sink.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tracing::callsite::rebuild_interest_cache();
        f()
    });
    let logs = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}

fn test_config() -> GerritConfig {
    GerritConfig::new(ROOT_URL, "alice", "secret").expect("config should build")
}

fn client_with(transport: MockTransport) -> GerritClient<MockTransport> {
    GerritClient::with_transport(test_config(), transport).expect("client should authenticate")
}

fn basic_transport() -> MockTransport {
    MockTransport::accepting(&[AuthMethod::Basic])
}

fn group_url(group_id: &str) -> String {
    format!("{GROUPS_URL}{group_id}")
}

fn access_url(encoded_project: &str) -> String {
    format!("{PROJECTS_URL}{encoded_project}/access")
}

include!("probe.rs");
include!("groups.rs");
include!("owners.rs");
