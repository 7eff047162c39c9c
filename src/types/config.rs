//! Connection settings for a Gerrit instance.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{GerritError, Result};

/// Username and password presented to the server.
///
/// The password is held as a [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Credentials {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Where and how to reach a Gerrit server.
///
/// All REST endpoints live below the authenticated prefix `{root}a/`.
#[derive(Debug)]
pub struct GerritConfig {
    root_url: String,
    credentials: Credentials,
    timeout: Option<Duration>,
}

impl GerritConfig {
    /// Build a configuration for the server at `root_url`.
    ///
    /// The root URL must be absolute (`http` or `https`). A trailing `/` is
    /// added when missing so the derived endpoint URLs join cleanly.
    pub fn new<R, U, P>(root_url: R, username: U, password: P) -> Result<Self>
    where
        R: AsRef<str>,
        U: Into<String>,
        P: Into<String>,
    {
        let parsed = Url::parse(root_url.as_ref())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GerritError::InvalidUrl(format!(
                "unsupported scheme '{}' in '{}'",
                parsed.scheme(),
                root_url.as_ref()
            )));
        }

        let mut root_url = root_url.as_ref().to_string();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }

        Ok(GerritConfig {
            root_url,
            credentials: Credentials::new(username, password),
            timeout: None,
        })
    }

    /// Bound every request to `timeout`. Requests block indefinitely otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn api_root_url(&self) -> String {
        format!("{}a/", self.root_url)
    }

    pub fn projects_url(&self) -> String {
        format!("{}projects/", self.api_root_url())
    }

    pub fn groups_url(&self) -> String {
        format!("{}groups/", self.api_root_url())
    }

    pub fn version_url(&self) -> String {
        format!("{}config/server/version", self.api_root_url())
    }
}

impl Display for GerritConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}@{}", self.credentials.username, self.root_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        with_slash = { "https://review.example.com/" },
        without_slash = { "https://review.example.com" },
    )]
    fn test_root_url_normalized(root: &str) {
        let config = GerritConfig::new(root, "alice", "secret").unwrap();
        assert_eq!(config.root_url(), "https://review.example.com/");
        assert_eq!(config.api_root_url(), "https://review.example.com/a/");
    }

    #[test]
    fn test_derived_urls() {
        let config = GerritConfig::new("http://gerrit.local:8080/r/", "alice", "secret").unwrap();
        assert_eq!(config.projects_url(), "http://gerrit.local:8080/r/a/projects/");
        assert_eq!(config.groups_url(), "http://gerrit.local:8080/r/a/groups/");
        assert_eq!(
            config.version_url(),
            "http://gerrit.local:8080/r/a/config/server/version"
        );
    }

    #[parameterized(
        not_a_url = { "review.example.com" },
        ftp_scheme = { "ftp://review.example.com/" },
        empty = { "" },
    )]
    fn test_invalid_root_url(root: &str) {
        let result = GerritConfig::new(root, "alice", "secret");
        assert!(matches!(result, Err(GerritError::InvalidUrl(_))));
    }

    #[test]
    fn test_password_is_redacted() {
        let config = GerritConfig::new("https://review.example.com", "alice", "hunter2").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(config.to_string(), "alice@https://review.example.com/");
        assert_eq!(config.credentials().password(), "hunter2");
    }

    #[test]
    fn test_timeout_defaults_to_none() {
        let config = GerritConfig::new("https://review.example.com", "alice", "secret").unwrap();
        assert_eq!(config.timeout(), None);
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }
}
