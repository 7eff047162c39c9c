use serde_json::{Value, json};
use tracing::{Span, debug, error, info, info_span, warn};

use crate::{
    decode::{decode_json, encode_group_id, encode_project_name, strip_xssi_prefix},
    error::{GerritError, Result},
    traits::Transport,
    transport::HttpTransport,
    types::{AuthMethod, GerritConfig, ProjectAccessInfo, ProjectOwners, ServerVersion},
};

/// An authenticated handle on one Gerrit server.
///
/// Construction probes the server to find a working auth scheme, so a
/// `GerritClient` that exists is known to have valid credentials. Every
/// operation issues blocking requests, one at a time.
pub struct GerritClient<T = HttpTransport> {
    config: GerritConfig,
    transport: T,
    auth_method: AuthMethod,
    server_version: ServerVersion,
    span: Span,
}

impl GerritClient<HttpTransport> {
    /// Connect over HTTP, honouring the configured timeout.
    pub fn connect(config: GerritConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> GerritClient<T> {
    /// Connect through `transport`.
    ///
    /// Probes `GET a/config/server/version` with Basic auth, then with Digest
    /// auth. The first scheme the server accepts is kept for every later
    /// call. Fails with [`GerritError::Authentication`] when neither works,
    /// whether the server rejected the credentials or could not be reached.
    pub fn with_transport(config: GerritConfig, transport: T) -> Result<Self> {
        let span = info_span!("gerrit", root = config.root_url(), user = config.username());
        let (auth_method, server_version) = span.in_scope(|| probe(&config, &transport))?;

        Ok(GerritClient {
            config,
            transport,
            auth_method,
            server_version,
            span,
        })
    }

    pub fn config(&self) -> &GerritConfig {
        &self.config
    }

    /// The scheme chosen while probing.
    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn server_version(&self) -> &ServerVersion {
        &self.server_version
    }

    /// Log where this client points. The password is never logged.
    pub fn log_info(&self) {
        let _enter = self.span.enter();
        info!(
            event = "Client",
            root_url = self.config.root_url(),
            username = self.config.username(),
            projects_url = %self.config.projects_url(),
            groups_url = %self.config.groups_url(),
            auth = %self.auth_method,
            version = %self.server_version
        );
    }

    /// Fetch `GET a/groups/{group_id}{api_suffix}`.
    ///
    /// `group_id` is percent-encoded as one path segment, so names with spaces
    /// or `/` work. `api_suffix` is appended verbatim, e.g. `/detail` or `/owner`.
    pub fn get_group_info(&self, group_id: &str, api_suffix: &str) -> Result<Value> {
        let _enter = self.span.enter();
        let url = format!(
            "{}{}{}",
            self.config.groups_url(),
            encode_group_id(group_id),
            api_suffix
        );
        debug!(event = "Group", phase = "Fetch", group = group_id, url = url.as_str());

        let response = self
            .transport
            .get(&url, self.config.credentials(), self.auth_method)?;
        decode_json(&url, &response)
    }

    /// Fetch the members of a group. Pass `?recursive` as `api_suffix` to
    /// expand included groups.
    pub fn get_members_from_group(&self, group_id: &str, api_suffix: &str) -> Result<Value> {
        self.get_group_info(group_id, &format!("/members/{api_suffix}"))
    }

    /// Add members to a group with `POST a/groups/{group_id}/members/`.
    ///
    /// `members` is sent as the `members` field: a single account identifier
    /// or a list of them.
    pub fn add_member_to_group(&self, group_id: &str, members: Value) -> Result<Value> {
        let _enter = self.span.enter();
        let url = format!(
            "{}{}/members/",
            self.config.groups_url(),
            encode_group_id(group_id)
        );
        let body = json!({ "members": members });
        info!(event = "Group", phase = "AddMember", group = group_id, members = %body["members"]);

        let response =
            self.transport
                .post_json(&url, self.config.credentials(), self.auth_method, &body)?;
        decode_json(&url, &response)
    }

    /// Resolve the owner groups of every refspec the caller can see on
    /// `project_name`.
    ///
    /// Refspecs listed in `owner_of` without a local `owner` permission are
    /// skipped with a warning. If the access payload cannot be decoded the
    /// status and body are logged and an empty result is returned. Transport
    /// errors and failures resolving an owner group are returned.
    pub fn get_project_owners(&self, project_name: &str) -> Result<ProjectOwners> {
        let _enter = self.span.enter();
        let url = format!(
            "{}{}/access",
            self.config.projects_url(),
            encode_project_name(project_name)
        );
        debug!(event = "Owners", phase = "Fetch", project = project_name, url = url.as_str());

        let response = self
            .transport
            .get(&url, self.config.credentials(), self.auth_method)?;
        let access: ProjectAccessInfo = match decode_json(&url, &response) {
            Ok(access) => access,
            Err(err) => {
                error!(
                    event = "Owners",
                    phase = "Decode",
                    project = project_name,
                    status = response.status,
                    body = response.body.as_str(),
                    error = %err
                );
                return Ok(ProjectOwners::default());
            }
        };

        let mut owners = ProjectOwners::new();
        for refspec in &access.owner_of {
            let Some(group_ids) = access.owner_group_ids(refspec) else {
                warn!(
                    event = "Owners",
                    phase = "Lookup",
                    project = project_name,
                    refspec = refspec.as_str(),
                    "no owner permission defined for refspec"
                );
                continue;
            };

            let mut groups = Vec::with_capacity(group_ids.len());
            for group_id in &group_ids {
                groups.push(self.get_group_info(group_id, "")?);
            }
            debug!(
                event = "Owners",
                phase = "Resolved",
                refspec = refspec.as_str(),
                groups = groups.len()
            );
            owners.insert(refspec.as_str(), groups);
        }

        Ok(owners)
    }
}

/// Run the auth probe: Basic, then Digest, then give up.
fn probe<T: Transport>(config: &GerritConfig, transport: &T) -> Result<(AuthMethod, ServerVersion)> {
    let url = config.version_url();

    for method in AuthMethod::PROBE_ORDER {
        let response = match transport.get(&url, config.credentials(), method) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    event = "Probe",
                    phase = "Unreachable",
                    auth = %method,
                    url = url.as_str(),
                    error = %err
                );
                continue;
            }
        };

        if response.is_success() {
            let version = ServerVersion::from_body(&response.body);
            info!(event = "Probe", phase = "Authenticated", auth = %method, version = %version);
            return Ok((method, version));
        }

        debug!(
            event = "Probe",
            phase = "Rejected",
            auth = %method,
            status = response.status,
            body = strip_xssi_prefix(&response.body)
        );
    }

    warn!(event = "Probe", phase = "Failed", url = url.as_str());
    Err(GerritError::Authentication { url })
}

#[cfg(test)]
mod tests;
