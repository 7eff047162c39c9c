//! Data model for talking to a Gerrit server.
//!
//! Group and member payloads are passed through as `serde_json::Value`
//! since their shape depends on the requested endpoint and options. Only the
//! project access payload is modelled, as owner resolution walks it.

mod access;
mod auth_method;
mod config;
mod owners;
mod version;

pub use access::{AccessSection, OWNER_PERMISSION, Permission, ProjectAccessInfo};
pub use auth_method::AuthMethod;
pub use config::{Credentials, GerritConfig};
pub use owners::ProjectOwners;
pub use version::ServerVersion;
