// src/lib.rs
pub use client::GerritClient;
pub use decode::{XSSI_PREFIX, encode_group_id, encode_project_name, strip_xssi_prefix};
pub use error::{GerritError, Result};
pub use traits::{HttpResponse, Transport};
pub use transport::HttpTransport;
pub use types::{
    AccessSection, AuthMethod, Credentials, GerritConfig, OWNER_PERMISSION, Permission,
    ProjectAccessInfo, ProjectOwners, ServerVersion,
};

mod client;
mod decode;
mod error;
mod traits;
mod transport;
mod types;
