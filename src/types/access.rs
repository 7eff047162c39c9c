//! Project access configuration as returned by `GET /projects/{name}/access`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the permission that grants ownership of a refspec.
pub const OWNER_PERMISSION: &str = "owner";

/// The subset of Gerrit's `ProjectAccessInfo` needed to resolve owners.
///
/// Unknown fields (`revision`, `inherits_from`, `is_owner`, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectAccessInfo {
    /// Every refspec the caller can see ownership for.
    #[serde(default)]
    pub owner_of: Vec<String>,
    /// Access sections defined on the project itself, keyed by refspec.
    #[serde(default)]
    pub local: HashMap<String, AccessSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccessSection {
    #[serde(default)]
    pub permissions: HashMap<String, Permission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<bool>,
    /// Rules keyed by group identifier, in the order the server sent them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Map<String, Value>>,
}

impl ProjectAccessInfo {
    /// Owner group identifiers for `refspec`, in server order.
    ///
    /// Returns `None` when `local[refspec].permissions.owner.rules` does not
    /// exist, including an `owner` permission that carries no `rules` key.
    pub fn owner_group_ids(&self, refspec: &str) -> Option<Vec<String>> {
        let permission = self
            .local
            .get(refspec)?
            .permissions
            .get(OWNER_PERMISSION)?;
        let rules = permission.rules.as_ref()?;
        Some(rules.keys().cloned().collect())
    }
}
