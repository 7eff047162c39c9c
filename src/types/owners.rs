//! The owners-by-refspec result of project owner resolution.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Owner groups of a project, keyed by refspec.
///
/// Refspecs keep the order in which the server listed them in `owner_of`,
/// and each refspec's groups keep the order of the owner rules. Serialises
/// as a plain JSON object: `{"refs/*": [{"id": ..., "name": ...}]}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectOwners {
    entries: Vec<(String, Vec<Value>)>,
}

impl ProjectOwners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the groups owning `refspec`, replacing any earlier entry.
    pub fn insert<S: Into<String>>(&mut self, refspec: S, groups: Vec<Value>) {
        let refspec = refspec.into();
        match self.entries.iter_mut().find(|(r, _)| *r == refspec) {
            Some((_, existing)) => *existing = groups,
            None => self.entries.push((refspec, groups)),
        }
    }

    pub fn get(&self, refspec: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(r, _)| r == refspec)
            .map(|(_, groups)| groups.as_slice())
    }

    pub fn contains(&self, refspec: &str) -> bool {
        self.get(refspec).is_some()
    }

    pub fn refspecs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries
            .iter()
            .map(|(r, groups)| (r.as_str(), groups.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for ProjectOwners {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (refspec, groups) in &self.entries {
            map.serialize_entry(refspec, groups)?;
        }
        map.end()
    }
}

impl IntoIterator for ProjectOwners {
    type Item = (String, Vec<Value>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
