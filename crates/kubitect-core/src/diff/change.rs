//! Flattened change records.

use serde::Serialize;

use crate::diff::tree::Action;
use crate::value::{Kind, Value};

/// A changed leaf, stripped of its tree links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    /// Dotted path of display keys
    pub path: String,
    /// Dotted path of schema field names
    pub struct_path: String,
    /// Struct path with list-element segments replaced by `*`
    pub generic_path: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    /// Kind of the compared value
    #[serde(rename = "type")]
    pub value_type: Kind,
    pub action: Action,
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}) {}: {} -> {}",
            self.action,
            self.path,
            display_side(self.before.as_ref()),
            display_side(self.after.as_ref())
        )
    }
}

fn display_side(v: Option<&Value>) -> String {
    v.map_or_else(|| Value::Null.to_string(), Value::to_string)
}

/// Ordered list of changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Changes(pub Vec<Change>);

impl Changes {
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|c| c.path.clone()).collect()
    }

    pub fn with_action(&self, action: Action) -> impl Iterator<Item = &Change> {
        self.0.iter().filter(move |c| c.action == action)
    }

    pub fn into_inner(self) -> Vec<Change> {
        self.0
    }
}

impl std::ops::Deref for Changes {
    type Target = Vec<Change>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Changes {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Changes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self.0.iter().map(Change::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
