// ABOUTME: Validated domain identifiers shared across components.
// ABOUTME: ContainerId accepts anything the daemon itself resolves (id or name).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a container as understood by the daemon.
///
/// The daemon API accepts full ids, id prefixes, and names interchangeably,
/// so this type carries whichever of those the caller was given. Values are
/// only ever fed back to the daemon, never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
