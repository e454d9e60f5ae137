//! Hierarchical namespace scopes.

use crate::ids::NetId;
use serde::{Deserialize, Serialize};

/// What kind of source construct opened a scope.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ScopeKind {
    /// A module instance.
    Module,
    /// A task body.
    Task,
    /// A function body.
    Func,
    /// A named `begin`/`end` block.
    Begin,
    /// A named `fork`/`join` block.
    Fork,
}

/// One node of the design's scope tree.
///
/// A scope's name is its full dot-qualified path; the tree structure is
/// implicit in the paths. Each scope records the signals declared in it
/// so per-scope passes need not rescan the signal ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetScope {
    name: String,
    /// The construct that opened this scope.
    pub kind: ScopeKind,
    pub(crate) signals: Vec<NetId>,
}

impl NetScope {
    pub(crate) fn new(name: &str, kind: ScopeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            signals: Vec::new(),
        }
    }

    /// The full dot-qualified path of this scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signals declared in this scope, in declaration order.
    pub fn signals(&self) -> &[NetId] {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let scope = NetScope::new("top.u1", ScopeKind::Module);
        assert_eq!(scope.name(), "top.u1");
        assert_eq!(scope.kind, ScopeKind::Module);
        assert!(scope.signals().is_empty());
    }

    #[test]
    fn kinds_distinct() {
        let kinds = [
            ScopeKind::Module,
            ScopeKind::Task,
            ScopeKind::Func,
            ScopeKind::Begin,
            ScopeKind::Fork,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }
}
