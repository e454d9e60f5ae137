//! Pins and the addressing scheme for nexus membership.
//!
//! Every structural object owns a fixed array of [`Link`]s — its pins.
//! Electrically connected pins form a circular doubly-linked ring (a
//! *nexus*), threaded through the `next`/`prev` fields of each link.
//! Because objects live in arenas, a link is addressed by the pair of its
//! owner and pin index ([`LinkRef`]) rather than by pointer; ring surgery
//! is performed by the [`Design`](crate::design::Design) methods in terms
//! of these references.

use crate::ids::{NetId, NodeId};
use serde::{Deserialize, Serialize};

/// The electrical direction of a pin relative to its owning object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LinkDir {
    /// Neither drives nor samples; the default for a fresh pin.
    Passive,
    /// The object samples the nexus through this pin.
    Input,
    /// The object drives the nexus through this pin.
    Output,
    /// Bidirectional.
    InOut,
}

/// Identifies the object owning a pin: a logic node or a signal net.
///
/// Passes distinguish the two by matching on this — "is this pin's owner
/// a declared signal" is a pattern match, not a runtime type test.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum ObjRef {
    /// A logic node.
    Node(NodeId),
    /// A declared signal net.
    Net(NetId),
}

impl ObjRef {
    /// Returns the net id when this refers to a signal net.
    pub fn as_net(self) -> Option<NetId> {
        match self {
            ObjRef::Net(id) => Some(id),
            ObjRef::Node(_) => None,
        }
    }

    /// Returns the node id when this refers to a logic node.
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            ObjRef::Node(id) => Some(id),
            ObjRef::Net(_) => None,
        }
    }
}

/// Addresses one pin of one object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct LinkRef {
    /// The owning object.
    pub owner: ObjRef,
    /// The pin index within the owner.
    pub pin: u32,
}

impl LinkRef {
    /// Creates a reference to pin `pin` of `owner`.
    pub fn new(owner: ObjRef, pin: u32) -> Self {
        Self { owner, pin }
    }

    /// Creates a reference to pin `pin` of node `id`.
    pub fn node(id: NodeId, pin: u32) -> Self {
        Self::new(ObjRef::Node(id), pin)
    }

    /// Creates a reference to pin `pin` of net `id`.
    pub fn net(id: NetId, pin: u32) -> Self {
        Self::new(ObjRef::Net(id), pin)
    }
}

/// One pin of a structural object.
///
/// A freshly constructed link is its own ring: `next == prev == self`.
/// A ring of size one is an unconnected pin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    dir: LinkDir,
    name: Option<String>,
    inst: u32,
    pub(crate) next: LinkRef,
    pub(crate) prev: LinkRef,
}

impl Link {
    pub(crate) fn new(me: LinkRef) -> Self {
        Self {
            dir: LinkDir::Passive,
            name: None,
            inst: 0,
            next: me,
            prev: me,
        }
    }

    /// The direction of this pin.
    pub fn dir(&self) -> LinkDir {
        self.dir
    }

    /// Sets the direction of this pin.
    pub fn set_dir(&mut self, dir: LinkDir) {
        self.dir = dir;
    }

    /// The port name of this pin, if one was assigned.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The instance index within the pin's port name group. Multi-bit
    /// ports name each bit `("Data", 0)`, `("Data", 1)`, and so on.
    pub fn inst(&self) -> u32 {
        self.inst
    }

    /// Assigns the port name and instance index of this pin.
    pub fn set_name(&mut self, name: &str, inst: u32) {
        self.name = Some(name.to_string());
        self.inst = inst;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaId;

    #[test]
    fn fresh_link_is_its_own_ring() {
        let me = LinkRef::node(NodeId::new(0, 0), 3);
        let link = Link::new(me);
        assert_eq!(link.next, me);
        assert_eq!(link.prev, me);
        assert_eq!(link.dir(), LinkDir::Passive);
        assert_eq!(link.name(), None);
        assert_eq!(link.inst(), 0);
    }

    #[test]
    fn set_name_records_instance() {
        let me = LinkRef::net(NetId::new(0, 0), 0);
        let mut link = Link::new(me);
        link.set_name("Data", 4);
        assert_eq!(link.name(), Some("Data"));
        assert_eq!(link.inst(), 4);
    }

    #[test]
    fn obj_ref_discrimination() {
        let n = ObjRef::Node(NodeId::new(1, 0));
        let s = ObjRef::Net(NetId::new(1, 0));
        assert!(n.as_node().is_some());
        assert!(n.as_net().is_none());
        assert!(s.as_net().is_some());
        assert!(s.as_node().is_none());
        assert_ne!(LinkRef::new(n, 0), LinkRef::new(s, 0));
        assert_ne!(LinkRef::new(n, 0), LinkRef::new(n, 1));
    }

    #[test]
    fn serde_roundtrip() {
        let me = LinkRef::node(NodeId::new(2, 1), 5);
        let json = serde_json::to_string(&me).unwrap();
        let back: LinkRef = serde_json::from_str(&json).unwrap();
        assert_eq!(me, back);
    }
}
