//! Logic nodes: devices, constant drivers, and user-defined primitives.

use crate::design::Ring;
use crate::ids::NodeId;
use crate::link::{Link, ObjRef};
use crate::obj::NetObj;
use crate::udp::UdpTable;
use serde::{Deserialize, Serialize};
use volta_common::LogicVec;

/// What a [`NetNode`] computes.
///
/// The core defines only the kinds its own algorithms must see through;
/// everything else — adders, muxes, comparators, flip-flops, RAM ports —
/// is a [`Device`](NodeKind::Device) whose pinout conventions belong to
/// the device library that created it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// Drives a constant value, one output pin per bit.
    Const {
        /// The driven value; bit `i` appears on pin `i`.
        value: LogicVec,
    },
    /// A user-defined primitive evaluated through its state table.
    Udp(UdpTable),
    /// A device from an external library, known here only by class name
    /// and pin count.
    Device {
        /// The library's name for this device kind.
        class: String,
    },
}

/// A combinational or sequential device in the netlist.
///
/// Nodes are created unregistered; [`Design::add_node`]
/// (crate::design::Design::add_node) splices them into the design's node
/// ring, and [`Design::del_node`](crate::design::Design::del_node) takes
/// them back out without freeing them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetNode {
    /// The structural core: name, pins, attributes.
    pub base: NetObj,
    /// What this node computes.
    pub kind: NodeKind,
    pub(crate) ring: Option<Ring<NodeId>>,
}

impl NetNode {
    pub(crate) fn new(me: NodeId, name: &str, npins: u32, kind: NodeKind) -> Self {
        Self {
            base: NetObj::new(ObjRef::Node(me), name, npins),
            kind,
            ring: None,
        }
    }

    /// The hierarchical name of this node.
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// The number of pins.
    pub fn pin_count(&self) -> u32 {
        self.base.pin_count()
    }

    /// Returns pin `idx`; panics if out of range.
    pub fn pin(&self, idx: u32) -> &Link {
        self.base.pin(idx)
    }

    /// Returns `true` while this node is registered in a design's node
    /// ring.
    pub fn is_attached(&self) -> bool {
        self.ring.is_some()
    }

    /// The UDP state table, when this node is a user-defined primitive.
    pub fn udp(&self) -> Option<&UdpTable> {
        match &self.kind {
            NodeKind::Udp(table) => Some(table),
            _ => None,
        }
    }

    /// The UDP state table, mutably.
    pub fn udp_mut(&mut self) -> Option<&mut UdpTable> {
        match &mut self.kind {
            NodeKind::Udp(table) => Some(table),
            _ => None,
        }
    }
}
