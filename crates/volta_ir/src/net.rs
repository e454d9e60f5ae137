//! Declared signal nets.

use crate::design::Ring;
use crate::ids::NetId;
use crate::link::{Link, ObjRef};
use crate::obj::NetObj;
use serde::{Deserialize, Serialize};
use std::fmt;
use volta_common::{Logic, LogicVec};

/// The declared kind of a signal net.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NetKind {
    /// A wire created by implicit declaration.
    ImplicitWire,
    /// A reg created by implicit declaration.
    ImplicitReg,
    /// An `integer` variable.
    Integer,
    /// A declared `reg`.
    Reg,
    /// A net tied low.
    Supply0,
    /// A net tied high.
    Supply1,
    /// A tri-state net.
    Tri,
    /// A tri-state net that pulls low when undriven.
    Tri0,
    /// A tri-state net that pulls high when undriven.
    Tri1,
    /// A wired-AND tri-state net.
    TriAnd,
    /// A wired-OR tri-state net.
    TriOr,
    /// A wired-AND net.
    Wand,
    /// A wired-OR net.
    Wor,
    /// A plain declared wire.
    Wire,
}

impl fmt::Display for NetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NetKind::ImplicitWire => "wire /*implicit*/",
            NetKind::ImplicitReg => "reg /*implicit*/",
            NetKind::Integer => "integer",
            NetKind::Reg => "reg",
            NetKind::Supply0 => "supply0",
            NetKind::Supply1 => "supply1",
            NetKind::Tri => "tri",
            NetKind::Tri0 => "tri0",
            NetKind::Tri1 => "tri1",
            NetKind::TriAnd => "triand",
            NetKind::TriOr => "trior",
            NetKind::Wand => "wand",
            NetKind::Wor => "wor",
            NetKind::Wire => "wire",
        };
        write!(f, "{text}")
    }
}

/// Whether (and how) a net passes through its module's port list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortType {
    /// Not part of the port list.
    NotAPort,
    /// A module input.
    Input,
    /// A module output.
    Output,
    /// A bidirectional module port.
    InOut,
}

/// A declared signal: one pin per bit of the declared range.
///
/// The declared range may run in either direction (`[7:0]` or `[0:7]`);
/// [`sb_to_idx`](Self::sb_to_idx) maps a source-level bit index onto the
/// pin offset regardless of orientation. Each bit carries a four-state
/// initial value, defaulting to Z.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetNet {
    /// The structural core: name, pins, attributes.
    pub base: NetObj,
    /// The declared kind of this net.
    pub kind: NetKind,
    /// How this net relates to its module's ports.
    pub port_type: PortType,
    scope: Option<String>,
    msb: i64,
    lsb: i64,
    ivalue: LogicVec,
    local: bool,
    eref: u32,
    pub(crate) ring: Option<Ring<NetId>>,
}

impl NetNet {
    pub(crate) fn new(
        me: NetId,
        scope: Option<&str>,
        name: &str,
        kind: NetKind,
        msb: i64,
        lsb: i64,
    ) -> Self {
        let width = ((msb - lsb).unsigned_abs() + 1) as u32;
        let mut base = NetObj::new(ObjRef::Net(me), name, width);
        for pin in 0..width {
            base.pin_mut(pin).set_name("P", pin);
        }
        Self {
            base,
            kind,
            port_type: PortType::NotAPort,
            scope: scope.map(str::to_string),
            msb,
            lsb,
            ivalue: LogicVec::all_z(width),
            local: false,
            eref: 0,
            ring: None,
        }
    }

    /// The hierarchical name of this net.
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// The number of pins (bits).
    pub fn pin_count(&self) -> u32 {
        self.base.pin_count()
    }

    /// Returns pin `idx`; panics if out of range.
    pub fn pin(&self, idx: u32) -> &Link {
        self.base.pin(idx)
    }

    /// The most significant declared bit index.
    pub fn msb(&self) -> i64 {
        self.msb
    }

    /// The least significant declared bit index.
    pub fn lsb(&self) -> i64 {
        self.lsb
    }

    /// Maps a source-level bit index onto the pin offset, accounting for
    /// the declared range orientation.
    pub fn sb_to_idx(&self, sb: i64) -> u32 {
        if self.msb >= self.lsb {
            (sb - self.lsb) as u32
        } else {
            (self.lsb - sb) as u32
        }
    }

    /// The path of the scope this net was declared in, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The initial value of bit `idx`.
    pub fn init_value(&self, idx: u32) -> Logic {
        self.ivalue.get(idx)
    }

    /// Sets the initial value of bit `idx`.
    pub fn set_init_value(&mut self, idx: u32, value: Logic) {
        self.ivalue.set(idx, value);
    }

    /// Returns `true` for an elaboration-temporary net that no source
    /// declaration names.
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Marks this net as an elaboration temporary.
    pub fn set_local(&mut self, flag: bool) {
        self.local = flag;
    }

    /// The number of external references currently holding this net.
    pub fn eref(&self) -> u32 {
        self.eref
    }

    /// Records one more external reference.
    pub fn incr_eref(&mut self) {
        self.eref += 1;
    }

    /// Releases one external reference.
    ///
    /// # Panics
    ///
    /// Panics on underflow — a release without a matching claim is a
    /// caller bug.
    pub fn decr_eref(&mut self) {
        assert!(
            self.eref > 0,
            "external reference count underflow on `{}`",
            self.name()
        );
        self.eref -= 1;
    }

    /// Returns `true` while this net is registered in a design's signal
    /// ring.
    pub fn is_attached(&self) -> bool {
        self.ring.is_some()
    }
}
