//! The common core of every structural netlist object.

use crate::link::{Link, LinkRef, ObjRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use volta_source::SourceLoc;

/// A string-keyed attribute map carried by structural objects and
/// memories.
///
/// Backends use attributes to attach target-specific annotations without
/// extending the core type hierarchy. The bulk setter is a write-once
/// initialization; individual keys may be overwritten afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Attributes {
    map: HashMap<String, String>,
}

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the map from a parsed attribute list.
    ///
    /// # Panics
    ///
    /// Panics if any attribute has already been set — bulk initialization
    /// happens exactly once, right after construction.
    pub fn set_all(&mut self, attrs: HashMap<String, String>) {
        assert!(
            self.map.is_empty(),
            "attributes initialized twice on the same object"
        );
        self.map = attrs;
    }

    /// Returns the value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Binds `key` to `value`, replacing any previous binding.
    pub fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    /// Returns `true` when every attribute of `other` is present here
    /// with an equal value.
    pub fn is_superset_of(&self, other: &Attributes) -> bool {
        other
            .map
            .iter()
            .all(|(key, value)| self.map.get(key) == Some(value))
    }

    /// The number of attributes set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// State shared by every structural object: hierarchical name, pins,
/// attributes, delays, and traversal bookkeeping.
///
/// The pin array is sized at construction and never resizes; each pin is
/// born as its own singleton nexus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetObj {
    name: String,
    pins: Vec<Link>,
    attributes: Attributes,
    /// Rise, fall, and decay delays.
    pub delays: [u64; 3],
    mark: bool,
    /// Where this object's declaration appeared.
    pub loc: SourceLoc,
}

impl NetObj {
    pub(crate) fn new(me: ObjRef, name: &str, npins: u32) -> Self {
        Self {
            name: name.to_string(),
            pins: (0..npins).map(|pin| Link::new(LinkRef::new(me, pin))).collect(),
            attributes: Attributes::new(),
            delays: [0; 3],
            mark: false,
            loc: SourceLoc::DUMMY,
        }
    }

    /// The hierarchical, dot-qualified name of this object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of pins.
    pub fn pin_count(&self) -> u32 {
        self.pins.len() as u32
    }

    /// Returns pin `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn pin(&self, idx: u32) -> &Link {
        assert!(
            (idx as usize) < self.pins.len(),
            "pin {idx} out of range on `{}` ({} pins)",
            self.name,
            self.pins.len()
        );
        &self.pins[idx as usize]
    }

    /// Returns pin `idx` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn pin_mut(&mut self, idx: u32) -> &mut Link {
        assert!(
            (idx as usize) < self.pins.len(),
            "pin {idx} out of range on `{}` ({} pins)",
            self.name,
            self.pins.len()
        );
        &mut self.pins[idx as usize]
    }

    /// The attribute map of this object.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The attribute map of this object, mutably.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns the value of attribute `key`, if set.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    /// Sets attribute `key` to `value`, replacing any previous value.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.set(key, value);
    }

    /// Bulk-initializes the attribute map; see [`Attributes::set_all`].
    pub fn set_attributes(&mut self, attrs: HashMap<String, String>) {
        self.attributes.set_all(attrs);
    }

    /// Returns `true` when every attribute of `other` appears on this
    /// object with an equal value. Used when deciding whether two devices
    /// may be merged.
    pub fn has_compat_attributes(&self, other: &NetObj) -> bool {
        self.attributes.is_superset_of(&other.attributes)
    }

    /// The traversal mark. Maintained entirely by passes via
    /// [`set_mark`](Self::set_mark); see the predicate scans on
    /// [`Design`](crate::design::Design).
    pub fn mark(&self) -> bool {
        self.mark
    }

    /// Sets the traversal mark.
    pub fn set_mark(&mut self, flag: bool) {
        self.mark = flag;
    }
}
