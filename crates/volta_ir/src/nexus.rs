//! Nexus surgery and queries over pin rings.
//!
//! A nexus is never materialized: it is whatever set of pins a ring walk
//! reaches. [`Design::connect`] merges two rings by splicing every member
//! of the left ring in behind the right anchor; the query operations walk
//! a ring once and classify what they pass. Every operation here is total
//! over well-formed rings; a broken ring (mismatched `next`/`prev`) is a
//! fatal programming error and fails immediately, because one corrupt
//! splice poisons every later traversal.

use crate::design::Design;
use crate::ids::NetId;
use crate::link::{Link, LinkDir, LinkRef, ObjRef};

impl Design {
    /// Returns the link addressed by `r`; panics on a stale object id or
    /// out-of-range pin.
    pub fn link(&self, r: LinkRef) -> &Link {
        match r.owner {
            ObjRef::Node(id) => self.nodes.get(id).base.pin(r.pin),
            ObjRef::Net(id) => self.nets.get(id).base.pin(r.pin),
        }
    }

    /// Returns the link addressed by `r` mutably.
    pub fn link_mut(&mut self, r: LinkRef) -> &mut Link {
        match r.owner {
            ObjRef::Node(id) => self.nodes.get_mut(id).base.pin_mut(r.pin),
            ObjRef::Net(id) => self.nets.get_mut(id).base.pin_mut(r.pin),
        }
    }

    /// The number of pins on the object `obj`.
    pub fn obj_pin_count(&self, obj: ObjRef) -> u32 {
        match obj {
            ObjRef::Node(id) => self.nodes.get(id).pin_count(),
            ObjRef::Net(id) => self.nets.get(id).pin_count(),
        }
    }

    fn check_ring(&self, l: LinkRef) {
        let link = self.link(l);
        assert!(
            self.link(link.next).prev == l && self.link(link.prev).next == l,
            "nexus ring corrupted at {l:?}"
        );
    }

    /// Merges the nexus containing `l` with the nexus containing `r`.
    ///
    /// Walks `l`'s ring, splicing each member in behind `r`; stumbling on
    /// `r` mid-walk means the two rings were already one, and the merge
    /// stops there — reconnecting joined pins is a no-op, not an error.
    ///
    /// # Panics
    ///
    /// Panics when asked to connect a pin to itself, and on ring
    /// corruption at entry or exit.
    pub fn connect(&mut self, l: LinkRef, r: LinkRef) {
        assert!(l != r, "cannot connect pin {l:?} to itself");
        self.check_ring(l);
        self.check_ring(r);

        let mut cur = l;
        loop {
            let tmp = self.link(cur).next;

            // Stumbling on r means the rings are already merged.
            if tmp == r {
                break;
            }

            // Pull cur out of the left ring.
            let (prev, next) = {
                let link = self.link(cur);
                (link.prev, link.next)
            };
            self.link_mut(prev).next = next;
            self.link_mut(next).prev = prev;

            // Put cur in the right ring, just behind r.
            let rnext = self.link(r).next;
            {
                let link = self.link_mut(cur);
                link.next = rnext;
                link.prev = r;
            }
            self.link_mut(rnext).prev = cur;
            self.link_mut(r).next = cur;

            cur = tmp;
            if cur == l {
                break;
            }
        }

        self.check_ring(l);
        self.check_ring(r);
    }

    /// Removes a single pin from its nexus, leaving it a singleton ring.
    pub fn unlink(&mut self, l: LinkRef) {
        let (prev, next) = {
            let link = self.link(l);
            (link.prev, link.next)
        };
        self.link_mut(next).prev = prev;
        self.link_mut(prev).next = next;
        let link = self.link_mut(l);
        link.next = l;
        link.prev = l;
    }

    /// Returns `true` if the pin is connected to anything.
    pub fn is_linked(&self, l: LinkRef) -> bool {
        self.link(l).next != l
    }

    /// Returns `true` if `l` and `that` are members of the same nexus.
    pub fn is_linked_pair(&self, l: LinkRef, that: LinkRef) -> bool {
        let mut cur = self.link(l).next;
        while cur != l {
            if cur == that {
                return true;
            }
            cur = self.link(cur).next;
        }
        false
    }

    /// Returns `true` if any pin of `obj` other than `l` itself is a
    /// member of `l`'s nexus.
    pub fn is_linked_obj(&self, l: LinkRef, obj: ObjRef) -> bool {
        let mut cur = self.link(l).next;
        while cur != l {
            if cur.owner == obj {
                return true;
            }
            cur = self.link(cur).next;
        }
        false
    }

    /// Returns `true` when every pin of `a` is connected to `b`.
    pub fn connected(&self, a: ObjRef, b: ObjRef) -> bool {
        (0..self.obj_pin_count(a)).all(|pin| self.is_linked_obj(LinkRef::new(a, pin), b))
    }

    /// Counts the INPUT pins in the nexus containing `pin`, the starting
    /// pin included.
    pub fn count_inputs(&self, pin: LinkRef) -> u32 {
        self.count_dir(pin, LinkDir::Input)
    }

    /// Counts the OUTPUT pins in the nexus containing `pin`, the
    /// starting pin included. More than one means multiple drivers.
    pub fn count_outputs(&self, pin: LinkRef) -> u32 {
        self.count_dir(pin, LinkDir::Output)
    }

    fn count_dir(&self, pin: LinkRef, dir: LinkDir) -> u32 {
        let mut count = (self.link(pin).dir() == dir) as u32;
        let mut cur = self.link(pin).next;
        while cur != pin {
            if self.link(cur).dir() == dir {
                count += 1;
            }
            cur = self.link(cur).next;
        }
        count
    }

    /// Counts the declared-signal pins in the nexus containing `pin`,
    /// the starting pin included.
    pub fn count_signals(&self, pin: LinkRef) -> u32 {
        let mut count = matches!(pin.owner, ObjRef::Net(_)) as u32;
        let mut cur = self.link(pin).next;
        while cur != pin {
            if matches!(cur.owner, ObjRef::Net(_)) {
                count += 1;
            }
            cur = self.link(cur).next;
        }
        count
    }

    /// Scans the nexus of pin `pin` of `obj` for a declared signal,
    /// returning the signal and the bit index it joins the nexus with.
    /// The scan stops when it comes back around to any pin of `obj`
    /// itself. Used to recover the natural name of an otherwise
    /// anonymous wire group.
    pub fn find_link_signal(&self, obj: ObjRef, pin: u32) -> Option<(NetId, u32)> {
        let start = LinkRef::new(obj, pin);
        let mut cur = self.link(start).next;
        while cur.owner != obj {
            if let ObjRef::Net(id) = cur.owner {
                return Some((id, cur.pin));
            }
            cur = self.link(cur).next;
        }
        None
    }

    /// Scans forward from `pin` for the next OUTPUT pin in its nexus.
    /// `None` means the nexus is undriven.
    pub fn find_next_output(&self, pin: LinkRef) -> Option<LinkRef> {
        let mut cur = self.link(pin).next;
        while cur != pin {
            if self.link(cur).dir() == LinkDir::Output {
                return Some(cur);
            }
            cur = self.link(cur).next;
        }
        None
    }

    /// Collects the members of the nexus containing `l`, starting with
    /// `l` itself.
    pub fn nexus_members(&self, l: LinkRef) -> Vec<LinkRef> {
        let mut members = vec![l];
        let mut cur = self.link(l).next;
        while cur != l {
            members.push(cur);
            cur = self.link(cur).next;
        }
        members
    }
}
