//! Opaque generational ID newtypes for netlist entities.
//!
//! Ids are issued by [`Arena::alloc`](crate::arena::Arena::alloc) and pair
//! a slot index with a generation; see [`crate::arena`] for the staleness
//! rules.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl ArenaId for $name {
            fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            fn index(self) -> u32 {
                self.index
            }

            fn generation(self) -> u32 {
                self.generation
            }
        }
    };
}

define_id!(
    /// Id of a logic node ([`NetNode`](crate::node::NetNode)) in a design.
    NodeId
);

define_id!(
    /// Id of a signal net ([`NetNet`](crate::net::NetNet)) in a design.
    NetId
);

define_id!(
    /// Id of a behavioral process in a design.
    ProcessId
);
