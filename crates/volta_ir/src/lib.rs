//! VoltaIR — the netlist intermediate representation of the Volta HDL
//! compiler.
//!
//! Elaboration builds a [`Design`]: signal nets ([`NetNet`]) and logic
//! nodes ([`NetNode`]) whose pins are wired together into nexuses through
//! [`Design::connect`], plus the behavioral objects (processes, tasks,
//! functions, memories, scopes, parameters) the later passes consult.
//! Synthesis and optimization rewrite the graph in place; code generation
//! reads the final result.
//!
//! All objects live in per-design arenas and are addressed by generational
//! ids, so graph surgery is index bookkeeping and a freed object's id can
//! never silently alias its successor.

#![warn(missing_docs)]

pub mod arena;
pub mod design;
pub mod expr;
pub mod ids;
pub mod link;
pub mod memory;
pub mod net;
pub mod node;
pub mod obj;
pub mod process;
pub mod scope;
pub mod stmt;
pub mod udp;

mod nexus;

pub use arena::{Arena, ArenaId};
pub use design::Design;
pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use ids::{NetId, NodeId, ProcessId};
pub use link::{Link, LinkDir, LinkRef, ObjRef};
pub use memory::NetMemory;
pub use net::{NetKind, NetNet, PortType};
pub use node::{NetNode, NodeKind};
pub use obj::{Attributes, NetObj};
pub use process::{FuncDef, NetProcTop, ProcKind, TaskDef};
pub use scope::{NetScope, ScopeKind};
pub use stmt::{Assign, Statement};
pub use udp::{expand_row, UdpTable};
