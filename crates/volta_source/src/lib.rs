//! Source-location types for the Volta HDL compiler.
//!
//! IR entities and diagnostics carry a [`SourceLoc`] — a file id plus a
//! line number — so every message can point back at the declaration it
//! came from.

#![warn(missing_docs)]

pub mod file_id;
pub mod loc;

pub use file_id::FileId;
pub use loc::SourceLoc;
