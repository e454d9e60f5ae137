//! Opaque identifiers for source files.

use serde::{Deserialize, Serialize};

/// An opaque id naming one source file loaded by the driver.
///
/// The id-to-path mapping is owned by the compilation driver; the IR
/// layer only stores and compares ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// The reserved id for constructs with no backing file (synthesized
    /// nets, compiler-generated nodes).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
