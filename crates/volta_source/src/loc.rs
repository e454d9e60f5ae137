//! File-and-line source locations.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A source location: one line in one file.
///
/// The netlist records where each declaration came from so that later
/// passes can report problems against the original source. Line
/// granularity is all elaboration preserves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SourceLoc {
    /// The file this location belongs to.
    pub file: FileId,
    /// The 1-based line number; 0 when unknown.
    pub line: u32,
}

impl SourceLoc {
    /// The location used for constructs with no source position.
    pub const DUMMY: SourceLoc = SourceLoc {
        file: FileId::DUMMY,
        line: 0,
    };

    /// Creates a location at the given file and line.
    pub fn new(file: FileId, line: u32) -> Self {
        Self { file, line }
    }

    /// Returns `true` if this is the dummy location.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}
