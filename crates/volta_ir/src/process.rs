//! Behavioral processes and task/function definitions.

use crate::ids::{NetId, ProcessId};
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use volta_source::SourceLoc;

/// Which construct created a process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ProcKind {
    /// An `initial` block: runs once at time zero.
    Initial,
    /// An `always` block: re-runs forever.
    Always,
}

/// One top-level behavioral process.
///
/// Processes form a singly-linked list hanging off the design, newest
/// first; they are rarely removed, so removal pays an O(n) search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetProcTop {
    /// Whether this is an `initial` or `always` process.
    pub kind: ProcKind,
    /// The process body.
    pub statement: Statement,
    pub(crate) next: Option<ProcessId>,
    /// Where the process was declared.
    pub loc: SourceLoc,
}

impl NetProcTop {
    /// Creates a process with the given body.
    pub fn new(kind: ProcKind, statement: Statement) -> Self {
        Self {
            kind,
            statement,
            next: None,
            loc: SourceLoc::DUMMY,
        }
    }
}

/// A user task definition.
///
/// The port list is fixed at definition; the body arrives in a second
/// phase once its statements have been elaborated, and may be installed
/// only once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskDef {
    name: String,
    ports: Vec<NetId>,
    proc: Option<Statement>,
}

impl TaskDef {
    /// Creates a task definition with the given port nets.
    pub fn new(name: &str, ports: Vec<NetId>) -> Self {
        Self {
            name: name.to_string(),
            ports,
            proc: None,
        }
    }

    /// The fully qualified name of this task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of ports.
    pub fn port_count(&self) -> u32 {
        self.ports.len() as u32
    }

    /// Returns port `idx`; panics if out of range.
    pub fn port(&self, idx: u32) -> NetId {
        assert!(
            (idx as usize) < self.ports.len(),
            "port {idx} out of range on task `{}`",
            self.name
        );
        self.ports[idx as usize]
    }

    /// Installs the elaborated body.
    ///
    /// # Panics
    ///
    /// Panics if a body was already installed.
    pub fn set_proc(&mut self, statement: Statement) {
        assert!(
            self.proc.is_none(),
            "body installed twice on task `{}`",
            self.name
        );
        self.proc = Some(statement);
    }

    /// The elaborated body, once installed.
    pub fn proc(&self) -> Option<&Statement> {
        self.proc.as_ref()
    }
}

/// A user function definition.
///
/// Like a task, but with a distinguished result net the function's
/// return value is bound to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuncDef {
    name: String,
    result: Option<NetId>,
    ports: Vec<NetId>,
    proc: Option<Statement>,
}

impl FuncDef {
    /// Creates a function definition with the given result and port nets.
    pub fn new(name: &str, result: Option<NetId>, ports: Vec<NetId>) -> Self {
        Self {
            name: name.to_string(),
            result,
            ports,
            proc: None,
        }
    }

    /// The fully qualified name of this function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The net bound to the function's return value.
    pub fn result(&self) -> Option<NetId> {
        self.result
    }

    /// The number of ports.
    pub fn port_count(&self) -> u32 {
        self.ports.len() as u32
    }

    /// Returns port `idx`; panics if out of range.
    pub fn port(&self, idx: u32) -> NetId {
        assert!(
            (idx as usize) < self.ports.len(),
            "port {idx} out of range on function `{}`",
            self.name
        );
        self.ports[idx as usize]
    }

    /// Installs the elaborated body.
    ///
    /// # Panics
    ///
    /// Panics if a body was already installed.
    pub fn set_proc(&mut self, statement: Statement) {
        assert!(
            self.proc.is_none(),
            "body installed twice on function `{}`",
            self.name
        );
        self.proc = Some(statement);
    }

    /// The elaborated body, once installed.
    pub fn proc(&self) -> Option<&Statement> {
        self.proc.as_ref()
    }
}
