//! The owning container for an elaborated design.

use crate::arena::Arena;
use crate::expr::Expr;
use crate::ids::{NetId, NodeId, ProcessId};
use crate::link::{LinkDir, LinkRef};
use crate::memory::NetMemory;
use crate::net::{NetKind, NetNet};
use crate::node::{NetNode, NodeKind};
use crate::process::{FuncDef, NetProcTop, TaskDef};
use crate::scope::{NetScope, ScopeKind};
use crate::udp::UdpTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use volta_common::LogicVec;

/// Intrusive ring membership: the neighbors of an object in one of the
/// design's circular lists. `None` ring state on the object means
/// "not registered in any design list".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub(crate) struct Ring<I> {
    pub(crate) next: I,
    pub(crate) prev: I,
}

/// The root owner of every elaborated object.
///
/// A design holds the storage arenas for nodes, signal nets, and
/// processes, the registration rings/list over them, and the name-keyed
/// maps for scopes, memories, parameters, functions, and tasks.
/// Allocation (`new_*`) and registration (`add_*`/`del_*`) are separate
/// steps: elaboration builds an object, wires its pins, then registers
/// it; optimization deregisters and frees what it proves dead.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Design {
    pub(crate) nodes: Arena<NodeId, NetNode>,
    pub(crate) nets: Arena<NetId, NetNet>,
    pub(crate) procs: Arena<ProcessId, NetProcTop>,
    nodes_head: Option<NodeId>,
    signals_head: Option<NetId>,
    procs_head: Option<ProcessId>,
    scopes: HashMap<String, NetScope>,
    memories: HashMap<String, NetMemory>,
    parameters: HashMap<String, Expr>,
    functions: HashMap<String, FuncDef>,
    tasks: HashMap<String, TaskDef>,
    flags: HashMap<String, String>,
    /// The count of recoverable semantic errors recorded against this
    /// design. Code generation is expected to require this be zero.
    pub errors: u32,
    lcounter: u64,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Object construction -------------------------------------------

    /// Allocates an unregistered node with `npins` passive pins.
    pub fn new_node(&mut self, name: &str, npins: u32, kind: NodeKind) -> NodeId {
        self.nodes
            .alloc_with(|id| NetNode::new(id, name, npins, kind))
    }

    /// Allocates a device node of the given class.
    pub fn new_device(&mut self, name: &str, class: &str, npins: u32) -> NodeId {
        self.new_node(
            name,
            npins,
            NodeKind::Device {
                class: class.to_string(),
            },
        )
    }

    /// Allocates a constant driver: one output pin per bit of `value`.
    pub fn new_const(&mut self, name: &str, value: LogicVec) -> NodeId {
        let width = value.width();
        assert!(width > 0, "constant `{name}` must drive at least one bit");
        let id = self.new_node(name, width, NodeKind::Const { value });
        for pin in 0..width {
            self.nodes.get_mut(id).base.pin_mut(pin).set_dir(LinkDir::Output);
        }
        id
    }

    /// Allocates a user-defined primitive node: pin 0 is the output, all
    /// further pins are inputs.
    pub fn new_udp(&mut self, name: &str, npins: u32, sequential: bool) -> NodeId {
        assert!(npins >= 2, "primitive `{name}` needs an output and an input");
        let id = self.new_node(name, npins, NodeKind::Udp(UdpTable::new(npins, sequential)));
        let node = self.nodes.get_mut(id);
        node.base.pin_mut(0).set_dir(LinkDir::Output);
        for pin in 1..npins {
            node.base.pin_mut(pin).set_dir(LinkDir::Input);
        }
        id
    }

    /// Allocates an unregistered signal net declared over `msb..lsb`
    /// (either orientation). When `scope` names a known scope the net is
    /// recorded among its siblings.
    pub fn new_signal(
        &mut self,
        scope: Option<&str>,
        name: &str,
        kind: NetKind,
        msb: i64,
        lsb: i64,
    ) -> NetId {
        let id = self
            .nets
            .alloc_with(|id| NetNet::new(id, scope, name, kind, msb, lsb));
        if let Some(path) = scope {
            if let Some(s) = self.scopes.get_mut(path) {
                s.signals.push(id);
            }
        }
        id
    }

    /// Allocates a signal of `width` bits with a `width-1 .. 0` range.
    pub fn new_signal_width(
        &mut self,
        scope: Option<&str>,
        name: &str,
        kind: NetKind,
        width: u32,
    ) -> NetId {
        assert!(width > 0, "signal `{name}` must have at least one bit");
        self.new_signal(scope, name, kind, width as i64 - 1, 0)
    }

    // --- Object access -------------------------------------------------

    /// Returns the node with the given id; panics if the id is stale.
    pub fn node(&self, id: NodeId) -> &NetNode {
        self.nodes.get(id)
    }

    /// Returns the node with the given id mutably; panics if stale.
    pub fn node_mut(&mut self, id: NodeId) -> &mut NetNode {
        self.nodes.get_mut(id)
    }

    /// Returns the net with the given id; panics if the id is stale.
    pub fn net(&self, id: NetId) -> &NetNet {
        self.nets.get(id)
    }

    /// Returns the net with the given id mutably; panics if stale.
    pub fn net_mut(&mut self, id: NetId) -> &mut NetNet {
        self.nets.get_mut(id)
    }

    /// Returns the process with the given id; panics if the id is stale.
    pub fn process(&self, id: ProcessId) -> &NetProcTop {
        self.procs.get(id)
    }

    /// Iterates over every allocated node, registered or not.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NetNode)> {
        self.nodes.iter()
    }

    /// Iterates over every allocated net, registered or not.
    pub fn signals(&self) -> impl Iterator<Item = (NetId, &NetNet)> {
        self.nets.iter()
    }

    // --- Node ring -----------------------------------------------------

    /// Registers a node in the design's node ring.
    ///
    /// # Panics
    ///
    /// Panics if the node is already registered.
    pub fn add_node(&mut self, id: NodeId) {
        assert!(
            self.nodes.get(id).ring.is_none(),
            "node `{}` is already owned by a design",
            self.nodes.get(id).name()
        );
        match self.nodes_head {
            None => {
                self.nodes.get_mut(id).ring = Some(Ring { next: id, prev: id });
            }
            Some(head) => {
                let next = self.node_ring(head).next;
                self.nodes.get_mut(id).ring = Some(Ring { next, prev: head });
                self.nodes.get_mut(next).ring.as_mut().expect("ring member").prev = id;
                self.nodes.get_mut(head).ring.as_mut().expect("ring member").next = id;
            }
        }
        self.nodes_head = Some(id);
    }

    /// Removes a node from the design's node ring without freeing it.
    ///
    /// # Panics
    ///
    /// Panics if the node is not registered in this design.
    pub fn del_node(&mut self, id: NodeId) {
        let ring = self.node_ring(id);
        if self.nodes_head == Some(id) {
            self.nodes_head = Some(ring.prev);
        }
        if self.nodes_head == Some(id) {
            self.nodes_head = None;
        } else {
            self.nodes.get_mut(ring.next).ring.as_mut().expect("ring member").prev = ring.prev;
            self.nodes.get_mut(ring.prev).ring.as_mut().expect("ring member").next = ring.next;
        }
        self.nodes.get_mut(id).ring = None;
    }

    /// Deregisters (if needed), disconnects, and frees a node.
    pub fn free_node(&mut self, id: NodeId) {
        if self.nodes.get(id).ring.is_some() {
            self.del_node(id);
        }
        for pin in 0..self.nodes.get(id).pin_count() {
            self.unlink(LinkRef::node(id, pin));
        }
        self.nodes.remove(id);
    }

    fn node_ring(&self, id: NodeId) -> Ring<NodeId> {
        match self.nodes.get(id).ring {
            Some(ring) => ring,
            None => panic!(
                "node `{}` is not owned by this design",
                self.nodes.get(id).name()
            ),
        }
    }

    // --- Signal ring ---------------------------------------------------

    /// Registers a net in the design's signal ring.
    ///
    /// # Panics
    ///
    /// Panics if the net is already registered.
    pub fn add_signal(&mut self, id: NetId) {
        assert!(
            self.nets.get(id).ring.is_none(),
            "signal `{}` is already owned by a design",
            self.nets.get(id).name()
        );
        match self.signals_head {
            None => {
                self.nets.get_mut(id).ring = Some(Ring { next: id, prev: id });
            }
            Some(head) => {
                let next = self.signal_ring(head).next;
                self.nets.get_mut(id).ring = Some(Ring { next, prev: head });
                self.nets.get_mut(next).ring.as_mut().expect("ring member").prev = id;
                self.nets.get_mut(head).ring.as_mut().expect("ring member").next = id;
            }
        }
        self.signals_head = Some(id);
    }

    /// Removes a net from the design's signal ring without freeing it.
    ///
    /// # Panics
    ///
    /// Panics if the net is not registered in this design.
    pub fn del_signal(&mut self, id: NetId) {
        let ring = self.signal_ring(id);
        if self.signals_head == Some(id) {
            self.signals_head = Some(ring.prev);
        }
        if self.signals_head == Some(id) {
            self.signals_head = None;
        } else {
            self.nets.get_mut(ring.next).ring.as_mut().expect("ring member").prev = ring.prev;
            self.nets.get_mut(ring.prev).ring.as_mut().expect("ring member").next = ring.next;
        }
        self.nets.get_mut(id).ring = None;
    }

    /// Deregisters (if needed), disconnects, and frees a signal net.
    ///
    /// # Panics
    ///
    /// Panics while external references to the net remain outstanding.
    pub fn free_signal(&mut self, id: NetId) {
        assert!(
            self.nets.get(id).eref() == 0,
            "signal `{}` freed while still referenced",
            self.nets.get(id).name()
        );
        if self.nets.get(id).ring.is_some() {
            self.del_signal(id);
        }
        for pin in 0..self.nets.get(id).pin_count() {
            self.unlink(LinkRef::net(id, pin));
        }
        if let Some(path) = self.nets.get(id).scope().map(str::to_string) {
            if let Some(scope) = self.scopes.get_mut(&path) {
                scope.signals.retain(|&sig| sig != id);
            }
        }
        self.nets.remove(id);
    }

    fn signal_ring(&self, id: NetId) -> Ring<NetId> {
        match self.nets.get(id).ring {
            Some(ring) => ring,
            None => panic!(
                "signal `{}` is not owned by this design",
                self.nets.get(id).name()
            ),
        }
    }

    // --- Processes -----------------------------------------------------

    /// Registers a behavioral process, newest first.
    pub fn add_process(&mut self, top: NetProcTop) -> ProcessId {
        let id = self.procs.alloc(top);
        self.procs.get_mut(id).next = self.procs_head;
        self.procs_head = Some(id);
        id
    }

    /// Unregisters and frees a process, releasing the signal references
    /// its body holds.
    ///
    /// # Panics
    ///
    /// Panics if the process is not registered in this design.
    pub fn delete_process(&mut self, id: ProcessId) {
        if self.procs_head == Some(id) {
            self.procs_head = self.procs.get(id).next;
        } else {
            let mut cur = match self.procs_head {
                Some(head) => head,
                None => panic!("process deleted from an empty design"),
            };
            loop {
                match self.procs.get(cur).next {
                    Some(next) if next == id => {
                        self.procs.get_mut(cur).next = self.procs.get(id).next;
                        break;
                    }
                    Some(next) => cur = next,
                    None => panic!("process is not owned by this design"),
                }
            }
        }
        let top = self.procs.remove(id);
        top.statement.release(self);
    }

    /// Iterates over the registered processes, newest first.
    pub fn processes(&self) -> impl Iterator<Item = (ProcessId, &NetProcTop)> {
        let mut cur = self.procs_head;
        std::iter::from_fn(move || {
            let id = cur?;
            let top = self.procs.get(id);
            cur = top.next;
            Some((id, top))
        })
    }

    // --- Scopes --------------------------------------------------------

    /// Creates the root scope of the design hierarchy.
    pub fn make_root_scope(&mut self, root: &str) -> String {
        self.scopes
            .insert(root.to_string(), NetScope::new(root, ScopeKind::Module));
        root.to_string()
    }

    /// Creates a child scope of `path` named `name`, returning the new
    /// scope's full path.
    pub fn make_scope(&mut self, path: &str, kind: ScopeKind, name: &str) -> String {
        let npath = format!("{path}.{name}");
        self.scopes.insert(npath.clone(), NetScope::new(&npath, kind));
        npath
    }

    /// Looks up a scope by its exact full path.
    pub fn find_scope(&self, key: &str) -> Option<&NetScope> {
        self.scopes.get(key)
    }

    // --- Parameters, memories, functions, tasks ------------------------

    /// Binds a parameter value under its fully qualified name. A later
    /// binding under the same name replaces the earlier one, releasing
    /// whatever signal references it held.
    pub fn set_parameter(&mut self, key: &str, value: Expr) {
        if let Some(old) = self.parameters.remove(key) {
            old.release(self);
        }
        self.parameters.insert(key.to_string(), value);
    }

    /// Finds a parameter from within a scope context, walking outward
    /// until a binding is found.
    pub fn find_parameter(&self, path: &str, name: &str) -> Option<&Expr> {
        find_scoped(&self.parameters, path, name)
    }

    /// Registers a memory under its own name.
    pub fn add_memory(&mut self, mem: NetMemory) {
        self.memories.insert(mem.name().to_string(), mem);
    }

    /// Finds a memory from within a scope context.
    pub fn find_memory(&self, path: &str, name: &str) -> Option<&NetMemory> {
        find_scoped(&self.memories, path, name)
    }

    /// Returns the memory bound to an exact fully qualified name.
    pub fn get_memory(&self, key: &str) -> Option<&NetMemory> {
        self.memories.get(key)
    }

    /// Registers a function definition under `key`.
    pub fn add_function(&mut self, key: &str, def: FuncDef) {
        self.functions.insert(key.to_string(), def);
    }

    /// Finds a function from within a scope context.
    pub fn find_function(&self, path: &str, name: &str) -> Option<&FuncDef> {
        find_scoped(&self.functions, path, name)
    }

    /// Returns the function bound to an exact fully qualified name.
    pub fn get_function(&self, key: &str) -> Option<&FuncDef> {
        self.functions.get(key)
    }

    /// Returns the function bound to an exact name, mutably (for the
    /// second phase of task/function elaboration).
    pub fn get_function_mut(&mut self, key: &str) -> Option<&mut FuncDef> {
        self.functions.get_mut(key)
    }

    /// Registers a task definition under `key`.
    pub fn add_task(&mut self, key: &str, def: TaskDef) {
        self.tasks.insert(key.to_string(), def);
    }

    /// Finds a task from within a scope context.
    pub fn find_task(&self, path: &str, name: &str) -> Option<&TaskDef> {
        find_scoped(&self.tasks, path, name)
    }

    /// Returns the task bound to an exact fully qualified name.
    pub fn get_task(&self, key: &str) -> Option<&TaskDef> {
        self.tasks.get(key)
    }

    /// Returns the task bound to an exact name, mutably.
    pub fn get_task_mut(&mut self, key: &str) -> Option<&mut TaskDef> {
        self.tasks.get_mut(key)
    }

    // --- Signal lookup -------------------------------------------------

    /// Finds a signal by name from within a scope context.
    ///
    /// Probes `path.name` against every registered signal, then trims the
    /// last dotted component of `path` and retries, so the nearest
    /// enclosing declaration shadows outer ones. Finding nothing is a
    /// normal outcome during elaboration of free identifiers.
    pub fn find_signal(&self, path: &str, name: &str) -> Option<NetId> {
        let head = self.signals_head?;
        let mut root = path.to_string();
        loop {
            let full = format!("{root}.{name}");
            let mut cur = head;
            loop {
                if self.nets.get(cur).name() == full {
                    return Some(cur);
                }
                cur = self.signal_ring(cur).prev;
                if cur == head {
                    break;
                }
            }
            match root.rfind('.') {
                Some(pos) => root.truncate(pos),
                None => return None,
            }
        }
    }

    // --- Predicate scans -----------------------------------------------

    /// Returns the first registered, unmarked node satisfying `pred`.
    ///
    /// Passes call this in a loop, marking each returned node before the
    /// next call, to visit every node exactly once without removing ring
    /// members mid-scan.
    pub fn find_node_where(&self, pred: impl Fn(&NetNode) -> bool) -> Option<NodeId> {
        let head = self.nodes_head?;
        let start = self.node_ring(head).next;
        let mut cur = start;
        loop {
            let node = self.nodes.get(cur);
            if !node.base.mark() && pred(node) {
                return Some(cur);
            }
            cur = self.node_ring(cur).next;
            if cur == start {
                return None;
            }
        }
    }

    /// Returns the first registered, unmarked signal satisfying `pred`.
    pub fn find_signal_where(&self, pred: impl Fn(&NetNet) -> bool) -> Option<NetId> {
        let head = self.signals_head?;
        let start = self.signal_ring(head).next;
        let mut cur = start;
        loop {
            let net = self.nets.get(cur);
            if !net.base.mark() && pred(net) {
                return Some(cur);
            }
            cur = self.signal_ring(cur).next;
            if cur == start {
                return None;
            }
        }
    }

    /// Clears the traversal mark of every registered node.
    pub fn clear_node_marks(&mut self) {
        let Some(head) = self.nodes_head else {
            return;
        };
        let mut cur = head;
        loop {
            self.nodes.get_mut(cur).base.set_mark(false);
            cur = self.node_ring(cur).next;
            if cur == head {
                break;
            }
        }
    }

    /// Clears the traversal mark of every registered signal.
    pub fn clear_signal_marks(&mut self) {
        let Some(head) = self.signals_head else {
            return;
        };
        let mut cur = head;
        loop {
            self.nets.get_mut(cur).base.set_mark(false);
            cur = self.signal_ring(cur).next;
            if cur == head {
                break;
            }
        }
    }

    // --- Miscellany ----------------------------------------------------

    /// Returns the value of a driver flag, if set.
    pub fn get_flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    /// Sets a driver flag.
    pub fn set_flag(&mut self, key: &str, value: &str) {
        self.flags.insert(key.to_string(), value.to_string());
    }

    /// Generates a design-unique name for an elaboration temporary under
    /// `path`.
    pub fn local_symbol(&mut self, path: &str) -> String {
        self.lcounter += 1;
        format!("{path}._L{}", self.lcounter)
    }
}

/// Probes `map` for `path.name`, trimming the last dotted component of
/// `path` until a binding is found. Models nested-scope shadowing: the
/// nearest enclosing declaration wins.
fn find_scoped<'a, V>(map: &'a HashMap<String, V>, path: &str, name: &str) -> Option<&'a V> {
    let mut root = path.to_string();
    loop {
        let full = format!("{root}.{name}");
        if let Some(value) = map.get(&full) {
            return Some(value);
        }
        match root.rfind('.') {
            Some(pos) => root.truncate(pos),
            None => return None,
        }
    }
}
