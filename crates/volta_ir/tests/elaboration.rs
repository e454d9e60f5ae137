//! End-to-end exercises of the netlist the way an elaboration front end
//! drives it: build objects, wire pins, register everything, then query
//! the graph like a synthesis pass would.

use volta_common::{Logic, LogicVec};
use volta_diagnostics::DiagnosticSink;
use volta_ir::{
    Design, Expr, LinkDir, LinkRef, NetKind, NetProcTop, ObjRef, ProcKind, ScopeKind, Statement,
};
use volta_source::SourceLoc;

#[test]
fn constant_driving_a_wire() {
    let mut design = Design::new();
    design.make_root_scope("top");

    // A two-bit wire and a one-bit constant driver on its low bit.
    let w = design.new_signal(Some("top"), "top.w", NetKind::Wire, 1, 0);
    design.add_signal(w);
    let c = design.new_const("top._c0", LogicVec::from_u64(1, 1));
    design.add_node(c);

    design.connect(LinkRef::node(c, 0), LinkRef::net(w, 0));

    // Exactly one driver on the nexus, visible from either end.
    assert_eq!(design.count_outputs(LinkRef::net(w, 0)), 1);
    assert_eq!(design.count_outputs(LinkRef::node(c, 0)), 1);

    // The wire gives the anonymous constant's nexus its natural name.
    let (sig, bidx) = design.find_link_signal(ObjRef::Node(c), 0).unwrap();
    assert_eq!(sig, w);
    assert_eq!(bidx, 0);
    assert_eq!(design.net(sig).name(), "top.w");

    // The wire's other bit is untouched.
    assert_eq!(design.count_outputs(LinkRef::net(w, 1)), 0);
    assert!(!design.is_linked(LinkRef::net(w, 1)));
}

#[test]
fn scope_walk_finds_nearest_declaration() {
    let mut design = Design::new();
    let top = design.make_root_scope("top");
    let a = design.make_scope(&top, ScopeKind::Module, "a");
    design.make_scope(&a, ScopeKind::Begin, "b");

    let sig = design.new_signal(Some("top.a"), "top.a.sig", NetKind::Reg, 7, 0);
    design.add_signal(sig);

    // Found from the deepest scope by trimming one level.
    assert_eq!(design.find_signal("top.a.b", "sig"), Some(sig));
    // A sibling/child declaration is invisible from the parent.
    assert_eq!(design.find_signal("top", "sig"), None);
}

#[test]
fn elaboration_to_optimization_lifecycle() {
    let mut design = Design::new();
    let sink = DiagnosticSink::new();
    design.make_root_scope("top");

    // Declared signals.
    let d = design.new_signal(Some("top"), "top.d", NetKind::Wire, 0, 0);
    let q = design.new_signal(Some("top"), "top.q", NetKind::Reg, 0, 0);
    for id in [d, q] {
        design.add_signal(id);
    }

    // A buffer device between them.
    let buf = design.new_device("top.b0", "BUF", 2);
    design.node_mut(buf).base.pin_mut(0).set_dir(LinkDir::Output);
    design.node_mut(buf).base.pin_mut(1).set_dir(LinkDir::Input);
    design.add_node(buf);
    design.connect(LinkRef::node(buf, 0), LinkRef::net(q, 0));
    design.connect(LinkRef::node(buf, 1), LinkRef::net(d, 0));

    // A process assigning the register.
    let rval = Expr::signal(&mut design, d);
    let assign = volta_ir::Assign::new(&mut design, &sink, q, rval, SourceLoc::DUMMY);
    let proc = design.add_process(NetProcTop::new(
        ProcKind::Always,
        Statement::AssignNb(assign),
    ));
    assert_eq!(design.errors, 0);

    // A pass scans for nodes driving q's nexus.
    design.clear_node_marks();
    let found = design
        .find_node_where(|node| node.name() == "top.b0")
        .unwrap();
    assert_eq!(found, buf);
    assert_eq!(
        design.find_next_output(LinkRef::net(q, 0)),
        Some(LinkRef::node(buf, 0))
    );

    // Optimization removes the buffer; its pins leave their nexuses.
    design.free_node(buf);
    assert_eq!(design.count_outputs(LinkRef::net(q, 0)), 0);

    // Tearing down the process releases d, allowing its removal.
    design.delete_process(proc);
    design.free_signal(d);
    assert!(design.find_signal("top", "d").is_none());
    assert_eq!(design.find_signal("top", "q"), Some(q));
}

#[test]
fn width_conflict_is_recoverable() {
    let mut design = Design::new();
    let sink = DiagnosticSink::new();
    let q = design.new_signal(None, "top.q", NetKind::Reg, 7, 0);
    design.add_signal(q);

    let narrow = Expr::literal(LogicVec::from_u64(1, 2));
    let assign = volta_ir::Assign::new(&mut design, &sink, q, narrow, SourceLoc::DUMMY);

    // Reported, counted, and patched up so elaboration can continue.
    assert_eq!(design.errors, 1);
    assert!(sink.has_errors());
    assert_eq!(assign.rval().unwrap().width(), 8);
}

#[test]
fn sequential_udp_compiles_and_evaluates() {
    let mut design = Design::new();
    // A D-type primitive: output, clock, data.
    let dff = design.new_udp("top.dff0", 3, true);
    design.add_node(dff);
    assert_eq!(design.node(dff).pin(0).dir(), LinkDir::Output);
    assert_eq!(design.node(dff).pin(1).dir(), LinkDir::Input);

    {
        let table = design.node_mut(dff).udp_mut().unwrap();
        // Rising clock latches data; falling clock holds.
        table.set_table("?r0", '0').unwrap();
        table.set_table("?r1", '1').unwrap();
        table.set_table("?f?", '-').unwrap();
        table.set_initial('0');
        table.cleanup_table();
    }

    let table = design.node(dff).udp().unwrap();
    assert_eq!(table.init(), '0');
    // Current output 0, clock rising with data 1: output becomes 1.
    assert_eq!(table.table_lookup("001", '1', 1), '1');
    // Current output 1, clock falling: output holds.
    assert_eq!(table.table_lookup("111", '0', 1), '1');
    // Unrecorded combination: unknown.
    assert_eq!(table.table_lookup("0x1", '1', 2), 'x');
}

#[test]
fn net_initial_values_default_high_impedance() {
    let mut design = Design::new();
    let w = design.new_signal(None, "top.w", NetKind::Tri, 3, 0);
    assert_eq!(design.net(w).init_value(0), Logic::Z);
    design.net_mut(w).set_init_value(0, Logic::One);
    assert_eq!(design.net(w).init_value(0), Logic::One);
}
