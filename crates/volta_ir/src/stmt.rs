//! Behavioral statements for process, task, and function bodies.

use crate::design::Design;
use crate::expr::Expr;
use crate::ids::NetId;
use serde::{Deserialize, Serialize};
use volta_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use volta_source::SourceLoc;

/// Expression width conflicts with the assignment's l-value width.
const E_WIDTH_CONFLICT: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// The l-value/r-value pair of a (non-)blocking assignment.
///
/// A width conflict between the two sides is a *recoverable* user error:
/// it is reported, the design's error count is bumped, and a best-effort
/// coercion is substituted so elaboration can keep going and surface
/// further problems in the same run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assign {
    target: NetId,
    lwidth: u32,
    bmux: Option<Box<Expr>>,
    rval: Option<Box<Expr>>,
    /// Where the assignment appeared in source.
    pub loc: SourceLoc,
}

impl Assign {
    /// Builds a full-width assignment to `target`.
    ///
    /// An r-value narrower than the l-value is reported through `sink`
    /// and `design.errors`, then padded to fit.
    pub fn new(
        design: &mut Design,
        sink: &DiagnosticSink,
        target: NetId,
        mut rval: Expr,
        loc: SourceLoc,
    ) -> Self {
        let lwidth = design.net(target).pin_count();
        if rval.width() < lwidth {
            sink.emit(Diagnostic::error(
                E_WIDTH_CONFLICT,
                format!(
                    "expression width ({}) conflicts with l-value width ({})",
                    rval.width(),
                    lwidth
                ),
                loc,
            ));
            design.errors += 1;
            rval.set_width(lwidth);
        }
        Self {
            target,
            lwidth,
            bmux: None,
            rval: Some(Box::new(rval)),
            loc,
        }
    }

    /// Builds a single-bit assignment through a bit-select multiplexer.
    ///
    /// The r-value must coerce to one bit; failure to do so is reported
    /// and the uncoerced expression kept.
    pub fn new_bitmux(
        design: &mut Design,
        sink: &DiagnosticSink,
        target: NetId,
        bmux: Expr,
        mut rval: Expr,
        loc: SourceLoc,
    ) -> Self {
        let lwidth = design.net(target).pin_count();
        if !rval.set_width(1) {
            sink.emit(Diagnostic::error(
                E_WIDTH_CONFLICT,
                "expression width conflicts with bit-selected l-value",
                loc,
            ));
            design.errors += 1;
        }
        Self {
            target,
            lwidth,
            bmux: Some(Box::new(bmux)),
            rval: Some(Box::new(rval)),
            loc,
        }
    }

    /// The assigned net.
    pub fn target(&self) -> NetId {
        self.target
    }

    /// The l-value width in bits.
    pub fn lwidth(&self) -> u32 {
        self.lwidth
    }

    /// The bit-select expression, for single-bit assignments.
    pub fn bmux(&self) -> Option<&Expr> {
        self.bmux.as_deref()
    }

    /// The r-value expression.
    pub fn rval(&self) -> Option<&Expr> {
        self.rval.as_deref()
    }

    /// Installs the r-value of a two-phase construction.
    ///
    /// # Panics
    ///
    /// Panics if an r-value is already installed.
    pub fn set_rval(&mut self, rval: Expr) {
        assert!(
            self.rval.is_none(),
            "r-value installed twice on the same assignment"
        );
        self.rval = Some(Box::new(rval));
    }

    pub(crate) fn release(&self, design: &mut Design) {
        if let Some(bmux) = &self.bmux {
            bmux.release(design);
        }
        if let Some(rval) = &self.rval {
            rval.release(design);
        }
    }
}

/// A behavioral statement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Statement {
    /// The empty statement.
    Nop,
    /// A sequential block of statements.
    Block(Vec<Statement>),
    /// A blocking assignment (`=`).
    Assign(Assign),
    /// A non-blocking assignment (`<=`).
    AssignNb(Assign),
    /// An if/else statement.
    Condition {
        /// The condition expression.
        cond: Expr,
        /// Executed when the condition holds.
        then_body: Box<Statement>,
        /// Executed otherwise, when present.
        else_body: Option<Box<Statement>>,
    },
}

impl Statement {
    /// Releases every external signal reference held anywhere in this
    /// statement tree.
    pub(crate) fn release(&self, design: &mut Design) {
        match self {
            Statement::Nop => {}
            Statement::Block(stmts) => {
                for stmt in stmts {
                    stmt.release(design);
                }
            }
            Statement::Assign(a) | Statement::AssignNb(a) => a.release(design),
            Statement::Condition {
                cond,
                then_body,
                else_body,
            } => {
                cond.release(design);
                then_body.release(design);
                if let Some(body) = else_body {
                    body.release(design);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetKind;
    use volta_common::LogicVec;

    fn design_with_wide_net() -> (Design, NetId) {
        let mut design = Design::new();
        let net = design.new_signal(None, "top.q", NetKind::Reg, 7, 0);
        (design, net)
    }

    #[test]
    fn matching_widths_are_clean() {
        let (mut design, net) = design_with_wide_net();
        let sink = DiagnosticSink::new();
        let assign = Assign::new(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::all_zero(8)),
            SourceLoc::DUMMY,
        );
        assert_eq!(design.errors, 0);
        assert!(!sink.has_errors());
        assert_eq!(assign.lwidth(), 8);
        assert_eq!(assign.rval().unwrap().width(), 8);
    }

    #[test]
    fn narrow_rval_is_reported_and_padded() {
        let (mut design, net) = design_with_wide_net();
        let sink = DiagnosticSink::new();
        let assign = Assign::new(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::all_one(4)),
            SourceLoc::DUMMY,
        );
        assert_eq!(design.errors, 1);
        assert_eq!(sink.error_count(), 1);
        // Best-effort fallback: the r-value was padded so elaboration
        // can continue.
        assert_eq!(assign.rval().unwrap().width(), 8);
        let diags = sink.take_all();
        assert!(diags[0].message.contains("conflicts with l-value width"));
    }

    #[test]
    fn bitmux_coerces_to_one_bit() {
        let (mut design, net) = design_with_wide_net();
        let sink = DiagnosticSink::new();
        let assign = Assign::new_bitmux(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::from_u64(3, 3)),
            Expr::literal(LogicVec::all_one(4)),
            SourceLoc::DUMMY,
        );
        // Literals coerce, so no error.
        assert_eq!(design.errors, 0);
        assert_eq!(assign.rval().unwrap().width(), 1);
        assert!(assign.bmux().is_some());
    }

    #[test]
    fn bitmux_signal_rval_width_conflict() {
        let (mut design, net) = design_with_wide_net();
        let wide = design.new_signal(None, "top.d", NetKind::Wire, 3, 0);
        let sink = DiagnosticSink::new();
        let rval = Expr::signal(&mut design, wide);
        let _assign = Assign::new_bitmux(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::from_u64(0, 3)),
            rval,
            SourceLoc::DUMMY,
        );
        // A 4-bit signal cannot become 1 bit wide.
        assert_eq!(design.errors, 1);
        assert!(sink.has_errors());
    }

    #[test]
    #[should_panic(expected = "r-value installed twice")]
    fn double_rval_panics() {
        let (mut design, net) = design_with_wide_net();
        let sink = DiagnosticSink::new();
        let mut assign = Assign::new(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::all_zero(8)),
            SourceLoc::DUMMY,
        );
        assign.set_rval(Expr::literal(LogicVec::all_zero(8)));
    }

    #[test]
    fn release_walks_the_tree() {
        let (mut design, net) = design_with_wide_net();
        let sink = DiagnosticSink::new();
        let referenced = design.new_signal(None, "top.en", NetKind::Wire, 0, 0);
        let cond = Expr::signal(&mut design, referenced);
        let assign = Assign::new(
            &mut design,
            &sink,
            net,
            Expr::literal(LogicVec::all_zero(8)),
            SourceLoc::DUMMY,
        );
        let stmt = Statement::Condition {
            cond,
            then_body: Box::new(Statement::Assign(assign)),
            else_body: Some(Box::new(Statement::Nop)),
        };
        assert_eq!(design.net(referenced).eref(), 1);
        stmt.release(&mut design);
        assert_eq!(design.net(referenced).eref(), 0);
    }
}
