//! Expression trees consumed by the behavioral layer.
//!
//! The netlist core keeps expressions deliberately small: enough for
//! process bodies, parameter values, and assignment right-hand sides.
//! Device-specific expression lowering lives with the synthesis passes,
//! not here.

use crate::design::Design;
use crate::ids::NetId;
use serde::{Deserialize, Serialize};
use volta_common::LogicVec;
use volta_source::SourceLoc;

/// A unary operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~`).
    Not,
    /// Arithmetic negation (`-`).
    Neg,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction XOR (`^`).
    RedXor,
    /// Logical NOT (`!`).
    LogicNot,
}

/// A binary operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Left shift (`<<`).
    Shl,
    /// Right shift (`>>`).
    Shr,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

/// The payload of an [`Expr`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExprKind {
    /// A literal constant.
    Literal(LogicVec),
    /// A reference to a declared signal. Holding one of these counts as
    /// an external reference on the net; see [`Expr::signal`].
    Signal(NetId),
    /// A parameter reference, resolved late through
    /// [`Design::find_parameter`](crate::design::Design::find_parameter).
    Param {
        /// The scope path the reference appeared in.
        path: String,
        /// The parameter name.
        name: String,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: Box<Expr>,
        /// The right-hand side.
        rhs: Box<Expr>,
    },
}

/// A width-carrying expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expr {
    width: u32,
    /// The expression payload.
    pub kind: ExprKind,
    /// Where this expression appeared in source.
    pub loc: SourceLoc,
}

impl Expr {
    /// Creates a literal expression; its width is the literal's width.
    pub fn literal(value: LogicVec) -> Self {
        Self {
            width: value.width(),
            kind: ExprKind::Literal(value),
            loc: SourceLoc::DUMMY,
        }
    }

    /// Creates a signal reference, claiming an external reference on the
    /// net. The owner of the expression must call
    /// [`release`](Self::release) before the net may be freed.
    pub fn signal(design: &mut Design, net: NetId) -> Self {
        let width = design.net(net).pin_count();
        design.net_mut(net).incr_eref();
        Self {
            width,
            kind: ExprKind::Signal(net),
            loc: SourceLoc::DUMMY,
        }
    }

    /// Creates a late-bound parameter reference. Its width is unknown
    /// (zero) until resolution.
    pub fn param(path: &str, name: &str) -> Self {
        Self {
            width: 0,
            kind: ExprKind::Param {
                path: path.to_string(),
                name: name.to_string(),
            },
            loc: SourceLoc::DUMMY,
        }
    }

    /// Creates a unary operation. Reductions and logical NOT are one bit
    /// wide; NOT and negation keep the operand width.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let width = match op {
            UnaryOp::Not | UnaryOp::Neg => operand.width,
            UnaryOp::RedAnd | UnaryOp::RedOr | UnaryOp::RedXor | UnaryOp::LogicNot => 1,
        };
        Self {
            width,
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            loc: SourceLoc::DUMMY,
        }
    }

    /// Creates a binary operation. Comparisons and logical connectives
    /// are one bit wide; everything else takes the wider operand.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        let width = match op {
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::LogicAnd
            | BinaryOp::LogicOr => 1,
            _ => lhs.width.max(rhs.width),
        };
        Self {
            width,
            kind: ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            loc: SourceLoc::DUMMY,
        }
    }

    /// The width of this expression in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Attempts to coerce this expression to `width` bits, returning
    /// `true` on success.
    ///
    /// Literals pad or truncate; parameter references accept any width
    /// until resolved; signal references have a fixed width and refuse
    /// anything else. Operators forward the request to their operands
    /// where the operation preserves width.
    pub fn set_width(&mut self, width: u32) -> bool {
        match &mut self.kind {
            ExprKind::Literal(value) => {
                value.resize(width);
                self.width = width;
                true
            }
            ExprKind::Signal(_) => self.width == width,
            ExprKind::Param { .. } => {
                self.width = width;
                true
            }
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Not | UnaryOp::Neg => {
                    if operand.set_width(width) {
                        self.width = width;
                        true
                    } else {
                        false
                    }
                }
                _ => width == 1,
            },
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::LogicAnd
                | BinaryOp::LogicOr => width == 1,
                _ => {
                    let lhs_ok = lhs.set_width(width);
                    let rhs_ok = rhs.set_width(width);
                    if lhs_ok && rhs_ok {
                        self.width = width;
                        true
                    } else {
                        false
                    }
                }
            },
        }
    }

    /// Releases every external signal reference held by this expression.
    /// Must be called exactly once when the owning construct is torn
    /// down.
    pub fn release(&self, design: &mut Design) {
        match &self.kind {
            ExprKind::Signal(net) => design.net_mut(*net).decr_eref(),
            ExprKind::Unary { operand, .. } => operand.release(design),
            ExprKind::Binary { lhs, rhs, .. } => {
                lhs.release(design);
                rhs.release(design);
            }
            ExprKind::Literal(_) | ExprKind::Param { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::net::NetKind;

    #[test]
    fn literal_width() {
        let e = Expr::literal(LogicVec::from_u64(5, 8));
        assert_eq!(e.width(), 8);
    }

    #[test]
    fn literal_set_width_resizes() {
        let mut e = Expr::literal(LogicVec::from_u64(0b11, 2));
        assert!(e.set_width(4));
        assert_eq!(e.width(), 4);
        match &e.kind {
            ExprKind::Literal(v) => assert_eq!(v.to_u64(), Some(0b11)),
            _ => panic!("expected Literal"),
        }
    }

    #[test]
    fn signal_width_is_fixed() {
        let mut design = Design::new();
        let w = design.new_signal(None, "top.w", NetKind::Wire, 3, 0);
        let mut e = Expr::signal(&mut design, w);
        assert_eq!(e.width(), 4);
        assert!(e.set_width(4));
        assert!(!e.set_width(1));
    }

    #[test]
    fn signal_claims_and_releases_eref() {
        let mut design = Design::new();
        let w = design.new_signal(None, "top.w", NetKind::Wire, 0, 0);
        let e = Expr::signal(&mut design, w);
        assert_eq!(design.net(w).eref(), 1);
        e.release(&mut design);
        assert_eq!(design.net(w).eref(), 0);
    }

    #[test]
    fn comparison_is_one_bit() {
        let e = Expr::binary(
            BinaryOp::Eq,
            Expr::literal(LogicVec::all_zero(8)),
            Expr::literal(LogicVec::all_zero(8)),
        );
        assert_eq!(e.width(), 1);
        let mut e = e;
        assert!(e.set_width(1));
        assert!(!e.set_width(8));
    }

    #[test]
    fn bitwise_takes_wider_operand() {
        let e = Expr::binary(
            BinaryOp::And,
            Expr::literal(LogicVec::all_zero(4)),
            Expr::literal(LogicVec::all_zero(8)),
        );
        assert_eq!(e.width(), 8);
    }

    #[test]
    fn not_forwards_width() {
        let mut e = Expr::unary(UnaryOp::Not, Expr::literal(LogicVec::all_zero(4)));
        assert_eq!(e.width(), 4);
        assert!(e.set_width(8));
        assert_eq!(e.width(), 8);
    }

    #[test]
    fn reduction_is_one_bit() {
        let e = Expr::unary(UnaryOp::RedOr, Expr::literal(LogicVec::all_zero(4)));
        assert_eq!(e.width(), 1);
    }

    #[test]
    fn param_accepts_any_width() {
        let mut e = Expr::param("top.u1", "WIDTH");
        assert_eq!(e.width(), 0);
        assert!(e.set_width(16));
        assert_eq!(e.width(), 16);
    }

    #[test]
    fn nested_release() {
        let mut design = Design::new();
        let w = design.new_signal(None, "top.w", NetKind::Wire, 0, 0);
        let a = Expr::signal(&mut design, w);
        let b = Expr::signal(&mut design, w);
        let e = Expr::binary(BinaryOp::Xor, a, b);
        assert_eq!(design.net(w).eref(), 2);
        e.release(&mut design);
        assert_eq!(design.net(w).eref(), 0);
    }
}
