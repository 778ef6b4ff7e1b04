//! Byte-width term trees.
//!
//! Relations are expressed as an equation between two [`Expr`] trees. Every
//! operator here has the property that the low 8 bits of its result only
//! depend on the low 8 bits of its inputs, so targets that promote bytes to
//! wider integers only need to truncate once per side of a comparison.
//!
//! ```text
//! (p0 ^ p1) + p2 == 0x4d
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators over 8-bit values, all wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Xor,
    Or,
    And,
}

impl BinaryOp {
    #[inline]
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::Xor => a ^ b,
            Self::Or => a | b,
            Self::And => a & b,
        }
    }

    /// Infix symbol, shared by C and Python syntax.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Xor => "^",
            Self::Or => "|",
            Self::And => "&",
        }
    }
}

/// A term over byte variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// The byte at this position of the secret.
    Var(usize),
    Const(u8),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Left shift by a fixed amount in `1..8`.
    Shl(Box<Expr>, u8),
}

impl Expr {
    pub fn var(index: usize) -> Self {
        Self::Var(index)
    }

    pub fn constant(value: u8) -> Self {
        Self::Const(value)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn shl(inner: Expr, amount: u8) -> Self {
        Self::Shl(Box::new(inner), amount)
    }

    /// Evaluates the term with 8-bit wraparound.
    ///
    /// # Panics
    /// If a variable index is outside `assignment`.
    pub fn eval(&self, assignment: &[u8]) -> u8 {
        match self {
            Self::Var(index) => assignment[*index],
            Self::Const(value) => *value,
            Self::Binary(op, lhs, rhs) => op.apply(lhs.eval(assignment), rhs.eval(assignment)),
            Self::Shl(inner, amount) => inner.eval(assignment).wrapping_shl(u32::from(*amount)),
        }
    }

    /// True for variables and constants.
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Const(_))
    }

    /// Writes the term in fully parenthesised infix form, naming variables
    /// with `name`.
    pub fn write_infix(&self, out: &mut String, name: &dyn Fn(usize) -> String) {
        match self {
            Self::Var(index) => out.push_str(&name(*index)),
            Self::Const(value) => out.push_str(&value.to_string()),
            Self::Binary(op, lhs, rhs) => {
                out.push('(');
                lhs.write_infix(out, name);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                rhs.write_infix(out, name);
                out.push(')');
            }
            Self::Shl(inner, amount) => {
                out.push('(');
                inner.write_infix(out, name);
                out.push_str(" << ");
                out.push_str(&amount.to_string());
                out.push(')');
            }
        }
    }

    pub fn to_infix(&self, name: &dyn Fn(usize) -> String) -> String {
        let mut out = String::new();
        self.write_infix(&mut out, name);
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_infix(&|i| format!("secret[{i}]")))
    }
}

/// An equation `lhs == rhs` between two terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Predicate {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    pub fn holds(&self, assignment: &[u8]) -> bool {
        self.lhs.eval(assignment) == self.rhs.eval(assignment)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.lhs, self.rhs)
    }
}
