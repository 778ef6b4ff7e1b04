//! The relation catalog.
//!
//! A [`Relation`] is a `(kind, operands, constant)` triple. The kind decides
//! the arity, how the constant is computed from the operand bytes, and which
//! [`Predicate`] is emitted for it. Everything downstream (generation,
//! solving, rendering) goes through [`RelationKind::evaluate`] and
//! [`Relation::predicate`], so a new shape only needs a variant here plus its
//! arms in those two functions.
//!
//! | kind          | arity | predicate                 |
//! |---------------|-------|---------------------------|
//! | `Xor`         | 2     | `a ^ b == c`              |
//! | `Sum`         | 2     | `a + b == c`              |
//! | `Diff`        | 2     | `a - b == c`              |
//! | `Product`     | 2     | `a * b == c`              |
//! | `Shift{k}`    | 2     | `(a << k) ^ b == c`       |
//! | `Offset`      | 2     | `a == b + c`              |
//! | `Or`          | 2     | `a \| b == c`             |
//! | `And`         | 2     | `a & b == c`              |
//! | `Scale{f}`    | 1     | `a * f == c` (f odd)      |
//! | `TripleSum`   | 3     | `a + b + d == c`          |
//! | `Mix`         | 3     | `(a ^ b) + d == c`        |

use crate::expr::{BinaryOp, Expr, Predicate};
use crate::result::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest operand count of any relation kind.
pub const MAX_ARITY: usize = 3;

/// Relation shapes. Parameterised kinds carry their parameter inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Xor,
    Sum,
    Diff,
    Product,
    /// Shift amount in `1..=7`.
    Shift { amount: u8 },
    Offset,
    Or,
    And,
    /// Odd multiplier, so the relation is a bijection on the byte.
    Scale { factor: u8 },
    TripleSum,
    Mix,
}

impl RelationKind {
    /// Every shape in the catalog, with placeholder parameters.
    pub const CATALOG: [RelationKind; 11] = [
        Self::Xor,
        Self::Sum,
        Self::Diff,
        Self::Product,
        Self::Shift { amount: 1 },
        Self::Offset,
        Self::Or,
        Self::And,
        Self::Scale { factor: 1 },
        Self::TripleSum,
        Self::Mix,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Xor => "xor",
            Self::Sum => "sum",
            Self::Diff => "diff",
            Self::Product => "product",
            Self::Shift { .. } => "shift",
            Self::Offset => "offset",
            Self::Or => "or",
            Self::And => "and",
            Self::Scale { .. } => "scale",
            Self::TripleSum => "triple_sum",
            Self::Mix => "mix",
        }
    }

    pub const fn arity(&self) -> usize {
        match self {
            Self::Scale { .. } => 1,
            Self::TripleSum | Self::Mix => 3,
            _ => 2,
        }
    }

    /// Relative selection weight.
    ///
    /// Bijective shapes are favoured; lossy ones (`Or`, `And`, `Product`)
    /// prune less per relation, and `Scale` pins a byte on its own.
    pub const fn weight(&self) -> u32 {
        match self {
            Self::Xor | Self::Sum | Self::Diff => 4,
            Self::Shift { .. } | Self::Offset => 3,
            Self::Product | Self::TripleSum | Self::Mix => 2,
            Self::Or | Self::And | Self::Scale { .. } => 1,
        }
    }

    /// Number of leading operands whose order does not matter.
    const fn commutative_prefix(&self) -> usize {
        match self {
            Self::Xor | Self::Sum | Self::Product | Self::Or | Self::And => 2,
            Self::TripleSum => 3,
            Self::Mix => 2,
            _ => 0,
        }
    }

    /// Picks a weighted random kind with arity at most `max_arity`, drawing
    /// its parameters as well.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_arity: usize) -> Option<Self> {
        let total: u32 = Self::CATALOG
            .iter()
            .filter(|kind| kind.arity() <= max_arity)
            .map(RelationKind::weight)
            .sum();
        if total == 0 {
            return None;
        }

        let mut roll = rng.random_range(0..total);
        for kind in Self::CATALOG.iter().filter(|kind| kind.arity() <= max_arity) {
            if roll < kind.weight() {
                return Some(kind.with_random_parameters(rng));
            }
            roll -= kind.weight();
        }
        None
    }

    fn with_random_parameters<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        match self {
            Self::Shift { .. } => Self::Shift {
                amount: rng.random_range(1..=7),
            },
            Self::Scale { .. } => Self::Scale {
                factor: (rng.random_range(1..128u8) << 1) | 1,
            },
            other => other,
        }
    }

    /// Computes the relation's constant from the operand bytes.
    ///
    /// Returns `None` when `values` does not match the arity.
    pub fn evaluate(&self, values: &[u8]) -> Option<u8> {
        let value = match (*self, values) {
            (Self::Xor, &[a, b]) => a ^ b,
            (Self::Sum, &[a, b]) => a.wrapping_add(b),
            (Self::Diff, &[a, b]) | (Self::Offset, &[a, b]) => a.wrapping_sub(b),
            (Self::Product, &[a, b]) => a.wrapping_mul(b),
            (Self::Shift { amount }, &[a, b]) => a.wrapping_shl(u32::from(amount)) ^ b,
            (Self::Or, &[a, b]) => a | b,
            (Self::And, &[a, b]) => a & b,
            (Self::Scale { factor }, &[a]) => a.wrapping_mul(factor),
            (Self::TripleSum, &[a, b, d]) => a.wrapping_add(b).wrapping_add(d),
            (Self::Mix, &[a, b, d]) => (a ^ b).wrapping_add(d),
            _ => return None,
        };
        Some(value)
    }

    /// The last operand that makes the relation hold, given the others.
    ///
    /// Only shapes where that operand is uniquely determined answer; the
    /// rest, and a `leading` slice of the wrong length, give `None`.
    pub fn complete(&self, leading: &[u8], constant: u8) -> Option<u8> {
        let value = match (*self, leading) {
            (Self::Xor, &[a]) => a ^ constant,
            (Self::Sum, &[a]) => constant.wrapping_sub(a),
            (Self::Diff | Self::Offset, &[a]) => a.wrapping_sub(constant),
            (Self::Shift { amount }, &[a]) => a.wrapping_shl(u32::from(amount)) ^ constant,
            (Self::TripleSum, &[a, b]) => constant.wrapping_sub(a).wrapping_sub(b),
            (Self::Mix, &[a, b]) => constant.wrapping_sub(a ^ b),
            _ => return None,
        };
        Some(value)
    }

    /// Whether [`Self::complete`] answers for this shape.
    pub const fn determines_last(&self) -> bool {
        matches!(
            self,
            Self::Xor
                | Self::Sum
                | Self::Diff
                | Self::Offset
                | Self::Shift { .. }
                | Self::TripleSum
                | Self::Mix
        )
    }

    /// Constants that merely copy one byte into another.
    pub const fn is_degenerate(&self, constant: u8) -> bool {
        matches!(self, Self::Xor | Self::Diff | Self::Offset) && constant == 0
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift { amount } => write!(f, "shift<<{amount}"),
            Self::Scale { factor } => write!(f, "scale*{factor}"),
            other => f.write_str(other.name()),
        }
    }
}

/// One instantiated relation over byte variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRelation")]
pub struct Relation {
    kind: RelationKind,
    operands: Vec<usize>,
    constant: u8,
}

#[derive(Deserialize)]
struct RawRelation {
    kind: RelationKind,
    operands: Vec<usize>,
    constant: u8,
}

impl TryFrom<RawRelation> for Relation {
    type Error = Error;

    fn try_from(raw: RawRelation) -> Result<Self> {
        Self::new(raw.kind, raw.operands, raw.constant)
    }
}

impl Relation {
    /// Builds a relation from an explicit constant.
    pub fn new(kind: RelationKind, operands: Vec<usize>, constant: u8) -> Result<Self> {
        if operands.len() != kind.arity() {
            return Err(Error::ArityMismatch {
                kind: kind.name(),
                expected: kind.arity(),
                actual: operands.len(),
            });
        }
        Ok(Self {
            kind,
            operands,
            constant,
        })
    }

    /// Builds a relation whose constant makes it hold on `bytes`.
    pub fn instantiate(kind: RelationKind, operands: Vec<usize>, bytes: &[u8]) -> Result<Self> {
        if let Some(&index) = operands.iter().find(|&&index| index >= bytes.len()) {
            return Err(Error::OperandOutOfRange {
                index,
                size: bytes.len(),
            });
        }
        let values: Vec<u8> = operands.iter().map(|&index| bytes[index]).collect();
        let constant = kind.evaluate(&values).ok_or(Error::ArityMismatch {
            kind: kind.name(),
            expected: kind.arity(),
            actual: operands.len(),
        })?;
        Self::new(kind, operands, constant)
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn operands(&self) -> &[usize] {
        &self.operands
    }

    pub fn constant(&self) -> u8 {
        self.constant
    }

    /// Whether the relation is satisfied by a full assignment.
    ///
    /// # Panics
    /// If an operand is outside `assignment`.
    pub fn holds(&self, assignment: &[u8]) -> bool {
        let mut values = [0u8; MAX_ARITY];
        for (slot, &index) in values.iter_mut().zip(&self.operands) {
            *slot = assignment[index];
        }
        self.kind.evaluate(&values[..self.operands.len()]) == Some(self.constant)
    }

    /// The equation this relation stands for.
    pub fn predicate(&self) -> Predicate {
        let v = |position: usize| Expr::var(self.operands[position]);
        let c = Expr::constant(self.constant);
        let bin = Expr::binary;
        match self.kind {
            RelationKind::Xor => Predicate::new(bin(BinaryOp::Xor, v(0), v(1)), c),
            RelationKind::Sum => Predicate::new(bin(BinaryOp::Add, v(0), v(1)), c),
            RelationKind::Diff => Predicate::new(bin(BinaryOp::Sub, v(0), v(1)), c),
            RelationKind::Product => Predicate::new(bin(BinaryOp::Mul, v(0), v(1)), c),
            RelationKind::Shift { amount } => Predicate::new(
                bin(BinaryOp::Xor, Expr::shl(v(0), amount), v(1)),
                c,
            ),
            RelationKind::Offset => Predicate::new(v(0), bin(BinaryOp::Add, v(1), c)),
            RelationKind::Or => Predicate::new(bin(BinaryOp::Or, v(0), v(1)), c),
            RelationKind::And => Predicate::new(bin(BinaryOp::And, v(0), v(1)), c),
            RelationKind::Scale { factor } => Predicate::new(
                bin(BinaryOp::Mul, v(0), Expr::constant(factor)),
                c,
            ),
            RelationKind::TripleSum => Predicate::new(
                bin(BinaryOp::Add, bin(BinaryOp::Add, v(0), v(1)), v(2)),
                c,
            ),
            RelationKind::Mix => Predicate::new(
                bin(BinaryOp::Add, bin(BinaryOp::Xor, v(0), v(1)), v(2)),
                c,
            ),
        }
    }

    /// Key under which syntactically identical relations collide.
    pub fn canonical_key(&self) -> (RelationKind, Vec<usize>) {
        let mut operands = self.operands.clone();
        let prefix = self.kind.commutative_prefix().min(operands.len());
        operands[..prefix].sort_unstable();
        (self.kind, operands)
    }

    /// True when the relation constrains nothing useful: a byte related to
    /// itself, or a plain copy of one byte into another.
    pub fn is_tautological(&self) -> bool {
        let repeated = self
            .operands
            .iter()
            .enumerate()
            .any(|(i, a)| self.operands[i + 1..].contains(a));
        repeated || self.kind.is_degenerate(self.constant)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.predicate().fmt(f)
    }
}
