//! Core types for armor.
//!
//! A [`Secret`] is modelled as one 8-bit variable per byte. Relations from the
//! catalog in [`relation`] are instantiated against the known bytes and
//! collected into a [`ConstraintSystem`]; the [`Seed`] drives every random
//! choice made along the way.

pub mod expr;
pub mod relation;
pub mod result;
pub mod secret;
pub mod seed;
pub mod system;

pub use expr::{BinaryOp, Expr, Predicate};
pub use relation::{Relation, RelationKind, MAX_ARITY};
pub use result::{Error, Result};
pub use secret::{ByteVariable, Secret};
pub use seed::Seed;
pub use system::ConstraintSystem;

/// Width in bits of every variable in a constraint system.
pub const BYTE_WIDTH: u32 = 8;
