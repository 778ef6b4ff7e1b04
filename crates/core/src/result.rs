//! Core results and error types

use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A relation was instantiated with the wrong number of operands.
    #[error("relation {kind} expects {expected} operands, got {actual}")]
    ArityMismatch {
        /// Name of the relation kind.
        kind: &'static str,
        /// Operand count required by the kind.
        expected: usize,
        /// Operand count supplied.
        actual: usize,
    },

    /// Secrets must contain at least one byte.
    #[error("secret is empty")]
    EmptySecret,

    /// Seed is neither an integer nor a hex seed.
    #[error("invalid seed '{0}': expected an integer or 0x-prefixed hex")]
    InvalidSeed(String),

    /// Invalid hexadecimal in seed.
    #[error("invalid hexadecimal in seed")]
    InvalidSeedHex,

    /// Invalid seed length.
    #[error("invalid seed length: expected 64 hex chars, got {0}")]
    InvalidSeedLength(usize),

    /// A relation references a byte outside the secret.
    #[error("operand {index} is out of range for {size} variables")]
    OperandOutOfRange {
        /// The offending byte index.
        index: usize,
        /// Number of variables in the domain.
        size: usize,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
