//! The secret being protected and its byte-variable view.

use crate::result::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An immutable, non-empty byte string.
///
/// Each position is modelled as an 8-bit unsigned variable; the known byte
/// values are only consulted while generating relations.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Secret {
    bytes: Vec<u8>,
}

/// One position of the secret together with its known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteVariable {
    pub index: usize,
    pub value: u8,
}

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Number of byte variables.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false, secrets are never empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Iterates the byte variables in position order.
    pub fn variables(&self) -> impl Iterator<Item = ByteVariable> + '_ {
        self.bytes
            .iter()
            .enumerate()
            .map(|(index, &value)| ByteVariable { index, value })
    }

    /// Printable form with non-ASCII bytes escaped, for logs and reports.
    pub fn escaped(&self) -> String {
        self.bytes.escape_ascii().to_string()
    }
}

impl TryFrom<Vec<u8>> for Secret {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::new(bytes)
    }
}

impl From<Secret> for Vec<u8> {
    fn from(secret: Secret) -> Self {
        secret.bytes
    }
}

impl FromStr for Secret {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(b\"{}\")", self.escaped())
    }
}
