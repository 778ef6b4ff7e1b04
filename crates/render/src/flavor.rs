//! Target-language syntax for relations.
//!
//! Variables are named `p0 .. pN` in both languages. The C flavor promotes
//! bytes to `int`, so every non-atomic side of a comparison is truncated with
//! a `(uint8_t)` cast; the Python flavor works on 8-bit z3 bit-vectors, which
//! wrap on their own.

use armor_core::{ConstraintSystem, Expr, Relation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Separator between conjuncts of the C predicate.
const C_CONJUNCTION: &str = " &&\n        ";

/// Which artifact a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// C program that accepts only the secret.
    Validator,
    /// Python script that recovers the secret with z3.
    Solver,
}

impl Flavor {
    /// Infers the flavor from a template file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "c" | "h" => Some(Self::Validator),
            "py" => Some(Self::Solver),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::Solver => "solver",
        }
    }

    pub fn variable(index: usize) -> String {
        format!("p{index}")
    }

    /// One declaration line per byte variable.
    pub fn declarations(self, size: usize) -> String {
        (0..size)
            .map(|i| match self {
                Self::Validator => format!("    const uint8_t p{i} = input[{i}];"),
                Self::Solver => format!("p{i} = BitVec(\"p{i}\", 8)"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated variable names in position order.
    pub fn variables(size: usize) -> String {
        (0..size).map(Self::variable).collect::<Vec<_>>().join(", ")
    }

    /// A single relation as a boolean expression.
    pub fn relation(self, relation: &Relation) -> String {
        let predicate = relation.predicate();
        match self {
            Self::Validator => format!(
                "({} == {})",
                c_side(&predicate.lhs),
                c_side(&predicate.rhs)
            ),
            Self::Solver => format!(
                "{} == {}",
                predicate.lhs.to_infix(&Self::variable),
                predicate.rhs.to_infix(&Self::variable)
            ),
        }
    }

    /// The conjunction of every relation as one expression.
    pub fn predicate(self, system: &ConstraintSystem) -> String {
        let relations: Vec<String> = system
            .relations()
            .iter()
            .map(|relation| self.relation(relation))
            .collect();
        match self {
            Self::Validator if relations.is_empty() => "1".to_string(),
            Self::Validator => relations.join(C_CONJUNCTION),
            Self::Solver if relations.is_empty() => "True".to_string(),
            Self::Solver => format!("And({})", relations.join(", ")),
        }
    }

    /// One statement per relation.
    pub fn assertions(self, system: &ConstraintSystem) -> String {
        system
            .relations()
            .iter()
            .map(|relation| match self {
                Self::Validator => format!("    if (!{}) return 0;", self.relation(relation)),
                Self::Solver => format!("s.add({})", self.relation(relation)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Escapes `message` for use inside a double-quoted string literal.
    pub fn escape(self, message: &str) -> String {
        match self {
            Self::Validator => escape_c(message),
            Self::Solver => escape_python(message),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn c_side(expr: &Expr) -> String {
    let text = expr.to_infix(&Flavor::variable);
    if expr.is_atom() {
        text
    } else {
        format!("(uint8_t){text}")
    }
}

/// Octal escapes never swallow the following character, unlike `\x`.
fn escape_c(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for byte in message.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}

fn escape_python(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && u32::from(c) < 0x100 => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)))
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}
