//! A tiny evaluator for rendered relation expressions.
//!
//! Understands exactly what the flavors print: `p<i>` variables, decimal
//! constants, parentheses, `(uint8_t)` casts and the operators
//! `* + - << == & ^ | &&`.

/// How intermediate values behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    /// C: bytes promote to `int`, only casts truncate.
    C,
    /// z3 8-bit bit-vectors: every operation wraps.
    BitVec8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Num(i64),
    Var(usize),
    Open,
    Close,
    Cast,
    Op(&'static str),
}

const OPERATORS: [&str; 9] = ["<<", "==", "&&", "+", "-", "*", "^", "|", "&"];

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source.trim_start();
    while !rest.is_empty() {
        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if let Some(after) = rest.strip_prefix("(uint8_t)") {
            tokens.push(Token::Cast);
            rest = after;
        } else if let Some(after) = rest.strip_prefix('(') {
            tokens.push(Token::Open);
            rest = after;
        } else if let Some(after) = rest.strip_prefix(')') {
            tokens.push(Token::Close);
            rest = after;
        } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
            let end = digits(rest);
            tokens.push(Token::Num(rest[..end].parse().unwrap()));
            rest = &rest[end..];
        } else if let Some(after) = rest.strip_prefix('p') {
            let end = digits(after);
            tokens.push(Token::Var(after[..end].parse().unwrap()));
            rest = &after[end..];
        } else {
            let op = OPERATORS
                .into_iter()
                .find(|op| rest.starts_with(op))
                .unwrap_or_else(|| panic!("unexpected input: {rest}"));
            tokens.push(Token::Op(op));
            rest = &rest[op.len()..];
        }
        rest = rest.trim_start();
    }
    tokens
}

fn precedence(op: &str) -> u8 {
    match op {
        "&&" => 1,
        "|" => 2,
        "^" => 3,
        "&" => 4,
        "==" => 5,
        "<<" => 6,
        "+" | "-" => 7,
        "*" => 8,
        _ => unreachable!("{op}"),
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    values: &'a [u8],
    semantics: Semantics,
}

impl Parser<'_> {
    fn next(&mut self) -> Token {
        let token = self.tokens[self.position];
        self.position += 1;
        token
    }

    fn expression(&mut self, min_precedence: u8) -> i64 {
        let mut lhs = self.operand();
        while let Some(&Token::Op(op)) = self.tokens.get(self.position) {
            let precedence = precedence(op);
            if precedence < min_precedence {
                break;
            }
            self.position += 1;
            let rhs = self.expression(precedence + 1);
            lhs = self.apply(op, lhs, rhs);
        }
        lhs
    }

    fn operand(&mut self) -> i64 {
        match self.next() {
            Token::Num(value) => value,
            Token::Var(index) => i64::from(self.values[index]),
            Token::Cast => self.operand() & 0xff,
            Token::Open => {
                let value = self.expression(0);
                assert_eq!(self.next(), Token::Close);
                value
            }
            token => panic!("unexpected token {token:?}"),
        }
    }

    fn apply(&self, op: &str, lhs: i64, rhs: i64) -> i64 {
        let value = match op {
            "==" => return i64::from(lhs == rhs),
            "&&" => return i64::from(lhs != 0 && rhs != 0),
            "+" => lhs + rhs,
            "-" => lhs - rhs,
            "*" => lhs * rhs,
            "<<" => lhs << rhs,
            "^" => lhs ^ rhs,
            "|" => lhs | rhs,
            "&" => lhs & rhs,
            _ => unreachable!("{op}"),
        };
        match self.semantics {
            Semantics::C => value,
            Semantics::BitVec8 => value & 0xff,
        }
    }
}

/// Evaluates `source` with `p<i>` bound to `values[i]`.
pub fn evaluate(source: &str, values: &[u8], semantics: Semantics) -> i64 {
    let mut parser = Parser {
        tokens: tokenize(source),
        position: 0,
        values,
        semantics,
    };
    let value = parser.expression(0);
    assert_eq!(parser.position, parser.tokens.len(), "trailing input in {source}");
    value
}

/// The boolean returned by the `check` function of a rendered validator.
pub fn validator_accepts(program: &str, input: &[u8]) -> bool {
    let start = program.find("return ").expect("validator has a return") + "return ".len();
    let end = start + program[start..].find(';').expect("return statement ends");
    evaluate(&program[start..end], input, Semantics::C) != 0
}

/// Whether every `s.add(...)` line of a rendered solver script holds.
pub fn solver_assertions_hold(script: &str, input: &[u8]) -> bool {
    script
        .lines()
        .filter_map(|line| line.strip_prefix("s.add(")?.strip_suffix(')'))
        .all(|assertion| evaluate(assertion, input, Semantics::BitVec8) != 0)
}

#[test]
fn test_evaluator_follows_each_semantics() {
    assert_eq!(evaluate("(p0 - p1)", &[1, 2], Semantics::C), -1);
    assert_eq!(evaluate("(uint8_t)(p0 - p1)", &[1, 2], Semantics::C), 255);
    assert_eq!(evaluate("(p0 - p1)", &[1, 2], Semantics::BitVec8), 255);
    assert_eq!(evaluate("(p0 << 4) == 0", &[0x10], Semantics::BitVec8), 1);
    assert_eq!(evaluate("(1 == 1) && (2 == 3)", &[], Semantics::C), 0);
}
