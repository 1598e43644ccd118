//! The centralized operator table: a total function from
//! `(operator, left kind, right kind)` to either a result-producing rule or
//! an explicit type error.
//!
//! Every operator application in the evaluator goes through [`unary`],
//! [`binary`], or [`truth`] — promotion and coercion rules live here and
//! nowhere else, so they can be tested in isolation.
//!
//! The rules, exactly:
//!
//! - `!` is defined only for booleans; `-` only for longs and doubles.
//! - `+ - * / %` on two longs stay long (`/` truncates, `%` is the
//!   remainder, arithmetic wraps on 64-bit overflow); any double operand
//!   promotes the other side and the result to double.
//! - `+` additionally concatenates when at least one operand is a string:
//!   the other operand is rendered to its canonical text (defined for long,
//!   double, boolean, string, and pattern — a pattern renders its original
//!   source text).  `nil`, objects, and functions have no canonical text, so
//!   pairing them with a string under `+` is a type error.
//! - `== !=` promote numerics, compare strings and booleans, and treat a
//!   `nil` operand as identity (`nil == nil`, `nil != anything-else`).
//! - `< <= > >=` promote numerics and compare strings lexicographically;
//!   every other pairing is a type error.
//! - `&& ||` demand booleans on both sides; short-circuiting itself is the
//!   evaluator's job, [`truth`] validates whichever operand got evaluated.

use std::cmp::Ordering;

use crate::error::{EvalError, Result};
use crate::value::{Kind, Value};

/// Binary operator identifiers, one per infix construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// Source-level spelling, for diagnostics.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Prefix operator identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}

/// Apply a prefix operator to a single operand.
pub fn unary(op: UnOp, operand: &Value, line: usize) -> Result<Value> {
    match (op, operand) {
        (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

        (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),

        (op, operand) => Err(unary_mismatch(op, operand.kind(), line)),
    }
}

/// Apply an infix operator to a pair of operands.
///
/// `&&`/`||` are accepted for completeness (both sides already evaluated),
/// but the evaluator normally routes them through [`truth`] to get
/// short-circuit semantics.
pub fn binary(op: BinOp, left: &Value, right: &Value, line: usize) -> Result<Value> {
    match op {
        BinOp::Add => add(left, right, line),

        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => arithmetic(op, left, right, line),

        BinOp::Eq => Ok(Value::Bool(equality(left, right, line)?)),
        BinOp::Ne => Ok(Value::Bool(!equality(left, right, line)?)),

        BinOp::Lt => Ok(Value::Bool(ordering(op, left, right, line)? == Ordering::Less)),
        BinOp::Le => Ok(Value::Bool(ordering(op, left, right, line)? != Ordering::Greater)),
        BinOp::Gt => Ok(Value::Bool(ordering(op, left, right, line)? == Ordering::Greater)),
        BinOp::Ge => Ok(Value::Bool(ordering(op, left, right, line)? != Ordering::Less)),

        BinOp::And => Ok(Value::Bool(truth(op, left, line)? && truth(op, right, line)?)),
        BinOp::Or => Ok(Value::Bool(truth(op, left, line)? || truth(op, right, line)?)),
    }
}

/// Validate one operand of `&&`/`||` (or a ternary condition) as a boolean.
pub fn truth(op: BinOp, operand: &Value, line: usize) -> Result<bool> {
    match operand {
        Value::Bool(b) => Ok(*b),

        other => Err(EvalError::type_error(format!(
            "operator '{}' requires boolean operands, got {} [line {}]",
            op.symbol(),
            other.kind(),
            line
        ))),
    }
}

/// Canonical textual form used by `+` string coercion.  Defined for long,
/// double, boolean, string, and pattern; `None` for everything else.
pub fn canonical_text(value: &Value) -> Option<String> {
    match value {
        Value::Int(n) => {
            let mut buf: itoa::Buffer = itoa::Buffer::new();

            Some(buf.format(*n).to_owned())
        }

        Value::Float(n) => Some(float_text(*n)),

        Value::Bool(b) => Some(b.to_string()),

        Value::Str(s) => Some(s.clone()),

        // A pattern renders its original source text, verbatim.
        Value::Pattern(p) => Some(p.text().to_owned()),

        Value::Nil | Value::Opaque(_) | Value::Func(_) => None,
    }
}

// ───────────────────────────── rule groups ─────────────────────────────────

/// `+`: numeric addition when both sides are numeric, otherwise string
/// concatenation when at least one side is a string.
fn add(left: &Value, right: &Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),

        (l, r) if l.kind() == Kind::Str || r.kind() == Kind::Str => {
            match (canonical_text(l), canonical_text(r)) {
                (Some(a), Some(b)) => Ok(Value::Str(a + &b)),

                _ => Err(binary_mismatch(BinOp::Add, l.kind(), r.kind(), line)),
            }
        }

        (l, r) => Err(binary_mismatch(BinOp::Add, l.kind(), r.kind(), line)),
    }
}

/// `- * / %` over the numeric tower: long stays long, any double promotes.
fn arithmetic(op: BinOp, left: &Value, right: &Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b, line),

        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_arithmetic(op, *a as f64, *b))),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_arithmetic(op, *a, *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_arithmetic(op, *a, *b))),

        (l, r) => Err(binary_mismatch(op, l.kind(), r.kind(), line)),
    }
}

fn int_arithmetic(op: BinOp, a: i64, b: i64, line: usize) -> Result<Value> {
    let n: i64 = match op {
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),

        BinOp::Div => {
            if b == 0 {
                return Err(divide_by_zero(line));
            }

            a.wrapping_div(b)
        }

        BinOp::Rem => {
            if b == 0 {
                return Err(divide_by_zero(line));
            }

            a.wrapping_rem(b)
        }

        _ => unreachable!("non-arithmetic operator {:?}", op),
    };

    Ok(Value::Int(n))
}

fn float_arithmetic(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Rem => a % b,
        _ => unreachable!("non-arithmetic operator {:?}", op),
    }
}

/// `==`: numeric promotion, same-variant string/boolean comparison, `nil`
/// identity.  Patterns compare by source text and objects by their
/// host-provided capability.
fn equality(left: &Value, right: &Value, line: usize) -> Result<bool> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Int(a), Value::Float(b)) => Ok(*a as f64 == *b),
        (Value::Float(a), Value::Int(b)) => Ok(*a == *b as f64),
        (Value::Float(a), Value::Float(b)) => Ok(a == b),

        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),

        (Value::Nil, Value::Nil) => Ok(true),
        (Value::Nil, _) | (_, Value::Nil) => Ok(false),

        (Value::Pattern(a), Value::Pattern(b)) => Ok(a.text() == b.text()),
        (Value::Opaque(a), Value::Opaque(b)) => Ok(a.object_eq(b.as_ref())),

        (l, r) => Err(binary_mismatch(BinOp::Eq, l.kind(), r.kind(), line)),
    }
}

/// `< <= > >=`: numeric promotion or string/string; anything else is a type
/// error, including comparisons against NaN (no total order exists).
fn ordering(op: BinOp, left: &Value, right: &Value, line: usize) -> Result<Ordering> {
    let ord: Option<Ordering> = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),

        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),

        _ => None,
    };

    ord.ok_or_else(|| binary_mismatch(op, left.kind(), right.kind(), line))
}

// ───────────────────────────── error builders ──────────────────────────────

fn unary_mismatch(op: UnOp, operand: Kind, line: usize) -> EvalError {
    EvalError::type_error(format!(
        "operator '{}' cannot be applied to {} [line {}]",
        op.symbol(),
        operand,
        line
    ))
}

fn binary_mismatch(op: BinOp, left: Kind, right: Kind, line: usize) -> EvalError {
    EvalError::type_error(format!(
        "operator '{}' cannot be applied to {} and {} [line {}]",
        op.symbol(),
        left,
        right,
        line
    ))
}

fn divide_by_zero(line: usize) -> EvalError {
    EvalError::Arithmetic {
        message: "division by zero".to_owned(),
        line,
    }
}

fn float_text(n: f64) -> String {
    // 3.0 renders as "3.0", not "3": integral doubles keep their point.
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}
