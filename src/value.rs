//! Runtime value model: the closed set of variants an expression can
//! produce, conversions across the host boundary, and the [`HostObject`]
//! capability for opaque host-supplied values.
//!
//! Operator semantics over pairs of variants live in [`crate::operators`],
//! not here; this module only defines the variants and their identity.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{EvalError, Result};
use crate::functions::Function;

/// Capability carried by [`Value::Opaque`]: a host-provided object reference
/// the engine can name and compare, but never interprets.  Property access on
/// such values goes through the host's
/// [`PropertyResolver`](crate::environment::PropertyResolver).
pub trait HostObject: fmt::Debug + Send + Sync + 'static {
    /// Short type name used in diagnostics.
    fn type_name(&self) -> &str;

    /// Downcasting hook for resolvers that know the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Identity comparison for `==`/`!=`.  Defaults to never-equal.
    fn object_eq(&self, _other: &dyn HostObject) -> bool {
        false
    }
}

/// A compiled `/…/` pattern literal: the compiled machine plus the original
/// source text, which round-trips verbatim through string coercion.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `text` into a pattern value.  The text is kept exactly as it
    /// appeared between the delimiting slashes.
    pub fn new(text: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            text: text.to_owned(),
            regex: Regex::new(text)?,
        })
    }

    /// The original pattern text (no escaping transformation).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The compiled regex, for host functions that match against it.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Variant tag of a [`Value`], used by the operator table and in error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Pattern,
    Opaque,
    Func,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "boolean",
            Kind::Int => "long",
            Kind::Float => "double",
            Kind::Str => "string",
            Kind::Pattern => "pattern",
            Kind::Opaque => "object",
            Kind::Func => "function",
        };

        write!(f, "{}", name)
    }
}

/// A runtime-tagged evaluation result.  Values are immutable once
/// constructed; arithmetic and concatenation produce new values.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Pattern(Pattern),
    Opaque(Arc<dyn HostObject>),
    Func(Arc<Function>),
}

impl Value {
    /// The variant tag of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Pattern(_) => Kind::Pattern,
            Value::Opaque(_) => Kind::Opaque,
            Value::Func(_) => Kind::Func,
        }
    }

    /// Wrap a host object as an opaque value.
    pub fn object<T: HostObject>(object: T) -> Self {
        Value::Opaque(Arc::new(object))
    }
}

impl PartialEq for Value {
    /// Structural identity, variant by variant.  No numeric cross-variant
    /// promotion happens here — that belongs to the `==` operator rule in
    /// [`crate::operators`].
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.text == b.text,
            (Value::Opaque(a), Value::Opaque(b)) => a.object_eq(b.as_ref()),
            (Value::Func(a), Value::Func(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Int(n) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();

                write!(f, "{}", buf.format(*n))
            }

            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Str(s) => write!(f, "{}", s),

            Value::Pattern(p) => write!(f, "/{}/", p.text),

            Value::Opaque(o) => write!(f, "<{}>", o.type_name()),

            Value::Func(func) => write!(f, "<fn {}>", func.name()),
        }
    }
}

// ───────────────────── host boundary conversions ──────────────────────────

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl TryFrom<Value> for i64 {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<i64> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(EvalError::type_error(format!(
                "expected long, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<f64> {
        match value {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            other => Err(EvalError::type_error(format!(
                "expected double, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::type_error(format!(
                "expected boolean, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<String> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(EvalError::type_error(format!(
                "expected string, got {}",
                other.kind()
            ))),
        }
    }
}
