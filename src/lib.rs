//! `verdict` is an embeddable expression language: boolean, arithmetic, and
//! string expressions compiled once and evaluated many times against
//! caller-supplied environments.
//!
//! ```rust
//! use verdict::{Environment, Value};
//!
//! let mut env = Environment::new();
//! env.define("threshold", Value::Int(10));
//!
//! let value = verdict::execute("3 + 3 / 2 < threshold", &env).unwrap();
//! assert_eq!(value, Value::Bool(true));
//! ```

pub mod ast;
pub mod builtins;
pub mod cache;
pub mod environment;
pub mod error;
pub mod expression;
pub mod functions;
pub mod interpreter;
pub mod operators;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use std::sync::Arc;

pub use crate::environment::{Environment, MapResolver, PropertyResolver, ValueMap};
pub use crate::error::{EvalError, Result};
pub use crate::expression::CompiledExpression;
pub use crate::functions::{Arity, Function};
pub use crate::value::{HostObject, Kind, Pattern, Value};

/// Compile `source` through the process-wide cache.  Repeated calls with
/// the same text return the same shared compilation.
pub fn compile(source: &str) -> Result<Arc<CompiledExpression>> {
    cache::global().get_or_compile(source)
}

/// Compile (cached) and evaluate `source` against `env`.
pub fn execute(source: &str, env: &Environment) -> Result<Value> {
    compile(source)?.evaluate(env)
}

/// Evaluate an expression that references no variables.
pub fn execute_simple(source: &str) -> Result<Value> {
    execute(source, &Environment::new())
}

/// Register a host function process-wide; a taken name is rejected with
/// [`EvalError::DuplicateFunction`].
pub fn register_function(function: Function) -> Result<()> {
    functions::global().register(function)
}

/// Register a host function process-wide, replacing any previous binding.
pub fn replace_function(function: Function) {
    functions::global().register_or_replace(function)
}
