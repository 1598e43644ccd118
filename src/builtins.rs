//! Built-in function library.
//!
//! Deliberately small: the engine's contract is the registry, not a
//! standard library.  `string.contains` is the canonical shape for a
//! built-in — namespaced name, fixed arity, strict argument typing.

use crate::error::{EvalError, Result};
use crate::functions::{Arity, Function, FunctionRegistry};
use crate::value::Value;

/// Install the built-ins into `registry`.  Called once when the global
/// registry is initialized.
pub fn install(registry: &FunctionRegistry) {
    registry.register_or_replace(Function::new(
        "string.contains",
        Arity::Exact(2),
        |args: &[Value]| {
            let haystack: &str = str_arg("string.contains", args, 0)?;
            let needle: &str = str_arg("string.contains", args, 1)?;

            Ok(Value::Bool(haystack.contains(needle)))
        },
    ));
}

/// Fetch a required string argument, rejecting any other variant.
fn str_arg<'a>(function: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    match &args[index] {
        Value::Str(s) => Ok(s),

        other => Err(EvalError::type_error(format!(
            "{}: argument {} must be a string, got {}",
            function,
            index + 1,
            other.kind()
        ))),
    }
}
