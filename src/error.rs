//! Centralised error hierarchy for the **verdict** expression engine.
//!
//! All subsystems (scanner, parser, operator table, evaluator, registry,
//! cache) must convert their internal failure modes into one of the variants
//! defined here.  This enables a uniform `Result<T>` alias throughout the
//! crate while still preserving rich diagnostic detail.
//!
//! Every error is fatal to the compile or evaluation attempt that raised it;
//! the engine performs no internal retries.  The module **does not** print
//! diagnostics itself.

use thiserror::Error;

use log::info;

/// Canonical error type used throughout the expression engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// Lexical error with source line information: malformed literal,
    /// unterminated string/pattern, illegal character.
    #[error("[line {line}] Lex error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic error: unexpected token, unmatched delimiter, malformed
    /// argument list.
    #[error("[line {line}] Syntax error: {message}")]
    Syntax { message: String, line: usize },

    /// An operator was applied to an unsupported operand pairing.  The
    /// documented promotion rules are the only implicit conversions; nothing
    /// is coerced silently beyond them.
    #[error("Type error: {0}")]
    Type(String),

    /// Integer division or remainder by zero.
    #[error("[line {line}] Arithmetic error: {message}")]
    Arithmetic { message: String, line: usize },

    /// The first segment of an identifier path has no binding in the
    /// environment.  Missing bindings are an error, never a silent `nil`.
    #[error("[line {line}] Undefined variable '{name}'")]
    Unresolved { name: String, line: usize },

    /// A later segment of an identifier path could not be resolved.
    #[error("Property error: {0}")]
    Property(String),

    /// A call named a function that is not in the registry.
    #[error("[line {line}] Unknown function '{name}'")]
    UnknownFunction { name: String, line: usize },

    /// A function rejected its argument count.
    #[error("{function}: {message}")]
    Arity { function: String, message: String },

    /// An attempt to register a function under a name that is already taken.
    #[error("function '{0}' is already registered")]
    DuplicateFunction(String),
}

impl EvalError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        EvalError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn syntax<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Syntax error: line={}, msg={}", line, message);

        EvalError::Syntax { message, line }
    }

    /// Helper constructor for the **operator table** and built-ins.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        EvalError::Type(msg.into())
    }

    /// Helper constructor for identifier lookups.
    pub fn unresolved<S: Into<String>>(line: usize, name: S) -> Self {
        EvalError::Unresolved {
            name: name.into(),
            line,
        }
    }

    /// Helper constructor for property-path resolution.
    pub fn property<S: Into<String>>(msg: S) -> Self {
        EvalError::Property(msg.into())
    }

    /// Helper constructor for function-call dispatch.
    pub fn unknown_function<S: Into<String>>(line: usize, name: S) -> Self {
        EvalError::UnknownFunction {
            name: name.into(),
            line,
        }
    }

    /// Helper constructor for argument-count violations.
    pub fn arity<S: Into<String>, M: Into<String>>(function: S, msg: M) -> Self {
        EvalError::Arity {
            function: function.into(),
            message: msg.into(),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, EvalError>;
