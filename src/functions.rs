//! Process-wide function registry.
//!
//! Call expressions resolve their (possibly dotted) name here.  The registry
//! starts out holding the built-ins from [`crate::builtins`] and accepts
//! host-registered extensions; registration under a taken name is rejected
//! unless the replace entry point is used.  Lookups are served concurrently
//! behind a read lock, so compiled expressions can be evaluated from many
//! threads at once.
//!
//! Registered invocables are assumed to run to completion without
//! preemption: the engine imposes no deadline.  A host wrapping a
//! long-running function must enforce its own timeout.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::{debug, info};
use once_cell::sync::Lazy;

use crate::error::{EvalError, Result};
use crate::value::Value;

/// Argument-count policy checked before an invocable runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),

    /// `n` or more arguments.
    AtLeast(usize),

    /// Any argument count.
    Variadic,
}

impl Arity {
    fn check(&self, function: &str, got: usize) -> Result<()> {
        match *self {
            Arity::Exact(n) if got != n => Err(EvalError::arity(
                function,
                format!("expected {} argument(s), got {}", n, got),
            )),

            Arity::AtLeast(n) if got < n => Err(EvalError::arity(
                function,
                format!("expected at least {} argument(s), got {}", n, got),
            )),

            _ => Ok(()),
        }
    }
}

type Invocable = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A named invocable plus its arity policy.  Arguments arrive already
/// evaluated, left to right.
pub struct Function {
    name: String,
    arity: Arity,
    invocable: Box<Invocable>,
}

impl Function {
    pub fn new<F>(name: &str, arity: Arity, invocable: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_owned(),
            arity,
            invocable: Box::new(invocable),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check arity, then run the invocable.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        debug!("Invoking function '{}' with {} arg(s)", self.name, args.len());

        self.arity.check(&self.name, args.len())?;

        (self.invocable)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name → function table; safe for unsynchronized concurrent reads.
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Arc<Function>>>,
}

impl FunctionRegistry {
    /// An empty registry (no built-ins).
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a function; a taken name is rejected.
    pub fn register(&self, function: Function) -> Result<()> {
        let mut functions = self
            .functions
            .write()
            .expect("function registry lock poisoned");

        if functions.contains_key(function.name()) {
            return Err(EvalError::DuplicateFunction(function.name().to_owned()));
        }

        info!("Registered function '{}'", function.name());

        functions.insert(function.name().to_owned(), Arc::new(function));

        Ok(())
    }

    /// Register a function, silently replacing any previous binding.
    pub fn register_or_replace(&self, function: Function) {
        let mut functions = self
            .functions
            .write()
            .expect("function registry lock poisoned");

        info!("Registered function '{}' (replace allowed)", function.name());

        functions.insert(function.name().to_owned(), Arc::new(function));
    }

    /// Resolve a call name.
    pub fn lookup(&self, name: &str) -> Option<Arc<Function>> {
        self.functions
            .read()
            .expect("function registry lock poisoned")
            .get(name)
            .cloned()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        FunctionRegistry::new()
    }
}

static GLOBAL: Lazy<FunctionRegistry> = Lazy::new(|| {
    let registry = FunctionRegistry::new();

    crate::builtins::install(&registry);

    registry
});

/// The process-wide registry every `Call` expression resolves against.
/// Initialized on first use with the built-in functions.
pub fn global() -> &'static FunctionRegistry {
    &GLOBAL
}
