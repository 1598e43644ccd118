//! Compiled-expression representation: the immutable product of one
//! scan+parse pass, re-evaluable any number of times against different
//! environments.

use log::{debug, info};

use crate::ast::Expr;
use crate::environment::Environment;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::token::Token;
use crate::value::Value;

/// An immutable compiled expression: the AST root plus the original source
/// text (the cache key, also kept for diagnostics).  Never mutated after
/// construction; safe to share across threads.
pub struct CompiledExpression {
    source: String,
    root: Expr,
}

impl CompiledExpression {
    /// The exact source text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The expression tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Evaluate against `env`.  Evaluation is pure with respect to this
    /// expression and the environment; repeated calls with an unchanged
    /// environment yield identical results.
    pub fn evaluate(&self, env: &Environment) -> Result<Value> {
        Interpreter::new(env).evaluate(&self.root)
    }
}

/// Scan and parse `source` into a fresh [`CompiledExpression`].
///
/// Callers that evaluate the same source repeatedly should go through
/// [`crate::cache::ExpressionCache`] (or the crate-level
/// [`compile`](crate::compile)) instead, which memoizes this step.
pub fn compile(source: &str) -> Result<CompiledExpression> {
    info!("Compiling expression ({} bytes)", source.len());

    let mut tokens: Vec<Token<'_>> = Vec::new();

    for token in Scanner::new(source.as_bytes()) {
        tokens.push(token?);
    }

    let mut parser: Parser<'_> = Parser::new(&tokens);
    let root: Expr = parser.parse()?;

    debug!("Compiled `{}` => {}", source, root);

    Ok(CompiledExpression {
        source: source.to_owned(),
        root,
    })
}
