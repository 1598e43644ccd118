//! The evaluator: a stateless recursive walk over a compiled expression
//! tree against a borrowed [`Environment`].
//!
//! All operator applications defer to the table in [`crate::operators`];
//! the walk itself only contributes evaluation *order*: short-circuiting
//! `&&`/`||`, lazy ternary branch selection, and eager left-to-right
//! argument evaluation for calls.

use log::debug;

use crate::ast::Expr;
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::functions;
use crate::operators::{self, BinOp};
use crate::value::Value;

/// One evaluation pass.  Cheap to construct; holds nothing but the borrowed
/// environment, so a compiled expression can be walked from many threads at
/// once.
pub struct Interpreter<'a> {
    env: &'a Environment,
}

impl<'a> Interpreter<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Evaluate `expr` to a value.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),

            Expr::Identifier { path, line } => self.resolve_identifier(path, *line),

            Expr::Unary { op, operand, line } => {
                let value: Value = self.evaluate(operand)?;

                operators::unary(*op, &value, *line)
            }

            // && and || bypass the generic binary path: the right operand
            // must not be evaluated unless the left leaves the outcome open.
            Expr::Binary {
                op: BinOp::And,
                left,
                right,
                line,
            } => {
                if !operators::truth(BinOp::And, &self.evaluate(left)?, *line)? {
                    return Ok(Value::Bool(false));
                }

                let right_value: Value = self.evaluate(right)?;

                Ok(Value::Bool(operators::truth(BinOp::And, &right_value, *line)?))
            }

            Expr::Binary {
                op: BinOp::Or,
                left,
                right,
                line,
            } => {
                if operators::truth(BinOp::Or, &self.evaluate(left)?, *line)? {
                    return Ok(Value::Bool(true));
                }

                let right_value: Value = self.evaluate(right)?;

                Ok(Value::Bool(operators::truth(BinOp::Or, &right_value, *line)?))
            }

            Expr::Binary {
                op,
                left,
                right,
                line,
            } => {
                let left_value: Value = self.evaluate(left)?;
                let right_value: Value = self.evaluate(right)?;

                operators::binary(*op, &left_value, &right_value, *line)
            }

            // Exactly one branch evaluates; the other must never run.
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
                line,
            } => {
                let chosen: bool = match self.evaluate(cond)? {
                    Value::Bool(b) => b,

                    other => {
                        return Err(EvalError::type_error(format!(
                            "ternary condition must be boolean, got {} [line {}]",
                            other.kind(),
                            line
                        )));
                    }
                };

                if chosen {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Call { name, args, line } => {
                let function = functions::global()
                    .lookup(name)
                    .ok_or_else(|| EvalError::unknown_function(*line, name.clone()))?;

                let mut arg_values: Vec<Value> = Vec::with_capacity(args.len());

                for arg in args {
                    arg_values.push(self.evaluate(arg)?);
                }

                debug!("Calling function '{}'", name);

                function.invoke(&arg_values)
            }
        }
    }

    /// Resolve a full identifier path: the first segment against the
    /// environment, each later segment through the property resolver.
    fn resolve_identifier(&self, path: &[String], line: usize) -> Result<Value> {
        let first: &String = &path[0];

        let mut value: Value = self
            .env
            .get(first)
            .cloned()
            .ok_or_else(|| EvalError::unresolved(line, first.clone()))?;

        for segment in &path[1..] {
            value = self.env.resolve_property(&value, segment)?;
        }

        debug!("Identifier '{}' resolved to {}", path.join("."), value);

        Ok(value)
    }
}
