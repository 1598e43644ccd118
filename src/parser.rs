/*!
Grammar (EBNF — condensed)
--------------------------

```text
expression     → ternary ;
ternary        → logic_or ( "?" expression ":" ternary )? ;
logic_or       → logic_and ( "||" logic_and )* ;
logic_and      → equality  ( "&&" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" | "%" ) unary )* ;
unary          → ( "!" | "-" ) unary | primary ;
primary        → NUMBER_INT | NUMBER_FLOAT | STRING | REGEX
               | "true" | "false" | "nil"
               | path ( "(" arguments? ")" )?
               | "(" expression ")" ;
path           → IDENT ( "." IDENT )* ;
arguments      → expression ( "," expression )* ;
```

Expression parsing uses **precedence climbing**: one method per precedence
tier, each looping over its operators and delegating to the next-tighter
tier, so precedence and associativity are encoded exactly once.  The ternary
recurses into itself on the else side, which makes `a ? b : c ? d : e`
right-associative.

A dotted `path` becomes a single `Identifier` node carrying the ordered
segment list (one atomic lookup at evaluation time).  A path followed by
`(` becomes a `Call` whose name is the joined path — that is how namespaced
built-ins such as `string.contains` are addressed.  There is no assignment:
a bare `=` is rejected wherever it appears.

The parser consumes the whole token stream: anything left over after one
complete expression (other than `EOF`) is a syntax error.
*/

use crate::ast::Expr;
use crate::error::{EvalError, Result};
use crate::operators::{BinOp, UnOp};
use crate::token::{Token, TokenType};
use crate::value::{Pattern, Value};

use log::{debug, info};

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse exactly one expression and reject trailing tokens.
    pub fn parse(&mut self) -> Result<Expr> {
        info!("Beginning parse phase");

        let expr: Expr = self.expression()?;

        if !self.is_at_end() {
            let token: &Token<'_> = self.peek();

            debug!("Trailing token after expression: {:?}", token.token_type);

            return Err(EvalError::syntax(
                token.line,
                format!(
                    "Unexpected token {} after expression",
                    token.token_type.name()
                ),
            ));
        }

        Ok(expr)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.ternary()
    }

    fn ternary(&mut self) -> Result<Expr> {
        let cond: Expr = self.logical_or()?;

        if self.matches(TokenType::QUESTION) {
            let line: usize = self.previous().line;
            let then_branch: Expr = self.expression()?;

            self.consume(TokenType::COLON, "Expected ':' in ternary expression")?;

            // Recurse on the else side for right associativity.
            let else_branch: Expr = self.ternary()?;

            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
                line,
            });
        }

        Ok(cond)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR_OR) {
            let line: usize = self.previous().line;
            let right: Expr = self.logical_and()?;

            expr = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AND_AND) {
            let line: usize = self.previous().line;
            let right: Expr = self.equality()?;

            expr = Expr::Binary {
                op: BinOp::And,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: &Token<'_> = self.previous();

            let op: BinOp = match operator.token_type {
                TokenType::BANG_EQUAL => BinOp::Ne,
                _ => BinOp::Eq,
            };

            let line: usize = operator.line;
            let right: Expr = self.comparison()?;

            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: &Token<'_> = self.previous();

            let op: BinOp = match operator.token_type {
                TokenType::GREATER => BinOp::Gt,
                TokenType::GREATER_EQUAL => BinOp::Ge,
                TokenType::LESS => BinOp::Lt,
                _ => BinOp::Le,
            };

            let line: usize = operator.line;
            let right: Expr = self.term()?;

            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: &Token<'_> = self.previous();

            let op: BinOp = match operator.token_type {
                TokenType::MINUS => BinOp::Sub,
                _ => BinOp::Add,
            };

            let line: usize = operator.line;
            let right: Expr = self.factor()?;

            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.unary()?;

        while self.matches(TokenType::STAR)
            || self.matches(TokenType::SLASH)
            || self.matches(TokenType::PERCENT)
        {
            let operator: &Token<'_> = self.previous();

            let op: BinOp = match operator.token_type {
                TokenType::STAR => BinOp::Mul,
                TokenType::SLASH => BinOp::Div,
                _ => BinOp::Rem,
            };

            let line: usize = operator.line;
            let right: Expr = self.unary()?;

            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: &Token<'_> = self.previous();

            let op: UnOp = match operator.token_type {
                TokenType::BANG => UnOp::Not,
                _ => UnOp::Neg,
            };

            let line: usize = operator.line;
            let operand: Expr = self.unary()?;

            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                line,
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let line: usize = self.peek().line;

        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal {
                value: Value::Bool(false),
                line,
            });
        }

        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal {
                value: Value::Bool(true),
                line,
            });
        }

        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal {
                value: Value::Nil,
                line,
            });
        }

        if let TokenType::NUMBER_INT(n) = self.peek().token_type {
            self.advance();

            return Ok(Expr::Literal {
                value: Value::Int(n),
                line,
            });
        }

        if let TokenType::NUMBER_FLOAT(n) = self.peek().token_type {
            self.advance();

            return Ok(Expr::Literal {
                value: Value::Float(n),
                line,
            });
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            let value = Value::Str(s.clone());

            self.advance();

            return Ok(Expr::Literal { value, line });
        }

        if let TokenType::REGEX(ref text) = self.peek().token_type {
            let pattern = Pattern::new(text).map_err(|e| {
                EvalError::syntax(line, format!("Invalid pattern /{}/: {}", text, e))
            })?;

            self.advance();

            return Ok(Expr::Literal {
                value: Value::Pattern(pattern),
                line,
            });
        }

        if self.matches(TokenType::IDENTIFIER) {
            return self.path(line);
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            // Grouping only steers precedence; it leaves no node behind.
            return Ok(expr);
        }

        Err(EvalError::syntax(
            line,
            format!(
                "Expected expression, found {}",
                self.peek().token_type.name()
            ),
        ))
    }

    /// Parse the rest of a dotted identifier chain, then decide between a
    /// variable reference and a function call.
    fn path(&mut self, line: usize) -> Result<Expr> {
        let mut path: Vec<String> = vec![self.previous().lexeme.to_owned()];

        while self.matches(TokenType::DOT) {
            let segment: &Token<'_> =
                self.consume(TokenType::IDENTIFIER, "Expected property name after '.'")?;

            path.push(segment.lexeme.to_owned());
        }

        if self.matches(TokenType::LEFT_PAREN) {
            return self.finish_call(path.join("."), line);
        }

        Ok(Expr::Identifier { path, line })
    }

    fn finish_call(&mut self, name: String, line: usize) -> Result<Expr> {
        let mut args: Vec<Expr> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if args.len() >= 255 {
                    return Err(EvalError::syntax(
                        self.peek().line,
                        "Cannot have more than 255 arguments",
                    ));
                }

                args.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expr::Call { name, args, line })
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(EvalError::syntax(self.peek().line, message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current - 1]
    }
}
