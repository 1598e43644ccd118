//! Module `scanner` implements a one‑pass, streaming UTF‑8 lexer for the
//! expression language.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of `Token<'a>`s,
//! skipping whitespace and comments, and emitting exactly one `EOF` token at
//! the end. Designed as a `FusedIterator`, it can be chained safely with
//! other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a [u8]) -> Scanner<'a>`
//!   Create a new lexer over the input buffer.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, EvalError>` on each `.next()`, where
//!   `Ok(token)` is a scanned token and `Err` reports a lexing error with
//!   line information.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `,`, `.`, `?`, `:`, `+`, `-`, `*`,
//!   `%`.
//! - One‑or‑two‑character operators: `!`/`!=`, `=`/`==`, `<`/`<=`, `>`/`>=`;
//!   `&&` and `||` (a lone `&` or `|` is an error).
//! - String literals delimited by `'` or `"`; the *other* quote character is
//!   allowed unescaped inside, and no escape processing is performed.
//! - Pattern literals `/…/`, raw text preserved verbatim.  A `/` starts a
//!   pattern only where an operand may begin; after a complete operand it is
//!   the division operator, so `6/2` stays arithmetic.
//! - Numeric literals: decimal and `0x` hex integers (64‑bit signed, with an
//!   explicit out‑of‑range error), and floats with a mandatory fractional
//!   part plus optional exponent.
//! - Identifiers/keywords: `[A-Za-z_][A-Za-z0-9_]*`, resolved via a
//!   perfect‑hash `KEYWORDS` map (`true`, `false`, `nil`).
//! - `#` line comments are skipped to end of line.
//!
//! # Performance Notes
//!
//! - Bulk comment skipping via `memchr` for rapid new‑line search.
//! - `#[inline(always)]` on hot path helpers.
//! - Zero‑allocation lexeme slicing: tokens reference the original buffer.

use crate::error::{EvalError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"true"  => TokenType::TRUE,
    b"false" => TokenType::FALSE,
    b"nil"   => TokenType::NIL,
};

/// A single pass **scanner / lexer** that converts raw UTF‑8 bytes into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token’s
/// `lexeme` slice back to the original source buffer.
pub struct Scanner<'a> {
    src: &'a [u8],              // entire source expression
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    operand_ok: bool,           // may the next token begin an operand? ('/' = pattern)
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
            operand_ok: true,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input slice.
    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  *Panics* if called at EOF – higher‑level
    /// code always guards with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past EOF
    /// to avoid branching at call‑site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    /// Returns `true` on success so callers can branch inline without an else.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'?' => self.pending = Some(TokenType::QUESTION),
            b':' => self.pending = Some(TokenType::COLON),
            b'+' => self.pending = Some(TokenType::PLUS),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'*' => self.pending = Some(TokenType::STAR),
            b'%' => self.pending = Some(TokenType::PERCENT),

            // ── one‑or‑two‑character operators ────────────────────────────
            b'!' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            b'&' => {
                if !self.match_byte(b'&') {
                    return Err(EvalError::lex(self.line, "Unexpected character: &"));
                }

                self.pending = Some(TokenType::AND_AND);
            }

            b'|' => {
                if !self.match_byte(b'|') {
                    return Err(EvalError::lex(self.line, "Unexpected character: |"));
                }

                self.pending = Some(TokenType::OR_OR);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(()); // skip insignificants
            }

            b'\n' => {
                self.line += 1; // track for diagnostics

                return Ok(());
            }

            // ── comments (# … until newline) ─────────────────────────────
            b'#' => {
                // Fast‑forward to next newline using `memchr`.  If none
                // found, skip to EOF.
                if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                    self.curr += pos;
                } else {
                    self.curr = self.len();
                }

                return Ok(());
            }

            // ── division operator or pattern literal ─────────────────────
            b'/' => {
                if self.operand_ok {
                    return self.parse_pattern();
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal, either quote character ───────────────────
            b'\'' | b'"' => {
                return self.parse_string(b);
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                return self.parse_number(b);
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                return Err(EvalError::lex(
                    self.line,
                    format!("Unexpected character: {}", b as char),
                ));
            }
        }

        Ok(())
    }

    /// Parse a string literal delimited by `quote` (`'` or `"`).
    ///
    /// The *other* quote character passes through literally, and no escape
    /// processing happens: the token payload is the raw text between the
    /// delimiters.
    ///
    /// * `self.start` still points to the opening quote.
    /// * When we return, `self.curr` points **past** the closing quote.
    fn parse_string(&mut self, quote: u8) -> Result<()> {
        while !self.is_at_end() && self.peek() != quote {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(EvalError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes.
        let slice: &[u8] = &self.src[self.start + 1..self.curr - 1];

        // SAFETY: the original source is valid UTF‑8 (guaranteed by caller).
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a `/…/` pattern literal.  The text between the slashes is kept
    /// verbatim — a backslash only shields the following byte from ending the
    /// literal, it is not stripped.
    fn parse_pattern(&mut self) -> Result<()> {
        loop {
            if self.is_at_end() {
                return Err(EvalError::lex(self.line, "Unterminated pattern."));
            }

            match self.advance() {
                b'/' => break,

                b'\\' => {
                    if !self.is_at_end() {
                        self.advance();
                    }
                }

                b'\n' => {
                    self.line += 1;
                }

                _ => {}
            }
        }

        // Slice excluding the delimiting slashes.
        let slice: &[u8] = &self.src[self.start + 1..self.curr - 1];
        let text: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        self.pending = Some(TokenType::REGEX(text.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal: decimal integer (`123`), hex integer
    /// (`0x7f`), or float (`3.14`, `10.5e3`).  The fractional part is what
    /// makes a literal a float; an exponent is only recognized after it.
    fn parse_number(&mut self, first: u8) -> Result<()> {
        // Hex integer: 0x… / 0X…
        if first == b'0' && (self.peek() == b'x' || self.peek() == b'X') {
            self.advance(); // consume 'x'

            if !self.peek().is_ascii_hexdigit() {
                return Err(EvalError::lex(self.line, "Expected hex digits after 0x"));
            }

            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }

            let slice: &[u8] = &self.src[self.start + 2..self.curr];
            let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

            let n: i64 = i64::from_str_radix(s, 16).map_err(|_| {
                EvalError::lex(self.line, format!("Integer literal out of range: 0x{}", s))
            })?;

            self.pending = Some(TokenType::NUMBER_INT(n));

            return Ok(());
        }

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Optional fractional part; its presence decides int vs float.
        let mut is_float = false;

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            is_float = true;

            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }

            // Optional exponent, only after a fraction: [eE][+-]?[0-9]+
            if self.peek() == b'e' || self.peek() == b'E' {
                let after_sign: u8 = if self.peek_next() == b'+' || self.peek_next() == b'-' {
                    if self.curr + 2 < self.len() {
                        self.src[self.curr + 2]
                    } else {
                        0
                    }
                } else {
                    self.peek_next()
                };

                if after_sign.is_ascii_digit() {
                    self.advance(); // consume 'e'

                    if self.peek() == b'+' || self.peek() == b'-' {
                        self.advance();
                    }

                    while self.peek().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }

        let slice: &[u8] = &self.src[self.start..self.curr];
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        if is_float {
            let n: f64 = s
                .parse::<f64>()
                .map_err(|_| EvalError::lex(self.line, format!("Malformed float literal: {}", s)))?;

            self.pending = Some(TokenType::NUMBER_FLOAT(n));
        } else {
            let n: i64 = s.parse::<i64>().map_err(|_| {
                EvalError::lex(self.line, format!("Integer literal out of range: {}", s))
            })?;

            self.pending = Some(TokenType::NUMBER_INT(n));
        }

        Ok(())
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>; // alias = Result<T, EvalError>

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                // Whether a following '/' starts a pattern literal: only
                // when this token cannot end an operand.
                self.operand_ok = !matches!(
                    tt,
                    TokenType::NUMBER_INT(_)
                        | TokenType::NUMBER_FLOAT(_)
                        | TokenType::STRING(_)
                        | TokenType::REGEX(_)
                        | TokenType::IDENTIFIER
                        | TokenType::TRUE
                        | TokenType::FALSE
                        | TokenType::NIL
                        | TokenType::RIGHT_PAREN
                );

                let slice: &[u8] = &self.src[self.start..self.curr];
                let lex: &str = unsafe { std::str::from_utf8_unchecked(slice) };
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
