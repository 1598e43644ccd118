use log::debug;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the expression scanner.
///
/// Variants without data represent operators and punctuation.
/// `STRING(String)`, `NUMBER_INT(i64)`, `NUMBER_FLOAT(f64)`, and
/// `REGEX(String)` carry their literal values (the regex payload is the raw
/// pattern text between the delimiting slashes, preserved verbatim).
/// `IDENTIFIER` is used for variable and function names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// '?'
    QUESTION,

    /// ':'
    COLON,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    STAR,

    /// '/'
    SLASH,

    /// '%'
    PERCENT,

    /// '!'
    BANG,

    /// '!='
    BANG_EQUAL,

    /// '='
    EQUAL,

    /// '=='
    EQUAL_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '&&'
    AND_AND,

    /// '||'
    OR_OR,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A 64‑bit signed integer literal (decimal or hex)
    #[serde(rename = "NUMBER_INT")]
    NUMBER_INT(i64),

    /// A floating point literal
    #[serde(rename = "NUMBER_FLOAT")]
    NUMBER_FLOAT(f64),

    /// A `/…/` pattern literal (raw text, no unescaping)
    REGEX(String),

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'nil'
    NIL,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// Variant name without payloads, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::QUESTION => "QUESTION",
            TokenType::COLON => "COLON",
            TokenType::PLUS => "PLUS",
            TokenType::MINUS => "MINUS",
            TokenType::STAR => "STAR",
            TokenType::SLASH => "SLASH",
            TokenType::PERCENT => "PERCENT",
            TokenType::BANG => "BANG",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::AND_AND => "AND_AND",
            TokenType::OR_OR => "OR_OR",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER_INT(_) => "NUMBER_INT",
            TokenType::NUMBER_FLOAT(_) => "NUMBER_FLOAT",
            TokenType::REGEX(_) => "REGEX",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::NIL => "NIL",
            TokenType::EOF => "EOF",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line number where it was found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'a> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new(token_type: TokenType, lexeme: &'a str, line: usize) -> Self {
        debug!(
            "Creating new token: type={:?}, lexeme={}, line={}",
            token_type, lexeme, line
        );

        Self {
            token_type,
            lexeme,
            line,
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_type {
            TokenType::STRING(s) => write!(f, "STRING {} {}", self.lexeme, s),

            TokenType::NUMBER_INT(n) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();

                write!(f, "NUMBER_INT {} {}", self.lexeme, buf.format(*n))
            }

            TokenType::NUMBER_FLOAT(n) => write!(f, "NUMBER_FLOAT {} {}", self.lexeme, n),

            TokenType::REGEX(text) => write!(f, "REGEX {} {}", self.lexeme, text),

            other => write!(f, "{} {} null", other.name(), self.lexeme),
        }
    }
}
