// src/parser/lexer.rs
//! Lexical analyzer (tokenizer) for the block DSL
//!
//! The lexer is error tolerant: an illegal character produces a [`LexError`]
//! item and lexing resumes on the next character.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Block,
    Add,
    Print,
    View,
    Mine,
    Export,

    // Type keywords
    Str,
    Int,
    Long,
    Float,
    List,
    Tuple,
    Dict,

    // Identifiers and literals
    Identifier(String),
    Integer(i64),
    Number(f64),
    String(String),

    // Delimiters
    Assign,
    Colon,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
}

impl Token {
    /// Keyword token for a reserved word, if `word` is one
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word {
            "block" => Token::Block,
            "add" => Token::Add,
            "print" => Token::Print,
            "view" => Token::View,
            "mine" => Token::Mine,
            "export" => Token::Export,
            "str" => Token::Str,
            "int" => Token::Int,
            "long" => Token::Long,
            "float" => Token::Float,
            "List" => Token::List,
            "Tuple" => Token::Tuple,
            "Dict" => Token::Dict,
            _ => return None,
        };
        Some(token)
    }

    /// Whether this token can begin a top-level statement
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            Token::Block | Token::Add | Token::Print | Token::View | Token::Mine | Token::Export
        )
    }
}

/// Renders the token's value the way diagnostics quote it: identifiers and
/// strings bare, numbers in decimal, keywords and punctuation as written.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Identifier(s) | Token::String(s) => return f.write_str(s),
            Token::Integer(n) => return write!(f, "{}", n),
            Token::Number(n) => return f.write_str(&crate::runtime::value::float_repr(*n)),
            Token::Block => "block",
            Token::Add => "add",
            Token::Print => "print",
            Token::View => "view",
            Token::Mine => "mine",
            Token::Export => "export",
            Token::Str => "str",
            Token::Int => "int",
            Token::Long => "long",
            Token::Float => "float",
            Token::List => "List",
            Token::Tuple => "Tuple",
            Token::Dict => "Dict",
            Token::Assign => "=",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
        };
        f.write_str(text)
    }
}

/// A token together with the line it started on
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("[Lexical Error] Line {line}: Illegal character '{character}'")]
    IllegalCharacter { character: char, line: usize },

    #[error("[Lexical Error] Line {line}: Integer literal '{literal}' out of range")]
    IntegerOutOfRange { literal: String, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::IllegalCharacter { line, .. } | LexError::IntegerOutOfRange { line, .. } => *line,
        }
    }
}

/// Lazy token stream over a source text.
///
/// Implements [`Iterator`]; every item is either a token or a recoverable
/// lexical error. [`Lexer::reset`] rewinds to the start of the input.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Rewind to the beginning of the input
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
    }

    /// Current line number (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> Option<Result<SpannedToken, LexError>> {
        self.skip_ignored();

        if self.is_at_end() {
            return None;
        }

        let line = self.line;
        let ch = self.current_char();

        let token = match ch {
            '=' => Token::Assign,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '"' => return Some(self.read_string(line)),
            c if c.is_ascii_digit() => return Some(self.read_number(line)),
            c if c.is_ascii_alphabetic() => return Some(Ok(self.read_identifier(line))),
            _ => {
                self.position += 1;
                return Some(Err(LexError::IllegalCharacter { character: ch, line }));
            }
        };

        self.position += 1;
        Some(Ok(SpannedToken { token, line }))
    }

    fn read_identifier(&mut self, line: usize) -> SpannedToken {
        let start = self.position;

        while !self.is_at_end() && self.current_char().is_ascii_alphanumeric() {
            self.position += 1;
        }

        let identifier: String = self.input[start..self.position].iter().collect();
        let token = Token::keyword(&identifier).unwrap_or(Token::Identifier(identifier));

        SpannedToken { token, line }
    }

    fn read_number(&mut self, line: usize) -> Result<SpannedToken, LexError> {
        let start = self.position;
        self.skip_digits();

        // A float needs digits on both sides of the dot; `3.` lexes as `3` then `.`
        let is_float = !self.is_at_end()
            && self.current_char() == '.'
            && self.peek().is_some_and(|c| c.is_ascii_digit());

        if is_float {
            self.position += 1;
            self.skip_digits();
        }

        let text: String = self.input[start..self.position].iter().collect();

        let token = if is_float {
            // digits '.' digits always parses; overflow saturates to infinity
            Token::Number(text.parse::<f64>().unwrap_or(f64::INFINITY))
        } else {
            match text.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                Err(_) => return Err(LexError::IntegerOutOfRange { literal: text, line }),
            }
        };

        Ok(SpannedToken { token, line })
    }

    fn read_string(&mut self, line: usize) -> Result<SpannedToken, LexError> {
        let start = self.position + 1;
        let closing = self.input[start..].iter().position(|&c| c == '"');

        let Some(len) = closing else {
            // No closing quote: the quote itself is the illegal character
            self.position += 1;
            return Err(LexError::IllegalCharacter { character: '"', line });
        };

        let value: String = self.input[start..start + len].iter().collect();
        self.line += value.matches('\n').count();
        self.position = start + len + 1;

        Ok(SpannedToken {
            token: Token::String(value),
            line,
        })
    }

    fn skip_digits(&mut self) {
        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            self.position += 1;
        }
    }

    fn skip_ignored(&mut self) {
        while !self.is_at_end() {
            match self.current_char() {
                '\n' => {
                    self.line += 1;
                    self.position += 1;
                }
                ' ' | '\t' | '\r' => self.position += 1,
                '/' if self.peek() == Some('/') => {
                    while !self.is_at_end() && self.current_char() != '\n' {
                        self.position += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

impl Iterator for Lexer {
    type Item = Result<SpannedToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
