// src/parser/parser.rs
//! Parser that turns the token stream into statements, one at a time
//!
//! ```text
//! Start          := Statement+
//! Statement      := BlockDefinition | BlockOperation
//! BlockDefinition:= "block" ID "=" "(" Attribute ("," Attribute)* ")"
//! Attribute      := ID ":" Type
//! BlockOperation := "add" ID "=" "(" NewAttr ("," NewAttr)* ")"
//!                 | ("print" | "mine" | "export" | "view") ID
//! NewAttr        := ID ":" (STRING | INT | FLOAT | Tuple | List | Dict)
//! ```
//!
//! Lexical errors met while pulling tokens are buffered; the caller drains
//! them with [`Parser::take_lex_errors`] so they can be reported in order.
//!
//! Tuple literals nest at most [`MAX_NESTING`] levels.

use super::ast::*;
use super::lexer::{LexError, Lexer, SpannedToken, Token};
use crate::schema::TypeTag;
use thiserror::Error;

/// Deepest tuple literal the parser accepts
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("[Syntax Error] Line {line}: Unexpected token '{token}'")]
    UnexpectedToken { token: String, line: usize },

    #[error("[Syntax Error] Line {line}: Literal nested deeper than {} levels", MAX_NESTING)]
    NestingTooDeep { line: usize },

    #[error("[Syntax Error] Unexpected end of file")]
    UnexpectedEof,
}

pub struct Parser {
    lexer: Lexer,
    current: Option<SpannedToken>,
    lex_errors: Vec<LexError>,
    started: bool,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(input),
            current: None,
            lex_errors: Vec::new(),
            started: false,
            depth: 0,
        };
        parser.advance();
        parser
    }

    /// Parse the next statement; `None` once the input is exhausted.
    ///
    /// A program without a single statement yields one `UnexpectedEof`.
    pub fn next_statement(&mut self) -> Option<Result<Statement, SyntaxError>> {
        if self.current.is_none() {
            if self.started {
                return None;
            }
            self.started = true;
            return Some(Err(SyntaxError::UnexpectedEof));
        }

        self.started = true;
        self.depth = 0;

        let result = match self.current_token() {
            Some(Token::Block) => self.parse_definition(),
            Some(Token::Add) => self.parse_add(),
            Some(Token::Print) => self.parse_operation(Token::Print),
            Some(Token::View) => self.parse_operation(Token::View),
            Some(Token::Mine) => self.parse_operation(Token::Mine),
            Some(Token::Export) => self.parse_operation(Token::Export),
            _ => Err(self.unexpected()),
        };

        Some(result)
    }

    /// Discard tokens up to the start of the next statement
    pub fn recover(&mut self) {
        while let Some(current) = &self.current {
            if current.token.starts_statement() {
                break;
            }
            self.advance();
        }
    }

    /// Lexical errors seen since the last call
    pub fn take_lex_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.lex_errors)
    }

    fn parse_definition(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(Token::Block)?;
        let name = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        self.expect(Token::LeftParen)?;

        let mut attributes = vec![self.parse_attribute()?];
        while self.eat(&Token::Comma) {
            attributes.push(self.parse_attribute()?);
        }

        self.expect(Token::RightParen)?;

        Ok(Statement::Define { name, attributes })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, SyntaxError> {
        let name = self.expect_identifier()?;
        self.expect(Token::Colon)?;

        let ty = match self.current_token() {
            Some(Token::Str) => TypeTag::Str,
            Some(Token::Int) => TypeTag::Int,
            Some(Token::Long) => TypeTag::Long,
            Some(Token::Float) => TypeTag::Float,
            Some(Token::List) => TypeTag::List,
            Some(Token::Tuple) => TypeTag::Tuple,
            Some(Token::Dict) => TypeTag::Dict,
            _ => return Err(self.unexpected()),
        };
        self.advance();

        Ok(Attribute { name, ty })
    }

    fn parse_add(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(Token::Add)?;
        let block = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        self.expect(Token::LeftParen)?;

        let fields = self.parse_field_inits()?;

        self.expect(Token::RightParen)?;

        Ok(Statement::Add { block, fields })
    }

    fn parse_operation(&mut self, keyword: Token) -> Result<Statement, SyntaxError> {
        self.expect(keyword.clone())?;
        let block = self.expect_identifier()?;

        let statement = match keyword {
            Token::Print => Statement::Print { block },
            Token::View => Statement::View { block },
            Token::Mine => Statement::Mine { block },
            _ => Statement::Export { block },
        };

        Ok(statement)
    }

    /// NewAttr ("," NewAttr)*
    fn parse_field_inits(&mut self) -> Result<Vec<FieldInit>, SyntaxError> {
        let mut fields = vec![self.parse_field_init()?];
        while self.eat(&Token::Comma) {
            fields.push(self.parse_field_init()?);
        }
        Ok(fields)
    }

    fn parse_field_init(&mut self) -> Result<FieldInit, SyntaxError> {
        let name = self.expect_identifier()?;
        self.expect(Token::Colon)?;

        let value = match self.current_token() {
            Some(Token::LeftParen) => {
                if self.depth >= MAX_NESTING {
                    return Err(SyntaxError::NestingTooDeep {
                        line: self.current.as_ref().map_or(0, |t| t.line),
                    });
                }
                self.advance();
                self.depth += 1;
                let fields = self.parse_field_inits()?;
                self.depth -= 1;
                self.expect(Token::RightParen)?;
                Literal::Tuple(fields)
            }
            Some(Token::LeftBracket) => {
                self.advance();
                let mut items = vec![self.parse_element()?];
                while self.eat(&Token::Comma) {
                    items.push(self.parse_element()?);
                }
                self.expect(Token::RightBracket)?;
                Literal::List(items)
            }
            Some(Token::LeftBrace) => {
                self.advance();
                let mut pairs = vec![self.parse_pair()?];
                while self.eat(&Token::Comma) {
                    pairs.push(self.parse_pair()?);
                }
                self.expect(Token::RightBrace)?;
                Literal::Dict(pairs)
            }
            _ => self.parse_element()?,
        };

        Ok(FieldInit { name, value })
    }

    /// Pair := STRING ":" Element
    fn parse_pair(&mut self) -> Result<(String, Literal), SyntaxError> {
        let key = match self.current_token() {
            Some(Token::String(s)) => s.clone(),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        self.expect(Token::Colon)?;
        Ok((key, self.parse_element()?))
    }

    /// Element := STRING | INT | FLOAT
    fn parse_element(&mut self) -> Result<Literal, SyntaxError> {
        let literal = match self.current_token() {
            Some(Token::String(s)) => Literal::String(s.clone()),
            Some(Token::Integer(n)) => Literal::Int(*n),
            Some(Token::Number(f)) => Literal::Float(*f),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(literal)
    }

    fn current_token(&self) -> Option<&Token> {
        self.current.as_ref().map(|t| &t.token)
    }

    /// Consume the current token if it equals `token`
    fn eat(&mut self, token: &Token) -> bool {
        if self.current_token() == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let result = name.clone();
                self.advance();
                Ok(result)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn unexpected(&self) -> SyntaxError {
        match &self.current {
            Some(current) => SyntaxError::UnexpectedToken {
                token: current.token.to_string(),
                line: current.line,
            },
            None => SyntaxError::UnexpectedEof,
        }
    }

    /// Move to the next valid token, buffering lexical errors on the way
    fn advance(&mut self) {
        self.current = loop {
            match self.lexer.next_token() {
                Some(Ok(token)) => break Some(token),
                Some(Err(err)) => self.lex_errors.push(err),
                None => break None,
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str) -> Vec<Result<Statement, SyntaxError>> {
        let mut parser = Parser::new(input);
        let mut results = Vec::new();
        while let Some(result) = parser.next_statement() {
            if result.is_err() {
                parser.recover();
            }
            results.push(result);
        }
        results
    }

    #[test]
    fn test_parse_definition() {
        let results = parse_all("block Person = (name: str, age: int, tags: List)");

        assert_eq!(
            results,
            vec![Ok(Statement::Define {
                name: "Person".to_string(),
                attributes: vec![
                    Attribute { name: "name".to_string(), ty: TypeTag::Str },
                    Attribute { name: "age".to_string(), ty: TypeTag::Int },
                    Attribute { name: "tags".to_string(), ty: TypeTag::List },
                ],
            })]
        );
    }

    #[test]
    fn test_parse_add_with_structured_literals() {
        let input = r#"add Order = (id: 7, items: ["a", 2, 3.5], meta: {"k": 1}, at: (x: 1, y: "z"))"#;
        let results = parse_all(input);

        let Ok(Statement::Add { block, fields }) = &results[0] else {
            panic!("Expected add statement");
        };

        assert_eq!(block, "Order");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].value, Literal::Int(7));
        assert_eq!(
            fields[1].value,
            Literal::List(vec![
                Literal::String("a".to_string()),
                Literal::Int(2),
                Literal::Float(3.5),
            ])
        );
        assert_eq!(
            fields[2].value,
            Literal::Dict(vec![("k".to_string(), Literal::Int(1))])
        );
        assert!(matches!(&fields[3].value, Literal::Tuple(inner) if inner.len() == 2));
    }

    #[test]
    fn test_parse_operations() {
        let results = parse_all("print A view A mine A export A");

        assert_eq!(
            results,
            vec![
                Ok(Statement::Print { block: "A".to_string() }),
                Ok(Statement::View { block: "A".to_string() }),
                Ok(Statement::Mine { block: "A".to_string() }),
                Ok(Statement::Export { block: "A".to_string() }),
            ]
        );
    }

    #[test]
    fn test_nested_list_is_a_syntax_error() {
        let results = parse_all("add A = (x: [[1]])\nprint A");

        assert_eq!(
            results[0],
            Err(SyntaxError::UnexpectedToken { token: "[".to_string(), line: 1 })
        );
        assert_eq!(results[1], Ok(Statement::Print { block: "A".to_string() }));
    }

    #[test]
    fn test_recovery_resumes_at_next_statement_keyword() {
        let results = parse_all("block A = (x: int\nadd A = (x: 1)");

        assert_eq!(
            results[0],
            Err(SyntaxError::UnexpectedToken { token: "add".to_string(), line: 2 })
        );
        assert!(matches!(results[1], Ok(Statement::Add { .. })));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_stray_tokens_are_skipped_once() {
        let results = parse_all("Person 42 \"x\" mine Person");

        assert_eq!(
            results[0],
            Err(SyntaxError::UnexpectedToken { token: "Person".to_string(), line: 1 })
        );
        assert_eq!(results[1], Ok(Statement::Mine { block: "Person".to_string() }));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| {
            format!("add A = (x: {}1{})\nprint A", "(a: ".repeat(levels), ")".repeat(levels))
        };

        let results = parse_all(&nested(MAX_NESTING));
        assert!(results.iter().all(Result::is_ok));

        let results = parse_all(&nested(20_000));
        assert_eq!(results[0], Err(SyntaxError::NestingTooDeep { line: 1 }));
        assert_eq!(results[1], Ok(Statement::Print { block: "A".to_string() }));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_truncated_statement() {
        assert_eq!(parse_all("add Person = ("), vec![Err(SyntaxError::UnexpectedEof)]);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse_all("// nothing here\n"), vec![Err(SyntaxError::UnexpectedEof)]);
    }

    #[test]
    fn test_lex_errors_are_buffered() {
        let mut parser = Parser::new("print # A");

        assert_eq!(
            parser.next_statement(),
            Some(Ok(Statement::Print { block: "A".to_string() }))
        );
        assert_eq!(
            parser.take_lex_errors(),
            vec![LexError::IllegalCharacter { character: '#', line: 1 }]
        );
        assert!(parser.take_lex_errors().is_empty());
    }
}
