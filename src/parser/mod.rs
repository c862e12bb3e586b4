// src/parser/mod.rs
//! Front end for the block DSL
//!
//! Converts source text into statements. Execution lives in
//! [`crate::runtime`]; this module only reads.

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::Diagnostic;
pub use ast::Statement;

/// Everything the front end found in one source text
#[derive(Debug, Default)]
pub struct ParseReport {
    pub statements: Vec<Statement>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Lex and parse a whole program without executing it.
///
/// Uses the same recovery as a real run: a broken statement is reported once
/// and parsing resumes at the next statement keyword.
pub fn parse(source: &str) -> ParseReport {
    let mut parser = parser::Parser::new(source);
    let mut report = ParseReport::default();

    while let Some(result) = parser.next_statement() {
        report
            .diagnostics
            .extend(parser.take_lex_errors().into_iter().map(Diagnostic::from));

        match result {
            Ok(statement) => report.statements.push(statement),
            Err(err) => {
                report.diagnostics.push(err.into());
                parser.recover();
            }
        }
    }

    report
        .diagnostics
        .extend(parser.take_lex_errors().into_iter().map(Diagnostic::from));

    report
}
