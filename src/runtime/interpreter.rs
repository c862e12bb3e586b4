// src/runtime/interpreter.rs
//! Statement execution
//!
//! Statements run in source order, each as soon as it has been parsed. A
//! failing statement writes one diagnostic and the run carries on with the
//! next one.

use crate::ledger::Block;
use crate::parser::ast::{Attribute, FieldInit, Statement};
use crate::parser::parser::Parser;
use crate::runtime::context::Session;
use crate::runtime::transcript::Transcript;
use crate::runtime::validator;
use crate::runtime::value::Value;
use crate::schema::BlockDefinition;
use crate::{RuntimeError, SemanticError};
use tracing::{debug, info, info_span};

pub struct Interpreter<'s> {
    session: &'s mut Session,
    transcript: Transcript,
}

impl<'s> Interpreter<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            transcript: Transcript::new(),
        }
    }

    /// Run a whole program and hand back its transcript
    pub fn run(mut self, source: &str) -> Transcript {
        let _span = info_span!("run", bytes = source.len()).entered();
        let mut parser = Parser::new(source);

        while let Some(parsed) = parser.next_statement() {
            for err in parser.take_lex_errors() {
                self.transcript.diagnostic(err);
            }

            match parsed {
                Ok(statement) => self.execute(statement),
                Err(err) => {
                    self.transcript.diagnostic(err);
                    parser.recover();
                }
            }
        }

        for err in parser.take_lex_errors() {
            self.transcript.diagnostic(err);
        }

        self.transcript
    }

    /// Execute one statement; errors become transcript lines
    pub fn execute(&mut self, statement: Statement) {
        debug!(keyword = statement.keyword(), target = statement.target(), "executing");

        let outcome = match statement {
            Statement::Define { name, attributes } => {
                self.define(name, attributes);
                Ok(())
            }
            Statement::Add { block, fields } => {
                self.add(&block, fields);
                Ok(())
            }
            Statement::Print { .. } => {
                self.print();
                Ok(())
            }
            Statement::View { block } => {
                debug!(block = %block, "view has no effect");
                Ok(())
            }
            Statement::Mine { block } => self.mine(&block),
            Statement::Export { .. } => self.export(),
        };

        if let Err(err) = outcome {
            self.transcript.diagnostic(err);
        }
    }

    fn define(&mut self, name: String, attributes: Vec<Attribute>) {
        let mut definition = BlockDefinition::new(name);
        for attribute in attributes {
            definition.declare(attribute.name, attribute.ty);
        }

        let line = format!(
            "Created block \"{}\" with {}",
            definition.name,
            definition.describe()
        );
        info!(block = %definition.name, fields = definition.fields().len(), "block defined");

        self.session.registry.define(definition);
        self.transcript.info(line);
    }

    fn add(&mut self, block: &str, fields: Vec<FieldInit>) {
        let provided: Vec<(String, Value)> = fields.into_iter().map(Into::into).collect();
        let validation = validator::validate(&self.session.registry, block, provided);

        for warning in validation.warnings {
            self.transcript.diagnostic(warning);
        }

        match validation.result {
            Ok(data) => {
                self.session.ledger.append(Block::new(Value::Dict(data)));
                self.transcript.info(format!("{} added to blockchain", block));
            }
            Err(err) => self.transcript.diagnostic(err),
        }
    }

    fn print(&mut self) {
        for block in self.session.ledger.blocks() {
            for line in block.summary_lines() {
                self.transcript.info(line);
            }
        }
    }

    /// The schema name only guards the statement; the whole ledger is mined
    fn mine(&mut self, block: &str) -> Result<(), RuntimeError> {
        if !self.session.registry.contains(block) {
            self.transcript
                .diagnostic(SemanticError::UndefinedBlock(block.to_string()));
            return Ok(());
        }

        self.session.ledger.mine_all()?;
        self.transcript.info("Mined blockchain!");
        Ok(())
    }

    fn export(&mut self) -> Result<(), RuntimeError> {
        self.session.export()?;
        Ok(())
    }
}
