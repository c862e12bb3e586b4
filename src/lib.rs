// src/lib.rs
//! # Chainscript
//!
//! A small language for declaring typed record schemas ("blocks"),
//! instantiating records, and appending them to an in-memory, hash-linked,
//! proof-of-work-sealed ledger.
//!
//! Each statement is executed as soon as it is parsed. Everything a program
//! says back (confirmations and diagnostics) is collected into one transcript
//! per run; nothing aborts the run as a whole.
//!
//! ## Example
//!
//! ```rust
//! use chainscript::{LedgerConfig, Session};
//!
//! let config = LedgerConfig::default().with_difficulty(2);
//! let mut session = Session::with_config(config).unwrap();
//!
//! let output = session.run(r#"
//!     block Person = (name: str, age: int)
//!     add Person = (name: "Alice", age: 30)
//!     mine Person
//! "#);
//!
//! assert!(output.transcript.text().contains("Person added to blockchain"));
//! assert_eq!(output.chain.len(), 2); // genesis + Alice
//! assert!(output.chain[1].hash.starts_with("00"));
//! ```

pub mod config;
pub mod ledger;
pub mod parser;
pub mod runtime;
pub mod schema;

use runtime::value::repr_name_list;
use std::path::PathBuf;
use thiserror::Error;

pub use config::LedgerConfig;
pub use ledger::{Block, BlockRecord, Ledger};
pub use parser::lexer::LexError;
pub use parser::parser::SyntaxError;
pub use runtime::context::{RunOutput, Session};
pub use runtime::shared::SharedSession;
pub use runtime::transcript::{LineKind, Transcript};
pub use runtime::value::{FieldMap, Value};
pub use schema::{BlockDefinition, Registry, TypeTag};

/// Errors found while checking a record against its block definition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("[Semantic Error] Undefined block '{0}'")]
    UndefinedBlock(String),

    #[error(
        "[Semantic Error] Missing required fields for '{block}': {}",
        repr_name_list(.missing.iter().map(String::as_str))
    )]
    MissingFields { block: String, missing: Vec<String> },

    /// Reported, but the field is still stored
    #[error("[Semantic Error] Unknown attribute '{field}' for block '{block}'")]
    UnknownAttribute { field: String, block: String },

    #[error("[Semantic Error] '{field}' should be {}, got {actual}", .expected.expectation())]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        actual: &'static str,
    },

    #[error("[Semantic Error] Unknown expected type '{type_name}' for field '{field}'")]
    UnknownExpectedType { field: String, type_name: String },
}

/// Proof-of-work search failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiningError {
    #[error("proof-of-work search gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },
}

/// Errors writing the ledger out
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Unexpected failures while executing a statement
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("[Runtime Error] mining block {index}: {source}")]
    Mining {
        index: usize,
        #[source]
        source: MiningError,
    },

    #[error("[Runtime Error] {0}")]
    Export(#[from] ExportError),

    #[error("[Runtime Error] {0}")]
    Internal(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("difficulty must be between 1 and 64, got {0}")]
    InvalidDifficulty(usize),

    #[error("max_mining_attempts must be at least 1")]
    ZeroMiningAttempts,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("genesis block could not be mined: {0}")]
    Genesis(#[source] MiningError),
}

/// Anything that ends up as a diagnostic line in a transcript
#[derive(Error, Debug)]
pub enum Diagnostic {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Diagnostic {
    pub fn kind(&self) -> LineKind {
        match self {
            Diagnostic::Lexical(_) => LineKind::Lexical,
            Diagnostic::Syntax(_) => LineKind::Syntax,
            Diagnostic::Semantic(_) => LineKind::Semantic,
            Diagnostic::Runtime(_) => LineKind::Runtime,
        }
    }
}
