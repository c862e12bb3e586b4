// src/runtime/context.rs
//! Interpreter context: the state that outlives a single run

use crate::config::LedgerConfig;
use crate::ledger::export::{self, BlockRecord};
use crate::ledger::{Block, Ledger};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::transcript::Transcript;
use crate::runtime::validator;
use crate::runtime::value::Value;
use crate::schema::Registry;
use crate::{ConfigError, ExportError, SemanticError};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a host gets back from a run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Everything the program printed, diagnostics included
    pub transcript: Transcript,

    /// Ledger snapshot after the run
    pub chain: Vec<BlockRecord>,
}

/// Block definitions plus the ledger they feed.
///
/// Both persist across [`Session::run`] calls, so a schema declared in one
/// run can be used by the next.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: LedgerConfig,
    pub(crate) registry: Registry,
    pub(crate) ledger: Ledger,
}

impl Session {
    /// Session with the default configuration
    pub fn new() -> Self {
        Self {
            ledger: Ledger::default(),
            registry: Registry::new(),
            config: LedgerConfig::default(),
        }
    }

    /// Validate `config` and mine the genesis block under its budget
    pub fn with_config(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ledger: Ledger::new(&config).map_err(ConfigError::Genesis)?,
            registry: Registry::new(),
            config,
        })
    }

    /// Execute a program and return its transcript with the resulting chain
    pub fn run(&mut self, source: &str) -> RunOutput {
        let transcript = Interpreter::new(self).run(source);

        RunOutput {
            transcript,
            chain: self.snapshot(),
        }
    }

    /// Validate and append a record without going through the DSL.
    ///
    /// Unknown attributes are logged and kept, as in `add`.
    pub fn instantiate(
        &mut self,
        block: &str,
        fields: Vec<(String, Value)>,
    ) -> Result<usize, SemanticError> {
        let validation = validator::validate(&self.registry, block, fields);
        for warning in &validation.warnings {
            warn!("{}", warning);
        }

        let data = validation.result?;
        Ok(self.ledger.append(Block::new(Value::Dict(data))))
    }

    /// Current chain as per-block records
    pub fn snapshot(&self) -> Vec<BlockRecord> {
        self.ledger.serialize_all()
    }

    /// Snapshot rendered as pretty JSON, for display
    pub fn chain_json(&self) -> Result<String, ExportError> {
        let bytes = export::to_pretty_json(&self.snapshot())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the export document to the configured path
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        let path = self.config.export_path.clone();
        export::write_export(&path, &self.snapshot())?;
        info!(path = %path.display(), blocks = self.ledger.len(), "ledger exported");
        Ok(path)
    }

    /// Fresh export, read back from the file it was written to
    pub fn export_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let path = self.export()?;
        Ok(std::fs::read(path)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
