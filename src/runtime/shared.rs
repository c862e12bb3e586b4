// src/runtime/shared.rs
//! Session shared between concurrent hosts
//!
//! A run reads and writes both the registry and the ledger, and block indices
//! are assigned from the chain length, so the lock covers a whole run rather
//! than individual statements.

use crate::ledger::BlockRecord;
use crate::runtime::context::{RunOutput, Session};
use crate::ExportError;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run a program while holding the session exclusively
    pub fn run(&self, source: &str) -> RunOutput {
        self.inner.lock().run(source)
    }

    pub fn snapshot(&self) -> Vec<BlockRecord> {
        self.inner.lock().snapshot()
    }

    pub fn export_bytes(&self) -> Result<Vec<u8>, ExportError> {
        self.inner.lock().export_bytes()
    }

    /// Borrow the session exclusively for several operations
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Run on the blocking pool so mining does not stall the async runtime
    #[cfg(feature = "tokio")]
    pub async fn run_async(&self, source: impl Into<String>) -> Result<RunOutput, crate::RuntimeError> {
        let shared = self.clone();
        let source = source.into();

        tokio::task::spawn_blocking(move || shared.run(&source))
            .await
            .map_err(|e| crate::RuntimeError::Internal(e.to_string()))
    }
}
