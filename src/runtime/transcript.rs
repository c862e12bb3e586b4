// src/runtime/transcript.rs
//! Captured output of one run

use crate::Diagnostic;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

/// Ordered lines written by a program: confirmations and diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<Line>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.lines.push(Line {
            kind: LineKind::Info,
            text: text.into(),
        });
    }

    pub fn diagnostic(&mut self, diagnostic: impl Into<Diagnostic>) {
        let diagnostic = diagnostic.into();
        let text = diagnostic.to_string();
        warn!(kind = ?diagnostic.kind(), "{}", text);
        self.lines.push(Line {
            kind: diagnostic.kind(),
            text,
        });
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Diagnostic lines only, in order
    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|line| line.kind != LineKind::Info)
            .map(|line| line.text.as_str())
    }

    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }

    /// All lines, each terminated by a newline
    pub fn text(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line.text)?;
        }
        Ok(())
    }
}
