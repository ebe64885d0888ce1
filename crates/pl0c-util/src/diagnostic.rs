//! Diagnostics: the one channel every pipeline stage reports through.
//!
//! The pipeline proceeds to the next stage only if no `Severity::Error`
//! diagnostic has been raised in the stages run so far; see
//! [`Handler::has_errors`]. Diagnostics are accumulated, never discarded,
//! so a compile failure can print every error found in source order.

use crate::Line;
use std::fmt;

/// Which pipeline stage raised a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Lexical => "Lexical",
            Phase::Syntax => "Syntax",
            Phase::Semantic => "Semantic",
            Phase::Runtime => "Runtime",
        };
        write!(f, "{s}")
    }
}

/// Whether a diagnostic blocks compilation or is merely informative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "{s}")
    }
}

/// A single diagnostic message.
///
/// Renders as `[<Phase> <Severity>] Line <n>: <message>`, with
/// `Did you mean '<candidate>'?` appended when `suggestion` is set.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub phase: Phase,
    pub severity: Severity,
    pub line: Line,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(phase: Phase, severity: Severity, line: Line, message: impl Into<String>) -> Self {
        Self {
            phase,
            severity,
            line,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(phase: Phase, line: Line, message: impl Into<String>) -> Self {
        Self::new(phase, Severity::Error, line, message)
    }

    pub fn warning(phase: Phase, line: Line, message: impl Into<String>) -> Self {
        Self::new(phase, Severity::Warning, line, message)
    }

    pub fn with_suggestion(mut self, candidate: impl Into<String>) -> Self {
        self.suggestion = Some(candidate.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] Line {}: {}",
            self.phase, self.severity, self.line, self.message
        )?;
        if let Some(candidate) = &self.suggestion {
            write!(f, " Did you mean '{candidate}'?")?;
        }
        Ok(())
    }
}

/// Accumulates diagnostics for the whole compile-and-run session.
///
/// Every stage holds a `&mut Handler` rather than its own diagnostic list,
/// so a single ordered list survives across stages for final reporting.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, phase: Phase, line: Line, message: impl Into<String>) {
        self.emit(Diagnostic::error(phase, line, message));
    }

    pub fn warning(&mut self, phase: Phase, line: Line, message: impl Into<String>) {
        self.emit(Diagnostic::warning(phase, line, message));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_without_suggestion() {
        let diag = Diagnostic::error(Phase::Semantic, Line(4), "undeclared identifier 'x'");
        assert_eq!(
            diag.to_string(),
            "[Semantic Error] Line 4: undeclared identifier 'x'"
        );
    }

    #[test]
    fn formats_with_suggestion() {
        let diag = Diagnostic::error(Phase::Semantic, Line(4), "undeclared identifier 'countr'")
            .with_suggestion("counter");
        assert_eq!(
            diag.to_string(),
            "[Semantic Error] Line 4: undeclared identifier 'countr' Did you mean 'counter'?"
        );
    }

    #[test]
    fn handler_tracks_errors_and_warnings_separately() {
        let mut handler = Handler::new();
        handler.warning(Phase::Semantic, Line(1), "dead branch");
        assert!(!handler.has_errors());
        handler.error(Phase::Syntax, Line(2), "unexpected token");
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.diagnostics().len(), 2);
    }
}
