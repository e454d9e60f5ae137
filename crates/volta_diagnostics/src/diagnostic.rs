//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use volta_source::SourceLoc;

/// One diagnostic message: severity, code, text, and the source location
/// of the construct it complains about, plus any explanatory notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level.
    pub severity: Severity,
    /// The structured code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main message text.
    pub message: String,
    /// Where the offending construct was declared.
    pub loc: SourceLoc,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, loc: SourceLoc) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            loc,
            notes: Vec::new(),
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, loc: SourceLoc) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            loc,
            notes: Vec::new(),
        }
    }

    /// Appends a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "expression width conflict", SourceLoc::DUMMY);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "expression width conflict");
        assert_eq!(format!("{}", diag.code), "E301");
    }

    #[test]
    fn create_warning_with_note() {
        let code = DiagnosticCode::new(Category::Warning, 102);
        let diag = Diagnostic::warning(code, "implicit wire", SourceLoc::DUMMY)
            .with_note("declare the net explicitly");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "bad width", SourceLoc::DUMMY);
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "bad width");
        assert_eq!(back.code, code);
    }
}
