//! Structured diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Semantic errors, prefixed `E`.
    Error,
    /// Warnings, prefixed `W`.
    Warning,
    /// Elaboration/netlist informational diagnostics, prefixed `N`.
    Netlist,
}

impl Category {
    /// The single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Netlist => 'N',
        }
    }
}

/// A diagnostic code: category prefix plus a number, displayed like
/// `E301` or `W112`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this code.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Netlist.prefix(), 'N');
    }

    #[test]
    fn display_pads_to_three_digits() {
        assert_eq!(
            format!("{}", DiagnosticCode::new(Category::Error, 301)),
            "E301"
        );
        assert_eq!(
            format!("{}", DiagnosticCode::new(Category::Warning, 7)),
            "W007"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
