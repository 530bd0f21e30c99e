//! Adapter over the external parser-table generation service.
//!
//! Table generation itself (LR construction, conflict resolution) lives
//! behind [`TableGenerator`]; this layer hands it a validated grammar in
//! JSON wire form and passes its output through untouched. Generation is a
//! deterministic function of the grammar, so nothing here retries.

use crate::grammar::Grammar;

/// The external table-generation service.
pub trait TableGenerator {
    /// Generate parser source text for the named grammar.
    ///
    /// `grammar_json` is the grammar's JSON wire form
    /// ([`Grammar::to_json`]); the returned text is opaque to this crate.
    fn generate(&self, name: &str, grammar_json: &str) -> Result<String, CompileError>;
}

/// A failure reported by the table generator.
///
/// `is_grammar_error` distinguishes diagnostics the grammar author should
/// fix (ambiguities, conflicts) from every other failure class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub is_grammar_error: bool,
}

/// Run the table generator against an assembled grammar.
pub fn generate_parser(
    grammar: &Grammar,
    generator: &dyn TableGenerator,
) -> Result<String, CompileError> {
    generator.generate(&grammar.name, &grammar.to_json().to_string())
}
