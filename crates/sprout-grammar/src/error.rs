//! Error types for rule construction and grammar assembly.
//!
//! Every stage fails fast: the first error encountered is returned as-is,
//! with enough context (tag, field, rule name) to render a diagnostic
//! pointing at the offending node.

use crate::build::json_type_name;

/// A malformed rule description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The `type` tag was a string, but not one of the known rule kinds.
    #[error("unrecognized rule type `{0}`")]
    UnrecognizedRuleKind(String),

    /// A rule object was required but something else was found, or the
    /// object carried no usable `type` tag.
    #[error("expected a rule object with a `type` tag, found {0}")]
    MalformedShape(String),

    /// A required field was absent.
    #[error("`{kind}` rule is missing its `{field}` field")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A required field was present with the wrong type.
    #[error("`{field}` field of a `{kind}` rule must be {expected}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        expected: &'static str,
    },
}

impl RuleError {
    pub(crate) fn malformed(value: &serde_json::Value) -> Self {
        RuleError::MalformedShape(json_type_name(value).to_string())
    }
}

/// A grammar that failed assembly.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// The grammar description was not valid JSON at all.
    #[error("grammar description is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule description failed to build.
    #[error("in rule `{name}`: {source}")]
    Rule {
        name: String,
        #[source]
        source: RuleError,
    },

    /// The same rule name appeared more than once.
    #[error("duplicate rule name `{0}`")]
    DuplicateRuleName(String),

    /// A `SYMBOL` reference names a rule that does not exist.
    ///
    /// Carries the referencing rule as well, so callers can point at the
    /// reference site rather than just the missing name.
    #[error("undefined symbol `{symbol}` referenced from rule `{rule}`")]
    UndefinedSymbol { symbol: String, rule: String },

    /// An auxiliary grammar field had the wrong shape.
    #[error("grammar `{field}` field must be {expected}")]
    MalformedField {
        field: &'static str,
        expected: &'static str,
    },

    /// An extras element failed to build as a rule.
    #[error("in extras[{index}]: {source}")]
    Extra {
        index: usize,
        #[source]
        source: RuleError,
    },

    /// An expected-conflict set names a rule that does not exist.
    #[error("conflict set references unknown rule `{0}`")]
    UnknownConflictRule(String),
}
