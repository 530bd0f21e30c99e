#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar rule IR, validation, and parser generation for Sprout.
//!
//! An untrusted grammar description (untyped JSON) is turned into a
//! strongly typed [`Grammar`] in two stages:
//!
//! - [`build_rule`] constructs one [`Rule`] tree per production, failing
//!   fast with a located [`RuleError`] on the first malformed node;
//! - [`Grammar::assemble`] collects named rules, builds the auxiliary
//!   fields, and resolves every `SYMBOL` reference against the rule table
//!   (forward references are legal, so this happens after all rules exist).
//!
//! A validated grammar is then consumed exactly once by
//! [`generate_parser`], which delegates to an external [`TableGenerator`].
//! The whole pipeline is purely functional over immutable inputs;
//! concurrent calls with independent inputs share no state.

pub mod build;
pub mod error;
pub mod generate;
pub mod grammar;
pub mod rules;

#[cfg(test)]
mod grammar_tests;

pub use build::build_rule;
pub use error::{GrammarError, RuleError};
pub use generate::{CompileError, TableGenerator, generate_parser};
pub use grammar::{Auxiliary, Grammar};
pub use rules::Rule;
