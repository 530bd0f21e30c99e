#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Sprout: grammar compilation and dynamic language loading.
//!
//! Two independent pipelines, re-exported here:
//!
//! - [`sprout_grammar`] turns an untyped grammar description into a
//!   validated [`Grammar`] and hands it to a [`TableGenerator`];
//! - [`sprout_loader`] builds and loads a native language library,
//!   resolving its entry-point symbol.
//!
//! [`compile_and_load`] composes the two: generate parser source for a
//! grammar, write it to a temporary file, and provision it under the
//! grammar's name.

pub use sprout_grammar::{
    Auxiliary, CompileError, Grammar, GrammarError, Rule, RuleError, TableGenerator, build_rule,
    generate_parser,
};
pub use sprout_loader::{
    BuildOptions, LANGUAGE_SYMBOL_PREFIX, ModuleHandle, ProvisionError, entry_symbol_name, loaded,
    provision,
};


/// A failure anywhere along the compile-and-load path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("could not write generated parser source: {0}")]
    WriteSource(#[from] std::io::Error),

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

/// Generate parser source for `grammar`, build it, and load it.
///
/// The generated source lands in a temporary file that lives only as long
/// as this call; the loaded library itself stays in the process for good,
/// registered under the grammar's name.
pub fn compile_and_load(
    grammar: &Grammar,
    generator: &dyn TableGenerator,
    options: &BuildOptions,
) -> Result<ModuleHandle, Error> {
    let code = generate_parser(grammar, generator)?;

    let dir = tempfile::tempdir()?;
    let source_path = dir.path().join(format!("{}.c", grammar.name));
    std::fs::write(&source_path, code)?;

    Ok(provision(&source_path, &grammar.name, options)?)
}
