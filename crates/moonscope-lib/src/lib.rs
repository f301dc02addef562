//! Moonscope: scope analysis, safe renaming and minification for Lua.
//!
//! # Example
//!
//! ```
//! use moonscope_lib::{LuaSyntaxOptions, Script, SyntaxTree};
//! use moonscope_lib::minify::Alphabetical;
//!
//! let tree = SyntaxTree::parse("local count = 0\ncount = count + 1", LuaSyntaxOptions::ALL)
//!     .expect("out of fuel");
//! let script = Script::single(tree);
//! let minified = script.minify(&Alphabetical);
//! assert_eq!(minified.trees()[0].text(), "local a=0 a=a+1");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod minify;
pub mod rename;
pub mod script;
pub mod semantic;
pub mod syntax;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use moonscope_core::{IdentifierCharacters, LuaSyntaxOptions};
pub use rename::RenameError;
pub use script::{Script, SourceId, SourceKind};
pub use syntax::SyntaxTree;

/// Errors that can occur while parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
