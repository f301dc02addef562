//! Lua front end: lexer, parser and lossless syntax trees.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: suffix chains (`a.b[c]:d()`) and binary operators are
//!   wrapped retroactively
//! - Dialect gating: extensions are always parsed, and rejected with a diagnostic
//!   when the tree's `LuaSyntaxOptions` do not accept them
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree.
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Statement keywords are synchronization points for expression errors
//!
//! Fuel exhaustion (exec fuel, recursion limit) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;
mod invariants;
mod printer;
mod ptr;


pub use cst::{LuaLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use printer::SyntaxTreePrinter;
pub use ptr::NodePtr;

use moonscope_core::LuaSyntaxOptions;
use rowan::GreenNode;
use tracing::debug;

use crate::Result;
use crate::diagnostics::Diagnostics;
use crate::script::SourceKind;
use core::Parser;
use lexer::lex;

const DEFAULT_EXEC_FUEL: u32 = 10_000_000;
const DEFAULT_RECURSION_LIMIT: u32 = 512;

/// A parsed Lua chunk: source text, immutable green tree and parse diagnostics.
///
/// The tree is always complete: diagnostics are returned separately and
/// `Error` nodes mark recovery points.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    kind: SourceKind,
    text: String,
    green: GreenNode,
    options: LuaSyntaxOptions,
    diagnostics: Diagnostics,
}

impl SyntaxTree {
    /// Parse `text` with default limits.
    pub fn parse(text: &str, options: LuaSyntaxOptions) -> Result<Self> {
        Self::builder(text).options(options).build()
    }

    pub fn builder(text: &str) -> SyntaxTreeBuilder<'_> {
        SyntaxTreeBuilder::new(text)
    }

    /// Tree produced by a token rewrite of `self`.
    pub(crate) fn with_green(&self, green: GreenNode, diagnostics: Diagnostics) -> Self {
        let text = SyntaxNode::new_root(green.clone()).text().to_string();
        Self {
            kind: self.kind.clone(),
            text,
            green,
            options: self.options,
            diagnostics,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Creates a navigable view over the immutable green tree.
    ///
    /// Each call creates a fresh root: nodes from different calls compare
    /// unequal, but share the green tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn root(&self) -> Option<ast::Root> {
        ast::Root::cast(self.syntax())
    }

    pub fn options(&self) -> &LuaSyntaxOptions {
        &self.options
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn source_kind(&self) -> &SourceKind {
        &self.kind
    }

    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::File(path) => Some(path.as_str()),
            SourceKind::Inline => None,
        }
    }

    /// Whether `node` belongs to this exact tree (not an earlier or later version).
    pub fn owns(&self, node: &SyntaxNode) -> bool {
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        std::ptr::eq(&*root.green(), &*self.green)
    }

    pub fn printer(&self) -> SyntaxTreePrinter<'_> {
        SyntaxTreePrinter::new(self)
    }
}

/// Configures and runs a parse.
pub struct SyntaxTreeBuilder<'a> {
    text: &'a str,
    kind: SourceKind,
    options: LuaSyntaxOptions,
    exec_fuel: Option<u32>,
    recursion_limit: Option<u32>,
}

impl<'a> SyntaxTreeBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            kind: SourceKind::Inline,
            options: LuaSyntaxOptions::default(),
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
        }
    }

    pub fn options(mut self, options: LuaSyntaxOptions) -> Self {
        self.options = options;
        self
    }

    /// File path shown in rendered diagnostics.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.kind = SourceKind::File(path.into());
        self
    }

    /// Maximum number of tokens consumed; `None` for unlimited.
    pub fn exec_fuel(mut self, fuel: Option<u32>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Maximum nesting of blocks and expressions; `None` for unlimited.
    pub fn recursion_limit(mut self, limit: Option<u32>) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn build(self) -> Result<SyntaxTree> {
        let tokens = lex(self.text);
        let mut parser = Parser::new(self.text, tokens, self.options)
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_fuel(self.recursion_limit);
        parser.parse_root();
        let (green, diagnostics) = parser.finish()?;

        debug!(
            source = self.kind.display_name(),
            bytes = self.text.len(),
            errors = diagnostics.error_count(),
            "parsed chunk"
        );

        Ok(SyntaxTree {
            kind: self.kind,
            text: self.text.to_owned(),
            green,
            options: self.options,
            diagnostics,
        })
    }
}
