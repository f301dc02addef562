//! Minification: systematic renaming to short names, then compact output.
//!
//! Scopes are visited top-down. Each renamable variable (a local or
//! parameter with a declaration) takes the lowest free slot and asks the
//! naming strategy for candidates until one is a valid identifier in every
//! tree and clashes with no variable visible from where it can be accessed.
//! Slots return to the pool when the declaring scope's subtree is done, so
//! sibling scopes reuse the same short names.
//!
//! The renamed trees are printed compactly and reparsed into a new `Script`.

pub mod compact;

mod invariants;
mod slots;
mod strategy;

#[cfg(test)]
mod tests;

pub use strategy::{Alphabetical, NamingStrategy, Numerical};

use indexmap::{IndexMap, IndexSet};
use moonscope_core::is_valid_identifier;
use tracing::{debug, trace};

use crate::rename::rewrite;
use crate::script::Script;
use crate::semantic::{ScopeId, Semantics, VariableId, VariableKind, GLOBAL_SCOPE};
use crate::syntax::SyntaxTree;
use slots::SlotAllocator;

/// Built-in naming strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Alphabetical,
    Numerical,
}

#[derive(Debug, Clone, Default)]
pub struct MinifyOptions {
    pub strategy: Strategy,
}

impl Script {
    /// Rename every local to a short name and strip trivia.
    ///
    /// Never fails: strategies produce an unbounded sequence of candidates.
    pub fn minify(&self, strategy: &dyn NamingStrategy) -> Script {
        let names = assign_names(self, strategy);
        let renamed = rewrite(self, &names);
        let trees: Vec<SyntaxTree> = renamed.iter().map(reparse_compact).collect();

        debug!(
            renamed = names.len(),
            bytes_before = self.trees().iter().map(|t| t.text().len()).sum::<usize>(),
            bytes_after = trees.iter().map(|t| t.text().len()).sum::<usize>(),
            "minified script"
        );
        Script::new(trees)
    }

    pub fn minify_with(&self, options: &MinifyOptions) -> Script {
        match options.strategy {
            Strategy::Alphabetical => self.minify(&Alphabetical),
            Strategy::Numerical => self.minify(&Numerical),
        }
    }
}

/// New name for every renamable variable, in assignment order.
pub(crate) fn assign_names(script: &Script, strategy: &dyn NamingStrategy) -> IndexMap<VariableId, String> {
    let mut namer = Namer {
        script,
        strategy,
        slots: SlotAllocator::new(),
        names: IndexMap::new(),
    };
    namer.scope(GLOBAL_SCOPE);
    debug_assert_eq!(namer.slots.held(), 0);
    namer.names
}

struct Namer<'a> {
    script: &'a Script,
    strategy: &'a dyn NamingStrategy,
    slots: SlotAllocator,
    names: IndexMap<VariableId, String>,
}

impl Namer<'_> {
    fn semantics(&self) -> &Semantics {
        self.script.semantics()
    }

    fn scope(&mut self, scope: ScopeId) {
        let semantics = self.script.semantics();
        let renamable: Vec<VariableId> = semantics
            .scope(scope)
            .declared()
            .iter()
            .copied()
            .filter(|v| is_renamable(semantics, *v))
            .collect();

        for variable in &renamable {
            self.name(*variable, scope);
        }
        for child in semantics.scope(scope).children() {
            self.scope(*child);
        }
        for variable in &renamable {
            self.slots.release(*variable);
        }
    }

    /// Picks the first candidate no visible variable spells.
    ///
    /// Declarations in nested scopes count as taken even when they only
    /// shadow `variable`, so the result can be longer than necessary.
    fn name(&mut self, variable: VariableId, scope: ScopeId) {
        let slot = self.slots.allocate(variable);
        let taken: IndexSet<String> = self
            .semantics()
            .visible_variables(variable)
            .into_iter()
            .map(|other| self.current_name(other).to_owned())
            .collect();

        let mut attempt = 0;
        let name = loop {
            let candidate = self.strategy.candidate(slot, attempt, scope, &taken);
            if !taken.contains(&candidate) && self.valid_everywhere(&candidate) {
                break candidate;
            }
            attempt += 1;
        };

        trace!(
            variable = self.semantics().variable(variable).name(),
            slot,
            attempt,
            name = name.as_str(),
            "named variable"
        );
        self.names.insert(variable, name);
    }

    fn current_name(&self, variable: VariableId) -> &str {
        match self.names.get(&variable) {
            Some(name) => name,
            None => self.semantics().variable(variable).name(),
        }
    }

    fn valid_everywhere(&self, name: &str) -> bool {
        self.script
            .trees()
            .iter()
            .all(|tree| is_valid_identifier(name, tree.options()))
    }
}

fn is_renamable(semantics: &Semantics, variable: VariableId) -> bool {
    let variable = semantics.variable(variable);
    variable.kind() != VariableKind::Global && variable.declaration().is_some()
}

/// Print compactly and parse again with the tree's own options and path.
fn reparse_compact(tree: &SyntaxTree) -> SyntaxTree {
    let text = compact::emit(tree);
    let mut builder = SyntaxTree::builder(&text)
        .options(*tree.options())
        .exec_fuel(None)
        .recursion_limit(None);
    if let Some(path) = tree.path() {
        builder = builder.path(path);
    }
    // Only fuel can stop a parse, and it is disabled.
    builder.build().unwrap_or_else(|_| tree.clone())
}
