//! Scope analysis: scopes, variables, goto labels and usage containers.
//!
//! One forward walk over every tree of a `Script` produces an immutable
//! `Semantics` snapshot. Nodes are referenced by `NodePtr`, so the snapshot
//! is `Send + Sync` and outlives the `SyntaxNode` views used to build it.
//!
//! Scope tree:
//!
//! ```text
//! Global
//! └── File (one per tree)
//!     ├── Function (function bodies; parameters live here)
//!     └── Block (do/while/repeat/if clauses, for loops)
//! ```

mod builder;
mod invariants;
mod labels;
mod printer;
mod usage;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod labels_tests;

use indexmap::{IndexMap, IndexSet};

use crate::diagnostics::Diagnostics;
use crate::script::SourceId;
use crate::syntax::{NodePtr, SyntaxTree};

pub use printer::ScopesPrinter;
pub use usage::{ContainerParent, Read, ReadWriteContainer, Write, WriteValue};

/// Container of the global table; parent of every global variable's container.
pub const GLOBAL_TABLE: ContainerId = ContainerId(0);

/// The single Global scope, parent of every File scope.
pub const GLOBAL_SCOPE: ScopeId = ScopeId(0);

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

arena_id!(
    /// Index of a scope in `Semantics`.
    ScopeId
);
arena_id!(
    /// Index of a variable in `Semantics`. One per declaration.
    VariableId
);
arena_id!(
    /// Index of a goto label in `Semantics`.
    LabelId
);
arena_id!(
    /// Index of a usage container in `Semantics`.
    ContainerId
);

/// Ordered from most general to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeKind {
    Global,
    File,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) kind: ScopeKind,
    pub(crate) node: Option<NodePtr>,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    pub(crate) declared: Vec<VariableId>,
    pub(crate) referenced: IndexSet<VariableId>,
    pub(crate) labels: IndexMap<String, LabelId>,
    pub(crate) captured: IndexSet<VariableId>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, node: Option<NodePtr>, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            node,
            parent,
            children: Vec::new(),
            declared: Vec::new(),
            referenced: IndexSet::new(),
            labels: IndexMap::new(),
            captured: IndexSet::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The node introducing this scope; `None` only for the Global scope.
    pub fn node(&self) -> Option<NodePtr> {
        self.node
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Variables declared here, in declaration order.
    pub fn declared(&self) -> &[VariableId] {
        &self.declared
    }

    /// Variables referenced here or in a descendant, but owned by this scope or an ancestor.
    pub fn referenced(&self) -> &IndexSet<VariableId> {
        &self.referenced
    }

    pub fn labels(&self) -> &IndexMap<String, LabelId> {
        &self.labels
    }

    /// For Function scopes: referenced variables owned by a strict ancestor.
    pub fn captured(&self) -> &IndexSet<VariableId> {
        &self.captured
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Local,
    Global,
    Parameter,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) kind: VariableKind,
    pub(crate) scope: ScopeId,
    pub(crate) name: String,
    pub(crate) declaration: Option<NodePtr>,
    pub(crate) referenced_in: IndexSet<ScopeId>,
    pub(crate) reads: Vec<NodePtr>,
    pub(crate) writes: Vec<NodePtr>,
    pub(crate) container: ContainerId,
}

impl Variable {
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// The declaring scope.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `Name` node of the declaration; `None` for globals and implicit `self`.
    pub fn declaration(&self) -> Option<NodePtr> {
        self.declaration
    }

    pub fn referenced_in(&self) -> &IndexSet<ScopeId> {
        &self.referenced_in
    }

    /// `NameRef` nodes reading the variable.
    pub fn reads(&self) -> &[NodePtr] {
        &self.reads
    }

    /// `NameRef` nodes assigning the variable (declarations excluded).
    pub fn writes(&self) -> &[NodePtr] {
        &self.writes
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Declaration, reads and writes: every place the name is spelled.
    pub fn locations(&self) -> impl Iterator<Item = NodePtr> + '_ {
        self.declaration
            .into_iter()
            .chain(self.reads.iter().copied())
            .chain(self.writes.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct GotoLabel {
    pub(crate) name: String,
    pub(crate) scope: ScopeId,
    pub(crate) declaration: Option<NodePtr>,
    pub(crate) jumps: Vec<NodePtr>,
}

impl GotoLabel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// The `LabelStmt`; `None` while no matching label was found.
    pub fn declaration(&self) -> Option<NodePtr> {
        self.declaration
    }

    /// `GotoStmt` nodes targeting this label.
    pub fn jumps(&self) -> &[NodePtr] {
        &self.jumps
    }
}

/// Immutable analysis snapshot over the trees of a `Script`.
#[derive(Debug, Clone)]
pub struct Semantics {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) labels: Vec<GotoLabel>,
    pub(crate) containers: Vec<ReadWriteContainer>,
    pub(crate) scope_by_node: IndexMap<NodePtr, ScopeId>,
    pub(crate) variable_by_node: IndexMap<NodePtr, VariableId>,
    pub(crate) diagnostics: Vec<Diagnostics>,
}

impl Semantics {
    /// Analyze `trees`; tree `i` is addressed by `SourceId(i)`.
    pub fn build(trees: &[SyntaxTree]) -> Self {
        builder::ScopeBuilder::new().build(trees)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn label(&self, id: LabelId) -> &GotoLabel {
        &self.labels[id.index()]
    }

    pub fn container(&self, id: ContainerId) -> &ReadWriteContainer {
        &self.containers[id.index()]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId::from_index(i), s))
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId::from_index(i), v))
    }

    pub fn goto_labels(&self) -> impl Iterator<Item = (LabelId, &GotoLabel)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (LabelId::from_index(i), l))
    }

    pub fn scope_of_node(&self, ptr: &NodePtr) -> Option<ScopeId> {
        self.scope_by_node.get(ptr).copied()
    }

    pub fn variable_of_node(&self, ptr: &NodePtr) -> Option<VariableId> {
        self.variable_by_node.get(ptr).copied()
    }

    /// Semantic findings (labels, misplaced `break`) for one tree.
    pub fn diagnostics(&self, source: SourceId) -> Option<&Diagnostics> {
        self.diagnostics.get(source.index())
    }

    /// `scope` followed by its ancestors up to Global.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |s| self.scope(*s).parent)
    }

    /// `scope` and all its descendants, pre-order.
    pub fn descendants(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.scope(id).children.iter().rev().copied());
        }
        out
    }

    /// Nearest variable named `name` visible from `scope`.
    ///
    /// The walk goes outward and stops after the first scope whose kind is
    /// `limit` or more general, so `limit = Function` stays inside the
    /// enclosing function and `limit = Global` also finds globals. Within a
    /// scope, the latest declaration wins.
    pub fn find_variable(&self, scope: ScopeId, name: &str, limit: ScopeKind) -> Option<VariableId> {
        for id in self.ancestors(scope) {
            let scope = self.scope(id);
            let found = scope
                .declared
                .iter()
                .rev()
                .copied()
                .find(|v| self.variable(*v).name == name);
            if found.is_some() {
                return found;
            }
            if scope.kind <= limit {
                break;
            }
        }
        None
    }

    /// Whether `scope` is the declaring scope of `variable` or nested in it.
    pub fn can_be_accessed_in(&self, variable: VariableId, scope: ScopeId) -> bool {
        let owner = self.variable(variable).scope;
        self.ancestors(scope).any(|s| s == owner)
    }

    /// Scopes in which `variable` can be accessed: its owner and every descendant.
    pub fn accessible_scopes(&self, variable: VariableId) -> Vec<ScopeId> {
        self.descendants(self.variable(variable).scope)
    }

    /// Every other variable whose name would clash with `variable`'s.
    ///
    /// For each scope `variable` can be accessed in: variables declared
    /// there or in an ancestor, and variables referenced there.
    pub fn visible_variables(&self, variable: VariableId) -> IndexSet<VariableId> {
        let owner = self.variable(variable).scope;
        let mut visible = IndexSet::new();

        for scope in self.ancestors(owner) {
            visible.extend(self.scope(scope).declared.iter().copied());
        }
        for scope in self.accessible_scopes(variable) {
            let scope = self.scope(scope);
            visible.extend(scope.declared.iter().copied());
            visible.extend(scope.referenced.iter().copied());
        }

        visible.shift_remove(&variable);
        visible
    }

    /// Whether a container's value may have been changed through an alias.
    ///
    /// True when a strict ancestor in the member chain has a read that can
    /// mutate: a call, a method receiver, or the prefix of an assignment.
    pub fn has_indirect_writes(&self, container: ContainerId) -> bool {
        let mut current = self.container(container).parent;
        while let ContainerParent::Member(parent) = current {
            let parent = self.container(parent);
            if parent.reads.iter().any(|r| r.can_cause_mutation) {
                return true;
            }
            current = parent.parent;
        }
        false
    }

    pub fn printer<'s>(&'s self, trees: &'s [SyntaxTree]) -> ScopesPrinter<'s> {
        ScopesPrinter::new(self, trees)
    }
}
