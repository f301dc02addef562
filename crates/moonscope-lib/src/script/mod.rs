//! A set of parsed chunks analyzed together.
//!
//! `Script` pairs the syntax trees with the `Semantics` snapshot built over
//! them. It is never mutated: renaming and minification return a new
//! `Script` with new trees, and nodes of the old trees resolve to nothing
//! in the new one.


use crate::diagnostics::Diagnostics;
use crate::semantic::{
    ContainerId, ReadWriteContainer, ScopeId, ScopeKind, Semantics, VariableId,
};
use crate::syntax::{NodePtr, SyntaxKind, SyntaxNode, SyntaxTree};

/// Lightweight handle to a tree in a `Script`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Describes the origin of a source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// Text passed directly (tests, REPL-style hosts).
    Inline,
    /// A file with its path.
    File(String),
}

impl SourceKind {
    /// Returns the display name for diagnostics.
    pub fn display_name(&self) -> &str {
        match self {
            SourceKind::Inline => "<inline>",
            SourceKind::File(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Script {
    trees: Vec<SyntaxTree>,
    semantics: Semantics,
}

impl Script {
    /// Analyze `trees` together; they share the Global scope.
    pub fn new(trees: Vec<SyntaxTree>) -> Self {
        let semantics = Semantics::build(&trees);
        Self { trees, semantics }
    }

    pub fn single(tree: SyntaxTree) -> Self {
        Self::new(vec![tree])
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn tree(&self, source: SourceId) -> Option<&SyntaxTree> {
        self.trees.get(source.index())
    }

    pub fn semantics(&self) -> &Semantics {
        &self.semantics
    }

    /// The tree `node` belongs to; `None` for nodes of other or older trees.
    pub fn source_of(&self, node: &SyntaxNode) -> Option<SourceId> {
        self.trees
            .iter()
            .position(|tree| tree.owns(node))
            .map(SourceId::from_index)
    }

    pub fn node_ptr(&self, node: &SyntaxNode) -> Option<NodePtr> {
        self.source_of(node).map(|source| NodePtr::new(source, node))
    }

    /// Resolve a pointer back to a node of this script's trees.
    pub fn node(&self, ptr: NodePtr) -> Option<SyntaxNode> {
        let tree = self.tree(ptr.source)?;
        ptr.to_node(&tree.syntax())
    }

    /// The scope introduced by `node`, if it introduces one.
    pub fn get_scope(&self, node: &SyntaxNode) -> Option<ScopeId> {
        let ptr = self.node_ptr(node)?;
        self.semantics.scope_of_node(&ptr)
    }

    /// The innermost scope enclosing `node`.
    ///
    /// This is the scope names inside `node` resolve in: `for` bounds and
    /// function names belong to the enclosing scope, a `repeat` condition
    /// to the loop body.
    ///
    /// `None` only for nodes that do not belong to this script.
    pub fn find_scope(&self, node: &SyntaxNode) -> Option<ScopeId> {
        let source = self.source_of(node)?;
        let scope_of = |n: &SyntaxNode| self.semantics.scope_of_node(&NodePtr::new(source, n));

        let mut child: Option<SyntaxNode> = None;
        for owner in node.ancestors() {
            let via_header = child.as_ref().is_some_and(|c| is_scope_header(&owner, c));
            if !via_header && let Some(scope) = scope_of(&owner) {
                return Some(scope);
            }
            if owner.kind() == SyntaxKind::RepeatStmt
                && child.as_ref().is_some_and(|c| c.kind() != SyntaxKind::Block)
                && let Some(body) = owner.children().find(|n| n.kind() == SyntaxKind::Block)
                && let Some(scope) = scope_of(&body)
            {
                return Some(scope);
            }
            child = Some(owner);
        }
        None
    }

    /// The variable a `Name` or `NameRef` node declares or refers to.
    pub fn get_variable(&self, node: &SyntaxNode) -> Option<VariableId> {
        if !matches!(node.kind(), SyntaxKind::Name | SyntaxKind::NameRef) {
            return None;
        }
        let ptr = self.node_ptr(node)?;
        self.semantics.variable_of_node(&ptr)
    }

    /// See [`Semantics::find_variable`].
    pub fn find_variable(&self, scope: ScopeId, name: &str, limit: ScopeKind) -> Option<VariableId> {
        self.semantics.find_variable(scope, name, limit)
    }

    pub fn can_be_accessed_in(&self, variable: VariableId, scope: ScopeId) -> bool {
        self.semantics.can_be_accessed_in(variable, scope)
    }

    /// Usage container of a variable.
    pub fn container(&self, variable: VariableId) -> &ReadWriteContainer {
        let id = self.semantics.variable(variable).container();
        self.semantics.container(id)
    }

    pub fn container_by_id(&self, id: ContainerId) -> &ReadWriteContainer {
        self.semantics.container(id)
    }

    /// Parse diagnostics followed by semantic diagnostics for one tree.
    pub fn diagnostics(&self, source: SourceId) -> Diagnostics {
        let mut all = Diagnostics::new();
        if let Some(tree) = self.tree(source) {
            all.extend(tree.diagnostics().clone());
        }
        if let Some(semantic) = self.semantics.diagnostics(source) {
            all.extend(semantic.clone());
        }
        all
    }

    /// Parse and semantic diagnostics of one tree as annotated snippets.
    pub fn render_diagnostics(&self, source: SourceId, colored: bool) -> String {
        let Some(tree) = self.tree(source) else {
            return String::new();
        };
        self.diagnostics(source)
            .printer()
            .tree(tree)
            .colored(colored)
            .render()
    }

    /// Source text under `ptr`.
    pub fn text_at(&self, ptr: NodePtr) -> Option<&str> {
        let tree = self.tree(ptr.source)?;
        tree.text().get(std::ops::Range::<usize>::from(ptr.range))
    }

    pub fn dump_scopes(&self) -> String {
        self.semantics.printer(&self.trees).dump()
    }
}

/// Children of a scope owner that are resolved outside the scope it opens.
fn is_scope_header(owner: &SyntaxNode, child: &SyntaxNode) -> bool {
    match owner.kind() {
        SyntaxKind::NumericForStmt | SyntaxKind::GenericForStmt => {
            !matches!(child.kind(), SyntaxKind::Name | SyntaxKind::Block)
        }
        SyntaxKind::LocalFunctionStmt | SyntaxKind::FunctionStmt => {
            child.kind() != SyntaxKind::FunctionBody
        }
        _ => false,
    }
}
