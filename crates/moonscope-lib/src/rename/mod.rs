//! Safe variable renaming.
//!
//! A rename is validated in full before anything is rewritten: every error
//! is collected and returned together, and on success the result is a new
//! `Script` built from new trees. The original script is left untouched.

#[cfg(test)]
mod tests;

use indexmap::{IndexMap, IndexSet};
use moonscope_core::is_valid_identifier;
use rowan::{GreenNode, GreenToken, TextRange, TextSize};
use tracing::debug;

use crate::diagnostics::shift_range;
use crate::script::{Script, SourceId};
use crate::semantic::VariableId;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};

/// Why a rename was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    /// The new name is not an identifier in the dialect of one of the trees.
    #[error("`{name}` is not a valid identifier in source {}", .tree.index())]
    IdentifierNameNotSupported { tree: SourceId, name: String },

    /// Another variable with the new name is visible where the variable is.
    #[error("the new name is already used by variable {conflicting_variable:?}")]
    VariableConflict {
        variable: VariableId,
        conflicting_variable: VariableId,
    },

    /// Globals and implicit `self` have no declaration to rename.
    #[error("variable {variable:?} has no declaration")]
    ImplicitVariable { variable: VariableId },
}

impl Script {
    /// Rename `variable` to `new_name` everywhere it is spelled.
    pub fn rename_variable(&self, variable: VariableId, new_name: &str) -> Result<Script, Vec<RenameError>> {
        let errors = self.validate_rename(variable, new_name);
        if !errors.is_empty() {
            debug!(
                variable = self.semantics().variable(variable).name(),
                new_name,
                errors = errors.len(),
                "rename rejected"
            );
            return Err(errors);
        }

        let mut renames = IndexMap::new();
        renames.insert(variable, new_name.to_owned());
        let trees = rewrite(self, &renames);

        debug!(
            variable = self.semantics().variable(variable).name(),
            new_name, "renamed variable"
        );
        Ok(Script::new(trees))
    }

    /// All reasons `variable` cannot be renamed to `new_name`; empty when it can.
    pub fn validate_rename(&self, variable: VariableId, new_name: &str) -> Vec<RenameError> {
        let semantics = self.semantics();
        let mut errors = Vec::new();

        for (index, tree) in self.trees().iter().enumerate() {
            if !is_valid_identifier(new_name, tree.options()) {
                errors.push(RenameError::IdentifierNameNotSupported {
                    tree: SourceId::from_index(index),
                    name: new_name.to_owned(),
                });
            }
        }

        if semantics.variable(variable).declaration().is_none() {
            errors.push(RenameError::ImplicitVariable { variable });
        }

        for other in semantics.visible_variables(variable) {
            if semantics.variable(other).name() == new_name {
                errors.push(RenameError::VariableConflict {
                    variable,
                    conflicting_variable: other,
                });
            }
        }

        errors
    }
}

/// Apply `renames` to every tree, returning the rewritten trees in order.
///
/// Each identifier token is replaced once, even when it is both read and
/// written (`x += 1`). Unaffected subtrees are shared with the old trees.
pub(crate) fn rewrite(script: &Script, renames: &IndexMap<VariableId, String>) -> Vec<SyntaxTree> {
    let semantics = script.semantics();
    let mut edits: Vec<IndexMap<TextRange, &str>> = vec![IndexMap::new(); script.trees().len()];

    for (variable, new_name) in renames {
        let locations: IndexSet<_> = semantics.variable(*variable).locations().collect();
        for ptr in locations {
            let Some(node) = script.node(ptr) else {
                continue;
            };
            let Some(token) = ident_token(&node) else {
                continue;
            };
            edits[ptr.source.index()].insert(token.text_range(), new_name.as_str());
        }
    }

    script
        .trees()
        .iter()
        .zip(edits)
        .map(|(tree, edits)| rewrite_tree(tree, edits))
        .collect()
}

fn ident_token(node: &SyntaxNode) -> Option<crate::syntax::SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::Ident)
}

fn rewrite_tree(tree: &SyntaxTree, edits: IndexMap<TextRange, &str>) -> SyntaxTree {
    if edits.is_empty() {
        return tree.clone();
    }

    let mut edits: Vec<(TextRange, &str)> = edits.into_iter().collect();
    edits.sort_by_key(|(range, _)| range.start());

    // Back to front, so earlier offsets stay valid.
    let mut green: GreenNode = tree.green().clone();
    for (range, name) in edits.iter().rev() {
        let root = SyntaxNode::new_root(green.clone());
        let Some(token) = root
            .token_at_offset(range.start())
            .find(|t| t.text_range() == *range && t.kind() == SyntaxKind::Ident)
        else {
            continue;
        };
        green = token.replace_with(GreenToken::new(SyntaxKind::Ident.into(), name));
    }

    let shifts: Vec<(TextSize, i64)> = edits
        .iter()
        .map(|(range, name)| (range.end(), name.len() as i64 - i64::from(u32::from(range.len()))))
        .collect();
    let diagnostics = tree
        .diagnostics()
        .map_ranges(|range| shift_range(range, &shifts));

    tree.with_green(green, diagnostics)
}
