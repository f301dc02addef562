//! Thread-safe node handles.
//!
//! `SyntaxNode` is `!Send`, so analysis results refer to nodes by
//! `(source, kind, range)` and resolve them against the owning tree on demand.

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode};
use crate::script::SourceId;

/// Identifies one node of one tree in a `Script`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePtr {
    pub source: SourceId,
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl NodePtr {
    pub fn new(source: SourceId, node: &SyntaxNode) -> Self {
        Self {
            source,
            kind: node.kind(),
            range: node.text_range(),
        }
    }

    /// Find the node under `root`.
    ///
    /// Only subtrees covering the range are searched. Empty nodes (an empty
    /// `Block`) touch their neighbours, so more than one branch may qualify.
    pub fn to_node(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if node.kind() == self.kind && node.text_range() == self.range {
                return Some(node);
            }
            stack.extend(
                node.children()
                    .filter(|c| c.text_range().contains_range(self.range)),
            );
        }
        None
    }
}
