//! Goto label resolution.
//!
//! Labels are visible in their block and nested blocks, never across a
//! function boundary. A `goto` to a label not seen yet creates the label
//! eagerly (pending); pending labels move outward when their block closes
//! and are claimed by the first matching `::name::` statement in the scope
//! they ended up in. Whatever is still pending when the enclosing function
//! or file closes has no target.

use super::builder::ScopeBuilder;
use super::invariants::assert_label_slot_free;
use super::{GotoLabel, LabelId, ScopeId, ScopeKind};
use crate::diagnostics::DiagnosticKind;
use crate::syntax::{NodePtr, ast};

impl ScopeBuilder {
    /// Nearest label named `name`, searching outward through blocks.
    fn visible_label(&self, name: &str) -> Option<LabelId> {
        for scope in self.stack.iter().rev() {
            let scope = self.sem.scope(*scope);
            if let Some(id) = scope.labels.get(name) {
                return Some(*id);
            }
            if matches!(scope.kind, ScopeKind::Function | ScopeKind::File) {
                break;
            }
        }
        None
    }

    fn new_label(&mut self, name: &str, declaration: Option<NodePtr>) -> LabelId {
        let scope = self.current();
        let id = LabelId::from_index(self.sem.labels.len());
        self.sem.labels.push(GotoLabel {
            name: name.to_owned(),
            scope,
            declaration,
            jumps: Vec::new(),
        });
        self.sem.scopes[scope.index()]
            .labels
            .insert(name.to_owned(), id);
        id
    }

    pub(super) fn goto_stmt(&mut self, stmt: &ast::GotoStmt) {
        let Some(label) = stmt.label() else { return };
        let name = label.text();
        let node = self.ptr(stmt.as_cst());

        let id = match self.visible_label(name) {
            Some(id) => id,
            None => self.new_label(name, None),
        };
        self.sem.labels[id.index()].jumps.push(node);
    }

    pub(super) fn label_stmt(&mut self, stmt: &ast::LabelStmt) {
        let Some(label) = stmt.label() else { return };
        let name = label.text();
        let node = self.ptr(stmt.as_cst());
        let scope = self.current();

        if let Some(id) = self.sem.scope(scope).labels.get(name).copied()
            && self.sem.label(id).declaration.is_none()
        {
            self.sem.labels[id.index()].declaration = Some(node);
            return;
        }

        let previous = self
            .visible_label(name)
            .and_then(|id| self.sem.label(id).declaration);
        if let Some(previous) = previous {
            self.diagnostics
                .report(DiagnosticKind::DuplicateLabel, node.range)
                .message(name)
                .related_to("first defined here", previous.range)
                .emit();
            return;
        }

        self.new_label(name, Some(node));
    }

    /// Settle the labels of a scope being closed.
    pub(super) fn close_labels(&mut self, scope: ScopeId) {
        let labels: Vec<(String, LabelId)> = self
            .sem
            .scope(scope)
            .labels
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();

        for (name, id) in labels {
            let label = self.sem.label(id);
            let (declaration, unused) = (label.declaration, label.jumps.is_empty());
            match declaration {
                Some(declaration) if unused => {
                    self.diagnostics
                        .report(DiagnosticKind::UnusedLabel, declaration.range)
                        .message(&name)
                        .emit();
                }
                Some(_) => {}
                None => self.settle_pending(scope, &name, id),
            }
        }
    }

    fn settle_pending(&mut self, scope: ScopeId, name: &str, id: LabelId) {
        let entry = self.sem.scope(scope);
        match (entry.kind, entry.parent) {
            (ScopeKind::Block, Some(parent)) => {
                assert_label_slot_free(self.sem.scope(parent).labels.contains_key(name), name);
                self.sem.scopes[scope.index()].labels.shift_remove(name);
                self.sem.scopes[parent.index()]
                    .labels
                    .insert(name.to_owned(), id);
                self.sem.labels[id.index()].scope = parent;
            }
            _ => {
                let jumps = self.sem.label(id).jumps.clone();
                for jump in jumps {
                    self.diagnostics
                        .report(DiagnosticKind::UndefinedLabel, jump.range)
                        .message(name)
                        .emit();
                }
            }
        }
    }
}
