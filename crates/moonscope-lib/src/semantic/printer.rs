//! Indented dump of the scope tree, used by tests and tooling.

use std::fmt::Write;

use rowan::TextRange;

use super::{ScopeId, ScopeKind, Semantics, VariableKind, GLOBAL_SCOPE};
use crate::syntax::SyntaxTree;

pub struct ScopesPrinter<'s> {
    semantics: &'s Semantics,
    trees: &'s [SyntaxTree],
    usage: bool,
}

impl<'s> ScopesPrinter<'s> {
    pub fn new(semantics: &'s Semantics, trees: &'s [SyntaxTree]) -> Self {
        Self {
            semantics,
            trees,
            usage: true,
        }
    }

    /// Show read/write counts next to variables.
    pub fn with_usage(mut self, value: bool) -> Self {
        self.usage = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        self.format_scope(GLOBAL_SCOPE, 0, w)
    }

    fn format_scope(&self, id: ScopeId, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let sem = self.semantics;
        let scope = sem.scope(id);
        let prefix = "  ".repeat(indent);

        write!(w, "{}{:?}", prefix, scope.kind)?;
        if let Some(node) = scope.node {
            if scope.kind == ScopeKind::File
                && let Some(tree) = self.trees.get(node.source.index())
            {
                write!(w, " {}", tree.source_kind().display_name())?;
            }
            write!(w, " {}", span(node.range))?;
        }
        if !scope.captured.is_empty() {
            let names: Vec<_> = scope
                .captured
                .iter()
                .map(|v| sem.variable(*v).name.as_str())
                .collect();
            write!(w, " captures {}", names.join(", "))?;
        }
        writeln!(w)?;

        for variable in &scope.declared {
            let variable = sem.variable(*variable);
            let kind = match variable.kind {
                VariableKind::Local => "local",
                VariableKind::Global => "global",
                VariableKind::Parameter => "param",
            };
            write!(w, "{}  {} {}", prefix, kind, variable.name)?;
            if let Some(decl) = variable.declaration {
                write!(w, " @{}", span(decl.range))?;
            }
            if self.usage && (!variable.reads.is_empty() || !variable.writes.is_empty()) {
                write!(
                    w,
                    " [reads: {}, writes: {}]",
                    variable.reads.len(),
                    variable.writes.len()
                )?;
            }
            writeln!(w)?;
        }

        for (name, label) in &scope.labels {
            let label = sem.label(*label);
            write!(w, "{}  ::{}::", prefix, name)?;
            match label.declaration {
                Some(decl) => write!(w, " @{}", span(decl.range))?,
                None => write!(w, " (unresolved)")?,
            }
            if !label.jumps.is_empty() {
                write!(w, " [jumps: {}]", label.jumps.len())?;
            }
            writeln!(w)?;
        }

        for child in &scope.children {
            self.format_scope(*child, indent + 1, w)?;
        }
        Ok(())
    }
}

fn span(range: TextRange) -> String {
    format!("{}..{}", u32::from(range.start()), u32::from(range.end()))
}
