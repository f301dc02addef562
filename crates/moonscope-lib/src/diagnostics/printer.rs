//! Builder-pattern printer for rendering diagnostics.
//!
//! Without source text the printer emits one `severity at start..end: message`
//! line per diagnostic. With source text (usually via [`DiagnosticsPrinter::tree`])
//! it renders annotated snippets, with related spans such as a label's first
//! definition shown as context.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};
use crate::syntax::SyntaxTree;

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    origin: Option<&'s str>,
    colored: bool,
    warnings: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            origin: None,
            colored: false,
            warnings: true,
        }
    }

    /// Render against `tree`: its text, titled with its display name.
    pub fn tree(mut self, tree: &'s SyntaxTree) -> Self {
        self.source = Some(tree.text());
        self.origin = Some(tree.source_kind().display_name());
        self
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.origin = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Include warnings such as unused labels (default `true`).
    pub fn warnings(mut self, value: bool) -> Self {
        self.warnings = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let messages: Vec<&DiagnosticMessage> = self
            .diagnostics
            .sorted()
            .into_iter()
            .filter(|m| self.warnings || !m.is_warning())
            .collect();

        match self.source {
            Some(source) => self.format_annotated(w, source, &messages),
            None => self.format_plain(w, &messages),
        }
    }

    fn format_annotated(
        &self,
        w: &mut impl Write,
        source: &str,
        messages: &[&DiagnosticMessage],
    ) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in messages.iter().enumerate() {
            let range = adjust_range(diag.range, source.len());

            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(range.clone())
                    .label(&diag.message),
            );
            if let Some(origin) = self.origin {
                snippet = snippet.path(origin);
            }
            for related in &diag.related {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.range, source.len()))
                        .label(&related.message),
                );
            }

            let mut title_group = severity_to_level(diag.severity())
                .primary_title(&diag.message)
                .element(snippet);
            for hint in &diag.hints {
                title_group = title_group.element(Level::HELP.message(hint.as_str()));
            }

            let mut report: Vec<Group> = vec![title_group];
            if let Some(fix) = &diag.fix {
                report.push(
                    Level::HELP.secondary_title(&fix.description).element(
                        Snippet::source(source)
                            .line_start(1)
                            .patch(Patch::new(range, &fix.replacement)),
                    ),
                );
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write, messages: &[&DiagnosticMessage]) -> std::fmt::Result {
        for (i, diag) in messages.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            if let Some(origin) = self.origin {
                write!(w, "{origin}: ")?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Widen empty ranges to one byte so the caret has something to point at.
fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
