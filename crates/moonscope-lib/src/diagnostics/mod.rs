//! Syntax errors and semantic findings, collected per tree.
//!
//! Diagnostics never abort a pass: the parser recovers and the scope builder
//! keeps going, so a tree always comes with a complete (if partial) analysis.

mod message;
mod printer;

#[cfg(test)]
mod tests;

use rowan::{TextRange, TextSize};

pub use message::{DiagnosticKind, DiagnosticMessage, Fix, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Remap every range (primary and related) through `f`.
    ///
    /// Used after token rewrites shift the text under existing diagnostics.
    pub fn map_ranges(&self, f: impl Fn(TextRange) -> TextRange) -> Diagnostics {
        let messages = self
            .messages
            .iter()
            .map(|m| {
                let mut m = m.clone();
                m.range = f(m.range);
                for related in &mut m.related {
                    related.range = f(related.range);
                }
                m
            })
            .collect();
        Diagnostics { messages }
    }

    /// Messages sorted by position; at equal starts, in `DiagnosticKind` order.
    pub fn sorted(&self) -> Vec<&DiagnosticMessage> {
        let mut sorted: Vec<_> = self.messages.iter().collect();
        sorted.sort_by_key(|m| (m.range.start(), m.kind));
        sorted
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }

    pub fn render(&self, source: &str) -> String {
        self.printer().source(source).render()
    }

    pub fn render_colored(&self, source: &str, colored: bool) -> String {
        self.printer().source(source).colored(colored).render()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix::new(replacement, description));
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

/// Shift a range by a list of `(offset, delta)` edits sorted by offset.
///
/// Positions at or after an edit's offset move by its delta.
pub(crate) fn shift_range(range: TextRange, edits: &[(TextSize, i64)]) -> TextRange {
    let shift = |pos: TextSize| {
        let delta: i64 = edits
            .iter()
            .take_while(|(at, _)| *at <= pos)
            .map(|(_, d)| d)
            .sum();
        TextSize::from((i64::from(u32::from(pos)) + delta).max(0) as u32)
    };
    TextRange::new(shift(range.start()), shift(range.end()))
}
