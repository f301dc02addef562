use rowan::{TextRange, TextSize};

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, range(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.message(), "expected an expression");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedLabel, range(0, 5))
        .message("continue")
        .emit();

    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.message(), "no visible label `continue` for `goto`");
    assert_eq!(msg.kind(), DiagnosticKind::UndefinedLabel);
}

#[test]
fn warnings_are_counted_separately() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnusedLabel, range(0, 2))
        .message("top")
        .emit();
    diagnostics
        .report(DiagnosticKind::DuplicateLabel, range(3, 5))
        .message("top")
        .emit();

    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 1);
    assert!(diagnostics.has_warnings());
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, range(0, 5))
        .message("primary")
        .related_to("related info", range(6, 10))
        .emit();

    let result = diagnostics.printer().source("hello world!").render();
    insta::assert_snapshot!(result, @r"
    error: missing closing `end`; primary
      |
    1 | hello world!
      | ^^^^^ ---- related info
    ");
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownAttribute, range(0, 5))
        .message("hello")
        .fix("apply this fix", "fixed")
        .emit();

    let result = diagnostics.printer().source("hello world").render();
    insta::assert_snapshot!(result, @r"
    error: unknown attribute `hello`
      |
    1 | hello world
      | ^^^^^
      |
    help: apply this fix
      |
    1 - hello world
    1 + fixed world
      |
    ");
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedLabel, range(0, 5))
        .message("hello")
        .emit();

    let result = diagnostics
        .printer()
        .source("hello world")
        .path("main.lua")
        .render();
    insta::assert_snapshot!(result, @r"
    error: no visible label `hello` for `goto`
     --> main.lua:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, TextRange::empty(0.into()))
        .message("zero width error")
        .emit();

    let result = diagnostics.printer().source("hello").render();
    insta::assert_snapshot!(result, @r"
    error: missing closing `end`; zero width error
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(0, 5))
        .emit();

    let result = diagnostics.render_colored("hello", true);
    assert!(result.contains("unexpected token"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.render("source").is_empty());
}

#[test]
fn plain_format_sorts_by_position() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(6, 7))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedName, range(1, 2))
        .hint("names start with a letter")
        .emit();

    let result = diagnostics.printer().render();
    insta::assert_snapshot!(result, @r"
    error at 1..2: expected a name (hint: names start with a letter)
    error at 6..7: unexpected token
    ");
}

#[test]
fn map_ranges_moves_primary_and_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateLabel, range(10, 12))
        .related_to("first", range(2, 4))
        .emit();

    let edits = [(TextSize::from(5), 3i64)];
    let shifted = diagnostics.map_ranges(|r| shift_range(r, &edits));
    let msg = shifted.iter().next().unwrap();
    assert_eq!(msg.range(), range(13, 15));
    assert_eq!(msg.related[0].range, range(2, 4));
}

#[test]
fn shift_range_applies_cumulative_deltas() {
    let edits = [(TextSize::from(3), -2i64), (TextSize::from(8), 4)];
    assert_eq!(shift_range(range(0, 3), &edits), range(0, 1));
    assert_eq!(shift_range(range(4, 6), &edits), range(2, 4));
    assert_eq!(shift_range(range(9, 10), &edits), range(11, 12));
}

#[test]
fn same_start_sorts_root_cause_first() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(4, 6))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedName, range(4, 5))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, range(4, 4))
        .emit();

    let kinds: Vec<_> = diagnostics.sorted().iter().map(|m| m.kind()).collect();
    assert_eq!(
        kinds,
        [
            DiagnosticKind::UnclosedBlock,
            DiagnosticKind::ExpectedName,
            DiagnosticKind::UnexpectedToken,
        ]
    );
}

#[test]
fn plain_format_prefixes_origin() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::BreakOutsideLoop, range(0, 5))
        .message("break")
        .emit();

    let result = diagnostics.printer().path("init.lua").render();
    insta::assert_snapshot!(result, @"init.lua: error at 0..5: `break` outside a loop");
}

#[test]
fn warnings_can_be_left_out() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnusedLabel, range(0, 7))
        .message("top")
        .emit();
    diagnostics
        .report(DiagnosticKind::UndefinedLabel, range(8, 14))
        .message("bottom")
        .emit();

    let result = diagnostics.printer().warnings(false).render();
    insta::assert_snapshot!(result, @"error at 8..14: no visible label `bottom` for `goto`");
}

#[test]
fn annotated_hints_are_rendered() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedName, range(6, 7))
        .hint("names start with a letter")
        .emit();

    let result = diagnostics.printer().source("local = 1").render();
    assert!(result.starts_with("error: expected a name"));
    assert!(result.contains("names start with a letter"));
}
