use crate::script::SourceId;
use crate::syntax::SyntaxTree;
use crate::{LuaSyntaxOptions, Script};

fn script(src: &str) -> Script {
    Script::single(SyntaxTree::parse(src, LuaSyntaxOptions::LUA_54).unwrap())
}

fn semantic_diagnostics(src: &str) -> String {
    let script = script(src);
    let diagnostics = script.diagnostics(SourceId::default());
    diagnostics.printer().render()
}

#[test]
fn forward_goto() {
    let s = script("goto skip\nprint(1)\n::skip::");
    assert!(s.diagnostics(SourceId::default()).is_empty());

    let (_, label) = s.semantics().goto_labels().next().unwrap();
    assert_eq!(label.name(), "skip");
    assert_eq!(label.jumps().len(), 1);
    assert!(label.declaration().is_some());
}

#[test]
fn backward_goto() {
    insta::assert_snapshot!(semantic_diagnostics("::top::\ngoto top"), @"");
}

#[test]
fn goto_leaves_nested_block() {
    let s = script("do\n  goto done\nend\n::done::");
    assert!(s.diagnostics(SourceId::default()).is_empty());

    let labels: Vec<_> = s.semantics().goto_labels().collect();
    assert_eq!(labels.len(), 1);
    let file = s.semantics().scopes().nth(1).unwrap().0;
    assert_eq!(labels[0].1.scope(), file);
}

#[test]
fn every_jump_to_one_label() {
    let s = script("goto x\ngoto x\n::x::");
    let labels: Vec<_> = s.semantics().goto_labels().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].1.jumps().len(), 2);
}

#[test]
fn goto_cannot_enter_a_block() {
    insta::assert_snapshot!(semantic_diagnostics("goto inner\ndo ::inner:: end"), @r"
    error at 0..10: no visible label `inner` for `goto`
    warning at 14..23: label `inner` is never jumped to
    ");
}

#[test]
fn goto_cannot_leave_a_function() {
    insta::assert_snapshot!(
        semantic_diagnostics("::outer::\nlocal function f()\n  goto outer\nend"),
        @r"
    warning at 0..9: label `outer` is never jumped to
    error at 31..41: no visible label `outer` for `goto`
    "
    );
}

#[test]
fn sibling_functions_do_not_share_labels() {
    insta::assert_snapshot!(
        semantic_diagnostics("local function f1() ::l:: end\nlocal function f2() goto l end"),
        @r"
    warning at 20..25: label `l` is never jumped to
    error at 50..56: no visible label `l` for `goto`
    "
    );
}

#[test]
fn duplicate_label_in_nested_block() {
    insta::assert_snapshot!(
        semantic_diagnostics("::a::\ndo\n  ::a::\nend\ngoto a"),
        @"error at 11..16: label `a` is already defined (related: first defined here at 0..5)"
    );
}

#[test]
fn duplicate_label_in_same_scope() {
    insta::assert_snapshot!(
        semantic_diagnostics("::a::\n::a::\ngoto a"),
        @"error at 6..11: label `a` is already defined (related: first defined here at 0..5)"
    );
}

#[test]
fn unused_label_is_a_warning() {
    let s = script("::unused::");
    let diagnostics = s.diagnostics(SourceId::default());
    assert!(diagnostics.has_warnings());
    assert!(!diagnostics.has_errors());
}

#[test]
fn break_outside_loop() {
    insta::assert_snapshot!(semantic_diagnostics("break"), @"error at 0..5: `break` outside a loop");
    insta::assert_snapshot!(semantic_diagnostics("while true do break end"), @"");
    insta::assert_snapshot!(semantic_diagnostics("for i = 1, 2 do if i then break end end"), @"");
}

#[test]
fn function_resets_loop_context() {
    insta::assert_snapshot!(
        semantic_diagnostics("while true do\n  local f = function() break end\nend"),
        @"error at 37..42: `break` outside a loop"
    );
}

#[test]
fn labels_in_scope_dump() {
    let s = script("goto done\n::done::");
    insta::assert_snapshot!(s.dump_scopes(), @r"
    Global
      File <inline> 0..18
        ::done:: @10..18 [jumps: 1]
    ");

    let s = script("goto nowhere");
    insta::assert_snapshot!(s.dump_scopes(), @r"
    Global
      File <inline> 0..12
        ::nowhere:: (unresolved) [jumps: 1]
    ");
}
