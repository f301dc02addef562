use indoc::indoc;

use super::{ScopeId, ScopeKind, VariableId, VariableKind};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::{LuaSyntaxOptions, Script};

fn script(src: &str) -> Script {
    Script::single(SyntaxTree::parse(src, LuaSyntaxOptions::ALL).unwrap())
}

fn nodes(script: &Script, kind: SyntaxKind, text: &str) -> Vec<SyntaxNode> {
    script.trees()[0]
        .syntax()
        .descendants()
        .filter(|n| n.kind() == kind && n.text() == text)
        .collect()
}

fn first_node(script: &Script, kind: SyntaxKind) -> SyntaxNode {
    script.trees()[0]
        .syntax()
        .descendants()
        .find(|n| n.kind() == kind)
        .unwrap()
}

fn variables(script: &Script, name: &str) -> Vec<VariableId> {
    script
        .semantics()
        .variables()
        .filter(|(_, v)| v.name() == name)
        .map(|(id, _)| id)
        .collect()
}

fn resolved(script: &Script, name: &str) -> Vec<VariableId> {
    nodes(script, SyntaxKind::NameRef, name)
        .iter()
        .map(|n| script.get_variable(n).unwrap())
        .collect()
}

fn scopes_of_kind(script: &Script, kind: ScopeKind) -> Vec<ScopeId> {
    script
        .semantics()
        .scopes()
        .filter(|(_, s)| s.kind() == kind)
        .map(|(id, _)| id)
        .collect()
}

#[test]
fn scope_tree() {
    let s = script("local x = 1\nlocal function f(a)\n  return x + a + y\nend\ndo\n  local z = f(x)\nend\n");
    insta::assert_snapshot!(s.dump_scopes(), @r"
    Global
      global y [reads: 1, writes: 0]
      File <inline> 0..79
        local x @6..7 [reads: 2, writes: 0]
        local f @27..28 [reads: 1, writes: 0]
        Function 12..54 captures x, y
          param a @29..30 [reads: 1, writes: 0]
        Block 57..74
          local z @66..67
    ");
}

#[test]
fn dump_without_usage() {
    let s = script("local x = 1\nprint(x)");
    let dump = s.semantics().printer(s.trees()).with_usage(false).dump();
    insta::assert_snapshot!(dump, @r"
    Global
      global print
      File <inline> 0..20
        local x @6..7
    ");
}

#[test]
fn initializer_sees_outer_binding() {
    let s = script("local x = 1\nlocal x = x");
    let declared = variables(&s, "x");
    assert_eq!(declared.len(), 2);
    assert_eq!(resolved(&s, "x"), vec![declared[0]]);
}

#[test]
fn inner_block_shadows() {
    let s = script("local x = 1\ndo local x = 2 print(x) end\nprint(x)");
    let declared = variables(&s, "x");
    assert_eq!(resolved(&s, "x"), vec![declared[1], declared[0]]);
}

#[test]
fn later_declaration_does_not_capture_earlier_use() {
    let s = script("print(x)\nlocal x = 1\nprint(x)");
    let refs = resolved(&s, "x");
    let sem = s.semantics();
    assert_eq!(sem.variable(refs[0]).kind(), VariableKind::Global);
    assert_eq!(sem.variable(refs[1]).kind(), VariableKind::Local);
}

#[test]
fn local_function_sees_itself() {
    let s = script("local function f() return f() end");
    let refs = resolved(&s, "f");
    assert_eq!(s.semantics().variable(refs[0]).kind(), VariableKind::Local);

    let s = script("local g = function() return g() end");
    let refs = resolved(&s, "g");
    assert_eq!(s.semantics().variable(refs[0]).kind(), VariableKind::Global);
}

#[test]
fn repeat_condition_sees_body_locals() {
    let s = script("repeat local done = true until done");
    let done = resolved(&s, "done")[0];
    let variable = s.semantics().variable(done);
    assert_eq!(variable.kind(), VariableKind::Local);

    let block = first_node(&s, SyntaxKind::Block);
    let body = block
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::Block)
        .nth(1)
        .unwrap();
    assert_eq!(s.get_scope(&body), Some(variable.scope()));
}

#[test]
fn numeric_for_variable_lives_in_loop_scope() {
    let s = script("for i = 1, i do print(i) end");
    let refs = resolved(&s, "i");
    let sem = s.semantics();
    assert_eq!(sem.variable(refs[0]).kind(), VariableKind::Global);
    assert_eq!(sem.variable(refs[1]).kind(), VariableKind::Local);

    let for_stmt = first_node(&s, SyntaxKind::NumericForStmt);
    let scope = s.get_scope(&for_stmt).unwrap();
    assert_eq!(sem.scope(scope).kind(), ScopeKind::Block);
    assert_eq!(sem.variable(refs[1]).scope(), scope);
}

#[test]
fn generic_for_declares_all_names() {
    let s = script("for k, v in pairs(t) do print(k, v) end");
    let for_stmt = first_node(&s, SyntaxKind::GenericForStmt);
    let scope = s.get_scope(&for_stmt).unwrap();
    let names: Vec<_> = s
        .semantics()
        .scope(scope)
        .declared()
        .iter()
        .map(|v| s.semantics().variable(*v).name())
        .collect();
    assert_eq!(names, ["k", "v"]);
}

#[test]
fn method_declares_implicit_self() {
    let s = script("function Account:deposit(amount) self.balance = self.balance + amount end");
    let sem = s.semantics();
    let function = scopes_of_kind(&s, ScopeKind::Function)[0];
    let declared: Vec<_> = sem
        .scope(function)
        .declared()
        .iter()
        .map(|v| sem.variable(*v))
        .collect();

    assert_eq!(declared[0].name(), "self");
    assert_eq!(declared[0].kind(), VariableKind::Parameter);
    assert_eq!(declared[0].declaration(), None);
    assert_eq!(declared[0].reads().len(), 2);
    assert_eq!(declared[1].name(), "amount");
}

#[test]
fn closures_capture_through_every_function() {
    let src = indoc! {"
        local a = 1
        local function outer()
          return function() return a end
        end
    "};
    let s = script(src);
    let a = variables(&s, "a")[0];
    let sem = s.semantics();
    let functions = scopes_of_kind(&s, ScopeKind::Function);
    assert_eq!(functions.len(), 2);
    for function in functions {
        assert!(sem.scope(function).captured().contains(&a));
        assert!(sem.variable(a).referenced_in().contains(&function));
    }
    let file = sem.variable(a).scope();
    assert!(!sem.scope(file).captured().contains(&a));
}

#[test]
fn globals_are_shared_and_declared_in_global_scope() {
    let s = script("x = 1\nlocal function f() return x end\nprint(x)");
    let declared = variables(&s, "x");
    assert_eq!(declared.len(), 1);
    let variable = s.semantics().variable(declared[0]);
    assert_eq!(variable.kind(), VariableKind::Global);
    assert_eq!(variable.scope(), super::GLOBAL_SCOPE);
    assert_eq!(variable.writes().len(), 1);
    assert_eq!(variable.reads().len(), 2);
}

#[test]
fn find_variable_respects_limit() {
    let src = indoc! {"
        local a = 1
        local function f()
          local b = 2
          do local c = 3 end
        end
        print(g)
    "};
    let s = script(src);
    let c = variables(&s, "c")[0];
    let block = s.semantics().variable(c).scope();

    assert_eq!(s.find_variable(block, "c", ScopeKind::Block), Some(c));
    assert_eq!(s.find_variable(block, "b", ScopeKind::Block), None);
    assert_eq!(
        s.find_variable(block, "b", ScopeKind::Function),
        Some(variables(&s, "b")[0])
    );
    assert_eq!(s.find_variable(block, "a", ScopeKind::Function), None);
    assert_eq!(
        s.find_variable(block, "a", ScopeKind::File),
        Some(variables(&s, "a")[0])
    );
    assert_eq!(s.find_variable(block, "g", ScopeKind::File), None);
    assert_eq!(
        s.find_variable(block, "g", ScopeKind::Global),
        Some(variables(&s, "g")[0])
    );
}

#[test]
fn find_variable_prefers_latest_declaration() {
    let s = script("local v = 1\nlocal v = 2");
    let file = scopes_of_kind(&s, ScopeKind::File)[0];
    assert_eq!(
        s.find_variable(file, "v", ScopeKind::File),
        Some(variables(&s, "v")[1])
    );
}

#[test]
fn accessibility_follows_nesting() {
    let s = script("local a = 1\ndo local b = 2 end\nlocal function f() end");
    let a = variables(&s, "a")[0];
    let b = variables(&s, "b")[0];
    let sem = s.semantics();
    let block = sem.variable(b).scope();
    let function = scopes_of_kind(&s, ScopeKind::Function)[0];

    assert!(s.can_be_accessed_in(a, block));
    assert!(s.can_be_accessed_in(a, function));
    assert!(s.can_be_accessed_in(b, block));
    assert!(!s.can_be_accessed_in(b, function));
    assert!(!s.can_be_accessed_in(b, sem.variable(a).scope()));
}

fn visible_names(script: &Script, variable: VariableId) -> Vec<String> {
    let sem = script.semantics();
    let mut names: Vec<String> = sem
        .visible_variables(variable)
        .iter()
        .map(|other| sem.variable(*other).name().to_owned())
        .collect();
    names.sort_unstable();
    names
}

#[test]
fn visible_variables_cover_descendants_and_globals() {
    let s = script("local a = 1\ndo local b = a end\nprint(c)");
    assert_eq!(visible_names(&s, variables(&s, "a")[0]), ["b", "c", "print"]);
    assert_eq!(visible_names(&s, variables(&s, "b")[0]), ["a", "c", "print"]);
}

#[test]
fn referenced_sets_stop_at_owner() {
    let s = script("local a = 1\ndo do print(a) end end");
    let a = variables(&s, "a")[0];
    let sem = s.semantics();
    let blocks = scopes_of_kind(&s, ScopeKind::Block);
    assert_eq!(blocks.len(), 2);
    for block in &blocks {
        assert!(sem.scope(*block).referenced().contains(&a));
    }
    let file = sem.variable(a).scope();
    assert!(!sem.scope(file).referenced().contains(&a));
    assert_eq!(sem.variable(a).referenced_in().len(), 2);
}

#[test]
fn scopes_are_keyed_by_owner_nodes() {
    let s = script("local f = function() end\nwhile true do end\nif x then elseif y then else end");
    let sem = s.semantics();
    let kinds: Vec<_> = sem.scopes().map(|(_, scope)| scope.kind()).collect();
    assert_eq!(
        kinds,
        [
            ScopeKind::Global,
            ScopeKind::File,
            ScopeKind::Function,
            ScopeKind::Block,
            ScopeKind::Block,
            ScopeKind::Block,
            ScopeKind::Block,
        ]
    );

    let function = first_node(&s, SyntaxKind::FunctionExpr);
    assert_eq!(s.get_scope(&function), Some(ScopeId::from_index(2)));
}

#[test]
fn recovered_statements_still_resolve() {
    let tree = SyntaxTree::parse("local x = 1\nlocal = x", LuaSyntaxOptions::ALL).unwrap();
    assert!(tree.diagnostics().has_errors());
    let s = Script::single(tree);
    let x = variables(&s, "x")[0];
    assert_eq!(s.semantics().variable(x).reads().len(), 1);
}
