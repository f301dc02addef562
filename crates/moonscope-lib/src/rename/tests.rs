use indoc::indoc;

use super::RenameError;
use crate::script::SourceId;
use crate::semantic::VariableId;
use crate::syntax::{SyntaxKind, SyntaxTree};
use crate::{LuaSyntaxOptions, Script};

fn script(src: &str) -> Script {
    Script::single(SyntaxTree::parse(src, LuaSyntaxOptions::ALL).unwrap())
}

fn vars(script: &Script, name: &str) -> Vec<VariableId> {
    script
        .semantics()
        .variables()
        .filter(|(_, v)| v.name() == name)
        .map(|(id, _)| id)
        .collect()
}

fn rename(src: &str, name: &str, new_name: &str) -> String {
    let s = script(src);
    let renamed = s.rename_variable(vars(&s, name)[0], new_name).unwrap();
    renamed.trees()[0].text().to_owned()
}

#[test]
fn renames_declaration_only_for_that_variable() {
    assert_eq!(
        rename("local a = 2\nlocal function a() end", "a", "b"),
        "local b = 2\nlocal function a() end"
    );
}

#[test]
fn renames_every_occurrence() {
    let src = indoc! {"
        local count = 0
        count = count + 1
        print(count)
    "};
    let expected = indoc! {"
        local total = 0
        total = total + 1
        print(total)
    "};
    assert_eq!(rename(src, "count", "total"), expected);
}

#[test]
fn compound_assignment_is_renamed_once() {
    assert_eq!(rename("local n = 0\nn += n", "n", "m"), "local m = 0\nm += m");
}

#[test]
fn parameters_and_captures() {
    let src = "local function f(p)\n  return function() return p end\nend";
    assert_eq!(
        rename(src, "p", "value"),
        "local function f(value)\n  return function() return value end\nend"
    );
}

#[test]
fn sibling_scopes_may_share_a_name() {
    assert_eq!(
        rename("do local a = 1 end do local b = 2 end", "b", "a"),
        "do local a = 1 end do local a = 2 end"
    );
}

#[test]
fn conflict_with_sibling_declaration() {
    let s = script("local a, b = 2, 3");
    let (a, b) = (vars(&s, "a")[0], vars(&s, "b")[0]);
    assert_eq!(
        s.rename_variable(a, "b").unwrap_err(),
        vec![RenameError::VariableConflict {
            variable: a,
            conflicting_variable: b,
        }]
    );
}

#[test]
fn conflict_with_shadowed_outer_variable() {
    let s = script("local x = 1\ndo local y = 2 print(x) end");
    let (x, y) = (vars(&s, "x")[0], vars(&s, "y")[0]);

    let errors = s.rename_variable(y, "x").unwrap_err();
    assert_eq!(
        errors,
        vec![RenameError::VariableConflict {
            variable: y,
            conflicting_variable: x,
        }]
    );
    let errors = s.rename_variable(x, "y").unwrap_err();
    assert_eq!(
        errors,
        vec![RenameError::VariableConflict {
            variable: x,
            conflicting_variable: y,
        }]
    );
}

#[test]
fn conflict_with_referenced_global() {
    let s = script("local a = 1\nprint(b)");
    let a = vars(&s, "a")[0];
    let b = vars(&s, "b")[0];
    assert_eq!(
        s.rename_variable(a, "b").unwrap_err(),
        vec![RenameError::VariableConflict {
            variable: a,
            conflicting_variable: b,
        }]
    );
}

#[test]
fn invalid_identifiers_are_rejected_per_tree() {
    let tree = SyntaxTree::parse("local a = 1", LuaSyntaxOptions::LUA_51).unwrap();
    let s = Script::single(tree);
    let a = vars(&s, "a")[0];

    for new_name in ["\u{200B}", "", "end", "1st", "caf\u{e9}"] {
        assert_eq!(
            s.rename_variable(a, new_name).unwrap_err(),
            vec![RenameError::IdentifierNameNotSupported {
                tree: SourceId::default(),
                name: new_name.to_owned(),
            }],
            "{new_name:?}"
        );
    }
    assert!(s.rename_variable(a, "goto").is_ok());
}

#[test]
fn dialect_is_checked_for_every_tree() {
    let lua51 = SyntaxTree::parse("local a = 1", LuaSyntaxOptions::LUA_51).unwrap();
    let lua52 = SyntaxTree::parse("return 2", LuaSyntaxOptions::LUA_52).unwrap();
    let s = Script::new(vec![lua51, lua52]);
    let a = vars(&s, "a")[0];

    assert_eq!(
        s.rename_variable(a, "goto").unwrap_err(),
        vec![RenameError::IdentifierNameNotSupported {
            tree: SourceId::from_index(1),
            name: "goto".to_owned(),
        }]
    );
}

#[test]
fn implicit_variables_cannot_be_renamed() {
    let s = script("print(x)");
    let x = vars(&s, "x")[0];
    assert_eq!(
        s.rename_variable(x, "y").unwrap_err(),
        vec![RenameError::ImplicitVariable { variable: x }]
    );

    let s = script("function t:m() return self end");
    let this = vars(&s, "self")[0];
    assert_eq!(
        s.rename_variable(this, "end").unwrap_err(),
        vec![
            RenameError::IdentifierNameNotSupported {
                tree: SourceId::default(),
                name: "end".to_owned(),
            },
            RenameError::ImplicitVariable { variable: this },
        ]
    );
}

#[test]
fn result_is_reanalyzed_and_old_nodes_are_stale() {
    let s = script("local old = 1\nreturn old");
    let old_name = s.trees()[0]
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Name)
        .unwrap();
    let renamed = s.rename_variable(vars(&s, "old")[0], "new").unwrap();

    let new_name = renamed.trees()[0]
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Name)
        .unwrap();
    let variable = renamed.get_variable(&new_name).unwrap();
    assert_eq!(renamed.semantics().variable(variable).name(), "new");
    assert_eq!(renamed.semantics().variable(variable).reads().len(), 1);

    assert_eq!(renamed.get_variable(&old_name), None);
    assert_eq!(renamed.find_scope(&old_name), None);
    assert_eq!(s.trees()[0].text(), "local old = 1\nreturn old");
    assert!(s.get_variable(&old_name).is_some());
}

#[test]
fn untouched_trees_are_shared() {
    let first = SyntaxTree::parse("local a = 1", LuaSyntaxOptions::ALL).unwrap();
    let second = SyntaxTree::parse("return 2", LuaSyntaxOptions::ALL).unwrap();
    let s = Script::new(vec![first, second]);
    let renamed = s.rename_variable(vars(&s, "a")[0], "b").unwrap();

    assert_eq!(renamed.trees()[0].text(), "local b = 1");
    assert!(std::ptr::eq(
        &*renamed.trees()[1].green(),
        &*s.trees()[1].green()
    ));
}

#[test]
fn parse_diagnostics_follow_the_text() {
    let s = script("local x = 1\nlocal = 2");
    insta::assert_snapshot!(s.trees()[0].diagnostics().printer().render(), @"error at 18..19: expected a name");

    let renamed = s.rename_variable(vars(&s, "x")[0], "longer").unwrap();
    insta::assert_snapshot!(renamed.trees()[0].diagnostics().printer().render(), @"error at 23..24: expected a name");
}

#[test]
fn errors_display() {
    let error = RenameError::IdentifierNameNotSupported {
        tree: SourceId::default(),
        name: "end".to_owned(),
    };
    assert_eq!(error.to_string(), "`end` is not a valid identifier in source 0");

    let error = RenameError::ImplicitVariable {
        variable: VariableId::from_index(4),
    };
    assert_eq!(error.to_string(), "variable VariableId(4) has no declaration");
}
