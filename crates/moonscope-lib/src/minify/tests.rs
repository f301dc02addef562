use indexmap::IndexSet;
use indoc::indoc;

use super::{Alphabetical, MinifyOptions, NamingStrategy, Numerical, Strategy};
use crate::semantic::ScopeId;
use crate::syntax::{SyntaxKind, SyntaxTree};
use crate::{LuaSyntaxOptions, Script};

fn script(src: &str) -> Script {
    Script::single(SyntaxTree::parse(src, LuaSyntaxOptions::ALL).unwrap())
}

fn minify(src: &str) -> String {
    script(src).minify(&Alphabetical).trees()[0].text().to_owned()
}

/// Kinds of all nodes and non-trivia tokens, pre-order.
fn shape(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.syntax()
        .descendants_with_tokens()
        .map(|element| element.kind())
        .filter(|kind| !kind.is_trivia())
        .collect()
}

#[test]
fn referenced_global_forces_fallback() {
    assert_eq!(minify("local a, c = 1, 2\r\nprint(a, b)"), "local a,_b=1,2 print(a,b)");
}

#[test]
fn self_assignment() {
    assert_eq!(minify("local x = 0\r\nx = x + 1"), "local a=0 a=a+1");
}

#[test]
fn compound_self_assignment() {
    assert_eq!(minify("local x = 0\r\nx += x + 1"), "local a=0 a+=a+1");
}

#[test]
fn already_short_names_terminate() {
    assert_eq!(minify("local a, b = 1, 2"), "local a,b=1,2");
}

#[test]
fn redeclaration_in_one_scope() {
    assert_eq!(minify("local a = 1\nlocal a = a + 1"), "local _a=1 local b=_a+1");
}

#[test]
fn sibling_scopes_reuse_slots() {
    let src = indoc! {"
        do local first = 1 end
        do local second = 2 end
    "};
    assert_eq!(minify(src), "do local a=1 end do local a=2 end");
}

#[test]
fn parameters_follow_enclosing_locals() {
    let src = indoc! {"
        local function identity(value)
          return value
        end
    "};
    assert_eq!(minify(src), "local function a(b)return b end");
}

#[test]
fn self_and_globals_keep_their_names() {
    let src = indoc! {"
        function Stack:push(item)
          self[#self + 1] = item
        end
    "};
    assert_eq!(minify(src), "function Stack:push(a)self[#self+1]=a end");
}

#[test]
fn shadowing_declarations_are_avoided() {
    assert_eq!(
        minify("local a = 1 do local a = 2 print(a) end print(a)"),
        "local _a=1 do local b=2 print(b)end print(_a)"
    );
}

#[test]
fn shadowed_outer_variable_stays_reachable() {
    let src = indoc! {"
        local outer = 1
        local function f()
          local inner = outer
          return inner
        end
    "};
    assert_eq!(
        minify(src),
        "local a=1 local function b()local c=a return c end"
    );
}

#[test]
fn numerical_strategy() {
    let minified = script("local x, y = 1, 2\nreturn x + y").minify(&Numerical);
    assert_eq!(minified.trees()[0].text(), "local _0,_1=1,2 return _0+_1");
}

#[test]
fn minify_with_options() {
    let src = "local value = 1 return value";
    let options = MinifyOptions {
        strategy: Strategy::Numerical,
    };
    assert_eq!(script(src).minify_with(&options).trees()[0].text(), "local _0=1 return _0");
    assert_eq!(
        script(src).minify_with(&MinifyOptions::default()).trees()[0].text(),
        "local a=1 return a"
    );
}

#[test]
fn globals_are_avoided() {
    let tree = SyntaxTree::parse("local x = 1 print(x, a)", LuaSyntaxOptions::LUA_51).unwrap();
    let minified = Script::single(tree).minify(&Alphabetical);
    assert_eq!(minified.trees()[0].text(), "local _a=1 print(_a,a)");
}

/// Offers `end`, then `goto`, then plain names.
struct Reserved;

impl NamingStrategy for Reserved {
    fn candidate(&self, slot: usize, attempt: usize, _scope: ScopeId, _taken: &IndexSet<String>) -> String {
        match attempt {
            0 => "end".to_owned(),
            1 => "goto".to_owned(),
            _ => format!("v{slot}{attempt}"),
        }
    }
}

#[test]
fn keywords_of_the_dialect_are_skipped() {
    let src = "local x = 1 return x";

    let lua51 = SyntaxTree::parse(src, LuaSyntaxOptions::LUA_51).unwrap();
    let minified = Script::single(lua51).minify(&Reserved);
    assert_eq!(minified.trees()[0].text(), "local goto=1 return goto");

    let lua52 = SyntaxTree::parse(src, LuaSyntaxOptions::LUA_52).unwrap();
    let minified = Script::single(lua52).minify(&Reserved);
    assert_eq!(minified.trees()[0].text(), "local v02=1 return v02");
}

#[test]
fn structure_is_preserved() {
    let src = indoc! {r#"
        #!/usr/bin/env lua
        local items = {}
        local function add(list, value)
          list[#list + 1] = value
          return list
        end
        for index = 1, 10 do
          if index % 2 == 0 then
            add(items, index)
          end
        end
        ::done::
        return items
    "#};
    let original = SyntaxTree::builder(src)
        .options(LuaSyntaxOptions::LUA_54)
        .path("main.lua")
        .build()
        .unwrap();
    let minified = Script::single(original.clone()).minify(&Alphabetical);
    let tree = &minified.trees()[0];

    assert_eq!(shape(&original), shape(tree));
    assert_eq!(tree.path(), Some("main.lua"));
    assert_eq!(tree.options(), &LuaSyntaxOptions::LUA_54);
    assert!(tree.diagnostics().is_empty());
    assert!(tree.text().starts_with("#!/usr/bin/env lua\n"));
}

#[test]
fn minified_script_is_analyzed_again() {
    let minified = script("local count = 0\ncount = count + 1").minify(&Alphabetical);
    let (_, variable) = minified
        .semantics()
        .variables()
        .find(|(_, v)| v.name() == "a")
        .unwrap();
    assert_eq!(variable.writes().len(), 1);
    assert_eq!(variable.reads().len(), 1);
}

#[test]
fn files_share_globals_but_not_locals() {
    let first = SyntaxTree::parse("local x = 1 shared = x", LuaSyntaxOptions::ALL).unwrap();
    let second = SyntaxTree::parse("local y = shared return y", LuaSyntaxOptions::ALL).unwrap();
    let minified = Script::new(vec![first, second]).minify(&Alphabetical);

    assert_eq!(minified.trees()[0].text(), "local a=1 shared=a");
    assert_eq!(minified.trees()[1].text(), "local a=shared return a");
}
