use crate::{IdentifierCharacters, LuaSyntaxOptions};

#[test]
fn default_is_all() {
    assert_eq!(LuaSyntaxOptions::default(), LuaSyntaxOptions::ALL);
}

#[test]
fn presets_are_cumulative() {
    let lua52 = LuaSyntaxOptions::LUA_52;
    let lua53 = LuaSyntaxOptions::LUA_53;
    let lua54 = LuaSyntaxOptions::LUA_54;

    assert!(!LuaSyntaxOptions::LUA_51.accept_goto);
    assert!(lua52.accept_goto && !lua52.accept_bitwise_operators);
    assert!(lua53.accept_goto && lua53.accept_integer_division);
    assert!(lua54.accept_local_attributes && !lua53.accept_local_attributes);
    assert!(!lua54.accept_compound_assignment);
}

#[test]
fn luau_preset() {
    let luau = LuaSyntaxOptions::LUAU;

    assert!(luau.accept_compound_assignment);
    assert!(luau.accept_continue);
    assert!(!luau.accept_goto);
    assert_eq!(luau.identifier_characters, IdentifierCharacters::Lua);
}

#[test]
fn preset_lookup() {
    assert_eq!(LuaSyntaxOptions::preset("Lua5.1"), Some(LuaSyntaxOptions::LUA_51));
    assert_eq!(LuaSyntaxOptions::preset("luajit"), Some(LuaSyntaxOptions::LUAJIT_21));
    assert_eq!(LuaSyntaxOptions::preset("luau"), Some(LuaSyntaxOptions::LUAU));
    assert_eq!(LuaSyntaxOptions::preset("lua6"), None);
}

#[test]
fn json_fills_missing_fields_from_default() {
    let opts = LuaSyntaxOptions::from_json(
        r#"{ "accept_compound_assignment": false, "identifier_characters": "lua" }"#,
    )
    .unwrap();

    assert!(!opts.accept_compound_assignment);
    assert_eq!(opts.identifier_characters, IdentifierCharacters::Lua);
    assert!(opts.accept_goto);
}

#[test]
fn json_roundtrip_of_preset() {
    let json = LuaSyntaxOptions::LUAU.to_json().unwrap();
    let back = LuaSyntaxOptions::from_json(&json).unwrap();

    assert_eq!(back, LuaSyntaxOptions::LUAU);
}

#[test]
fn json_rejects_unknown_character_set() {
    let err = LuaSyntaxOptions::from_json(r#"{ "identifier_characters": "emoji" }"#);
    assert!(err.is_err());
}
