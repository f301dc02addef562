#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Dialect configuration for the Lua language family.
//!
//! Two layers:
//! - **Options** (`LuaSyntaxOptions`): which syntax extensions a dialect accepts,
//!   with presets for the common Lua versions. Serializable, so hosts can keep
//!   dialect settings in a JSON config file.
//! - **Identifiers** (`identifiers`): the lexical rules for names, keyword
//!   tables, and validity checks used by renaming and minification.

pub mod identifiers;

#[cfg(test)]
mod lib_tests;

pub use identifiers::{IdentifierCharacters, is_keyword, is_valid_identifier};

// ============================================================================
// Options
// ============================================================================

/// Syntax features accepted by a Lua dialect.
///
/// Every flag maps to a construct the parser gates on. Identifier rules also
/// depend on the options: `goto` is only reserved when `accept_goto` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LuaSyntaxOptions {
    /// `goto name` and `::name::` statements (Lua 5.2+, LuaJIT).
    pub accept_goto: bool,
    /// The `//` floor division operator (Lua 5.3+, Luau).
    pub accept_integer_division: bool,
    /// `&`, `|`, `~`, `<<`, `>>` and unary `~` (Lua 5.3+).
    pub accept_bitwise_operators: bool,
    /// `+=`, `-=`, `..=` and friends (Luau).
    pub accept_compound_assignment: bool,
    /// `continue` as a contextual statement keyword (Luau).
    pub accept_continue: bool,
    /// `local x <const>` / `<close>` attributes (Lua 5.4).
    pub accept_local_attributes: bool,
    /// A lone `;` as an empty statement (Lua 5.2+).
    pub accept_empty_statements: bool,
    /// Which characters may appear in identifiers.
    pub identifier_characters: IdentifierCharacters,
}

impl LuaSyntaxOptions {
    pub const LUA_51: Self = Self {
        accept_goto: false,
        accept_integer_division: false,
        accept_bitwise_operators: false,
        accept_compound_assignment: false,
        accept_continue: false,
        accept_local_attributes: false,
        accept_empty_statements: false,
        identifier_characters: IdentifierCharacters::Lua,
    };

    pub const LUA_52: Self = Self {
        accept_goto: true,
        accept_empty_statements: true,
        ..Self::LUA_51
    };

    pub const LUA_53: Self = Self {
        accept_integer_division: true,
        accept_bitwise_operators: true,
        ..Self::LUA_52
    };

    pub const LUA_54: Self = Self {
        accept_local_attributes: true,
        ..Self::LUA_53
    };

    pub const LUAJIT_20: Self = Self {
        accept_goto: true,
        accept_empty_statements: true,
        identifier_characters: IdentifierCharacters::LuaJit,
        ..Self::LUA_51
    };

    pub const LUAJIT_21: Self = Self::LUAJIT_20;

    pub const LUAU: Self = Self {
        accept_integer_division: true,
        accept_compound_assignment: true,
        accept_continue: true,
        accept_empty_statements: true,
        ..Self::LUA_51
    };

    /// Everything every supported dialect accepts.
    pub const ALL: Self = Self {
        accept_goto: true,
        accept_integer_division: true,
        accept_bitwise_operators: true,
        accept_compound_assignment: true,
        accept_continue: true,
        accept_local_attributes: true,
        accept_empty_statements: true,
        identifier_characters: IdentifierCharacters::LuaJit,
    };

    /// Look up a preset by its conventional name (`"lua5.1"`, `"luajit2.1"`, `"luau"`, ...).
    pub fn preset(name: &str) -> Option<Self> {
        let preset = match name.to_ascii_lowercase().as_str() {
            "lua5.1" | "lua51" => Self::LUA_51,
            "lua5.2" | "lua52" => Self::LUA_52,
            "lua5.3" | "lua53" => Self::LUA_53,
            "lua5.4" | "lua54" => Self::LUA_54,
            "luajit2.0" | "luajit20" => Self::LUAJIT_20,
            "luajit2.1" | "luajit21" | "luajit" => Self::LUAJIT_21,
            "luau" => Self::LUAU,
            "all" => Self::ALL,
            _ => return None,
        };
        Some(preset)
    }

    /// Parse options from a JSON object. Missing fields take their `ALL` value.
    ///
    /// # Examples
    /// ```
    /// use moonscope_core::{IdentifierCharacters, LuaSyntaxOptions};
    /// let opts = LuaSyntaxOptions::from_json(r#"{ "accept_goto": false }"#).unwrap();
    /// assert!(!opts.accept_goto);
    /// assert_eq!(opts.identifier_characters, IdentifierCharacters::LuaJit);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for LuaSyntaxOptions {
    fn default() -> Self {
        Self::ALL
    }
}
