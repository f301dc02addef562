//! Lexical rules for identifiers.
//!
//! Lua identifiers are ASCII letters, digits and `_`, not starting with a digit.
//! LuaJIT's lexer additionally treats every byte `>= 0x80` as an identifier
//! character, which in UTF-8 terms means any non-ASCII scalar value.

use crate::LuaSyntaxOptions;

/// Character set accepted in identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCharacters {
    /// `[A-Za-z_][A-Za-z0-9_]*`
    #[default]
    Lua,
    /// Lua rules plus any non-ASCII character.
    LuaJit,
}

impl IdentifierCharacters {
    #[inline]
    pub fn is_start(self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || (self == Self::LuaJit && !c.is_ascii())
    }

    #[inline]
    pub fn is_continue(self, c: char) -> bool {
        self.is_start(c) || c.is_ascii_digit()
    }
}

/// Words reserved in every dialect.
pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Whether `name` is reserved under `options`.
///
/// `goto` is reserved only when the dialect has goto statements. Luau's
/// `continue` is contextual and stays a valid name.
pub fn is_keyword(name: &str, options: &LuaSyntaxOptions) -> bool {
    if name == "goto" {
        return options.accept_goto;
    }
    KEYWORDS.contains(&name)
}

/// Whether `name` can be written as a bare identifier under `options`.
///
/// # Examples
/// ```
/// use moonscope_core::{LuaSyntaxOptions, is_valid_identifier};
/// assert!(is_valid_identifier("_tmp1", &LuaSyntaxOptions::LUA_51));
/// assert!(!is_valid_identifier("1st", &LuaSyntaxOptions::LUA_51));
/// assert!(is_valid_identifier("goto", &LuaSyntaxOptions::LUA_51));
/// assert!(!is_valid_identifier("goto", &LuaSyntaxOptions::LUA_52));
/// ```
pub fn is_valid_identifier(name: &str, options: &LuaSyntaxOptions) -> bool {
    let chars = options.identifier_characters;
    let mut it = name.chars();
    let Some(first) = it.next() else {
        return false;
    };
    if !chars.is_start(first) || !it.all(|c| chars.is_continue(c)) {
        return false;
    }
    !is_keyword(name, options)
}
