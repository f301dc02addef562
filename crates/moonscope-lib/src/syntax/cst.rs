//! Syntax kinds for Lua.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `LuaLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

use super::lexer::{lex_comment, lex_long_string};

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("+")]
    Plus = 0,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
    #[token("&")]
    Ampersand,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token("==")]
    EqualsEquals,
    #[token("~=")]
    TildeEquals,
    #[token("<=")]
    LessEquals,
    #[token(">=")]
    GreaterEquals,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Equals,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("::")]
    DoubleColon,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DoubleDot,
    #[token("...")]
    Ellipsis,

    // Compound assignment operators (Luau)
    #[token("+=")]
    PlusEquals,
    #[token("-=")]
    MinusEquals,
    #[token("*=")]
    StarEquals,
    #[token("/=")]
    SlashEquals,
    #[token("//=")]
    DoubleSlashEquals,
    #[token("%=")]
    PercentEquals,
    #[token("^=")]
    CaretEquals,
    #[token("..=")]
    DoubleDotEquals,

    #[token("and")]
    AndKw,
    #[token("break")]
    BreakKw,
    #[token("do")]
    DoKw,
    #[token("else")]
    ElseKw,
    #[token("elseif")]
    ElseIfKw,
    #[token("end")]
    EndKw,
    #[token("false")]
    FalseKw,
    #[token("for")]
    ForKw,
    #[token("function")]
    FunctionKw,
    #[token("if")]
    IfKw,
    #[token("in")]
    InKw,
    #[token("local")]
    LocalKw,
    #[token("nil")]
    NilKw,
    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,
    #[token("repeat")]
    RepeatKw,
    #[token("return")]
    ReturnKw,
    #[token("then")]
    ThenKw,
    #[token("true")]
    TrueKw,
    #[token("until")]
    UntilKw,
    #[token("while")]
    WhileKw,

    /// Contextual keywords. The lexer produces `Ident`; the parser remaps.
    GotoKw,
    ContinueKw,

    /// Numerals are read greedily like Lua's own reader: malformed ones such as
    /// `3x` or `1..2` become a single token the parser rejects.
    #[regex(r"[0-9]([0-9a-zA-Z_.]|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9a-zA-Z_.]|[eEpP][+-])*")]
    Number,

    #[regex(r#""([^"\\\r\n]|\\z[ \t\r\n\x0B\x0C]*|\\[^\r\n]|\\(\r\n|\n\r|\r|\n))*""#)]
    #[regex(r"'([^'\\\r\n]|\\z[ \t\r\n\x0B\x0C]*|\\[^\r\n]|\\(\r\n|\n\r|\r|\n))*'")]
    String,

    /// `[[...]]`, `[==[...]==]`
    #[regex(r"\[=*\[", lex_long_string)]
    LongString,

    /// Identifiers accept any non-ASCII character; the dialect check happens in the parser.
    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Ident,

    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    /// `-- line` and `--[[ long ]]` comments.
    #[token("--", lex_comment)]
    Comment,

    /// `#!` first line, produced by the lexer post-pass.
    Shebang,
    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Block,

    LocalStmt,
    LocalFunctionStmt,
    FunctionStmt,
    AssignStmt,
    CompoundAssignStmt,
    CallStmt,
    DoStmt,
    WhileStmt,
    RepeatStmt,
    IfStmt,
    ElseIfClause,
    ElseClause,
    NumericForStmt,
    GenericForStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    GotoStmt,
    LabelStmt,
    EmptyStmt,

    /// `x <const>` inside a `local` statement.
    LocalName,
    Attribute,
    /// Declaration-site identifier.
    Name,
    /// Identifier used as an expression (read or write).
    NameRef,
    /// `a.b.c:m` in `function a.b.c:m() end`.
    FunctionName,
    FunctionBody,
    ParamList,
    TargetList,
    ExprList,

    LiteralExpr,
    VarargExpr,
    FunctionExpr,
    TableExpr,
    ListField,
    NamedField,
    KeyedField,
    ParenExpr,
    IndexExpr,
    MemberExpr,
    CallExpr,
    MethodCallExpr,
    CallArgs,
    BinaryExpr,
    UnaryExpr,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | Comment | Shebang)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (AndKw as u16..=ContinueKw as u16).contains(&(self as u16))
    }

    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < Root as u16
    }

    /// Binary operator this compound assignment applies (`+=` → `+`).
    pub fn compound_operator(self) -> Option<SyntaxKind> {
        let op = match self {
            PlusEquals => Plus,
            MinusEquals => Minus,
            StarEquals => Star,
            SlashEquals => Slash,
            DoubleSlashEquals => DoubleSlash,
            PercentEquals => Percent,
            CaretEquals => Caret,
            DoubleDotEquals => DoubleDot,
            _ => return None,
        };
        Some(op)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LuaLang {}

impl Language for LuaLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<LuaLang>;
pub type SyntaxToken = rowan::SyntaxToken<LuaLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const LITERALS: TokenSet =
        TokenSet::new(&[NilKw, TrueKw, FalseKw, Number, String, LongString]);

    pub const UNARY_OPS: TokenSet = TokenSet::new(&[NotKw, Minus, Hash, Tilde]);

    pub const COMPOUND_ASSIGN_OPS: TokenSet = TokenSet::new(&[
        PlusEquals,
        MinusEquals,
        StarEquals,
        SlashEquals,
        DoubleSlashEquals,
        PercentEquals,
        CaretEquals,
        DoubleDotEquals,
    ]);

    /// Tokens that start an expression.
    pub const EXPR_FIRST: TokenSet = LITERALS.union(UNARY_OPS).union(TokenSet::new(&[
        Ident,
        Ellipsis,
        FunctionKw,
        BraceOpen,
        ParenOpen,
    ]));

    /// Tokens that end a block.
    pub const BLOCK_END: TokenSet = TokenSet::new(&[EndKw, ElseKw, ElseIfKw, UntilKw]);

    /// Tokens that may follow `continue` when it is used as a plain name.
    pub const CONTINUE_AS_NAME: TokenSet = COMPOUND_ASSIGN_OPS.union(TokenSet::new(&[
        Equals,
        Comma,
        Dot,
        Colon,
        BracketOpen,
        ParenOpen,
        BraceOpen,
        String,
        LongString,
    ]));

    /// Statement starters used to resynchronize after an error.
    pub const STMT_RECOVERY: TokenSet = TokenSet::new(&[
        LocalKw,
        FunctionKw,
        IfKw,
        WhileKw,
        ForKw,
        RepeatKw,
        DoKw,
        ReturnKw,
        BreakKw,
        DoubleColon,
        Semicolon,
        EndKw,
        ElseKw,
        ElseIfKw,
        UntilKw,
    ]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, Comment, Shebang]);
}
