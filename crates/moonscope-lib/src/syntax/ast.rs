//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens in the parser.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Enum over several node wrappers, dispatching `cast` and `as_cst`.
macro_rules! ast_enum {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($variant),)*
        }

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$variant => $variant::cast(node).map($name::$variant),)*
                    _ => None,
                }
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                match self {
                    $($name::$variant(n) => n.as_cst(),)*
                }
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Block, Block);

ast_node!(LocalStmt, LocalStmt);
ast_node!(LocalFunctionStmt, LocalFunctionStmt);
ast_node!(FunctionStmt, FunctionStmt);
ast_node!(AssignStmt, AssignStmt);
ast_node!(CompoundAssignStmt, CompoundAssignStmt);
ast_node!(CallStmt, CallStmt);
ast_node!(DoStmt, DoStmt);
ast_node!(WhileStmt, WhileStmt);
ast_node!(RepeatStmt, RepeatStmt);
ast_node!(IfStmt, IfStmt);
ast_node!(ElseIfClause, ElseIfClause);
ast_node!(ElseClause, ElseClause);
ast_node!(NumericForStmt, NumericForStmt);
ast_node!(GenericForStmt, GenericForStmt);
ast_node!(ReturnStmt, ReturnStmt);
ast_node!(BreakStmt, BreakStmt);
ast_node!(ContinueStmt, ContinueStmt);
ast_node!(GotoStmt, GotoStmt);
ast_node!(LabelStmt, LabelStmt);
ast_node!(EmptyStmt, EmptyStmt);
ast_node!(Error, Error);

ast_node!(LocalName, LocalName);
ast_node!(Attribute, Attribute);
ast_node!(Name, Name);
ast_node!(NameRef, NameRef);
ast_node!(FunctionName, FunctionName);
ast_node!(FunctionBody, FunctionBody);
ast_node!(ParamList, ParamList);
ast_node!(TargetList, TargetList);
ast_node!(ExprList, ExprList);

ast_node!(LiteralExpr, LiteralExpr);
ast_node!(VarargExpr, VarargExpr);
ast_node!(FunctionExpr, FunctionExpr);
ast_node!(TableExpr, TableExpr);
ast_node!(ListField, ListField);
ast_node!(NamedField, NamedField);
ast_node!(KeyedField, KeyedField);
ast_node!(ParenExpr, ParenExpr);
ast_node!(IndexExpr, IndexExpr);
ast_node!(MemberExpr, MemberExpr);
ast_node!(CallExpr, CallExpr);
ast_node!(MethodCallExpr, MethodCallExpr);
ast_node!(CallArgs, CallArgs);
ast_node!(BinaryExpr, BinaryExpr);
ast_node!(UnaryExpr, UnaryExpr);

ast_enum!(Stmt {
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
    NumericForStmt,
    GenericForStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    GotoStmt,
    LabelStmt,
    EmptyStmt,
    Error,
});

ast_enum!(Expr {
    NameRef,
    LiteralExpr,
    VarargExpr,
    FunctionExpr,
    TableExpr,
    ParenExpr,
    IndexExpr,
    MemberExpr,
    CallExpr,
    MethodCallExpr,
    BinaryExpr,
    UnaryExpr,
});

ast_enum!(Field {
    ListField,
    NamedField,
    KeyedField,
});

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn exprs(node: &SyntaxNode) -> impl Iterator<Item = Expr> + '_ {
    node.children().filter_map(Expr::cast)
}

fn child<N>(node: &SyntaxNode, cast: fn(SyntaxNode) -> Option<N>) -> Option<N> {
    node.children().find_map(cast)
}

impl Root {
    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl Block {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

impl LocalStmt {
    pub fn names(&self) -> impl Iterator<Item = LocalName> + '_ {
        self.0.children().filter_map(LocalName::cast)
    }

    pub fn values(&self) -> Option<ExprList> {
        child(&self.0, ExprList::cast)
    }
}

impl LocalName {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn attribute(&self) -> Option<Attribute> {
        child(&self.0, Attribute::cast)
    }
}

impl Attribute {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl LocalFunctionStmt {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0, FunctionBody::cast)
    }
}

impl FunctionStmt {
    pub fn name(&self) -> Option<FunctionName> {
        child(&self.0, FunctionName::cast)
    }

    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0, FunctionBody::cast)
    }
}

impl FunctionName {
    /// The leading variable: `a` in `a.b.c:m`.
    pub fn base(&self) -> Option<NameRef> {
        child(&self.0, NameRef::cast)
    }

    /// Field names after the base, including the method name.
    pub fn fields(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
    }

    pub fn is_method(&self) -> bool {
        token(&self.0, SyntaxKind::Colon).is_some()
    }
}

impl FunctionBody {
    pub fn params(&self) -> Option<ParamList> {
        child(&self.0, ParamList::cast)
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl ParamList {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.children().filter_map(Name::cast)
    }

    pub fn has_vararg(&self) -> bool {
        token(&self.0, SyntaxKind::Ellipsis).is_some()
    }
}

impl AssignStmt {
    pub fn targets(&self) -> impl Iterator<Item = Expr> {
        child(&self.0, TargetList::cast)
            .into_iter()
            .flat_map(|list| list.0.children().filter_map(Expr::cast).collect::<Vec<_>>())
    }

    pub fn values(&self) -> Option<ExprList> {
        child(&self.0, ExprList::cast)
    }
}

impl CompoundAssignStmt {
    pub fn target(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().compound_operator().is_some())
    }

    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }
}

impl CallStmt {
    pub fn call(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl DoStmt {
    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl RepeatStmt {
    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }

    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }

    pub fn else_if_clauses(&self) -> impl Iterator<Item = ElseIfClause> + '_ {
        self.0.children().filter_map(ElseIfClause::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        child(&self.0, ElseClause::cast)
    }
}

impl ElseIfClause {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl ElseClause {
    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl NumericForStmt {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    /// Start, limit and optional step.
    pub fn bounds(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl GenericForStmt {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.children().filter_map(Name::cast)
    }

    pub fn values(&self) -> Option<ExprList> {
        child(&self.0, ExprList::cast)
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0, Block::cast)
    }
}

impl ReturnStmt {
    pub fn values(&self) -> Option<ExprList> {
        child(&self.0, ExprList::cast)
    }
}

impl GotoStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl LabelStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl ExprList {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }
}

impl FunctionExpr {
    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0, FunctionBody::cast)
    }
}

impl TableExpr {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.children().filter_map(Field::cast)
    }
}

impl ListField {
    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl NamedField {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl KeyedField {
    pub fn key(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl IndexExpr {
    pub fn base(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn index(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }
}

impl MemberExpr {
    pub fn base(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn member(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn args(&self) -> Option<CallArgs> {
        child(&self.0, CallArgs::cast)
    }
}

impl MethodCallExpr {
    pub fn receiver(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn method(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn args(&self) -> Option<CallArgs> {
        child(&self.0, CallArgs::cast)
    }
}

impl CallArgs {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn rhs(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }
}

impl UnaryExpr {
    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn operand(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl Expr {
    /// Calls and `...` can produce any number of values.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Expr::CallExpr(_) | Expr::MethodCallExpr(_) | Expr::VarargExpr(_)
        )
    }
}
