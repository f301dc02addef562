use crate::diagnostics::DiagnosticKind;
use crate::syntax::core::Parser;
use crate::syntax::cst::SyntaxKind;
use crate::syntax::cst::token_sets::{EXPR_FIRST, LITERALS, STMT_RECOVERY, UNARY_OPS};
use crate::syntax::lexer::is_long_string_terminated;

use super::is_valid_number;

/// Binding power of unary operators; binds tighter than everything but `^`.
const UNARY_PRIORITY: u8 = 12;

/// Left and right binding power of a binary operator.
///
/// Right-associative operators (`..`, `^`) bind less tightly on the right.
fn binary_priority(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;
    let priority = match kind {
        OrKw => (1, 1),
        AndKw => (2, 2),
        Less | Greater | LessEquals | GreaterEquals | TildeEquals | EqualsEquals => (3, 3),
        Pipe => (4, 4),
        Tilde => (5, 5),
        Ampersand => (6, 6),
        ShiftLeft | ShiftRight => (7, 7),
        DoubleDot => (9, 8),
        Plus | Minus => (10, 10),
        Star | Slash | DoubleSlash | Percent => (11, 11),
        Caret => (14, 13),
        _ => return None,
    };
    Some(priority)
}

fn is_bitwise(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Pipe
            | SyntaxKind::Tilde
            | SyntaxKind::Ampersand
            | SyntaxKind::ShiftLeft
            | SyntaxKind::ShiftRight
    )
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) {
        self.parse_subexpr(0);
    }

    pub(crate) fn parse_expr_list(&mut self) {
        self.start_node(SyntaxKind::ExprList);
        loop {
            self.parse_expr();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    /// Precedence climbing: parses operators binding tighter than `limit`.
    fn parse_subexpr(&mut self, limit: u8) {
        if !self.enter_recursion() {
            return;
        }

        let checkpoint = self.checkpoint();
        if self.currently_is_one_of(UNARY_OPS) {
            self.start_node(SyntaxKind::UnaryExpr);
            if self.currently_is(SyntaxKind::Tilde) {
                let span = self.current_span();
                self.gate(self.options.accept_bitwise_operators, "bitwise operator", span);
            }
            self.bump();
            self.parse_subexpr(UNARY_PRIORITY);
            self.finish_node();
        } else {
            self.parse_simple_expr();
        }

        loop {
            let op = self.current();
            let Some((left, right)) = binary_priority(op) else {
                break;
            };
            if left <= limit || self.should_stop() {
                break;
            }

            let span = self.current_span();
            if op == SyntaxKind::DoubleSlash {
                self.gate(self.options.accept_integer_division, "`//` operator", span);
            } else if is_bitwise(op) {
                self.gate(self.options.accept_bitwise_operators, "bitwise operator", span);
            }

            self.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.bump();
            self.parse_subexpr(right);
            self.finish_node();
        }

        self.exit_recursion();
    }

    fn parse_simple_expr(&mut self) {
        match self.current() {
            kind if LITERALS.contains(kind) => self.parse_literal(),
            SyntaxKind::Ellipsis => {
                self.start_node(SyntaxKind::VarargExpr);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::BraceOpen => self.parse_table(),
            SyntaxKind::FunctionKw => {
                self.start_node(SyntaxKind::FunctionExpr);
                let open = self.current_span();
                self.bump();
                self.parse_function_body(open);
                self.finish_node();
            }
            _ => {
                self.parse_suffixed_expr();
            }
        }
    }

    fn parse_literal(&mut self) {
        let span = self.current_span();
        let text = self.current_text();
        match self.current() {
            SyntaxKind::Number if !is_valid_number(text) => {
                self.error_at_msg(DiagnosticKind::MalformedNumber, span, text);
            }
            SyntaxKind::LongString if !is_long_string_terminated(text) => {
                self.error_at(DiagnosticKind::UnfinishedLongString, span);
            }
            _ => {}
        }
        self.start_node(SyntaxKind::LiteralExpr);
        self.bump();
        self.finish_node();
    }

    /// Name or parenthesized expression, followed by any number of
    /// `.name`, `[expr]`, `:name args` and call suffixes.
    ///
    /// Returns the kind of the outermost node, or `None` if no expression was found.
    pub(super) fn parse_suffixed_expr(&mut self) -> Option<SyntaxKind> {
        let checkpoint = self.checkpoint();
        let mut kind = self.parse_primary_expr()?;

        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpr);
                    self.bump();
                    self.parse_member_name();
                    self.finish_node();
                    kind = SyntaxKind::MemberExpr;
                }
                SyntaxKind::BracketOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::IndexExpr);
                    let open = self.current_span();
                    self.bump();
                    self.parse_expr();
                    self.expect_closing(
                        SyntaxKind::BracketClose,
                        DiagnosticKind::UnclosedBracket,
                        "[",
                        open,
                    );
                    self.finish_node();
                    kind = SyntaxKind::IndexExpr;
                }
                SyntaxKind::Colon => {
                    self.start_node_at(checkpoint, SyntaxKind::MethodCallExpr);
                    self.bump();
                    self.parse_member_name();
                    self.parse_call_args();
                    self.finish_node();
                    kind = SyntaxKind::MethodCallExpr;
                }
                SyntaxKind::ParenOpen
                | SyntaxKind::String
                | SyntaxKind::LongString
                | SyntaxKind::BraceOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.parse_call_args();
                    self.finish_node();
                    kind = SyntaxKind::CallExpr;
                }
                _ => break,
            }
        }

        Some(kind)
    }

    fn parse_primary_expr(&mut self) -> Option<SyntaxKind> {
        match self.current() {
            SyntaxKind::Ident => {
                self.parse_name_ref();
                Some(SyntaxKind::NameRef)
            }
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::ParenExpr);
                let open = self.current_span();
                self.bump();
                self.parse_expr();
                self.expect_closing(
                    SyntaxKind::ParenClose,
                    DiagnosticKind::UnclosedParen,
                    "(",
                    open,
                );
                self.finish_node();
                Some(SyntaxKind::ParenExpr)
            }
            _ => {
                if self.should_stop() || self.currently_is_one_of(STMT_RECOVERY) {
                    self.error(DiagnosticKind::ExpectedExpression);
                } else {
                    self.error_and_bump(DiagnosticKind::ExpectedExpression);
                }
                None
            }
        }
    }

    /// Identifier used as an expression.
    pub(super) fn parse_name_ref(&mut self) {
        if !self.currently_is(SyntaxKind::Ident) {
            self.error(DiagnosticKind::ExpectedName);
            return;
        }
        self.validate_identifier();
        self.start_node(SyntaxKind::NameRef);
        self.bump();
        self.finish_node();
    }

    /// `(args)`, `{table}` or `"string"`
    fn parse_call_args(&mut self) {
        self.start_node(SyntaxKind::CallArgs);
        match self.current() {
            SyntaxKind::ParenOpen => {
                let open = self.current_span();
                self.bump();
                if !self.currently_is(SyntaxKind::ParenClose) {
                    loop {
                        self.parse_expr();
                        if !self.eat_token(SyntaxKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect_closing(
                    SyntaxKind::ParenClose,
                    DiagnosticKind::UnclosedParen,
                    "(",
                    open,
                );
            }
            SyntaxKind::BraceOpen => self.parse_table(),
            SyntaxKind::String | SyntaxKind::LongString => self.parse_literal(),
            _ => {
                self.error_msg(DiagnosticKind::ExpectedToken, "function arguments");
            }
        }
        self.finish_node();
    }

    /// `{ [k] = v, name = v, v; ... }`
    fn parse_table(&mut self) {
        self.assert_current(SyntaxKind::BraceOpen);
        self.start_node(SyntaxKind::TableExpr);
        let open = self.current_span();
        self.bump();

        while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
            if !self.parse_field() {
                break;
            }
            if !self.eat_token(SyntaxKind::Comma) && !self.eat_token(SyntaxKind::Semicolon) {
                break;
            }
        }

        self.expect_closing(
            SyntaxKind::BraceClose,
            DiagnosticKind::UnclosedBrace,
            "{",
            open,
        );
        self.finish_node();
    }

    /// Returns `false` when no field could start here.
    fn parse_field(&mut self) -> bool {
        match self.current() {
            SyntaxKind::BracketOpen => {
                self.start_node(SyntaxKind::KeyedField);
                let open = self.current_span();
                self.bump();
                self.parse_expr();
                self.expect_closing(
                    SyntaxKind::BracketClose,
                    DiagnosticKind::UnclosedBracket,
                    "[",
                    open,
                );
                self.expect(SyntaxKind::Equals, "`=`");
                self.parse_expr();
                self.finish_node();
            }
            SyntaxKind::Ident if self.next_is(SyntaxKind::Equals) => {
                self.start_node(SyntaxKind::NamedField);
                self.validate_identifier();
                self.bump();
                self.bump(); // =
                self.parse_expr();
                self.finish_node();
            }
            kind if EXPR_FIRST.contains(kind) => {
                self.start_node(SyntaxKind::ListField);
                self.parse_expr();
                self.finish_node();
            }
            _ => {
                self.error_msg(DiagnosticKind::ExpectedToken, "a table field or `}`");
                return false;
            }
        }
        true
    }
}
