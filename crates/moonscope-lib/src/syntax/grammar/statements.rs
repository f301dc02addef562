use rowan::TextRange;

use crate::diagnostics::DiagnosticKind;
use crate::syntax::core::Parser;
use crate::syntax::cst::SyntaxKind;
use crate::syntax::cst::token_sets::{
    BLOCK_END, COMPOUND_ASSIGN_OPS, CONTINUE_AS_NAME, EXPR_FIRST,
};

impl Parser<'_> {
    pub(super) fn parse_stmt(&mut self) {
        match self.current() {
            SyntaxKind::Semicolon => self.parse_empty_stmt(),
            SyntaxKind::LocalKw if self.next_is(SyntaxKind::FunctionKw) => {
                self.parse_local_function_stmt()
            }
            SyntaxKind::LocalKw => self.parse_local_stmt(),
            SyntaxKind::FunctionKw => self.parse_function_stmt(),
            SyntaxKind::DoKw => self.parse_do_stmt(),
            SyntaxKind::WhileKw => self.parse_while_stmt(),
            SyntaxKind::RepeatKw => self.parse_repeat_stmt(),
            SyntaxKind::IfKw => self.parse_if_stmt(),
            SyntaxKind::ForKw => self.parse_for_stmt(),
            SyntaxKind::BreakKw => self.parse_break_stmt(),
            SyntaxKind::DoubleColon => self.parse_label_stmt(),
            SyntaxKind::Ident if self.at_goto() => self.parse_goto_stmt(),
            SyntaxKind::Ident if self.at_continue() => self.parse_continue_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// `goto name` where the dialect reserves `goto`.
    fn at_goto(&mut self) -> bool {
        self.options.accept_goto
            && self.currently_is_word("goto")
            && self.next_is(SyntaxKind::Ident)
    }

    /// `continue` is a statement unless the next token makes it a name (`continue = 1`).
    fn at_continue(&mut self) -> bool {
        if !self.options.accept_continue || !self.currently_is_word("continue") {
            return false;
        }
        let next = self.peek_nth(1);
        !CONTINUE_AS_NAME.contains(next)
    }

    fn parse_empty_stmt(&mut self) {
        let span = self.current_span();
        self.gate(self.options.accept_empty_statements, "empty statement", span);
        self.start_node(SyntaxKind::EmptyStmt);
        self.bump();
        self.finish_node();
    }

    /// `local a <const>, b = e1, e2`
    fn parse_local_stmt(&mut self) {
        self.start_node(SyntaxKind::LocalStmt);
        self.bump(); // local

        loop {
            self.parse_local_name();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }

        if self.eat_token(SyntaxKind::Equals) {
            self.parse_expr_list();
        }
        self.finish_node();
    }

    fn parse_local_name(&mut self) {
        self.start_node(SyntaxKind::LocalName);
        self.parse_name();
        if self.currently_is(SyntaxKind::Less) {
            self.parse_attribute();
        }
        self.finish_node();
    }

    /// `<const>` or `<close>`
    fn parse_attribute(&mut self) {
        let start = self.current_span().start();
        self.start_node(SyntaxKind::Attribute);
        self.bump(); // <
        let name_span = self.current_span();
        let name = self.current_text();
        if self.expect(SyntaxKind::Ident, "attribute name") && !matches!(name, "const" | "close")
        {
            self.error_at_msg(DiagnosticKind::UnknownAttribute, name_span, name);
        }
        self.expect(SyntaxKind::Greater, "`>`");
        self.finish_node();

        let range = self.range_from(start);
        self.gate(self.options.accept_local_attributes, "local attribute", range);
    }

    /// `local function name() ... end`
    fn parse_local_function_stmt(&mut self) {
        self.start_node(SyntaxKind::LocalFunctionStmt);
        self.bump(); // local
        let open = self.current_span();
        self.bump(); // function
        self.parse_name();
        self.parse_function_body(open);
        self.finish_node();
    }

    /// `function a.b.c:m() ... end`
    fn parse_function_stmt(&mut self) {
        self.start_node(SyntaxKind::FunctionStmt);
        let open = self.current_span();
        self.bump(); // function

        self.start_node(SyntaxKind::FunctionName);
        self.parse_name_ref();
        while self.eat_token(SyntaxKind::Dot) {
            self.parse_member_name();
        }
        if self.eat_token(SyntaxKind::Colon) {
            self.parse_member_name();
        }
        self.finish_node();

        self.parse_function_body(open);
        self.finish_node();
    }

    fn parse_do_stmt(&mut self) {
        self.start_node(SyntaxKind::DoStmt);
        let open = self.current_span();
        self.bump(); // do
        self.parse_block(false);
        self.expect_closing(SyntaxKind::EndKw, DiagnosticKind::UnclosedBlock, "do", open);
        self.finish_node();
    }

    fn parse_while_stmt(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        let open = self.current_span();
        self.bump(); // while
        self.parse_expr();
        self.expect(SyntaxKind::DoKw, "`do`");
        self.parse_block(false);
        self.expect_closing(SyntaxKind::EndKw, DiagnosticKind::UnclosedBlock, "while", open);
        self.finish_node();
    }

    fn parse_repeat_stmt(&mut self) {
        self.start_node(SyntaxKind::RepeatStmt);
        let open = self.current_span();
        self.bump(); // repeat
        self.parse_block(false);
        if self.expect_closing(
            SyntaxKind::UntilKw,
            DiagnosticKind::UnclosedBlock,
            "repeat",
            open,
        ) {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        let open = self.current_span();
        self.bump(); // if
        self.parse_expr();
        self.expect(SyntaxKind::ThenKw, "`then`");
        self.parse_block(false);

        while self.currently_is(SyntaxKind::ElseIfKw) {
            self.start_node(SyntaxKind::ElseIfClause);
            self.bump();
            self.parse_expr();
            self.expect(SyntaxKind::ThenKw, "`then`");
            self.parse_block(false);
            self.finish_node();
        }

        if self.currently_is(SyntaxKind::ElseKw) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_block(false);
            self.finish_node();
        }

        self.expect_closing(SyntaxKind::EndKw, DiagnosticKind::UnclosedBlock, "if", open);
        self.finish_node();
    }

    /// `for i = a, b [, c] do ... end` or `for k, v in e do ... end`
    fn parse_for_stmt(&mut self) {
        let kind = if self.peek_nth(2) == SyntaxKind::Equals {
            SyntaxKind::NumericForStmt
        } else {
            SyntaxKind::GenericForStmt
        };

        self.start_node(kind);
        let open = self.current_span();
        self.bump(); // for
        self.parse_name();

        if kind == SyntaxKind::NumericForStmt {
            self.expect(SyntaxKind::Equals, "`=`");
            self.parse_expr();
            self.expect(SyntaxKind::Comma, "`,`");
            self.parse_expr();
            if self.eat_token(SyntaxKind::Comma) {
                self.parse_expr();
            }
        } else {
            while self.eat_token(SyntaxKind::Comma) {
                self.parse_name();
            }
            self.expect(SyntaxKind::InKw, "`in` or `=`");
            self.parse_expr_list();
        }

        self.expect(SyntaxKind::DoKw, "`do`");
        self.parse_block(false);
        self.expect_closing(SyntaxKind::EndKw, DiagnosticKind::UnclosedBlock, "for", open);
        self.finish_node();
    }

    pub(super) fn parse_return_stmt(&mut self) {
        self.assert_current(SyntaxKind::ReturnKw);
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump();
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_expr_list();
        }
        self.eat_token(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn parse_break_stmt(&mut self) {
        self.start_node(SyntaxKind::BreakStmt);
        self.bump();
        self.finish_node();
    }

    fn parse_continue_stmt(&mut self) {
        self.start_node(SyntaxKind::ContinueStmt);
        self.bump_contextual(SyntaxKind::ContinueKw);
        self.finish_node();
    }

    fn parse_goto_stmt(&mut self) {
        self.start_node(SyntaxKind::GotoStmt);
        self.bump_contextual(SyntaxKind::GotoKw);
        self.parse_label_name();
        self.finish_node();
    }

    /// `::name::`
    fn parse_label_stmt(&mut self) {
        let span = self.current_span();
        self.gate(self.options.accept_goto, "`::label::`", span);
        self.start_node(SyntaxKind::LabelStmt);
        self.bump(); // ::
        self.parse_label_name();
        self.expect(SyntaxKind::DoubleColon, "`::`");
        self.finish_node();
    }

    fn parse_label_name(&mut self) {
        if self.currently_is(SyntaxKind::Ident) {
            self.validate_identifier();
            self.bump();
        } else {
            self.error(DiagnosticKind::ExpectedName);
        }
    }

    /// Assignment, compound assignment or call; anything else is an error.
    fn parse_expr_stmt(&mut self) {
        let checkpoint = self.checkpoint();
        let start = self.current_span().start();
        let first = self.parse_suffixed_expr();

        if self.currently_is_one_of(COMPOUND_ASSIGN_OPS) {
            self.start_node_at(checkpoint, SyntaxKind::CompoundAssignStmt);
            self.check_assign_target(first, start);
            let span = self.current_span();
            self.gate(
                self.options.accept_compound_assignment,
                "compound assignment",
                span,
            );
            self.bump();
            self.parse_expr();
            self.finish_node();
            return;
        }

        if self.currently_is(SyntaxKind::Equals) || self.currently_is(SyntaxKind::Comma) {
            self.start_node_at(checkpoint, SyntaxKind::AssignStmt);
            self.start_node_at(checkpoint, SyntaxKind::TargetList);
            self.check_assign_target(first, start);
            while self.eat_token(SyntaxKind::Comma) {
                let start = self.current_span().start();
                let target = self.parse_suffixed_expr();
                self.check_assign_target(target, start);
            }
            self.finish_node();
            if self.expect(SyntaxKind::Equals, "`=`") {
                self.parse_expr_list();
            }
            self.finish_node();
            return;
        }

        if matches!(
            first,
            Some(SyntaxKind::CallExpr | SyntaxKind::MethodCallExpr)
        ) {
            self.start_node_at(checkpoint, SyntaxKind::CallStmt);
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::Error);
        if first.is_some() {
            let range = self.range_from(start);
            self.error_at_msg(
                DiagnosticKind::ExpectedToken,
                TextRange::empty(range.end()),
                "`=` or a call",
            );
        }
        self.finish_node();
    }

    fn check_assign_target(&mut self, kind: Option<SyntaxKind>, start: rowan::TextSize) {
        if matches!(
            kind,
            Some(SyntaxKind::NameRef | SyntaxKind::MemberExpr | SyntaxKind::IndexExpr) | None
        ) {
            return;
        }
        let range = self.range_from(start);
        self.error_at_msg(
            DiagnosticKind::UnexpectedToken,
            range,
            "only names and table fields can be assigned",
        );
    }

    /// `function` was already consumed; `open` is its span.
    pub(super) fn parse_function_body(&mut self, open: TextRange) {
        self.start_node(SyntaxKind::FunctionBody);
        self.parse_param_list();
        self.parse_block(false);
        self.expect_closing(
            SyntaxKind::EndKw,
            DiagnosticKind::UnclosedBlock,
            "function",
            open,
        );
        self.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::ParamList);
        let open = self.current_span();
        if !self.expect(SyntaxKind::ParenOpen, "`(`") {
            self.finish_node();
            return;
        }

        if !self.currently_is(SyntaxKind::ParenClose) {
            loop {
                if self.eat_token(SyntaxKind::Ellipsis) {
                    break;
                }
                if !self.currently_is(SyntaxKind::Ident) {
                    self.error(DiagnosticKind::ExpectedName);
                    break;
                }
                self.parse_name();
                if !self.eat_token(SyntaxKind::Comma) {
                    break;
                }
            }
        }

        self.expect_closing(SyntaxKind::ParenClose, DiagnosticKind::UnclosedParen, "(", open);
        self.finish_node();
    }

    /// Declaration-site identifier.
    pub(super) fn parse_name(&mut self) {
        if !self.currently_is(SyntaxKind::Ident) {
            self.error(DiagnosticKind::ExpectedName);
            return;
        }
        self.validate_identifier();
        self.start_node(SyntaxKind::Name);
        self.bump();
        self.finish_node();
    }

    /// Field or method name after `.` or `:`.
    pub(super) fn parse_member_name(&mut self) {
        if self.currently_is(SyntaxKind::Ident) {
            self.validate_identifier();
            self.bump();
        } else if !self.currently_is_one_of(BLOCK_END) && self.current().is_keyword() {
            self.error_and_bump_msg(DiagnosticKind::ExpectedName, "keywords cannot be field names");
        } else {
            self.error(DiagnosticKind::ExpectedName);
        }
    }
}
