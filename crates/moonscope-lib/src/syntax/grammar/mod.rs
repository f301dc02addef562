//! Recursive-descent grammar for Lua chunks.
//!
//! Every dialect extension is always parsed; a dialect that does not accept it
//! gets an `UnsupportedSyntax` diagnostic instead of a broken tree.

mod expressions;
mod statements;
mod validation;

pub(crate) use validation::is_valid_number;

use super::core::Parser;
use super::cst::SyntaxKind;
use super::cst::token_sets::BLOCK_END;
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);
        self.parse_block(true);
        self.eat_trivia();
        self.finish_node();
    }

    /// Statements up to a block terminator (`end`, `else`, `elseif`, `until`) or EOF.
    ///
    /// At the top level terminators have nothing to close and are reported.
    pub(super) fn parse_block(&mut self, top_level: bool) {
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::Block);

        let mut after_return = false;
        while !self.should_stop() {
            if self.currently_is_one_of(BLOCK_END) {
                if !top_level {
                    break;
                }
                let text = self.current_text();
                self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    format!("`{}` has no matching block", text),
                );
                continue;
            }

            if after_return {
                self.error(DiagnosticKind::StatementAfterReturn);
            }

            if self.currently_is(SyntaxKind::ReturnKw) {
                self.parse_return_stmt();
                after_return = true;
                continue;
            }

            self.parse_stmt();
        }

        self.finish_node();
        self.exit_recursion();
    }
}
