//! Compact source emission: trivia dropped, spaces only where needed.

use logos::Logos;

use crate::syntax::{SyntaxKind, SyntaxTree};

/// Print `tree` without whitespace or comments.
///
/// Two adjacent tokens are separated by one space when gluing them would
/// lex differently (`local a`, `1 ..`, `- -`). A shebang line is kept.
pub fn emit(tree: &SyntaxTree) -> String {
    let mut out = String::with_capacity(tree.text().len());
    let mut prev: Option<String> = None;

    for token in tree
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
    {
        if token.kind() == SyntaxKind::Shebang {
            out.push_str(token.text());
            out.push('\n');
            continue;
        }
        if token.kind().is_trivia() {
            continue;
        }

        let text = token.text();
        if let Some(prev) = &prev
            && !lexes_apart(prev, text)
        {
            out.push(' ');
        }
        out.push_str(text);
        prev = Some(text.to_owned());
    }

    out
}

/// Whether `left` immediately followed by `right` lexes back into exactly these two tokens.
fn lexes_apart(left: &str, right: &str) -> bool {
    let glued = format!("{left}{right}");
    let mut lexer = SyntaxKind::lexer(&glued);

    let first = matches!(lexer.next(), Some(Ok(_))) && lexer.span() == (0..left.len());
    if !first {
        return false;
    }
    let second = matches!(lexer.next(), Some(Ok(_))) && lexer.span() == (left.len()..glued.len());
    second && lexer.next().is_none()
}
