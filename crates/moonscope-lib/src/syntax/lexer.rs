//! Lexer for Lua sources.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. Unterminated long strings and long comments
//! extend to the end of input; the parser reports the former.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Post-processes the Logos output:
/// - A leading `#` line becomes a single `Shebang` token
/// - Coalesces consecutive lexer errors into single `Garbage` tokens
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let offset = if source.starts_with('#') {
        let end = source.find(['\r', '\n']).unwrap_or(source.len());
        tokens.push(Token::new(SyntaxKind::Shebang, range_to_text_range(0..end)));
        end
    } else {
        0
    };

    let mut lexer = SyntaxKind::lexer(&source[offset..]);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = offset + lexer.span().start;
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..end),
                    ));
                }

                let span = lexer.span();
                tokens.push(Token::new(
                    kind,
                    range_to_text_range(offset + span.start..offset + span.end),
                ));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(offset + lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

/// Level of a long bracket opener at the start of `text`: `[[` is 0, `[==[` is 2.
pub(crate) fn long_bracket_level(text: &str) -> Option<usize> {
    let rest = text.strip_prefix('[')?;
    let level = rest.bytes().take_while(|&b| b == b'=').count();
    (rest.as_bytes().get(level) == Some(&b'[')).then_some(level)
}

/// Closing delimiter for a long bracket of the given level.
pub(crate) fn long_bracket_close(level: usize) -> String {
    format!("]{}]", "=".repeat(level))
}

/// Whether a `LongString` token's text contains its closing bracket.
pub(crate) fn is_long_string_terminated(text: &str) -> bool {
    let Some(level) = long_bracket_level(text) else {
        return false;
    };
    let close = long_bracket_close(level);
    text.len() >= 2 * (level + 2) && text.ends_with(&close)
}

/// Consumes the body of a long string after its `[=*[` opener.
pub(super) fn lex_long_string(lex: &mut logos::Lexer<'_, SyntaxKind>) {
    let level = lex.slice().len() - 2;
    skip_long_bracket_body(lex, level);
}

/// Consumes a comment after its `--`: a long bracket body, or the rest of the line.
pub(super) fn lex_comment(lex: &mut logos::Lexer<'_, SyntaxKind>) {
    let rest = lex.remainder();
    if let Some(level) = long_bracket_level(rest) {
        lex.bump(level + 2);
        skip_long_bracket_body(lex, level);
        return;
    }
    let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
    lex.bump(line_end);
}

fn skip_long_bracket_body(lex: &mut logos::Lexer<'_, SyntaxKind>, level: usize) {
    let close = long_bracket_close(level);
    let rest = lex.remainder();
    let len = rest.find(&close).map_or(rest.len(), |pos| pos + close.len());
    lex.bump(len);
}
