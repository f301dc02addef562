use moonscope_core::is_valid_identifier;

use crate::diagnostics::DiagnosticKind;
use crate::syntax::core::Parser;

impl Parser<'_> {
    /// Check the current identifier against the dialect's character set and keywords.
    pub(super) fn validate_identifier(&mut self) {
        let text = self.current_text();
        if is_valid_identifier(text, &self.options) {
            return;
        }
        let span = self.current_span();
        let suggested: String = text
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if is_valid_identifier(&suggested, &self.options) && suggested != text {
            self.error_with_fix(
                DiagnosticKind::InvalidIdentifier,
                span,
                text,
                format!("use `{}`", suggested),
                suggested,
            );
        } else {
            self.error_at_msg(DiagnosticKind::InvalidIdentifier, span, text);
        }
    }
}

/// Whether `text` is a well-formed Lua numeral.
///
/// Accepts decimal integers and floats with optional exponent, and
/// hexadecimal numerals with optional fraction and binary exponent.
pub(crate) fn is_valid_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return is_valid_mantissa(hex.as_bytes(), |b| b.is_ascii_hexdigit(), b"pP");
    }
    is_valid_mantissa(bytes, |b| b.is_ascii_digit(), b"eE")
}

fn is_valid_mantissa(bytes: &[u8], is_digit: impl Fn(u8) -> bool, exponent: &[u8]) -> bool {
    let mut i = 0;
    let mut digits = 0;
    while i < bytes.len() && is_digit(bytes[i]) {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && is_digit(bytes[i]) {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return false;
    }
    if i < bytes.len() && exponent.contains(&bytes[i]) {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == bytes.len()
}
