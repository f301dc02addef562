use rowan::TextRange;

/// Diagnostic kinds, root causes first.
///
/// The declaration order breaks ties between diagnostics starting at the same
/// position (see `Diagnostics::sorted`):
/// - Unclosed constructs swallow the rest of the file
/// - Expected-token errors are root causes the user should fix first
/// - Dialect and lexical violations are local mistakes
/// - Semantic errors assume valid syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // These cause cascading errors throughout the rest of the file
    UnclosedBlock,
    UnclosedParen,
    UnclosedBrace,
    UnclosedBracket,
    UnfinishedLongString,

    // User omitted something required - root cause errors
    ExpectedExpression,
    ExpectedName,
    ExpectedToken,

    // User wrote something that doesn't belong
    UnexpectedToken,
    MalformedNumber,
    InvalidIdentifier,
    UnsupportedSyntax,
    UnknownAttribute,
    StatementAfterReturn,

    // Valid syntax, invalid semantics
    DuplicateLabel,
    UndefinedLabel,
    BreakOutsideLoop,

    // Lints
    UnusedLabel,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedLabel => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBlock => "missing closing `end`",
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnclosedBracket => "missing closing `]`",
            Self::UnfinishedLongString => "unfinished long string",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedName => "expected a name",
            Self::ExpectedToken => "expected token",

            Self::UnexpectedToken => "unexpected token",
            Self::MalformedNumber => "malformed number",
            Self::InvalidIdentifier => "invalid identifier",
            Self::UnsupportedSyntax => "syntax not supported by this dialect",
            Self::UnknownAttribute => "unknown attribute",
            Self::StatementAfterReturn => "`return` must be the last statement of its block",

            Self::DuplicateLabel => "duplicate label",
            Self::UndefinedLabel => "no visible label for `goto`",
            Self::BreakOutsideLoop => "`break` outside a loop",

            Self::UnusedLabel => "label is never jumped to",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::ExpectedToken => "expected {}".to_string(),
            Self::MalformedNumber => "malformed number `{}`".to_string(),
            Self::InvalidIdentifier => "`{}` is not a valid identifier in this dialect".to_string(),
            Self::UnsupportedSyntax => "{} is not supported by this dialect".to_string(),
            Self::UnknownAttribute => "unknown attribute `{}`".to_string(),
            Self::DuplicateLabel => "label `{}` is already defined".to_string(),
            Self::UndefinedLabel => "no visible label `{}` for `goto`".to_string(),
            Self::BreakOutsideLoop => "`{}` outside a loop".to_string(),
            Self::UnusedLabel => "label `{}` is never jumped to".to_string(),

            Self::UnclosedBlock
            | Self::UnclosedParen
            | Self::UnclosedBrace
            | Self::UnclosedBracket => format!("{}; {{}}", self.fallback_message()),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
