//! Folio Error Handling
//!
//! Every failure in the pipeline (template syntax, portfolio configuration,
//! page evaluation, file I/O) is a [`FolioError`]. Errors are created through
//! the [`ErrorReporting`] trait, which each phase's context implements, so the
//! error code and source attachment stay consistent per phase.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::syntax::Span;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// A named piece of source text (a template or a portfolio file) that
/// errors can point into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Source context for text that did not come from a file.
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<inline>", content)
    }

    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type: what went wrong, where, and how to help.
#[derive(Debug)]
pub struct FolioError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

/// All failure kinds. The `Display` text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Template syntax
    #[error("directive is never closed with '>'")]
    UnterminatedDirective,
    #[error("directive cannot be empty")]
    EmptyDirective,
    #[error("template block must be closed with '}}'")]
    UnclosedBlock,
    #[error("'.' can only be used after a property")]
    MisplacedDot,
    #[error("'->' can only be used after a property")]
    MisplacedArrow,
    #[error("expected identifier after {after}")]
    MissingIdentifier { after: String },
    #[error("expected template block (enclosed with {{}}) in {construct}")]
    MissingBlock { construct: String },
    #[error("expected condition inside if tag")]
    MissingCondition,
    #[error("expected '>' at the end of {construct}")]
    MissingDirectiveEnd { construct: String },
    #[error("unexpected character '{found}' inside directive")]
    UnexpectedCharacter { found: char },
    #[error("stage parent must be an earlier property in the same sequence")]
    InvalidParent,

    // Portfolio configuration
    #[error("{message}")]
    MalformedConfig { message: String },
    #[error("unknown {object} attribute '{attribute}'")]
    UnknownAttribute { object: String, attribute: String },
    #[error("unknown setting '${setting}'")]
    UnknownSetting { setting: String },
    #[error("'${setting}' is set more than once")]
    DuplicateSetting { setting: String },
    #[error("portfolio is missing '${setting}'")]
    MissingSetting { setting: String },
    #[error("persona '{name}' would overwrite the page '{page}' of an earlier persona")]
    DuplicatePersona { name: String, page: String },

    // Evaluation
    #[error("unknown property '{name}'")]
    UnknownProperty { name: String },
    #[error("{record} has no property '{name}'")]
    UnknownField { record: String, name: String },
    #[error("property '{name}' is accessed on {parent}, which has no properties")]
    NotARecord { name: String, parent: String },
    #[error("given property can't be used as a list")]
    NotAList,
    #[error("if tags can only handle conditional arguments")]
    NotACondition,

    // I/O
    #[error("{action} '{path}': {message}")]
    Io {
        action: String,
        path: String,
        message: String,
    },
}

/// Where an error happened.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Option<Arc<NamedSource<String>>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Help text and the diagnostic code shown next to the message.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Config,
    Eval,
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Syntax => "Template error",
            ErrorCategory::Config => "Portfolio error",
            ErrorCategory::Eval => "Generator error",
            ErrorCategory::Io => "I/O error",
        };
        f.write_str(name)
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnterminatedDirective
            | Self::EmptyDirective
            | Self::UnclosedBlock
            | Self::MisplacedDot
            | Self::MisplacedArrow
            | Self::MissingIdentifier { .. }
            | Self::MissingBlock { .. }
            | Self::MissingCondition
            | Self::MissingDirectiveEnd { .. }
            | Self::UnexpectedCharacter { .. }
            | Self::InvalidParent => ErrorCategory::Syntax,

            Self::MalformedConfig { .. }
            | Self::UnknownAttribute { .. }
            | Self::UnknownSetting { .. }
            | Self::DuplicateSetting { .. }
            | Self::MissingSetting { .. }
            | Self::DuplicatePersona { .. } => ErrorCategory::Config,

            Self::UnknownProperty { .. }
            | Self::UnknownField { .. }
            | Self::NotARecord { .. }
            | Self::NotAList
            | Self::NotACondition => ErrorCategory::Eval,

            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnterminatedDirective => "unterminated_directive",
            Self::EmptyDirective => "empty_directive",
            Self::UnclosedBlock => "unclosed_block",
            Self::MisplacedDot => "misplaced_dot",
            Self::MisplacedArrow => "misplaced_arrow",
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::MissingBlock { .. } => "missing_block",
            Self::MissingCondition => "missing_condition",
            Self::MissingDirectiveEnd { .. } => "missing_directive_end",
            Self::UnexpectedCharacter { .. } => "unexpected_character",
            Self::InvalidParent => "invalid_parent",
            Self::MalformedConfig { .. } => "malformed",
            Self::UnknownAttribute { .. } => "unknown_attribute",
            Self::UnknownSetting { .. } => "unknown_setting",
            Self::DuplicateSetting { .. } => "duplicate_setting",
            Self::MissingSetting { .. } => "missing_setting",
            Self::DuplicatePersona { .. } => "duplicate_persona",
            Self::UnknownProperty { .. } => "unknown_property",
            Self::UnknownField { .. } => "unknown_field",
            Self::NotARecord { .. } => "not_a_record",
            Self::NotAList => "not_a_list",
            Self::NotACondition => "not_a_condition",
            Self::Io { .. } => "io",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Syntax => "here",
            ErrorCategory::Config => "in this part of the portfolio",
            ErrorCategory::Eval => "while rendering this",
            ErrorCategory::Io => "here",
        }
    }
}

impl FolioError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    /// An I/O failure that is not tied to any source text.
    pub fn io(action: &str, path: &Path, error: &std::io::Error) -> Self {
        let kind = ErrorKind::Io {
            action: action.into(),
            path: path.display().to_string(),
            message: error.to_string(),
        };
        let error_code = format!("folio::io::{}", kind.code_suffix());
        Self {
            kind,
            source_info: SourceInfo {
                source: None,
                primary_span: unspanned(),
                phase: "io".into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

impl std::error::Error for FolioError {}

impl fmt::Display for FolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.kind)
    }
}

impl Diagnostic for FolioError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source_info.source.as_ref()?;
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .source
            .as_deref()
            .map(|s| s as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR CREATION
// ============================================================================

/// Context-aware error creation. Each phase knows its source and its code prefix.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> FolioError;

    fn unknown_property(&self, name: &str, span: SourceSpan) -> FolioError {
        self.report(ErrorKind::UnknownProperty { name: name.into() }, span)
    }

    fn malformed(&self, message: impl Into<String>, span: SourceSpan) -> FolioError {
        self.report(
            ErrorKind::MalformedConfig {
                message: message.into(),
            },
            span,
        )
    }
}

/// A reporting context bound to one source and one phase name.
pub struct PhaseContext<'a> {
    pub source: &'a SourceContext,
    pub phase: &'static str,
}

impl<'a> PhaseContext<'a> {
    pub fn new(source: &'a SourceContext, phase: &'static str) -> Self {
        Self { source, phase }
    }
}

impl ErrorReporting for PhaseContext<'_> {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> FolioError {
        let error_code = format!("folio::{}::{}", self.phase, kind.code_suffix());
        FolioError {
            kind,
            source_info: SourceInfo {
                source: Some(self.source.to_named_source()),
                primary_span: span,
                phase: self.phase.into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Placeholder span for errors not tied to a source location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: FolioError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
