//! Error types for parsing, validation and output

use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::encoder::OutputFormat;
use crate::parser::lexer::Describe;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors returned by the conversion pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied option failed validation
    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// The requested output format is not one of png, jpg, jpeg, gif, webp
    #[error("unsupported output format '{0}' (expected one of png, jpg, jpeg, gif, webp)")]
    UnsupportedFormat(String),

    /// The SVG text could not be turned into a scene tree
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Writing the output file failed
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer aborted while painting the document
    #[error("rendering failed: {0}")]
    Render(String),

    /// The image codec rejected the pixel data
    #[error("failed to encode {format} image: {source}")]
    Encode {
        format: OutputFormat,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    /// Create an invalid option error
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error for the given output path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Name of the offending option, for invalid option errors
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::InvalidOption { option, .. } => Some(option),
            _ => None,
        }
    }
}

/// Errors raised while building the scene tree from SVG text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed XML: {message}")]
    Xml { message: String, span: Span },

    #[error("root element is <{found}>, expected <svg>")]
    NotSvg { found: String, span: Span },

    #[error("root <svg> is not in the SVG namespace; add xmlns=\"http://www.w3.org/2000/svg\"")]
    MissingNamespace { span: Span },

    #[error("invalid {attribute} on <{element}>: {message}")]
    Syntax {
        element: String,
        attribute: String,
        message: String,
        expected: Vec<String>,
        span: Span,
    },

    #[error("invalid {attribute} '{value}' on <{element}>: {reason}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        reason: String,
        span: Span,
    },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: String,
        span: Span,
    },

    /// Rejected by the SVG tree builder after the structural checks passed
    #[error("invalid SVG: {message}")]
    Svg { message: String, span: Span },
}

impl ParseError {
    /// Byte range of the offending text in the SVG source
    pub fn span(&self) -> &Span {
        match self {
            Self::Xml { span, .. }
            | Self::NotSvg { span, .. }
            | Self::MissingNamespace { span }
            | Self::Syntax { span, .. }
            | Self::InvalidAttribute { span, .. }
            | Self::MissingAttribute { span, .. }
            | Self::Svg { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let label = match self {
            Self::Syntax {
                message, expected, ..
            } if !expected.is_empty() => {
                format!("{}\nExpected: {}", message, expected.join(", "))
            }
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(report)) => report,
            _ => self.to_string(),
        }
    }
}

/// A micro-syntax error inside a single attribute value
///
/// Spans are relative to the attribute value; the tree builder rebases them
/// onto the document when wrapping the error in [`ParseError::Syntax`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// Attach element context and shift the span by `offset` bytes
    pub fn into_parse_error(self, element: &str, attribute: &str, offset: usize) -> ParseError {
        ParseError::Syntax {
            element: element.to_string(),
            attribute: attribute.to_string(),
            message: self.message,
            expected: self.expected,
            span: (self.span.start + offset)..(self.span.end + offset),
        }
    }
}

impl<'a, T: Describe> From<Rich<'a, T>> for SyntaxError {
    fn from(err: Rich<'a, T>) -> Self {
        let message = match err.reason() {
            RichReason::Custom(msg) => msg.to_string(),
            _ => match err.found() {
                Some(tok) => format!("Unexpected {}", tok.describe()),
                None => "Unexpected end of input".to_string(),
            },
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(tok.describe()),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        SyntaxError {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}
