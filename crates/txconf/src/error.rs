//! Error types for txconf

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
///
/// Every kind is terminal for the parse that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Root namespace is not one of the supported schema versions
    UnsupportedSchemaVersion { namespace: String },
    /// Element is not legal at this point for the active version
    UnexpectedElement { element: String, context: String },
    /// Attribute is not recognized on its host element
    UnknownAttribute { attribute: String, element: String },
    /// Attribute occurs more than once on one element
    DuplicateAttribute { attribute: String, element: String },
    /// Attribute value lies outside its value domain
    InvalidAttributeValue {
        attribute: String,
        value: String,
        expected: String,
    },
    /// One or more required attributes are absent
    MissingRequiredAttribute {
        attributes: Vec<String>,
        element: String,
    },
    /// Element is empty where child content is mandatory
    MissingRequiredContent { element: String, expected: String },
    /// Leaf element carries children or text
    UnexpectedContent { element: String, found: String },
    /// Document ended while elements were still open
    TruncatedInput { open: String },
    /// End tag does not close the innermost open element
    MismatchedEndElement { expected: String, found: String },
    /// Parameter was already written within this parse
    ParameterConflict { parameter: String, address: String },
    /// Malformed markup
    InvalidToken,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSchemaVersion { namespace } => {
                write!(f, "unsupported schema version: namespace '{namespace}'")
            }
            Self::UnexpectedElement { element, context } => {
                write!(f, "unexpected element '{element}' in '{context}'")
            }
            Self::UnknownAttribute { attribute, element } => {
                write!(f, "unknown attribute '{attribute}' on '{element}'")
            }
            Self::DuplicateAttribute { attribute, element } => {
                write!(f, "duplicate attribute '{attribute}' on '{element}'")
            }
            Self::InvalidAttributeValue {
                attribute,
                value,
                expected,
            } => write!(
                f,
                "invalid value '{value}' for attribute '{attribute}': expected {expected}"
            ),
            Self::MissingRequiredAttribute {
                attributes,
                element,
            } => write!(
                f,
                "missing required attribute(s) {} on '{element}'",
                attributes.join(", ")
            ),
            Self::MissingRequiredContent { element, expected } => {
                write!(f, "element '{element}' requires content: {expected}")
            }
            Self::UnexpectedContent { element, found } => {
                write!(f, "element '{element}' must be empty, found {found}")
            }
            Self::TruncatedInput { open } => {
                write!(f, "unexpected end of document inside '{open}'")
            }
            Self::MismatchedEndElement { expected, found } => {
                write!(f, "expected end of '{expected}', found end of '{found}'")
            }
            Self::ParameterConflict { parameter, address } => {
                write!(f, "parameter '{parameter}' of {address} is already set")
            }
            Self::InvalidToken => write!(f, "invalid token"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for txconf
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for txconf
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert_eq!(err.span().start.line, 1);
    }

    #[test]
    fn test_error_display_names_attribute() {
        let err = Error::at(
            ErrorKind::MissingRequiredAttribute {
                attributes: vec!["socket-binding".to_string()],
                element: "recovery-environment".to_string(),
            },
            10,
            2,
            5,
        );
        let display = err.to_string();
        assert!(display.starts_with("error at 2:5"));
        assert!(display.contains("socket-binding"));
        assert!(display.contains("recovery-environment"));
    }

    #[test]
    fn test_custom_message_kept() {
        let err = Error::with_message(ErrorKind::InvalidToken, Span::empty(), "unterminated comment");
        assert_eq!(err.message(), "unterminated comment");
    }
}
