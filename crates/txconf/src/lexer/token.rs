//! Structural token types

use std::fmt;

use crate::error::Span;

/// Qualified element or attribute name
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    /// Unprefixed name
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Split `prefix:local` at the first colon
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self::local(raw),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Attribute as read from a start tag
#[derive(Clone, Debug, PartialEq)]
pub struct RawAttribute {
    pub name: QName,
    pub value: String,
    pub span: Span,
}

impl RawAttribute {
    pub fn new(name: QName, value: impl Into<String>, span: Span) -> Self {
        Self {
            name,
            value: value.into(),
            span,
        }
    }
}

/// Start tag with resolved namespace and its attributes
///
/// Namespace declarations are not part of `attributes`.
#[derive(Clone, Debug, PartialEq)]
pub struct StartTag {
    pub name: QName,
    pub namespace: Option<String>,
    pub attributes: Vec<RawAttribute>,
    pub span: Span,
}

impl StartTag {
    pub fn new(name: QName, namespace: Option<String>, span: Span) -> Self {
        Self {
            name,
            namespace,
            attributes: Vec::new(),
            span,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .push(RawAttribute::new(QName::parse(name), value, self.span));
        self
    }

    pub fn local_name(&self) -> &str {
        &self.name.local
    }
}

/// Structural token kinds
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    StartElement(StartTag),
    EndElement(QName),
    /// Non-whitespace character data
    Text(String),
    Eof,
}

impl TokenKind {
    /// Get token name for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::StartElement(tag) => format!("element '{}'", tag.name),
            Self::EndElement(name) => format!("end of '{name}'"),
            Self::Text(_) => "text".to_string(),
            Self::Eof => "end of document".to_string(),
        }
    }
}

/// Token with source location
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub const fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            span,
        }
    }

    pub fn start(tag: StartTag) -> Self {
        let span = tag.span;
        Self::new(TokenKind::StartElement(tag), span)
    }

    pub fn end(name: &str, span: Span) -> Self {
        Self::new(TokenKind::EndElement(QName::parse(name)), span)
    }
}
