//! Child-element traversal over a token source

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{StartTag, TokenKind, TokenSource};
use crate::schema::element;

/// Reads the children of an open element, one start tag at a time
///
/// Every child must live in the document's root namespace.
pub struct ElementReader<'s> {
    source: &'s mut dyn TokenSource,
    namespace: &'static str,
}

impl<'s> ElementReader<'s> {
    pub fn new(source: &'s mut dyn TokenSource, namespace: &'static str) -> Self {
        Self { source, namespace }
    }

    /// Next child of `parent`, or `None` once `parent` is closed
    pub fn next_child(&mut self, parent: &StartTag) -> Result<Option<StartTag>> {
        let token = self.source.next_token()?;
        match token.kind {
            TokenKind::StartElement(tag) => {
                self.check_namespace(&tag, parent)?;
                Ok(Some(tag))
            }
            TokenKind::EndElement(name) if name == parent.name => Ok(None),
            TokenKind::EndElement(name) => Err(Error::new(
                ErrorKind::MismatchedEndElement {
                    expected: parent.name.to_string(),
                    found: name.to_string(),
                },
                token.span,
            )),
            kind @ TokenKind::Text(_) => Err(Error::new(
                ErrorKind::UnexpectedContent {
                    element: parent.name.to_string(),
                    found: kind.describe(),
                },
                token.span,
            )),
            TokenKind::Eof => Err(Error::new(
                ErrorKind::TruncatedInput {
                    open: parent.name.to_string(),
                },
                token.span,
            )),
        }
    }

    /// Consume the end of a leaf element
    pub fn require_no_content(&mut self, tag: &StartTag) -> Result<()> {
        match self.next_child(tag)? {
            None => Ok(()),
            Some(child) => Err(Error::new(
                ErrorKind::UnexpectedContent {
                    element: tag.name.to_string(),
                    found: format!("element '{}'", child.name),
                },
                child.span,
            )),
        }
    }

    fn check_namespace(&self, tag: &StartTag, parent: &StartTag) -> Result<()> {
        if tag.namespace.as_deref() == Some(self.namespace) {
            Ok(())
        } else {
            Err(element::unexpected(tag, parent.local_name()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::{QName, Token, TokenBuffer};

    const NS: &str = "urn:jboss:domain:transactions:2.1";

    fn tag(name: &str, namespace: Option<&str>) -> StartTag {
        StartTag::new(QName::parse(name), namespace.map(str::to_string), Span::empty())
    }

    #[test]
    fn test_children_then_close() -> Result<()> {
        let parent = tag("jdbc-store", Some(NS));
        let mut buffer = TokenBuffer::new([
            Token::start(tag("action", Some(NS))),
            Token::end("action", Span::empty()),
            Token::end("jdbc-store", Span::empty()),
        ]);
        let mut reader = ElementReader::new(&mut buffer, NS);
        let child = reader.next_child(&parent)?;
        assert_eq!(child.as_ref().map(StartTag::local_name), Some("action"));
        if let Some(child) = child {
            reader.require_no_content(&child)?;
        }
        assert!(reader.next_child(&parent)?.is_none());
        Ok(())
    }

    #[test]
    fn test_foreign_namespace_child_rejected() {
        let parent = tag("subsystem", Some(NS));
        let mut buffer = TokenBuffer::new([Token::start(tag("jts", Some("urn:other")))]);
        let mut reader = ElementReader::new(&mut buffer, NS);
        let err = reader.next_child(&parent).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnexpectedElement { element, .. }) if element == "jts"
        ));
    }

    #[test]
    fn test_text_in_leaf_rejected() {
        let leaf = tag("jts", Some(NS));
        let mut buffer = TokenBuffer::new([Token::new(TokenKind::Text("on".into()), Span::empty())]);
        let mut reader = ElementReader::new(&mut buffer, NS);
        let err = reader.require_no_content(&leaf).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnexpectedContent { element, .. }) if element == "jts"
        ));
    }

    #[test]
    fn test_eof_is_truncation() {
        let parent = tag("subsystem", Some(NS));
        let mut buffer = TokenBuffer::new([]);
        let mut reader = ElementReader::new(&mut buffer, NS);
        let err = reader.next_child(&parent).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::TruncatedInput {
                open: "subsystem".to_string()
            })
        );
    }
}
