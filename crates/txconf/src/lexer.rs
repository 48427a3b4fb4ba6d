//! Token stream: the parser's only view of the input document

pub mod buffer;
pub mod cursor;
pub mod token;
pub mod xml;

pub use buffer::TokenBuffer;
pub use cursor::Cursor;
pub use token::{QName, RawAttribute, StartTag, Token, TokenKind};
pub use xml::XmlLexer;

use crate::error::Result;

/// A source of structural tokens
///
/// After `Eof` has been returned, further calls keep returning `Eof`.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Token> {
        (**self).next_token()
    }
}
