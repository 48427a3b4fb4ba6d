//! Streaming XML tokenizer
//!
//! Produces start/end/text tokens with namespace prefixes resolved. The
//! tokenizer checks well-formedness (matching end tags, quoting, entities)
//! but knows nothing about the subsystem grammar.

use tracing::trace;

use crate::config::Config;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::token::{QName, RawAttribute, StartTag, Token, TokenKind};
use crate::lexer::{Cursor, TokenSource};

const XMLNS: &str = "xmlns";
const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug)]
struct OpenElement {
    name: QName,
    /// Length of the binding stack before this element's declarations
    scope: usize,
}

#[derive(Debug)]
struct Binding {
    prefix: Option<String>,
    uri: String,
}

/// XML token stream over a byte slice
#[derive(Debug)]
pub struct XmlLexer<'a> {
    cursor: Cursor<'a>,
    input_len: usize,
    config: Config,
    open: Vec<OpenElement>,
    bindings: Vec<Binding>,
    pending_end: Option<Span>,
}

impl<'a> XmlLexer<'a> {
    /// Create a lexer with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a lexer with custom limits
    ///
    /// A leading UTF-8 byte order mark is skipped.
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        let input_len = input.len();
        let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            input_len,
            config,
            open: Vec::new(),
            bindings: Vec::new(),
            pending_end: None,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn next(&mut self) -> Result<Token> {
        if let Some(span) = self.pending_end.take() {
            return self.close_innermost(span);
        }

        loop {
            if self.open.is_empty() {
                self.cursor.skip_whitespace();
            }

            if self.cursor.is_eof() {
                let pos = self.cursor.position();
                return Ok(Token::eof(Span::at(pos)));
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                let start = self.cursor.position();
                self.cursor.advance_by(9);
                let text_start = self.cursor.pos();
                let text = loop {
                    if self.cursor.starts_with(b"]]>") {
                        let raw = self.cursor.slice_from(text_start);
                        let text = bytes_to_string(raw, start)?;
                        self.cursor.advance_by(3);
                        break text;
                    }
                    if self.cursor.is_eof() {
                        return Err(self.error_here("unterminated CDATA section"));
                    }
                    self.cursor.advance();
                };
                if text.trim().is_empty() {
                    continue;
                }
                let span = Span::new(start, self.cursor.position());
                return Ok(Token::new(TokenKind::Text(text), span));
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.starts_with(b"<!") {
                self.cursor.advance_by(2);
                self.skip_until(b">")?;
                continue;
            }

            if self.cursor.starts_with(b"</") {
                return self.parse_end_tag();
            }

            if self.cursor.current() == Some(b'<') {
                return self.parse_start_tag();
            }

            let start = self.cursor.position();
            let text = self.parse_text()?;
            if text.trim().is_empty() {
                continue;
            }
            let span = Span::new(start, self.cursor.position());
            return Ok(Token::new(TokenKind::Text(text), span));
        }
    }

    fn parse_start_tag(&mut self) -> Result<Token> {
        let start = self.cursor.position();
        self.cursor.advance();
        let raw_name = self.parse_name()?;
        let mut attributes = Vec::new();
        let mut declarations: Vec<Binding> = Vec::new();

        loop {
            let had_space = matches!(
                self.cursor.current(),
                Some(b' ' | b'\t' | b'\r' | b'\n')
            );
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if had_space => {}
                Some(_) => return Err(self.error_here("expected whitespace before attribute")),
                None => return Err(self.error_here("unexpected end of input in start tag")),
            }

            let attr_start = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;
            let span = Span::new(attr_start, self.cursor.position());

            let declared = if name == XMLNS {
                Some(None)
            } else {
                name.strip_prefix("xmlns:").map(|p| Some(p.to_string()))
            };
            match declared {
                Some(prefix) => {
                    if declarations.iter().any(|b| b.prefix == prefix) {
                        return Err(Error::new(
                            ErrorKind::DuplicateAttribute {
                                attribute: name,
                                element: raw_name,
                            },
                            span,
                        ));
                    }
                    declarations.push(Binding { prefix, uri: value });
                }
                None => attributes.push(RawAttribute::new(QName::parse(&name), value, span)),
            }
        }

        let self_closing = self.cursor.consume(b'/');
        self.expect_byte(b'>')?;
        let span = Span::new(start, self.cursor.position());

        let depth = self.open.len() + 1;
        if self.config.depth_exceeded(depth) {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                span,
            ));
        }

        let name = QName::parse(&raw_name);
        let scope = self.bindings.len();
        self.bindings.extend(declarations);
        let namespace = self.resolve(name.prefix.as_deref(), span)?;
        for attr in &attributes {
            if let Some(prefix) = attr.name.prefix.as_deref() {
                self.resolve(Some(prefix), attr.span)?;
            }
        }

        trace!(element = %name, depth, "start tag");
        self.open.push(OpenElement {
            name: name.clone(),
            scope,
        });
        if self_closing {
            self.pending_end = Some(Span::at(span.end));
        }

        Ok(Token::start(StartTag {
            name,
            namespace,
            attributes,
            span,
        }))
    }

    fn parse_end_tag(&mut self) -> Result<Token> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let raw_name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;
        let span = Span::new(start, self.cursor.position());

        let name = QName::parse(&raw_name);
        match self.open.last() {
            Some(open) if open.name == name => self.close_innermost(span),
            Some(open) => Err(Error::new(
                ErrorKind::MismatchedEndElement {
                    expected: open.name.to_string(),
                    found: raw_name,
                },
                span,
            )),
            None => Err(Error::new(
                ErrorKind::MismatchedEndElement {
                    expected: "(no open element)".to_string(),
                    found: raw_name,
                },
                span,
            )),
        }
    }

    fn close_innermost(&mut self, span: Span) -> Result<Token> {
        let Some(open) = self.open.pop() else {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                span,
                "end tag without open element",
            ));
        };
        self.bindings.truncate(open.scope);
        Ok(Token::new(TokenKind::EndElement(open.name), span))
    }

    /// Resolve a prefix against the in-scope declarations
    fn resolve(&self, prefix: Option<&str>, span: Span) -> Result<Option<String>> {
        let found = self
            .bindings
            .iter()
            .rev()
            .find(|b| b.prefix.as_deref() == prefix);
        match (found, prefix) {
            (Some(binding), _) if binding.uri.is_empty() => Ok(None),
            (Some(binding), _) => Ok(Some(binding.uri.clone())),
            (None, None) => Ok(None),
            (None, Some("xml")) => Ok(Some("http://www.w3.org/XML/1998/namespace".to_string())),
            (None, Some(prefix)) => Err(Error::with_message(
                ErrorKind::InvalidToken,
                span,
                format!("unbound namespace prefix '{prefix}'"),
            )),
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        let value_pos = self.cursor.position();
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw, value_pos)?;
                return decode_entities(&text, value_pos);
            }
            if b == b'<' {
                return Err(self.error_here("'<' not allowed in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw, pos)?;
        decode_entities(&text, pos)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::at(start_pos),
                "expected name",
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw, start_pos)
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(ErrorKind::InvalidToken, Span::at(pos), message)
    }
}

impl TokenSource for XmlLexer<'_> {
    fn next_token(&mut self) -> Result<Token> {
        if self.config.size_exceeded(self.input_len) {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::at(self.cursor.position()),
            ));
        }
        self.next()
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(ToString::to_string)
        .map_err(|_| Error::with_message(ErrorKind::InvalidToken, Span::at(pos), "invalid utf-8"))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::at(pos),
                    format!("invalid xml entity '&{entity}'"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
