//! Vector-backed token source

use std::collections::VecDeque;

use crate::error::{Result, Span};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::TokenSource;

/// Replays a token sequence produced elsewhere
#[derive(Clone, Debug, Default)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
    end: Span,
}

impl TokenBuffer {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens: VecDeque<Token> = tokens.into_iter().collect();
        let end = tokens.back().map(|t| Span::at(t.span.end)).unwrap_or_default();
        Self { tokens, end }
    }

    /// Drain another source up to and including its `Eof`
    pub fn record<S: TokenSource>(mut source: S) -> Result<Self> {
        let mut tokens = Vec::new();
        loop {
            let token = source.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(Self::new(tokens));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Result<Token> {
        Ok(self
            .tokens
            .pop_front()
            .unwrap_or_else(|| Token::eof(self.end)))
    }
}
