//! txconf - versioned transactions-subsystem configuration parser
//!
//! Reads a `subsystem` document in any supported
//! `urn:jboss:domain:transactions:X.Y` namespace and turns it into the
//! ordered list of `add` operations that configure the transaction manager.
//!
//! # Quick Start
//!
//! ```
//! use txconf::{parse_str, ParamValue, Resource};
//! # fn main() -> Result<(), txconf::Error> {
//! let ops = parse_str(
//!     r#"<subsystem xmlns="urn:jboss:domain:transactions:2.1">
//!            <object-store type="hornetq" path="tx-store"/>
//!        </subsystem>"#,
//! )?;
//! assert_eq!(ops.len(), 2);
//! let log_store = ops.find(Resource::LogStore);
//! assert_eq!(
//!     log_store.and_then(|op| op.get("log-store-type")),
//!     Some(&ParamValue::Token("hornetq".to_string()))
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub use config::Config;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;
pub use lexer::{Token, TokenBuffer, TokenKind, TokenSource, XmlLexer};

pub mod model;
pub use model::{Operation, OperationList, ParamValue, PathElement, Resource, ResourceAddress};

pub mod schema;
pub use schema::{Attribute, Element, Version};

pub mod parser;
pub use parser::Parser;

pub mod writer;
pub use writer::write_current;

use tracing::instrument;

/// Parse a subsystem document with the default limits
pub fn parse_str(s: &str) -> Result<OperationList> {
    parse_bytes(s.as_bytes())
}

/// Parse a subsystem document from bytes
#[instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn parse_bytes(bytes: &[u8]) -> Result<OperationList> {
    Parser::new(XmlLexer::new(bytes)).parse()
}

/// Parse with custom configuration
#[instrument(level = "debug", skip_all, fields(len = s.len(), max_depth = config.max_depth))]
pub fn parse_str_with_config(s: &str, config: Config) -> Result<OperationList> {
    Parser::new(XmlLexer::with_config(s.as_bytes(), config)).parse()
}

/// Parse from any token source, such as a [`TokenBuffer`]
#[instrument(level = "debug", skip_all)]
pub fn parse_tokens<S: TokenSource>(source: S) -> Result<OperationList> {
    Parser::new(source).parse()
}

/// Convenience re-exports
pub use parser::{HandlerTable, State as ParserState};
