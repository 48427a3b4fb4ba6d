//! Subsystem parser: version resolution and top-level dispatch

pub mod chain;
pub mod context;
pub mod handlers;
pub mod reader;

pub use chain::{Handler, HandlerTable};
pub use context::ParseContext;
pub use reader::ElementReader;

use tracing::{debug, trace};

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{StartTag, TokenKind, TokenSource};
use crate::model::{OperationList, Resource};
use crate::schema::element;
use crate::schema::{apply_attributes, Element, Version};

/// Driver progress, logged on every transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Start,
    ResolvingVersion,
    DispatchingElements,
    Done,
    Failed,
}

/// One-shot parser over a token source
///
/// Consumes the root `subsystem` element and produces the subsystem and
/// log-store `add` operations.
pub struct Parser<S: TokenSource> {
    source: S,
    state: State,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: State::Start,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn transition(&mut self, next: State) {
        debug!(from = ?self.state, to = ?next, "parser state");
        self.state = next;
    }

    pub fn parse(mut self) -> Result<OperationList> {
        let outcome = self.run();
        match &outcome {
            Ok(_) => self.transition(State::Done),
            Err(err) => {
                debug!(error = %err, "parse failed");
                self.transition(State::Failed);
            }
        }
        outcome
    }

    fn run(&mut self) -> Result<OperationList> {
        self.transition(State::ResolvingVersion);
        let root = self.read_root()?;
        let version = resolve_version(&root)?;
        debug!(%version, "resolved schema version");

        self.transition(State::DispatchingElements);
        let table = HandlerTable::for_version(version);
        let operations = {
            let reader = ElementReader::new(&mut self.source, version.namespace());
            let mut cx = ParseContext::new(reader, version);
            cx.builder.operation_for(Resource::Subsystem.address());
            cx.builder.operation_for(Resource::LogStore.address());
            apply_attributes(&root, Element::Subsystem, &[], &mut cx.builder)?;
            dispatch(&mut cx, &root, table)?;
            cx.builder.finish()
        };

        let trailing = self.source.next_token()?;
        match trailing.kind {
            TokenKind::Eof => Ok(operations),
            kind => Err(Error::new(
                ErrorKind::UnexpectedContent {
                    element: root.name.to_string(),
                    found: format!("{} after the root element", kind.describe()),
                },
                trailing.span,
            )),
        }
    }

    fn read_root(&mut self) -> Result<StartTag> {
        let token = self.source.next_token()?;
        match token.kind {
            TokenKind::StartElement(tag) => Ok(tag),
            TokenKind::Eof => Err(Error::with_message(
                ErrorKind::TruncatedInput {
                    open: Element::Subsystem.name().to_string(),
                },
                token.span,
                "document has no root element",
            )),
            kind => Err(Error::new(
                ErrorKind::UnexpectedContent {
                    element: "document".to_string(),
                    found: kind.describe(),
                },
                token.span,
            )),
        }
    }
}

/// The namespace selects the version; the root must be `subsystem`
fn resolve_version(root: &StartTag) -> Result<Version> {
    let namespace = root.namespace.clone().unwrap_or_default();
    let Some(version) = Version::from_namespace(&namespace) else {
        let message = if Version::is_foreign_revision(&namespace) {
            format!("unsupported schema version: namespace '{namespace}' is not a known revision")
        } else {
            format!("unsupported schema version: namespace '{namespace}'")
        };
        return Err(Error::with_message(
            ErrorKind::UnsupportedSchemaVersion { namespace },
            root.span,
            message,
        ));
    };
    if root.local_name() != Element::Subsystem.name() {
        return Err(element::unexpected(root, "document"));
    }
    Ok(version)
}

fn dispatch(cx: &mut ParseContext<'_>, root: &StartTag, table: &HandlerTable) -> Result<()> {
    let mut seen: Vec<Element> = Vec::new();
    while let Some(child) = cx.reader.next_child(root)? {
        let element = Element::lookup(&child, root.local_name())?;
        if seen.contains(&element) {
            return Err(element::unexpected(&child, root.local_name()));
        }
        let Some(handler) = table.get(element) else {
            return Err(element::unexpected(&child, root.local_name()));
        };
        trace!(%element, version = %table.version(), "dispatch");
        seen.push(element);
        handler(cx, &child)?;
    }
    Ok(())
}
