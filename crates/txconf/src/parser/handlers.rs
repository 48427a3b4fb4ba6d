//! Handlers for the direct children of `subsystem`
//!
//! Each handler is entered with the child's start tag already consumed and
//! returns after consuming its end tag.

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::StartTag;
use crate::parser::context::ParseContext;
use crate::schema::definition::{
    AttributeDefinition, COORDINATOR_ENVIRONMENT_1_0, COORDINATOR_ENVIRONMENT_1_1,
    COORDINATOR_ENVIRONMENT_1_2, COORDINATOR_ENVIRONMENT_2_0, CORE_ENVIRONMENT, HORNETQ_STORE,
    JDBC_ACTION_STORE, JDBC_COMMUNICATION_STORE, JDBC_STATE_STORE, JDBC_STORE, OBJECT_STORE_1_0,
    OBJECT_STORE_2_1, PROCESS_ID_SOCKET, RECOVERY_ENVIRONMENT_1_0, RECOVERY_ENVIRONMENT_1_1,
    USE_HORNETQ_STORE_IGNORED,
};
use crate::schema::element::{self, Element};

fn leaf(
    cx: &mut ParseContext<'_>,
    tag: &StartTag,
    element: Element,
    definitions: &[AttributeDefinition],
) -> Result<()> {
    cx.apply(tag, element, definitions)?;
    cx.reader.require_no_content(tag)
}

pub fn core_environment_1_0(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::CoreEnvironment, CORE_ENVIRONMENT)
}

/// `core-environment` with its mandatory `process-id` child
pub fn core_environment_1_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    cx.apply(tag, Element::CoreEnvironment, CORE_ENVIRONMENT)?;

    let mut seen_process_id = false;
    while let Some(child) = cx.reader.next_child(tag)? {
        match Element::lookup(&child, tag.local_name())? {
            Element::ProcessId if !seen_process_id => {
                seen_process_id = true;
                process_id(cx, &child)?;
            }
            _ => return Err(element::unexpected(&child, tag.local_name())),
        }
    }

    if !seen_process_id {
        return Err(Error::new(
            ErrorKind::MissingRequiredContent {
                element: Element::CoreEnvironment.name().to_string(),
                expected: Element::ProcessId.name().to_string(),
            },
            tag.span,
        ));
    }
    Ok(())
}

fn process_id(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    cx.apply(tag, Element::ProcessId, &[])?;

    let mut chosen: Option<Element> = None;
    while let Some(child) = cx.reader.next_child(tag)? {
        let branch = Element::lookup(&child, tag.local_name())?;
        if chosen.is_some() {
            return Err(element::unexpected(&child, tag.local_name()));
        }
        match branch {
            Element::Uuid => {
                leaf(cx, &child, Element::Uuid, &[])?;
                cx.set_flag("process-id-uuid", &child)?;
            }
            Element::Socket => leaf(cx, &child, Element::Socket, PROCESS_ID_SOCKET)?,
            _ => return Err(element::unexpected(&child, tag.local_name())),
        }
        chosen = Some(branch);
    }

    match chosen {
        Some(branch) => {
            debug!(%branch, "process id");
            Ok(())
        }
        None => Err(Error::new(
            ErrorKind::MissingRequiredContent {
                element: Element::ProcessId.name().to_string(),
                expected: format!("one of {}, {}", Element::Uuid, Element::Socket),
            },
            tag.span,
        )),
    }
}

pub fn recovery_environment_1_0(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::RecoveryEnvironment, RECOVERY_ENVIRONMENT_1_0)
}

pub fn recovery_environment_1_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::RecoveryEnvironment, RECOVERY_ENVIRONMENT_1_1)
}

pub fn coordinator_environment_1_0(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::CoordinatorEnvironment, COORDINATOR_ENVIRONMENT_1_0)
}

pub fn coordinator_environment_1_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::CoordinatorEnvironment, COORDINATOR_ENVIRONMENT_1_1)
}

pub fn coordinator_environment_1_2(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::CoordinatorEnvironment, COORDINATOR_ENVIRONMENT_1_2)
}

pub fn coordinator_environment_2_0(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::CoordinatorEnvironment, COORDINATOR_ENVIRONMENT_2_0)
}

pub fn object_store_1_0(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::ObjectStore, OBJECT_STORE_1_0)
}

pub fn object_store_2_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::ObjectStore, OBJECT_STORE_2_1)
}

pub fn jts(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::Jts, &[])?;
    cx.set_flag("jts", tag)
}

pub fn use_hornetq_store_1_3(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    cx.claim_store_backend(Element::UseHornetqStore, tag)?;
    leaf(cx, tag, Element::UseHornetqStore, HORNETQ_STORE)?;
    cx.set_flag("use-hornetq-store", tag)
}

/// Validated, then dropped
pub fn use_hornetq_store_ignored(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    leaf(cx, tag, Element::UseHornetqStore, USE_HORNETQ_STORE_IGNORED)?;
    debug!(version = %cx.version, "ignoring deprecated use-hornetq-store");
    Ok(())
}

pub fn hornetq_store_2_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    cx.claim_store_backend(Element::HornetqStore, tag)?;
    leaf(cx, tag, Element::HornetqStore, HORNETQ_STORE)
}

pub fn jdbc_store_1_4(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    jdbc_store(cx, tag, true)
}

pub fn jdbc_store_2_1(cx: &mut ParseContext<'_>, tag: &StartTag) -> Result<()> {
    jdbc_store(cx, tag, false)
}

fn jdbc_store(cx: &mut ParseContext<'_>, tag: &StartTag, mark_in_use: bool) -> Result<()> {
    cx.claim_store_backend(Element::JdbcStore, tag)?;
    cx.apply(tag, Element::JdbcStore, JDBC_STORE)?;
    if mark_in_use {
        cx.set_flag("use-jdbc-store", tag)?;
    }

    let mut seen: Vec<Element> = Vec::with_capacity(3);
    while let Some(child) = cx.reader.next_child(tag)? {
        let store = Element::lookup(&child, tag.local_name())?;
        let definitions = match store {
            Element::JdbcActionStore => JDBC_ACTION_STORE,
            Element::JdbcStateStore => JDBC_STATE_STORE,
            Element::JdbcCommunicationStore => JDBC_COMMUNICATION_STORE,
            _ => return Err(element::unexpected(&child, tag.local_name())),
        };
        if seen.contains(&store) {
            return Err(element::unexpected(&child, tag.local_name()));
        }
        seen.push(store);
        leaf(cx, &child, store, definitions)?;
    }
    Ok(())
}
