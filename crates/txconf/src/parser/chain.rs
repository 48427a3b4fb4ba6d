//! Per-version dispatch tables
//!
//! Each version's table is its predecessor's table plus the overrides that
//! version introduces, so a grammar change is written exactly once.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::error::Result;
use crate::lexer::StartTag;
use crate::parser::context::ParseContext;
use crate::parser::handlers;
use crate::schema::{Element, Version};

pub type Handler = fn(&mut ParseContext<'_>, &StartTag) -> Result<()>;

/// Top-level element handlers for one schema version
#[derive(Clone)]
pub struct HandlerTable {
    version: Version,
    entries: IndexMap<Element, Handler>,
}

impl HandlerTable {
    fn empty(version: Version) -> Self {
        Self {
            version,
            entries: IndexMap::new(),
        }
    }

    /// Same handlers, relabelled for the next version
    fn rebase(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Add or replace the handler for `element`
    fn with(mut self, element: Element, handler: Handler) -> Self {
        self.entries.insert(element, handler);
        self
    }

    fn build(version: Version) -> Self {
        let base = match version.previous() {
            Some(previous) => Self::build(previous).rebase(version),
            None => Self::empty(version),
        };
        match version {
            Version::V1_0 => base
                .with(Element::CoreEnvironment, handlers::core_environment_1_0)
                .with(Element::RecoveryEnvironment, handlers::recovery_environment_1_0)
                .with(Element::CoordinatorEnvironment, handlers::coordinator_environment_1_0)
                .with(Element::ObjectStore, handlers::object_store_1_0),
            Version::V1_1 => base
                .with(Element::CoreEnvironment, handlers::core_environment_1_1)
                .with(Element::RecoveryEnvironment, handlers::recovery_environment_1_1)
                .with(Element::CoordinatorEnvironment, handlers::coordinator_environment_1_1)
                .with(Element::Jts, handlers::jts),
            Version::V1_2 => {
                base.with(Element::CoordinatorEnvironment, handlers::coordinator_environment_1_2)
            }
            Version::V1_3 => base.with(Element::UseHornetqStore, handlers::use_hornetq_store_1_3),
            Version::V1_4 => base.with(Element::JdbcStore, handlers::jdbc_store_1_4),
            Version::V2_0 => {
                base.with(Element::CoordinatorEnvironment, handlers::coordinator_environment_2_0)
            }
            Version::V2_1 => base
                .with(Element::ObjectStore, handlers::object_store_2_1)
                .with(Element::UseHornetqStore, handlers::use_hornetq_store_ignored)
                .with(Element::HornetqStore, handlers::hornetq_store_2_1)
                .with(Element::JdbcStore, handlers::jdbc_store_2_1),
        }
    }

    /// Shared table for `version`, built on first use
    pub fn for_version(version: Version) -> &'static Self {
        static V1_0: OnceLock<HandlerTable> = OnceLock::new();
        static V1_1: OnceLock<HandlerTable> = OnceLock::new();
        static V1_2: OnceLock<HandlerTable> = OnceLock::new();
        static V1_3: OnceLock<HandlerTable> = OnceLock::new();
        static V1_4: OnceLock<HandlerTable> = OnceLock::new();
        static V2_0: OnceLock<HandlerTable> = OnceLock::new();
        static V2_1: OnceLock<HandlerTable> = OnceLock::new();

        let slot = match version {
            Version::V1_0 => &V1_0,
            Version::V1_1 => &V1_1,
            Version::V1_2 => &V1_2,
            Version::V1_3 => &V1_3,
            Version::V1_4 => &V1_4,
            Version::V2_0 => &V2_0,
            Version::V2_1 => &V2_1,
        };
        slot.get_or_init(|| Self::build(version))
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn get(&self, element: Element) -> Option<Handler> {
        self.entries.get(&element).copied()
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.entries.keys().copied()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("version", &self.version)
            .field("elements", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
