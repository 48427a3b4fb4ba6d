//! Element vocabulary

use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::StartTag;
use crate::schema::namespace::Version;

/// Every element name the grammar knows, across all versions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Subsystem,
    CoreEnvironment,
    ProcessId,
    Uuid,
    Socket,
    RecoveryEnvironment,
    CoordinatorEnvironment,
    ObjectStore,
    Jts,
    UseHornetqStore,
    HornetqStore,
    JdbcStore,
    JdbcActionStore,
    JdbcStateStore,
    JdbcCommunicationStore,
}

impl Element {
    pub const ALL: [Self; 15] = [
        Self::Subsystem,
        Self::CoreEnvironment,
        Self::ProcessId,
        Self::Uuid,
        Self::Socket,
        Self::RecoveryEnvironment,
        Self::CoordinatorEnvironment,
        Self::ObjectStore,
        Self::Jts,
        Self::UseHornetqStore,
        Self::HornetqStore,
        Self::JdbcStore,
        Self::JdbcActionStore,
        Self::JdbcStateStore,
        Self::JdbcCommunicationStore,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Subsystem => "subsystem",
            Self::CoreEnvironment => "core-environment",
            Self::ProcessId => "process-id",
            Self::Uuid => "uuid",
            Self::Socket => "socket",
            Self::RecoveryEnvironment => "recovery-environment",
            Self::CoordinatorEnvironment => "coordinator-environment",
            Self::ObjectStore => "object-store",
            Self::Jts => "jts",
            Self::UseHornetqStore => "use-hornetq-store",
            Self::HornetqStore => "hornetq-store",
            Self::JdbcStore => "jdbc-store",
            Self::JdbcActionStore => "action",
            Self::JdbcStateStore => "state",
            Self::JdbcCommunicationStore => "communication",
        }
    }

    pub fn for_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Look up a child of `parent` by its local name
    pub fn lookup(tag: &StartTag, parent: &str) -> Result<Self> {
        Self::for_name(tag.local_name()).ok_or_else(|| unexpected(tag, parent))
    }

    /// Version in which a direct child of `subsystem` first appears
    ///
    /// `None` for the root and for nested elements. Each version's handler
    /// table must cover exactly the elements introduced at or before it.
    pub const fn top_level_since(self) -> Option<Version> {
        match self {
            Self::CoreEnvironment
            | Self::RecoveryEnvironment
            | Self::CoordinatorEnvironment
            | Self::ObjectStore => Some(Version::V1_0),
            Self::Jts => Some(Version::V1_1),
            Self::UseHornetqStore => Some(Version::V1_3),
            Self::JdbcStore => Some(Version::V1_4),
            Self::HornetqStore => Some(Version::V2_1),
            Self::Subsystem
            | Self::ProcessId
            | Self::Uuid
            | Self::Socket
            | Self::JdbcActionStore
            | Self::JdbcStateStore
            | Self::JdbcCommunicationStore => None,
        }
    }

    /// Direct children of `subsystem` legal in `version`
    pub fn top_level_in(version: Version) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |e| e.top_level_since().is_some_and(|since| since <= version))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an element that is not legal inside `context`
pub fn unexpected(tag: &StartTag, context: &str) -> Error {
    Error::new(
        ErrorKind::UnexpectedElement {
            element: tag.name.to_string(),
            context: context.to_string(),
        },
        tag.span,
    )
}
