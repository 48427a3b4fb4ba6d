//! Resource addresses

use std::fmt;

pub const SUBSYSTEM: &str = "subsystem";
pub const SUBSYSTEM_NAME: &str = "transactions";
pub const LOG_STORE: &str = "log-store";

/// One `(type, name)` segment of an address
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered path identifying a resource in the management model
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ResourceAddress(Vec<PathElement>);

impl ResourceAddress {
    /// The empty (model root) address
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Child address one segment below this one
    pub fn append(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathElement::new(key, value));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}={}", segment.key, segment.value)?;
        }
        Ok(())
    }
}

/// The resources a subsystem document can populate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Subsystem,
    LogStore,
}

impl Resource {
    pub fn address(self) -> ResourceAddress {
        let subsystem = ResourceAddress::root().append(SUBSYSTEM, SUBSYSTEM_NAME);
        match self {
            Self::Subsystem => subsystem,
            Self::LogStore => subsystem.append(LOG_STORE, LOG_STORE),
        }
    }
}
