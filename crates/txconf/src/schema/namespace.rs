//! Supported schema versions

use std::fmt;

const NAMESPACE_PREFIX: &str = "urn:jboss:domain:transactions:";

/// Schema generation, resolved once from the root element's namespace
///
/// Variants are declared oldest first; the derived ordering is the version
/// ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Version {
    #[cfg_attr(feature = "serde", serde(rename = "1.0"))]
    V1_0,
    #[cfg_attr(feature = "serde", serde(rename = "1.1"))]
    V1_1,
    #[cfg_attr(feature = "serde", serde(rename = "1.2"))]
    V1_2,
    #[cfg_attr(feature = "serde", serde(rename = "1.3"))]
    V1_3,
    #[cfg_attr(feature = "serde", serde(rename = "1.4"))]
    V1_4,
    #[cfg_attr(feature = "serde", serde(rename = "2.0"))]
    V2_0,
    #[cfg_attr(feature = "serde", serde(rename = "2.1"))]
    V2_1,
}

impl Version {
    /// Every supported version, oldest first
    pub const ALL: [Self; 7] = [
        Self::V1_0,
        Self::V1_1,
        Self::V1_2,
        Self::V1_3,
        Self::V1_4,
        Self::V2_0,
        Self::V2_1,
    ];

    /// Version written by [`crate::writer`]
    pub const CURRENT: Self = Self::V2_1;

    pub const fn label(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V2_0 => "2.0",
            Self::V2_1 => "2.1",
        }
    }

    pub const fn namespace(self) -> &'static str {
        match self {
            Self::V1_0 => "urn:jboss:domain:transactions:1.0",
            Self::V1_1 => "urn:jboss:domain:transactions:1.1",
            Self::V1_2 => "urn:jboss:domain:transactions:1.2",
            Self::V1_3 => "urn:jboss:domain:transactions:1.3",
            Self::V1_4 => "urn:jboss:domain:transactions:1.4",
            Self::V2_0 => "urn:jboss:domain:transactions:2.0",
            Self::V2_1 => "urn:jboss:domain:transactions:2.1",
        }
    }

    /// Exact match against the supported namespaces; no fallback
    pub fn from_namespace(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.namespace() == uri)
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::V1_0 => None,
            Self::V1_1 => Some(Self::V1_0),
            Self::V1_2 => Some(Self::V1_1),
            Self::V1_3 => Some(Self::V1_2),
            Self::V1_4 => Some(Self::V1_3),
            Self::V2_0 => Some(Self::V1_4),
            Self::V2_1 => Some(Self::V2_0),
        }
    }

    /// True when the namespace looks like ours but names an unknown version
    pub fn is_foreign_revision(uri: &str) -> bool {
        uri.starts_with(NAMESPACE_PREFIX) && Self::from_namespace(uri).is_none()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
