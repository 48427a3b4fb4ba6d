//! Attribute vocabulary

use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::RawAttribute;
use crate::schema::element::Element;

/// Every attribute name the grammar knows, across all versions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    NodeIdentifier,
    Path,
    RelativeTo,
    SocketBinding,
    StatusSocketBinding,
    RecoveryListener,
    SocketProcessIdMaxPorts,
    EnableStatistics,
    StatisticsEnabled,
    EnableTsmStatus,
    DefaultTimeout,
    Type,
    EnableAsyncIo,
    DatasourceJndiName,
    TablePrefix,
    DropTable,
}

impl Attribute {
    pub const ALL: [Self; 16] = [
        Self::NodeIdentifier,
        Self::Path,
        Self::RelativeTo,
        Self::SocketBinding,
        Self::StatusSocketBinding,
        Self::RecoveryListener,
        Self::SocketProcessIdMaxPorts,
        Self::EnableStatistics,
        Self::StatisticsEnabled,
        Self::EnableTsmStatus,
        Self::DefaultTimeout,
        Self::Type,
        Self::EnableAsyncIo,
        Self::DatasourceJndiName,
        Self::TablePrefix,
        Self::DropTable,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::NodeIdentifier => "node-identifier",
            Self::Path => "path",
            Self::RelativeTo => "relative-to",
            Self::SocketBinding => "socket-binding",
            Self::StatusSocketBinding => "status-socket-binding",
            Self::RecoveryListener => "recovery-listener",
            Self::SocketProcessIdMaxPorts => "socket-process-id-max-ports",
            Self::EnableStatistics => "enable-statistics",
            Self::StatisticsEnabled => "statistics-enabled",
            Self::EnableTsmStatus => "enable-tsm-status",
            Self::DefaultTimeout => "default-timeout",
            Self::Type => "type",
            Self::EnableAsyncIo => "enable-async-io",
            Self::DatasourceJndiName => "datasource-jndi-name",
            Self::TablePrefix => "table-prefix",
            Self::DropTable => "drop-table",
        }
    }

    pub fn for_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Resolve a raw attribute hosted by `element`
    ///
    /// Namespace-qualified attributes are never part of the grammar.
    pub fn lookup(raw: &RawAttribute, element: Element) -> Result<Self> {
        if raw.name.prefix.is_some() {
            return Err(unknown(raw, element));
        }
        Self::for_name(&raw.name.local).ok_or_else(|| unknown(raw, element))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn unknown(raw: &RawAttribute, element: Element) -> Error {
    Error::new(
        ErrorKind::UnknownAttribute {
            attribute: raw.name.to_string(),
            element: element.name().to_string(),
        },
        raw.span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::QName;

    #[test]
    fn test_lookup_round_trip() {
        for attribute in Attribute::ALL {
            assert_eq!(Attribute::for_name(attribute.name()), Some(attribute));
        }
    }

    #[test]
    fn test_prefixed_attribute_is_unknown() {
        let raw = RawAttribute::new(QName::parse("tx:path"), "x", Span::empty());
        let err = Attribute::lookup(&raw, Element::ObjectStore).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnknownAttribute { attribute, element })
                if attribute == "tx:path" && element == "object-store"
        ));
    }

    #[test]
    fn test_unknown_name() {
        let raw = RawAttribute::new(QName::local("colour"), "x", Span::empty());
        assert!(Attribute::lookup(&raw, Element::Jts).is_err());
    }
}
