//! Attribute definitions: value domains and write targets
//!
//! A definition validates one raw attribute value and writes the normalized
//! result to every declared [`Target`]. Most definitions have a single
//! target; `object-store/@type` from 2.1 on writes to both the subsystem and
//! the log-store operation.

use tracing::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{RawAttribute, StartTag};
use crate::model::{OperationBuilder, ParamValue, Resource};
use crate::schema::attribute::Attribute;
use crate::schema::element::Element;

pub const STORE_TYPES: &[&str] = &["default", "hornetq", "jdbc"];

/// Value domain of an attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueDomain {
    /// Non-empty text
    String,
    /// Non-empty filesystem path
    Path,
    Boolean,
    Int { min: i64 },
    /// One of a fixed token set, matched case-insensitively
    Enum(&'static [&'static str]),
}

impl ValueDomain {
    pub fn describe(&self) -> String {
        match self {
            Self::String => "a non-empty string".to_string(),
            Self::Path => "a non-empty path".to_string(),
            Self::Boolean => "true or false".to_string(),
            Self::Int { min } => format!("an integer >= {min}"),
            Self::Enum(tokens) => format!("one of {}", tokens.join(", ")),
        }
    }

    fn coerce(&self, value: &str) -> Option<ParamValue> {
        match self {
            Self::String => (!value.is_empty()).then(|| ParamValue::String(value.to_string())),
            Self::Path => (!value.is_empty() && !value.contains('\0'))
                .then(|| ParamValue::String(value.to_string())),
            Self::Boolean => {
                if value.eq_ignore_ascii_case("true") {
                    Some(ParamValue::Bool(true))
                } else if value.eq_ignore_ascii_case("false") {
                    Some(ParamValue::Bool(false))
                } else {
                    None
                }
            }
            Self::Int { min } => value
                .parse::<i64>()
                .ok()
                .filter(|n| n >= min)
                .map(ParamValue::Int),
            Self::Enum(tokens) => tokens
                .iter()
                .find(|t| t.eq_ignore_ascii_case(value))
                .map(|t| ParamValue::Token((*t).to_string())),
        }
    }
}

/// Where a validated value is written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub resource: Resource,
    pub parameter: &'static str,
}

/// Schema entry for one attribute on one element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub attribute: Attribute,
    pub domain: ValueDomain,
    pub required: bool,
    /// Documented default; never written by the parser
    pub default: Option<&'static str>,
    /// Accept `${...}` expressions verbatim
    pub expressions: bool,
    pub targets: &'static [Target],
}

impl AttributeDefinition {
    pub const fn new(attribute: Attribute, domain: ValueDomain) -> Self {
        Self {
            attribute,
            domain,
            required: false,
            default: None,
            expressions: false,
            targets: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn expressions(mut self) -> Self {
        self.expressions = true;
        self
    }

    pub const fn writes(mut self, targets: &'static [Target]) -> Self {
        self.targets = targets;
        self
    }

    /// Check the raw value against the domain and normalize it
    pub fn validate(&self, raw: &RawAttribute) -> Result<ParamValue> {
        let value = raw.value.trim();
        if self.expressions {
            if let Some(start) = value.find("${") {
                let closed = value
                    .get(start..)
                    .is_some_and(|rest| rest.contains('}'));
                if closed {
                    return Ok(ParamValue::Expression(value.to_string()));
                }
                return Err(self.invalid(raw, "a terminated ${...} expression".to_string()));
            }
        }
        self.domain
            .coerce(value)
            .ok_or_else(|| self.invalid(raw, self.domain.describe()))
    }

    /// Validate and write to every target
    pub fn validate_and_apply(&self, raw: &RawAttribute, builder: &mut OperationBuilder) -> Result<()> {
        let value = self.validate(raw)?;
        for target in self.targets {
            trace!(attribute = %self.attribute, parameter = target.parameter, "apply");
            builder.set(target.resource, target.parameter, value.clone(), raw.span)?;
        }
        Ok(())
    }

    fn invalid(&self, raw: &RawAttribute, expected: String) -> Error {
        Error::new(
            ErrorKind::InvalidAttributeValue {
                attribute: self.attribute.name().to_string(),
                value: raw.value.clone(),
                expected,
            },
            raw.span,
        )
    }
}

/// Apply every attribute of `tag` against the definitions legal on `element`
///
/// Rejects unknown, namespaced and repeated attributes, then reports all
/// absent required attributes at once.
pub fn apply_attributes(
    tag: &StartTag,
    element: Element,
    definitions: &[AttributeDefinition],
    builder: &mut OperationBuilder,
) -> Result<()> {
    for (index, raw) in tag.attributes.iter().enumerate() {
        if tag.attributes.iter().take(index).any(|earlier| earlier.name == raw.name) {
            return Err(Error::new(
                ErrorKind::DuplicateAttribute {
                    attribute: raw.name.to_string(),
                    element: element.name().to_string(),
                },
                raw.span,
            ));
        }
    }

    let mut seen: Vec<Attribute> = Vec::with_capacity(tag.attributes.len());
    for raw in &tag.attributes {
        let attribute = Attribute::lookup(raw, element)?;
        seen.push(attribute);

        let definition = definitions
            .iter()
            .find(|d| d.attribute == attribute)
            .ok_or_else(|| crate::schema::attribute::unknown(raw, element))?;
        definition.validate_and_apply(raw, builder)?;
    }

    let missing: Vec<String> = definitions
        .iter()
        .filter(|d| d.required && !seen.contains(&d.attribute))
        .map(|d| d.attribute.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::new(
            ErrorKind::MissingRequiredAttribute {
                attributes: missing,
                element: element.name().to_string(),
            },
            tag.span,
        ));
    }
    Ok(())
}

macro_rules! subsystem {
    ($parameter:literal) => {
        Target {
            resource: Resource::Subsystem,
            parameter: $parameter,
        }
    };
}

// core-environment

pub const NODE_IDENTIFIER: AttributeDefinition =
    AttributeDefinition::new(Attribute::NodeIdentifier, ValueDomain::String)
        .default_value("1")
        .expressions()
        .writes(&[subsystem!("node-identifier")]);
pub const CORE_PATH: AttributeDefinition = AttributeDefinition::new(Attribute::Path, ValueDomain::Path)
    .default_value("var")
    .expressions()
    .writes(&[subsystem!("path")]);
pub const CORE_RELATIVE_TO: AttributeDefinition =
    AttributeDefinition::new(Attribute::RelativeTo, ValueDomain::String)
        .default_value("jboss.server.data.dir")
        .expressions()
        .writes(&[subsystem!("relative-to")]);

pub const CORE_ENVIRONMENT: &[AttributeDefinition] = &[NODE_IDENTIFIER, CORE_PATH, CORE_RELATIVE_TO];

// process-id/socket

pub const PROCESS_ID_SOCKET_BINDING: AttributeDefinition =
    AttributeDefinition::new(Attribute::SocketBinding, ValueDomain::String)
        .required()
        .writes(&[subsystem!("process-id-socket-binding")]);
pub const PROCESS_ID_MAX_PORTS: AttributeDefinition =
    AttributeDefinition::new(Attribute::SocketProcessIdMaxPorts, ValueDomain::Int { min: 1 })
        .default_value("10")
        .expressions()
        .writes(&[subsystem!("process-id-socket-max-ports")]);

pub const PROCESS_ID_SOCKET: &[AttributeDefinition] = &[PROCESS_ID_SOCKET_BINDING, PROCESS_ID_MAX_PORTS];

// recovery-environment

pub const RECOVERY_SOCKET_BINDING: AttributeDefinition =
    AttributeDefinition::new(Attribute::SocketBinding, ValueDomain::String)
        .required()
        .writes(&[subsystem!("recovery-socket-binding")]);
pub const RECOVERY_STATUS_SOCKET_BINDING: AttributeDefinition =
    AttributeDefinition::new(Attribute::StatusSocketBinding, ValueDomain::String)
        .required()
        .writes(&[subsystem!("recovery-status-socket-binding")]);
pub const RECOVERY_LISTENER: AttributeDefinition =
    AttributeDefinition::new(Attribute::RecoveryListener, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("recovery-listener")]);

pub const RECOVERY_ENVIRONMENT_1_0: &[AttributeDefinition] =
    &[RECOVERY_SOCKET_BINDING, RECOVERY_STATUS_SOCKET_BINDING];
pub const RECOVERY_ENVIRONMENT_1_1: &[AttributeDefinition] =
    &[RECOVERY_SOCKET_BINDING, RECOVERY_STATUS_SOCKET_BINDING, RECOVERY_LISTENER];

// coordinator-environment

pub const ENABLE_STATISTICS: AttributeDefinition =
    AttributeDefinition::new(Attribute::EnableStatistics, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("enable-statistics")]);
/// From 1.2 `enable-statistics` is an alias of `statistics-enabled`
pub const ENABLE_STATISTICS_ALIAS: AttributeDefinition =
    AttributeDefinition::new(Attribute::EnableStatistics, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("statistics-enabled")]);
pub const STATISTICS_ENABLED: AttributeDefinition =
    AttributeDefinition::new(Attribute::StatisticsEnabled, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("statistics-enabled")]);
pub const ENABLE_TSM_STATUS: AttributeDefinition =
    AttributeDefinition::new(Attribute::EnableTsmStatus, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("enable-tsm-status")]);
pub const DEFAULT_TIMEOUT: AttributeDefinition =
    AttributeDefinition::new(Attribute::DefaultTimeout, ValueDomain::Int { min: 0 })
        .default_value("300")
        .expressions()
        .writes(&[subsystem!("default-timeout")]);

pub const COORDINATOR_ENVIRONMENT_1_0: &[AttributeDefinition] = &[ENABLE_STATISTICS, DEFAULT_TIMEOUT];
pub const COORDINATOR_ENVIRONMENT_1_1: &[AttributeDefinition] =
    &[ENABLE_STATISTICS, ENABLE_TSM_STATUS, DEFAULT_TIMEOUT];
pub const COORDINATOR_ENVIRONMENT_1_2: &[AttributeDefinition] = &[
    ENABLE_STATISTICS_ALIAS,
    STATISTICS_ENABLED,
    ENABLE_TSM_STATUS,
    DEFAULT_TIMEOUT,
];
pub const COORDINATOR_ENVIRONMENT_2_0: &[AttributeDefinition] =
    &[STATISTICS_ENABLED, ENABLE_TSM_STATUS, DEFAULT_TIMEOUT];

// object-store

pub const OBJECT_STORE_PATH: AttributeDefinition =
    AttributeDefinition::new(Attribute::Path, ValueDomain::Path)
        .default_value("tx-object-store")
        .expressions()
        .writes(&[subsystem!("object-store-path")]);
pub const OBJECT_STORE_RELATIVE_TO: AttributeDefinition =
    AttributeDefinition::new(Attribute::RelativeTo, ValueDomain::String)
        .default_value("jboss.server.data.dir")
        .expressions()
        .writes(&[subsystem!("object-store-relative-to")]);
pub const OBJECT_STORE_TYPE: AttributeDefinition =
    AttributeDefinition::new(Attribute::Type, ValueDomain::Enum(STORE_TYPES))
        .default_value("default")
        .writes(&[
            subsystem!("object-store-type"),
            Target {
                resource: Resource::LogStore,
                parameter: "log-store-type",
            },
        ]);

pub const OBJECT_STORE_1_0: &[AttributeDefinition] = &[OBJECT_STORE_PATH, OBJECT_STORE_RELATIVE_TO];
pub const OBJECT_STORE_2_1: &[AttributeDefinition] =
    &[OBJECT_STORE_PATH, OBJECT_STORE_RELATIVE_TO, OBJECT_STORE_TYPE];

// hornetq

pub const HORNETQ_ENABLE_ASYNC_IO: AttributeDefinition =
    AttributeDefinition::new(Attribute::EnableAsyncIo, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("hornetq-store-enable-async-io")]);
/// Validated like the 1.3 attribute, written nowhere
pub const IGNORED_ENABLE_ASYNC_IO: AttributeDefinition =
    AttributeDefinition::new(Attribute::EnableAsyncIo, ValueDomain::Boolean).expressions();

pub const HORNETQ_STORE: &[AttributeDefinition] = &[HORNETQ_ENABLE_ASYNC_IO];
pub const USE_HORNETQ_STORE_IGNORED: &[AttributeDefinition] = &[IGNORED_ENABLE_ASYNC_IO];

// jdbc-store

pub const JDBC_DATASOURCE: AttributeDefinition =
    AttributeDefinition::new(Attribute::DatasourceJndiName, ValueDomain::String)
        .required()
        .expressions()
        .writes(&[subsystem!("jdbc-store-datasource")]);

pub const JDBC_STORE: &[AttributeDefinition] = &[JDBC_DATASOURCE];

pub const JDBC_ACTION_STORE: &[AttributeDefinition] = &[
    AttributeDefinition::new(Attribute::TablePrefix, ValueDomain::String)
        .expressions()
        .writes(&[subsystem!("jdbc-action-store-table-prefix")]),
    AttributeDefinition::new(Attribute::DropTable, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("jdbc-action-store-drop-table")]),
];
pub const JDBC_STATE_STORE: &[AttributeDefinition] = &[
    AttributeDefinition::new(Attribute::TablePrefix, ValueDomain::String)
        .expressions()
        .writes(&[subsystem!("jdbc-state-store-table-prefix")]),
    AttributeDefinition::new(Attribute::DropTable, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("jdbc-state-store-drop-table")]),
];
pub const JDBC_COMMUNICATION_STORE: &[AttributeDefinition] = &[
    AttributeDefinition::new(Attribute::TablePrefix, ValueDomain::String)
        .expressions()
        .writes(&[subsystem!("jdbc-communication-store-table-prefix")]),
    AttributeDefinition::new(Attribute::DropTable, ValueDomain::Boolean)
        .default_value("false")
        .expressions()
        .writes(&[subsystem!("jdbc-communication-store-drop-table")]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::QName;

    fn raw(name: &str, value: &str) -> RawAttribute {
        RawAttribute::new(QName::local(name), value, Span::empty())
    }

    fn tag(name: &str, attributes: &[(&str, &str)]) -> StartTag {
        attributes.iter().fold(
            StartTag::new(QName::local(name), None, Span::empty()),
            |tag, (n, v)| tag.with_attribute(n, v),
        )
    }

    #[test]
    fn test_boolean_is_normalized() -> Result<()> {
        assert_eq!(ENABLE_TSM_STATUS.validate(&raw("enable-tsm-status", "TRUE"))?, ParamValue::Bool(true));
        assert_eq!(ENABLE_TSM_STATUS.validate(&raw("enable-tsm-status", " false "))?, ParamValue::Bool(false));
        assert!(ENABLE_TSM_STATUS.validate(&raw("enable-tsm-status", "yes")).is_err());
        Ok(())
    }

    #[test]
    fn test_enum_is_canonicalized() -> Result<()> {
        assert_eq!(
            OBJECT_STORE_TYPE.validate(&raw("type", "HornetQ"))?,
            ParamValue::Token("hornetq".to_string())
        );
        let err = OBJECT_STORE_TYPE.validate(&raw("type", "journal")).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::InvalidAttributeValue { attribute, value, .. })
                if attribute == "type" && value == "journal"
        ));
        Ok(())
    }

    #[test]
    fn test_int_bounds() -> Result<()> {
        assert_eq!(DEFAULT_TIMEOUT.validate(&raw("default-timeout", "0"))?, ParamValue::Int(0));
        assert!(DEFAULT_TIMEOUT.validate(&raw("default-timeout", "-1")).is_err());
        assert!(PROCESS_ID_MAX_PORTS.validate(&raw("socket-process-id-max-ports", "0")).is_err());
        assert!(DEFAULT_TIMEOUT.validate(&raw("default-timeout", "5m")).is_err());
        Ok(())
    }

    #[test]
    fn test_expressions() -> Result<()> {
        assert_eq!(
            DEFAULT_TIMEOUT.validate(&raw("default-timeout", "${tx.timeout:300}"))?,
            ParamValue::Expression("${tx.timeout:300}".to_string())
        );
        assert!(DEFAULT_TIMEOUT.validate(&raw("default-timeout", "${tx.timeout")).is_err());
        // type does not accept expressions
        assert!(OBJECT_STORE_TYPE.validate(&raw("type", "${store}")).is_err());
        Ok(())
    }

    #[test]
    fn test_empty_string_rejected() {
        assert!(JDBC_DATASOURCE.validate(&raw("datasource-jndi-name", "  ")).is_err());
    }

    #[test]
    fn test_type_writes_two_targets() -> Result<()> {
        let mut builder = OperationBuilder::new();
        OBJECT_STORE_TYPE.validate_and_apply(&raw("type", "jdbc"), &mut builder)?;
        let list = builder.finish();
        let token = ParamValue::Token("jdbc".to_string());
        assert_eq!(
            list.find(Resource::Subsystem).and_then(|op| op.get("object-store-type")),
            Some(&token)
        );
        assert_eq!(
            list.find(Resource::LogStore).and_then(|op| op.get("log-store-type")),
            Some(&token)
        );
        Ok(())
    }

    #[test]
    fn test_apply_attributes_duplicate() {
        let mut builder = OperationBuilder::new();
        let tag = tag("object-store", &[("type", "default"), ("type", "hornetq")]);
        let err = apply_attributes(&tag, Element::ObjectStore, OBJECT_STORE_2_1, &mut builder).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::DuplicateAttribute { attribute, .. }) if attribute == "type"
        ));
    }

    #[test]
    fn test_duplicate_reported_before_value_checks() {
        let cases = [
            (OBJECT_STORE_2_1, ("type", "bogus"), ("type", "hornetq")),
            (OBJECT_STORE_1_0, ("type", "x"), ("type", "y")),
            (OBJECT_STORE_2_1, ("path", ""), ("path", "p")),
        ];
        for (definitions, first, second) in cases {
            let mut builder = OperationBuilder::new();
            let tag = tag("object-store", &[first, second]);
            let err = apply_attributes(&tag, Element::ObjectStore, definitions, &mut builder).err();
            assert_eq!(
                err.map(|e| e.kind().clone()),
                Some(ErrorKind::DuplicateAttribute {
                    attribute: first.0.to_string(),
                    element: "object-store".to_string(),
                })
            );
            assert!(builder.is_empty());
        }
    }

    #[test]
    fn test_apply_attributes_missing_required_lists_all() {
        let mut builder = OperationBuilder::new();
        let tag = tag("recovery-environment", &[("recovery-listener", "true")]);
        let err = apply_attributes(&tag, Element::RecoveryEnvironment, RECOVERY_ENVIRONMENT_1_1, &mut builder).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MissingRequiredAttribute {
                attributes: vec!["socket-binding".to_string(), "status-socket-binding".to_string()],
                element: "recovery-environment".to_string(),
            })
        );
    }

    #[test]
    fn test_attribute_known_elsewhere_is_unknown_here() {
        let mut builder = OperationBuilder::new();
        let tag = tag("object-store", &[("type", "default")]);
        let err = apply_attributes(&tag, Element::ObjectStore, OBJECT_STORE_1_0, &mut builder).err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnknownAttribute { attribute, .. }) if attribute == "type"
        ));
    }

    #[test]
    fn test_ignored_definition_writes_nothing() -> Result<()> {
        let mut builder = OperationBuilder::new();
        let tag = tag("use-hornetq-store", &[("enable-async-io", "true")]);
        apply_attributes(&tag, Element::UseHornetqStore, USE_HORNETQ_STORE_IGNORED, &mut builder)?;
        assert!(builder.is_empty());
        Ok(())
    }
}
