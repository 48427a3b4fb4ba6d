//! Management operations

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::model::address::ResourceAddress;

pub const ADD: &str = "add";

/// Normalized parameter value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Bool(bool),
    Int(i64),
    /// Member of an enumerated token set, canonical spelling
    Token(String),
    /// `${...}` expression left for the management kernel to resolve
    Expression(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual payload of string-like values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Token(s) | Self::Expression(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Token(s) | Self::Expression(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ParamValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            Self::String(s) | Self::Token(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Expression(s) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("EXPRESSION", s)?;
                map.end()
            }
        }
    }
}

/// An `add` operation against one resource
///
/// Parameters are write-once: [`Operation::set`] refuses to replace a value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Operation {
    #[cfg_attr(feature = "serde", serde(rename = "operation"))]
    name: &'static str,
    address: ResourceAddress,
    #[cfg_attr(feature = "serde", serde(rename = "parameters"))]
    params: IndexMap<String, ParamValue>,
}

impl Operation {
    pub fn add(address: ResourceAddress) -> Self {
        Self {
            name: ADD,
            address,
            params: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn get(&self, param: &str) -> Option<&ParamValue> {
        self.params.get(param)
    }

    pub fn contains(&self, param: &str) -> bool {
        self.params.contains_key(param)
    }

    /// Parameters in the order they were first written
    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Write a parameter; `span` locates the source of the value
    pub fn set(&mut self, param: &str, value: ParamValue, span: Span) -> Result<()> {
        if self.params.contains_key(param) {
            return Err(Error::new(
                ErrorKind::ParameterConflict {
                    parameter: param.to_string(),
                    address: self.address.to_string(),
                },
                span,
            ));
        }
        self.params.insert(param.to_string(), value);
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}(", self.address, self.name)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                ParamValue::String(s) | ParamValue::Expression(s) => write!(f, "{key}=\"{s}\"")?,
                _ => write!(f, "{key}={value}")?,
            }
        }
        f.write_str(")")
    }
}
