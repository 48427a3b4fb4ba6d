//! Operation accumulation

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, Span};
use crate::model::address::{Resource, ResourceAddress};
use crate::model::operation::{Operation, ParamValue};

/// Accumulates operations in first-seen order during one parse
#[derive(Debug, Default)]
pub struct OperationBuilder {
    operations: IndexMap<ResourceAddress, Operation>,
}

impl OperationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the operation for `address`
    ///
    /// The first call registers a new empty operation at the end of the
    /// list; later calls return that same operation.
    pub fn operation_for(&mut self, address: ResourceAddress) -> &mut Operation {
        let created = !self.operations.contains_key(&address);
        if created {
            debug!(%address, position = self.operations.len(), "registering operation");
        }
        self.operations
            .entry(address)
            .or_insert_with_key(|address| Operation::add(address.clone()))
    }

    /// Write one parameter on the operation for `resource`
    pub fn set(
        &mut self,
        resource: Resource,
        param: &str,
        value: ParamValue,
        span: Span,
    ) -> Result<()> {
        self.operation_for(resource.address()).set(param, value, span)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn finish(self) -> OperationList {
        OperationList {
            operations: self.operations.into_values().collect(),
        }
    }
}

/// Ordered result of a successful parse
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct OperationList {
    operations: Vec<Operation>,
}

impl OperationList {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, address: &ResourceAddress) -> Option<&Operation> {
        self.operations.iter().find(|op| op.address() == address)
    }

    pub fn find(&self, resource: Resource) -> Option<&Operation> {
        self.get(&resource.address())
    }
}

impl IntoIterator for OperationList {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperationList {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
