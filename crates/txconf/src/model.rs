//! Output model: addresses, operations and the operation list

pub mod address;
pub mod builder;
pub mod operation;

pub use address::{PathElement, Resource, ResourceAddress};
pub use builder::{OperationBuilder, OperationList};
pub use operation::{Operation, ParamValue};
