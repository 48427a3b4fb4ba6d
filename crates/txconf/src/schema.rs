//! Grammar vocabulary: versions, element and attribute names, attribute definitions

pub mod attribute;
pub mod definition;
pub mod element;
pub mod namespace;

pub use attribute::Attribute;
pub use definition::{apply_attributes, AttributeDefinition, Target, ValueDomain};
pub use element::Element;
pub use namespace::Version;
