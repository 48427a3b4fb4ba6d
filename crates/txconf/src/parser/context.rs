//! State shared by element handlers during one parse

use tracing::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::StartTag;
use crate::model::{OperationBuilder, ParamValue, Resource};
use crate::parser::reader::ElementReader;
use crate::schema::{apply_attributes, AttributeDefinition, Element, Version};

pub struct ParseContext<'s> {
    pub reader: ElementReader<'s>,
    pub builder: OperationBuilder,
    pub version: Version,
    store_backend: Option<Element>,
}

impl<'s> ParseContext<'s> {
    pub fn new(reader: ElementReader<'s>, version: Version) -> Self {
        Self {
            reader,
            builder: OperationBuilder::new(),
            version,
            store_backend: None,
        }
    }

    /// Validate the attributes of `tag` and write them to their targets
    pub fn apply(
        &mut self,
        tag: &StartTag,
        element: Element,
        definitions: &[AttributeDefinition],
    ) -> Result<()> {
        apply_attributes(tag, element, definitions, &mut self.builder)
    }

    /// Write a `true` marker parameter on the subsystem operation
    pub fn set_flag(&mut self, parameter: &str, tag: &StartTag) -> Result<()> {
        trace!(parameter, "flag");
        self.builder
            .set(Resource::Subsystem, parameter, ParamValue::Bool(true), tag.span)
    }

    /// Reserve the single store-backend slot for `element`
    pub fn claim_store_backend(&mut self, element: Element, tag: &StartTag) -> Result<()> {
        if let Some(existing) = self.store_backend {
            return Err(Error::with_message(
                ErrorKind::UnexpectedElement {
                    element: tag.name.to_string(),
                    context: Element::Subsystem.name().to_string(),
                },
                tag.span,
                format!(
                    "unexpected element '{}' in 'subsystem': store backend '{existing}' already configured",
                    tag.name
                ),
            ));
        }
        self.store_backend = Some(element);
        Ok(())
    }
}
