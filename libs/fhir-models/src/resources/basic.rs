//! Basic resource, for concepts that have no dedicated resource

use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{add_to_array, wire, Builder, DomainResource, Model, PropertyAccess, Validate};
use crate::datatypes::{CodeableConcept, Identifier, Reference};
use crate::error::Result;
use serde_json::Value;

pub const BASIC_PROPERTIES: &[&str] = &[
    "identifier",
    "code",
    "subject",
    "created",
    "_created",
    "author",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Basic {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,
    /// Business identifier
    pub identifier: Option<Vec<Identifier>>,
    /// Kind of resource
    pub code: Option<CodeableConcept>,
    /// Identifies the focus of this resource
    pub subject: Option<Reference>,
    /// When created
    pub created: Option<Primitive<String>>,
    /// Who created
    pub author: Option<Reference>,
}

impl PropertyAccess for Basic {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "identifier" => wire::encode_list(self.identifier.as_deref()),
            "code" => wire::encode(self.code.as_ref()),
            "subject" => wire::encode(self.subject.as_ref()),
            "created" => primitive::encode_value(self.created.as_ref()),
            "_created" => primitive::encode_element(self.created.as_ref()),
            "author" => wire::encode(self.author.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "identifier" => self.identifier = Some(wire::decode_list(value)?),
            "code" => self.code = Some(wire::decode(value)?),
            "subject" => self.subject = Some(wire::decode(value)?),
            "created" => primitive::decode_value(&mut self.created, value)?,
            "_created" => primitive::decode_element(&mut self.created, value)?,
            "author" => self.author = Some(wire::decode(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Basic {
    const TYPE_NAME: &'static str = "Basic";
    const RESOURCE_TYPE: Option<&'static str> = Some("Basic");
    const PROPERTY_NAMES: &'static [&'static str] = BASIC_PROPERTIES;
    type Base = DomainResource;

    fn base(&self) -> &DomainResource {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DomainResource {
        &mut self.base
    }
}

impl Validate for Basic {}

impl Builder<Basic> {
    pub fn add_identifier(self, identifier: Identifier) -> Self {
        self.edit(|basic| add_to_array(&mut basic.identifier, identifier))
    }

    pub fn set_code(self, code: CodeableConcept) -> Self {
        self.edit(|basic| basic.code = Some(code))
    }

    pub fn set_subject(self, subject: Reference) -> Self {
        self.edit(|basic| basic.subject = Some(subject))
    }

    pub fn set_created(self, created: impl Into<Primitive<String>>) -> Self {
        let created = created.into();
        self.edit(|basic| basic.created = Some(created))
    }

    pub fn set_author(self, author: Reference) -> Self {
        self.edit(|basic| basic.author = Some(author))
    }
}

impl_json_serde!(Basic);
