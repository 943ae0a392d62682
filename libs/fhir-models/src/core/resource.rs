//! `Resource` and `DomainResource`, the base of every top-level resource

use super::extension::Extension;
use super::model::{BaseFields, ModifierExtensionBase};
use super::primitive::{self, Primitive};
use super::props::{serialize_props_to, JsonObject, PropertyAccess};
use super::wire;
use crate::datatypes::{Meta, Narrative};
use crate::error::{Error, Result};
use crate::resources::AnyResource;
use serde_json::Value;

pub const RESOURCE_PROPERTIES: &[&str] = &[
    "id",
    "meta",
    "implicitRules",
    "_implicitRules",
    "language",
    "_language",
];

pub const DOMAIN_RESOURCE_PROPERTIES: &[&str] = &[
    "id",
    "meta",
    "implicitRules",
    "_implicitRules",
    "language",
    "_language",
    "text",
    "contained",
    "extension",
    "modifierExtension",
];

/// Fields shared by all resources
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    /// Logical id of this artifact
    pub id: Option<String>,

    /// Metadata about the resource
    pub meta: Option<Meta>,

    /// A set of rules under which this content was created
    pub implicit_rules: Option<Primitive<String>>,

    /// Language of the resource content
    pub language: Option<Primitive<String>>,
}

impl PropertyAccess for Resource {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => wire::encode_string(self.id.as_deref()),
            "meta" => wire::encode(self.meta.as_ref()),
            "implicitRules" => primitive::encode_value(self.implicit_rules.as_ref()),
            "_implicitRules" => primitive::encode_element(self.implicit_rules.as_ref()),
            "language" => primitive::encode_value(self.language.as_ref()),
            "_language" => primitive::encode_element(self.language.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = Some(wire::decode_string(value)?),
            "meta" => self.meta = Some(wire::decode(value)?),
            "implicitRules" => primitive::decode_value(&mut self.implicit_rules, value)?,
            "_implicitRules" => primitive::decode_element(&mut self.implicit_rules, value)?,
            "language" => primitive::decode_value(&mut self.language, value)?,
            "_language" => primitive::decode_element(&mut self.language, value)?,
            _ => {}
        }
        Ok(())
    }
}

/// A resource with narrative, contained resources and extensions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomainResource {
    /// Fields inherited from `Resource`
    pub resource: Resource,

    /// Text summary of the resource, for human interpretation
    pub text: Option<Narrative>,

    /// Contained, inline resources
    pub contained: Option<Vec<AnyResource>>,

    /// Additional content defined by implementations
    pub extension: Option<Vec<Extension>>,

    /// Extensions that cannot be ignored
    pub modifier_extension: Option<Vec<Extension>>,
}

impl PropertyAccess for DomainResource {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "text" => wire::encode(self.text.as_ref()),
            "contained" => self
                .contained
                .as_ref()
                .map(|items| Value::Array(items.iter().map(AnyResource::to_json).collect())),
            "extension" => wire::encode_list(self.extension.as_deref()),
            "modifierExtension" => wire::encode_list(self.modifier_extension.as_deref()),
            other => self.resource.read_property(other),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "text" => self.text = Some(wire::decode(value)?),
            "contained" => self.contained = Some(decode_contained(value)?),
            "extension" => self.extension = Some(wire::decode_list(value)?),
            "modifierExtension" => self.modifier_extension = Some(wire::decode_list(value)?),
            other => self.resource.write_property(other, value)?,
        }
        Ok(())
    }
}

fn decode_contained(value: Value) -> Result<Vec<AnyResource>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                AnyResource::from_json(item).map_err(|e| e.in_field(format!("[{idx}]")))
            })
            .collect(),
        _ => Err(Error::InvalidFieldValue(
            "expected an array of resources".to_string(),
        )),
    }
}

impl BaseFields for DomainResource {
    const PROPERTY_NAMES: &'static [&'static str] = DOMAIN_RESOURCE_PROPERTIES;

    fn write_fields(&self, target: &mut JsonObject) {
        write_domain_resource_fields(self, target);
    }

    fn id(&self) -> Option<&str> {
        self.resource.id.as_deref()
    }

    fn id_mut(&mut self) -> &mut Option<String> {
        &mut self.resource.id
    }

    fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    fn extension_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.extension
    }
}

impl ModifierExtensionBase for DomainResource {
    fn modifier_extensions(&self) -> &[Extension] {
        self.modifier_extension.as_deref().unwrap_or(&[])
    }

    fn modifier_extension_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.modifier_extension
    }
}

/// Write `id`, `meta`, `implicitRules` and `language` with their shadows.
pub fn write_resource_fields(resource: &Resource, target: &mut JsonObject) {
    serialize_props_to(resource, target, RESOURCE_PROPERTIES);
}

/// Write the resource fields, then `text`, `contained` and both extension lists.
pub fn write_domain_resource_fields(domain: &DomainResource, target: &mut JsonObject) {
    write_resource_fields(&domain.resource, target);
    serialize_props_to(
        domain,
        target,
        &DOMAIN_RESOURCE_PROPERTIES[RESOURCE_PROPERTIES.len()..],
    );
}
