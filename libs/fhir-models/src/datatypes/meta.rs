//! Meta and Narrative, the resource-level datatypes

use super::Coding;
use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{add_to_array, wire, Element, Model, PropertyAccess};
use crate::error::Result;
use serde_json::Value;

pub const META_PROPERTIES: &[&str] = &[
    "versionId",
    "_versionId",
    "lastUpdated",
    "_lastUpdated",
    "source",
    "_source",
    "profile",
    "_profile",
    "security",
    "tag",
];

/// Metadata about a resource
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta {
    /// Element id and extensions
    pub base: Element,
    /// Version specific identifier
    pub version_id: Option<Primitive<String>>,
    /// When the resource version last changed
    pub last_updated: Option<Primitive<String>>,
    /// Identifies where the resource comes from
    pub source: Option<Primitive<String>>,
    /// Profiles this resource claims to conform to
    pub profile: Option<Vec<Primitive<String>>>,
    /// Security Labels applied to this resource
    pub security: Option<Vec<Coding>>,
    /// Tags applied to this resource
    pub tag: Option<Vec<Coding>>,
}

impl Meta {
    pub fn add_profile(&mut self, canonical: impl Into<String>) {
        add_to_array(&mut self.profile, Primitive::new(canonical.into()));
    }

    pub fn add_tag(&mut self, tag: Coding) {
        add_to_array(&mut self.tag, tag);
    }

    /// Profile canonicals, skipping shadow-only entries.
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.profile
            .iter()
            .flatten()
            .filter_map(|p| p.value().map(String::as_str))
    }
}

impl PropertyAccess for Meta {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "versionId" => primitive::encode_value(self.version_id.as_ref()),
            "_versionId" => primitive::encode_element(self.version_id.as_ref()),
            "lastUpdated" => primitive::encode_value(self.last_updated.as_ref()),
            "_lastUpdated" => primitive::encode_element(self.last_updated.as_ref()),
            "source" => primitive::encode_value(self.source.as_ref()),
            "_source" => primitive::encode_element(self.source.as_ref()),
            "profile" => primitive::encode_list_values(self.profile.as_deref()),
            "_profile" => primitive::encode_list_elements(self.profile.as_deref()),
            "security" => wire::encode_list(self.security.as_deref()),
            "tag" => wire::encode_list(self.tag.as_deref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "versionId" => primitive::decode_value(&mut self.version_id, value)?,
            "_versionId" => primitive::decode_element(&mut self.version_id, value)?,
            "lastUpdated" => primitive::decode_value(&mut self.last_updated, value)?,
            "_lastUpdated" => primitive::decode_element(&mut self.last_updated, value)?,
            "source" => primitive::decode_value(&mut self.source, value)?,
            "_source" => primitive::decode_element(&mut self.source, value)?,
            "profile" => primitive::decode_list_values(&mut self.profile, value)?,
            "_profile" => primitive::decode_list_elements(&mut self.profile, value)?,
            "security" => self.security = Some(wire::decode_list(value)?),
            "tag" => self.tag = Some(wire::decode_list(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Meta {
    const TYPE_NAME: &'static str = "Meta";
    const PROPERTY_NAMES: &'static [&'static str] = META_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const NARRATIVE_PROPERTIES: &[&str] = &["status", "_status", "div"];

/// Human-readable summary of the resource
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Narrative {
    /// Element id and extensions
    pub base: Element,
    /// generated | extensions | additional | empty
    pub status: Option<Primitive<String>>,
    /// Limited xhtml content
    pub div: Option<String>,
}

impl Narrative {
    pub fn generated(div: impl Into<String>) -> Self {
        Self {
            base: Element::default(),
            status: Some(Primitive::from("generated")),
            div: Some(div.into()),
        }
    }
}

impl PropertyAccess for Narrative {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "status" => primitive::encode_value(self.status.as_ref()),
            "_status" => primitive::encode_element(self.status.as_ref()),
            "div" => wire::encode_string(self.div.as_deref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "status" => primitive::decode_value(&mut self.status, value)?,
            "_status" => primitive::decode_element(&mut self.status, value)?,
            "div" => self.div = Some(wire::decode_string(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Narrative {
    const TYPE_NAME: &'static str = "Narrative";
    const PROPERTY_NAMES: &'static [&'static str] = NARRATIVE_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

impl_json_serde!(Meta, Narrative);
