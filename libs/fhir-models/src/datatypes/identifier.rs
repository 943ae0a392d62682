//! Identifier, Reference and Period

use super::CodeableConcept;
use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{wire, Element, Model, PropertyAccess};
use crate::error::Result;
use serde_json::Value;

pub const PERIOD_PROPERTIES: &[&str] = &["start", "_start", "end", "_end"];

/// Time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Period {
    /// Element id and extensions
    pub base: Element,
    /// Starting time with inclusive boundary
    pub start: Option<Primitive<String>>,
    /// End time with inclusive boundary, if not ongoing
    pub end: Option<Primitive<String>>,
}

impl Period {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            base: Element::default(),
            start: start.map(Primitive::from),
            end: end.map(Primitive::from),
        }
    }
}

impl PropertyAccess for Period {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "start" => primitive::encode_value(self.start.as_ref()),
            "_start" => primitive::encode_element(self.start.as_ref()),
            "end" => primitive::encode_value(self.end.as_ref()),
            "_end" => primitive::encode_element(self.end.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "start" => primitive::decode_value(&mut self.start, value),
            "_start" => primitive::decode_element(&mut self.start, value),
            "end" => primitive::decode_value(&mut self.end, value),
            "_end" => primitive::decode_element(&mut self.end, value),
            _ => Ok(()),
        }
    }
}

impl Model for Period {
    const TYPE_NAME: &'static str = "Period";
    const PROPERTY_NAMES: &'static [&'static str] = PERIOD_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const IDENTIFIER_PROPERTIES: &[&str] = &[
    "use", "_use", "type", "system", "_system", "value", "_value", "period", "assigner",
];

/// An identifier intended for computation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Identifier {
    /// Element id and extensions
    pub base: Element,
    /// usual | official | temp | secondary | old
    pub use_: Option<Primitive<String>>,
    /// Description of identifier
    pub type_: Option<CodeableConcept>,
    /// The namespace for the identifier value
    pub system: Option<Primitive<String>>,
    /// The value that is unique
    pub value: Option<Primitive<String>>,
    /// Time period when id is/was valid for use
    pub period: Option<Period>,
    /// Organization that issued the id
    pub assigner: Option<Box<Reference>>,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: Some(Primitive::new(system.into())),
            value: Some(Primitive::new(value.into())),
            ..Default::default()
        }
    }
}

impl PropertyAccess for Identifier {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "use" => primitive::encode_value(self.use_.as_ref()),
            "_use" => primitive::encode_element(self.use_.as_ref()),
            "type" => wire::encode(self.type_.as_ref()),
            "system" => primitive::encode_value(self.system.as_ref()),
            "_system" => primitive::encode_element(self.system.as_ref()),
            "value" => primitive::encode_value(self.value.as_ref()),
            "_value" => primitive::encode_element(self.value.as_ref()),
            "period" => wire::encode(self.period.as_ref()),
            "assigner" => wire::encode(self.assigner.as_deref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "use" => primitive::decode_value(&mut self.use_, value)?,
            "_use" => primitive::decode_element(&mut self.use_, value)?,
            "type" => self.type_ = Some(wire::decode(value)?),
            "system" => primitive::decode_value(&mut self.system, value)?,
            "_system" => primitive::decode_element(&mut self.system, value)?,
            "value" => primitive::decode_value(&mut self.value, value)?,
            "_value" => primitive::decode_element(&mut self.value, value)?,
            "period" => self.period = Some(wire::decode(value)?),
            "assigner" => self.assigner = Some(Box::new(wire::decode(value)?)),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Identifier {
    const TYPE_NAME: &'static str = "Identifier";
    const PROPERTY_NAMES: &'static [&'static str] = IDENTIFIER_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const REFERENCE_PROPERTIES: &[&str] = &[
    "reference",
    "_reference",
    "type",
    "_type",
    "identifier",
    "display",
    "_display",
];

/// A reference from one resource to another
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reference {
    /// Element id and extensions
    pub base: Element,
    /// Literal reference, relative, internal (`#id`) or absolute URL
    pub reference: Option<Primitive<String>>,
    /// Type the reference refers to (e.g. "Patient")
    pub type_: Option<Primitive<String>>,
    /// Logical reference, when literal reference is not known
    pub identifier: Option<Identifier>,
    /// Text alternative for the resource
    pub display: Option<Primitive<String>>,
}

impl Reference {
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(Primitive::new(reference.into())),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(Primitive::new(display.into()));
        self
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().and_then(|p| p.value()).map(String::as_str)
    }

    /// Id of a contained resource for `#id` references.
    pub fn contained_id(&self) -> Option<&str> {
        self.reference()?.strip_prefix('#')
    }
}

impl PropertyAccess for Reference {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "reference" => primitive::encode_value(self.reference.as_ref()),
            "_reference" => primitive::encode_element(self.reference.as_ref()),
            "type" => primitive::encode_value(self.type_.as_ref()),
            "_type" => primitive::encode_element(self.type_.as_ref()),
            "identifier" => wire::encode(self.identifier.as_ref()),
            "display" => primitive::encode_value(self.display.as_ref()),
            "_display" => primitive::encode_element(self.display.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "reference" => primitive::decode_value(&mut self.reference, value)?,
            "_reference" => primitive::decode_element(&mut self.reference, value)?,
            "type" => primitive::decode_value(&mut self.type_, value)?,
            "_type" => primitive::decode_element(&mut self.type_, value)?,
            "identifier" => self.identifier = Some(wire::decode(value)?),
            "display" => primitive::decode_value(&mut self.display, value)?,
            "_display" => primitive::decode_element(&mut self.display, value)?,
            _ => {}
        }
        Ok(())
    }
}

impl Model for Reference {
    const TYPE_NAME: &'static str = "Reference";
    const PROPERTY_NAMES: &'static [&'static str] = REFERENCE_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

impl_json_serde!(Period, Identifier, Reference);
