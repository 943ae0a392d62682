//! Coding and CodeableConcept

use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{wire, Element, Model, PropertyAccess};
use crate::error::Result;
use serde_json::Value;

pub const CODING_PROPERTIES: &[&str] = &[
    "system",
    "_system",
    "version",
    "_version",
    "code",
    "_code",
    "display",
    "_display",
    "userSelected",
    "_userSelected",
];

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Coding {
    /// Element id and extensions
    pub base: Element,
    /// Identity of the terminology system
    pub system: Option<Primitive<String>>,
    /// Version of the system, if relevant
    pub version: Option<Primitive<String>>,
    /// Symbol in syntax defined by the system
    pub code: Option<Primitive<String>>,
    /// Representation defined by the system
    pub display: Option<Primitive<String>>,
    /// If this coding was chosen directly by the user
    pub user_selected: Option<Primitive<bool>>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(Primitive::new(system.into())),
            code: Some(Primitive::new(code.into())),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(Primitive::new(display.into()));
        self
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_ref().and_then(|p| p.value()).map(String::as_str)
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().and_then(|p| p.value()).map(String::as_str)
    }
}

impl PropertyAccess for Coding {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "system" => primitive::encode_value(self.system.as_ref()),
            "_system" => primitive::encode_element(self.system.as_ref()),
            "version" => primitive::encode_value(self.version.as_ref()),
            "_version" => primitive::encode_element(self.version.as_ref()),
            "code" => primitive::encode_value(self.code.as_ref()),
            "_code" => primitive::encode_element(self.code.as_ref()),
            "display" => primitive::encode_value(self.display.as_ref()),
            "_display" => primitive::encode_element(self.display.as_ref()),
            "userSelected" => primitive::encode_value(self.user_selected.as_ref()),
            "_userSelected" => primitive::encode_element(self.user_selected.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "system" => primitive::decode_value(&mut self.system, value),
            "_system" => primitive::decode_element(&mut self.system, value),
            "version" => primitive::decode_value(&mut self.version, value),
            "_version" => primitive::decode_element(&mut self.version, value),
            "code" => primitive::decode_value(&mut self.code, value),
            "_code" => primitive::decode_element(&mut self.code, value),
            "display" => primitive::decode_value(&mut self.display, value),
            "_display" => primitive::decode_element(&mut self.display, value),
            "userSelected" => primitive::decode_value(&mut self.user_selected, value),
            "_userSelected" => primitive::decode_element(&mut self.user_selected, value),
            _ => Ok(()),
        }
    }
}

impl Model for Coding {
    const TYPE_NAME: &'static str = "Coding";
    const PROPERTY_NAMES: &'static [&'static str] = CODING_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const CODEABLE_CONCEPT_PROPERTIES: &[&str] = &["coding", "text", "_text"];

/// Concept, as defined by one or more codings and/or text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeableConcept {
    /// Element id and extensions
    pub base: Element,
    /// Code defined by a terminology system
    pub coding: Option<Vec<Coding>>,
    /// Plain text representation of the concept
    pub text: Option<Primitive<String>>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: Some(vec![coding]),
            ..Default::default()
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(Primitive::new(text.into())),
            ..Default::default()
        }
    }

    pub fn codings(&self) -> &[Coding] {
        self.coding.as_deref().unwrap_or(&[])
    }

    /// Whether any coding matches `system` and `code`.
    pub fn has_code(&self, system: &str, code: &str) -> bool {
        self.codings()
            .iter()
            .any(|c| c.system() == Some(system) && c.code() == Some(code))
    }
}

impl PropertyAccess for CodeableConcept {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "coding" => wire::encode_list(self.coding.as_deref()),
            "text" => primitive::encode_value(self.text.as_ref()),
            "_text" => primitive::encode_element(self.text.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "coding" => self.coding = Some(wire::decode_list(value)?),
            "text" => primitive::decode_value(&mut self.text, value)?,
            "_text" => primitive::decode_element(&mut self.text, value)?,
            _ => {}
        }
        Ok(())
    }
}

impl Model for CodeableConcept {
    const TYPE_NAME: &'static str = "CodeableConcept";
    const PROPERTY_NAMES: &'static [&'static str] = CODEABLE_CONCEPT_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

impl_json_serde!(Coding, CodeableConcept);
