//! `Element` and `BackboneElement`, the bases of every datatype and backbone

use super::extension::Extension;
use super::model::{BaseFields, ModifierExtensionBase};
use super::props::{assign_props, serialize_props_to, JsonObject, PropertyAccess};
use super::wire;
use crate::error::{Error, Result};
use serde_json::Value;

pub const ELEMENT_PROPERTIES: &[&str] = &["id", "extension"];

pub const BACKBONE_ELEMENT_PROPERTIES: &[&str] = &["id", "extension", "modifierExtension"];

/// Base for all elements: an optional id and extensions.
///
/// Also the content of every primitive `_field` shadow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Unique id for inter-element referencing
    pub id: Option<String>,

    /// Additional content defined by implementations
    pub extension: Option<Vec<Extension>>,
}

impl Element {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extension: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_none()
    }

    pub fn to_json_object(&self) -> JsonObject {
        let mut out = JsonObject::new();
        write_element_fields(self, &mut out);
        out
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let data = value
            .as_object()
            .ok_or_else(|| Error::ExpectedObject("Element".to_string()))?;
        let mut element = Self::default();
        assign_props(&mut element, data, ELEMENT_PROPERTIES)?;
        Ok(element)
    }
}

impl PropertyAccess for Element {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => wire::encode_string(self.id.as_deref()),
            "extension" => wire::encode_list(self.extension.as_deref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = Some(wire::decode_string(value)?),
            "extension" => self.extension = Some(wire::decode_list(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl BaseFields for Element {
    const PROPERTY_NAMES: &'static [&'static str] = ELEMENT_PROPERTIES;

    fn write_fields(&self, target: &mut JsonObject) {
        write_element_fields(self, target);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn id_mut(&mut self) -> &mut Option<String> {
        &mut self.id
    }

    fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    fn extension_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.extension
    }
}

/// Base for nested structures inside resources.
///
/// Consumers that meet a modifier extension they do not understand must treat
/// the whole element as unprocessable. This type only carries the list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackboneElement {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Option<Vec<Extension>>,

    /// Extensions that cannot be ignored
    pub modifier_extension: Option<Vec<Extension>>,
}

impl PropertyAccess for BackboneElement {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => wire::encode_string(self.id.as_deref()),
            "extension" => wire::encode_list(self.extension.as_deref()),
            "modifierExtension" => wire::encode_list(self.modifier_extension.as_deref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = Some(wire::decode_string(value)?),
            "extension" => self.extension = Some(wire::decode_list(value)?),
            "modifierExtension" => self.modifier_extension = Some(wire::decode_list(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl BaseFields for BackboneElement {
    const PROPERTY_NAMES: &'static [&'static str] = BACKBONE_ELEMENT_PROPERTIES;

    fn write_fields(&self, target: &mut JsonObject) {
        write_backbone_element_fields(self, target);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn id_mut(&mut self) -> &mut Option<String> {
        &mut self.id
    }

    fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    fn extension_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.extension
    }
}

impl ModifierExtensionBase for BackboneElement {
    fn modifier_extensions(&self) -> &[Extension] {
        self.modifier_extension.as_deref().unwrap_or(&[])
    }

    fn modifier_extension_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.modifier_extension
    }
}

/// Write `id` and `extension`.
pub fn write_element_fields(element: &Element, target: &mut JsonObject) {
    serialize_props_to(element, target, ELEMENT_PROPERTIES);
}

/// Write `id`, `extension` and `modifierExtension`.
pub fn write_backbone_element_fields(element: &BackboneElement, target: &mut JsonObject) {
    serialize_props_to(element, target, BACKBONE_ELEMENT_PROPERTIES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extension::ExtensionValue;
    use serde_json::json;

    #[test]
    fn test_backbone_fields_order() {
        let backbone = BackboneElement {
            modifier_extension: Some(vec![Extension::new(
                "http://example.org/mod",
                ExtensionValue::Boolean(true.into()),
            )]),
            extension: Some(vec![Extension::new(
                "http://example.org/ext",
                ExtensionValue::String("x".into()),
            )]),
            id: Some("b1".to_string()),
        };

        let mut out = JsonObject::new();
        write_backbone_element_fields(&backbone, &mut out);
        assert_eq!(
            out.keys().collect::<Vec<_>>(),
            vec!["id", "extension", "modifierExtension"]
        );
        assert_eq!(out["modifierExtension"][0]["valueBoolean"], json!(true));
    }

    #[test]
    fn test_element_from_json() {
        let element = Element::from_json(&json!({
            "id": "e1",
            "extension": [{ "url": "http://example.org", "valueCode": "a" }]
        }))
        .unwrap();

        assert_eq!(element.id.as_deref(), Some("e1"));
        assert_eq!(element.extension.as_ref().unwrap().len(), 1);
        assert!(Element::from_json(&json!("nope")).is_err());
    }

    #[test]
    fn test_empty_element_writes_nothing() {
        assert!(Element::default().to_json_object().is_empty());
        assert!(Element::default().is_empty());
        assert!(!Element::with_id("x").is_empty());
    }
}
