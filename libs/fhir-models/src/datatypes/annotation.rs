//! Annotation, a text note with an author choice

use super::Reference;
use crate::core::choice::{self, decode_complex, decode_primitive, encode_complex, encode_primitive};
use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{ChoiceType, Element, Model, PropertyAccess};
use crate::error::Result;
use serde_json::Value;

pub const ANNOTATION_PROPERTIES: &[&str] = &[
    "authorReference",
    "authorString",
    "_authorString",
    "time",
    "_time",
    "text",
    "_text",
];

/// A text note which also contains information about who made the statement and when
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotation {
    /// Element id and extensions
    pub base: Element,
    /// Individual responsible for the annotation
    pub author: Option<AnnotationAuthor>,
    /// When the annotation was made
    pub time: Option<Primitive<String>>,
    /// The annotation, as markdown
    pub text: Option<Primitive<String>>,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(Primitive::new(text.into())),
            ..Default::default()
        }
    }

    pub fn by(mut self, author: AnnotationAuthor) -> Self {
        self.author = Some(author);
        self
    }

    pub fn set_author(&mut self, author: Option<AnnotationAuthor>) -> Option<AnnotationAuthor> {
        choice::set_choice_type(&mut self.author, author)
    }
}

impl PropertyAccess for Annotation {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "time" => primitive::encode_value(self.time.as_ref()),
            "_time" => primitive::encode_element(self.time.as_ref()),
            "text" => primitive::encode_value(self.text.as_ref()),
            "_text" => primitive::encode_element(self.text.as_ref()),
            key => choice::read_choice(self.author.as_ref(), key),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "time" => primitive::decode_value(&mut self.time, value),
            "_time" => primitive::decode_element(&mut self.time, value),
            "text" => primitive::decode_value(&mut self.text, value),
            "_text" => primitive::decode_element(&mut self.text, value),
            key if AnnotationAuthor::owns_key(key) => {
                choice::write_choice(&mut self.author, key, value)
            }
            _ => Ok(()),
        }
    }
}

impl Model for Annotation {
    const TYPE_NAME: &'static str = "Annotation";
    const PROPERTY_NAMES: &'static [&'static str] = ANNOTATION_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

/// Annotation.author[x]
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationAuthor {
    Reference(Reference),
    String(Primitive<String>),
}

impl ChoiceType for AnnotationAuthor {
    const BASE_NAME: &'static str = "author";
    const TYPE_SUFFIXES: &'static [&'static str] = &["Reference", "String"];

    fn type_suffix(&self) -> &str {
        match self {
            Self::Reference(_) => "Reference",
            Self::String(_) => "String",
        }
    }

    fn empty_member(suffix: &str) -> Option<Self> {
        match suffix {
            "Reference" => Some(Self::Reference(Reference::default())),
            "String" => Some(Self::String(Primitive::default())),
            _ => None,
        }
    }

    fn encode_member(&self, shadow: bool) -> Option<Value> {
        match self {
            Self::Reference(v) => encode_complex(v, shadow),
            Self::String(p) => encode_primitive(p, shadow),
        }
    }

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
        match self {
            Self::Reference(v) => decode_complex(v, shadow, value),
            Self::String(p) => decode_primitive(p, shadow, value),
        }
    }
}

impl_json_serde!(Annotation);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_choice_position() {
        let note = Annotation::new("Patient is motivated")
            .by(AnnotationAuthor::String("Dr. Adams".into()));
        assert_eq!(
            note.to_json_object().keys().collect::<Vec<_>>(),
            vec!["authorString", "text"]
        );
    }

    #[test]
    fn test_switch_author() {
        let mut note = Annotation::from_json(&json!({
            "authorString": "nurse",
            "_authorString": { "id": "a" },
            "text": "n"
        }))
        .unwrap();

        note.set_author(Some(AnnotationAuthor::Reference(Reference::to("Practitioner/1"))));
        assert_eq!(
            note.to_json(),
            json!({ "authorReference": { "reference": "Practitioner/1" }, "text": "n" })
        );
    }

    #[test]
    fn test_two_authors_rejected() {
        let err = Annotation::from_json(&json!({
            "authorReference": { "reference": "Practitioner/1" },
            "authorString": "nurse"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("author[x]"));
    }
}
