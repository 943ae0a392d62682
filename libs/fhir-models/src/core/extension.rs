//! FHIR Extension with a closed `value[x]` choice plus a raw fallback
//!
//! Known value types decode into typed members. A `value<Type>` key for a type
//! this crate does not model (a newer FHIR release, for instance) is kept as
//! [`ExtensionValue::Raw`] and written back unchanged.

use super::choice::{
    self, decode_complex, decode_primitive, encode_complex, encode_primitive, ChoiceType,
};
use super::element::{write_element_fields, Element};
use super::model::{impl_json_serde, BaseFields, Model};
use super::primitive::Primitive;
use super::props::{
    assign_props, log_ignored_properties, serialize_props_to, JsonObject, PropertyAccess,
};
use super::validation::Validate;
use super::wire;
use crate::datatypes::{
    Annotation, CodeableConcept, Coding, Identifier, Period, Quantity, Range, Ratio, Reference,
};
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde_json::Value;

pub const EXTENSION_PROPERTIES: &[&str] = &[
    "url",
    "valueBase64Binary",
    "_valueBase64Binary",
    "valueBoolean",
    "_valueBoolean",
    "valueCanonical",
    "_valueCanonical",
    "valueCode",
    "_valueCode",
    "valueDate",
    "_valueDate",
    "valueDateTime",
    "_valueDateTime",
    "valueDecimal",
    "_valueDecimal",
    "valueId",
    "_valueId",
    "valueInstant",
    "_valueInstant",
    "valueInteger",
    "_valueInteger",
    "valueMarkdown",
    "_valueMarkdown",
    "valueOid",
    "_valueOid",
    "valuePositiveInt",
    "_valuePositiveInt",
    "valueString",
    "_valueString",
    "valueTime",
    "_valueTime",
    "valueUnsignedInt",
    "_valueUnsignedInt",
    "valueUri",
    "_valueUri",
    "valueUrl",
    "_valueUrl",
    "valueUuid",
    "_valueUuid",
    "valueAnnotation",
    "valueCodeableConcept",
    "valueCoding",
    "valueIdentifier",
    "valuePeriod",
    "valueQuantity",
    "valueRange",
    "valueRatio",
    "valueReference",
];

/// Optional extension element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extension {
    /// `id` and nested `extension`
    pub base: Element,

    /// Identifies the meaning of the extension
    pub url: Option<String>,

    /// Value of extension
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            base: Element::default(),
            url: Some(url.into()),
            value: Some(value),
        }
    }

    /// A complex extension: no value, only nested extensions.
    pub fn nested(url: impl Into<String>, children: Vec<Extension>) -> Self {
        Self {
            base: Element {
                id: None,
                extension: Some(children),
            },
            url: Some(url.into()),
            value: None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn value(&self) -> Option<&ExtensionValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<ExtensionValue>) -> Option<ExtensionValue> {
        choice::set_choice_type(&mut self.value, value)
    }

    /// Pick up `value<Type>` keys that no known member claims.
    fn read_raw_value(&mut self, data: &JsonObject) -> Result<()> {
        for (key, value) in data {
            let Some(suffix) = raw_value_suffix(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let shadow = key.starts_with('_');
            match &mut self.value {
                None => {
                    let mut raw = ExtensionValue::Raw {
                        type_suffix: suffix.to_string(),
                        value: None,
                        shadow: None,
                    };
                    raw.decode_member(shadow, value.clone())?;
                    self.value = Some(raw);
                }
                Some(existing) if existing.type_suffix() == suffix => {
                    existing.decode_member(shadow, value.clone())?;
                }
                Some(existing) => {
                    return Err(Error::ChoiceConflict {
                        group: "value[x]".to_string(),
                        existing: existing.wire_key(),
                        attempted: key.clone(),
                    })
                }
            }
            tracing::debug!(key = %key, "keeping unrecognized extension value type");
        }
        Ok(())
    }
}

/// `valueFoo` / `_valueFoo` with an uppercase suffix that is not a known member.
fn raw_value_suffix(key: &str) -> Option<&str> {
    let name = key.strip_prefix('_').unwrap_or(key);
    let suffix = name.strip_prefix(ExtensionValue::BASE_NAME)?;
    let starts_upper = suffix.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if starts_upper && !ExtensionValue::owns_key(key) {
        Some(suffix)
    } else {
        None
    }
}

impl PropertyAccess for Extension {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "url" => wire::encode_string(self.url.as_deref()),
            key => choice::read_choice(self.value.as_ref(), key),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "url" => self.url = Some(wire::decode_string(value)?),
            key if ExtensionValue::owns_key(key) => {
                choice::write_choice(&mut self.value, key, value)?
            }
            _ => {}
        }
        Ok(())
    }
}

impl Model for Extension {
    const TYPE_NAME: &'static str = "Extension";
    const PROPERTY_NAMES: &'static [&'static str] = EXTENSION_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }

    fn to_json_object(&self) -> JsonObject {
        let mut out = JsonObject::new();
        write_element_fields(&self.base, &mut out);
        serialize_props_to(self, &mut out, EXTENSION_PROPERTIES);
        if let Some(ExtensionValue::Raw {
            type_suffix,
            value,
            shadow,
        }) = &self.value
        {
            if let Some(value) = value {
                out.insert(format!("value{type_suffix}"), value.clone());
            }
            if let Some(shadow) = shadow {
                out.insert(format!("_value{type_suffix}"), shadow.clone());
            }
        }
        out
    }

    fn from_json_object(data: &JsonObject) -> Result<Self> {
        let mut extension = Self::default();
        extension.base.read_fields(data)?;
        assign_props(&mut extension, data, EXTENSION_PROPERTIES)?;
        extension.read_raw_value(data)?;
        let unclaimed: JsonObject = data
            .iter()
            .filter(|(key, _)| raw_value_suffix(key).is_none())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        log_ignored_properties(
            Self::TYPE_NAME,
            &unclaimed,
            &[<Element as BaseFields>::PROPERTY_NAMES, EXTENSION_PROPERTIES],
        );
        Ok(extension)
    }
}

impl Validate for Extension {}

impl_json_serde!(Extension);

/// Extension.value[x]
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    Base64Binary(Primitive<String>),
    Boolean(Primitive<bool>),
    Canonical(Primitive<String>),
    Code(Primitive<String>),
    Date(Primitive<String>),
    DateTime(Primitive<String>),
    Decimal(Primitive<Decimal>),
    Id(Primitive<String>),
    Instant(Primitive<String>),
    Integer(Primitive<i64>),
    Markdown(Primitive<String>),
    Oid(Primitive<String>),
    PositiveInt(Primitive<i64>),
    String(Primitive<String>),
    Time(Primitive<String>),
    UnsignedInt(Primitive<i64>),
    Uri(Primitive<String>),
    Url(Primitive<String>),
    Uuid(Primitive<String>),
    Annotation(Annotation),
    CodeableConcept(CodeableConcept),
    Coding(Coding),
    Identifier(Identifier),
    Period(Period),
    Quantity(Quantity),
    Range(Range),
    Ratio(Ratio),
    Reference(Reference),
    /// A value type this crate does not model, kept verbatim
    Raw {
        type_suffix: String,
        value: Option<Value>,
        shadow: Option<Value>,
    },
}

impl ChoiceType for ExtensionValue {
    const BASE_NAME: &'static str = "value";
    const TYPE_SUFFIXES: &'static [&'static str] = &[
        "Base64Binary",
        "Boolean",
        "Canonical",
        "Code",
        "Date",
        "DateTime",
        "Decimal",
        "Id",
        "Instant",
        "Integer",
        "Markdown",
        "Oid",
        "PositiveInt",
        "String",
        "Time",
        "UnsignedInt",
        "Uri",
        "Url",
        "Uuid",
        "Annotation",
        "CodeableConcept",
        "Coding",
        "Identifier",
        "Period",
        "Quantity",
        "Range",
        "Ratio",
        "Reference",
    ];

    fn type_suffix(&self) -> &str {
        match self {
            Self::Base64Binary(_) => "Base64Binary",
            Self::Boolean(_) => "Boolean",
            Self::Canonical(_) => "Canonical",
            Self::Code(_) => "Code",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Decimal(_) => "Decimal",
            Self::Id(_) => "Id",
            Self::Instant(_) => "Instant",
            Self::Integer(_) => "Integer",
            Self::Markdown(_) => "Markdown",
            Self::Oid(_) => "Oid",
            Self::PositiveInt(_) => "PositiveInt",
            Self::String(_) => "String",
            Self::Time(_) => "Time",
            Self::UnsignedInt(_) => "UnsignedInt",
            Self::Uri(_) => "Uri",
            Self::Url(_) => "Url",
            Self::Uuid(_) => "Uuid",
            Self::Annotation(_) => "Annotation",
            Self::CodeableConcept(_) => "CodeableConcept",
            Self::Coding(_) => "Coding",
            Self::Identifier(_) => "Identifier",
            Self::Period(_) => "Period",
            Self::Quantity(_) => "Quantity",
            Self::Range(_) => "Range",
            Self::Ratio(_) => "Ratio",
            Self::Reference(_) => "Reference",
            Self::Raw { type_suffix, .. } => type_suffix,
        }
    }

    fn empty_member(suffix: &str) -> Option<Self> {
        let member = match suffix {
            "Base64Binary" => Self::Base64Binary(Primitive::default()),
            "Boolean" => Self::Boolean(Primitive::default()),
            "Canonical" => Self::Canonical(Primitive::default()),
            "Code" => Self::Code(Primitive::default()),
            "Date" => Self::Date(Primitive::default()),
            "DateTime" => Self::DateTime(Primitive::default()),
            "Decimal" => Self::Decimal(Primitive::default()),
            "Id" => Self::Id(Primitive::default()),
            "Instant" => Self::Instant(Primitive::default()),
            "Integer" => Self::Integer(Primitive::default()),
            "Markdown" => Self::Markdown(Primitive::default()),
            "Oid" => Self::Oid(Primitive::default()),
            "PositiveInt" => Self::PositiveInt(Primitive::default()),
            "String" => Self::String(Primitive::default()),
            "Time" => Self::Time(Primitive::default()),
            "UnsignedInt" => Self::UnsignedInt(Primitive::default()),
            "Uri" => Self::Uri(Primitive::default()),
            "Url" => Self::Url(Primitive::default()),
            "Uuid" => Self::Uuid(Primitive::default()),
            "Annotation" => Self::Annotation(Annotation::default()),
            "CodeableConcept" => Self::CodeableConcept(CodeableConcept::default()),
            "Coding" => Self::Coding(Coding::default()),
            "Identifier" => Self::Identifier(Identifier::default()),
            "Period" => Self::Period(Period::default()),
            "Quantity" => Self::Quantity(Quantity::default()),
            "Range" => Self::Range(Range::default()),
            "Ratio" => Self::Ratio(Ratio::default()),
            "Reference" => Self::Reference(Reference::default()),
            _ => return None,
        };
        Some(member)
    }

    fn encode_member(&self, shadow: bool) -> Option<Value> {
        match self {
            Self::Base64Binary(p)
            | Self::Canonical(p)
            | Self::Code(p)
            | Self::Date(p)
            | Self::DateTime(p)
            | Self::Id(p)
            | Self::Instant(p)
            | Self::Markdown(p)
            | Self::Oid(p)
            | Self::String(p)
            | Self::Time(p)
            | Self::Uri(p)
            | Self::Url(p)
            | Self::Uuid(p) => encode_primitive(p, shadow),
            Self::Integer(p) | Self::PositiveInt(p) | Self::UnsignedInt(p) => {
                encode_primitive(p, shadow)
            }
            Self::Boolean(p) => encode_primitive(p, shadow),
            Self::Decimal(p) => encode_primitive(p, shadow),
            Self::Annotation(v) => encode_complex(v, shadow),
            Self::CodeableConcept(v) => encode_complex(v, shadow),
            Self::Coding(v) => encode_complex(v, shadow),
            Self::Identifier(v) => encode_complex(v, shadow),
            Self::Period(v) => encode_complex(v, shadow),
            Self::Quantity(v) => encode_complex(v, shadow),
            Self::Range(v) => encode_complex(v, shadow),
            Self::Ratio(v) => encode_complex(v, shadow),
            Self::Reference(v) => encode_complex(v, shadow),
            Self::Raw { value, shadow: raw_shadow, .. } => {
                if shadow {
                    raw_shadow.clone()
                } else {
                    value.clone()
                }
            }
        }
    }

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
        match self {
            Self::Base64Binary(p)
            | Self::Canonical(p)
            | Self::Code(p)
            | Self::Date(p)
            | Self::DateTime(p)
            | Self::Id(p)
            | Self::Instant(p)
            | Self::Markdown(p)
            | Self::Oid(p)
            | Self::String(p)
            | Self::Time(p)
            | Self::Uri(p)
            | Self::Url(p)
            | Self::Uuid(p) => decode_primitive(p, shadow, value),
            Self::Integer(p) | Self::PositiveInt(p) | Self::UnsignedInt(p) => {
                decode_primitive(p, shadow, value)
            }
            Self::Boolean(p) => decode_primitive(p, shadow, value),
            Self::Decimal(p) => decode_primitive(p, shadow, value),
            Self::Annotation(v) => decode_complex(v, shadow, value),
            Self::CodeableConcept(v) => decode_complex(v, shadow, value),
            Self::Coding(v) => decode_complex(v, shadow, value),
            Self::Identifier(v) => decode_complex(v, shadow, value),
            Self::Period(v) => decode_complex(v, shadow, value),
            Self::Quantity(v) => decode_complex(v, shadow, value),
            Self::Range(v) => decode_complex(v, shadow, value),
            Self::Ratio(v) => decode_complex(v, shadow, value),
            Self::Reference(v) => decode_complex(v, shadow, value),
            Self::Raw {
                value: raw_value,
                shadow: raw_shadow,
                ..
            } => {
                if shadow {
                    *raw_shadow = Some(value);
                } else {
                    *raw_value = Some(value);
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_value_round_trip() {
        let input = json!({
            "url": "http://example.org/fhir/StructureDefinition/flag",
            "valueBoolean": true,
            "_valueBoolean": { "id": "flag-meta" }
        });

        let ext = Extension::from_json(&input).unwrap();
        assert!(matches!(ext.value(), Some(ExtensionValue::Boolean(p)) if p.value == Some(true)));
        assert_eq!(ext.to_json(), input);
    }

    #[test]
    fn test_raw_value_is_preserved() {
        let input = json!({
            "url": "http://example.org/fhir/StructureDefinition/future",
            "valueInteger64": "9007199254740993",
            "_valueInteger64": { "id": "big" }
        });

        let ext = Extension::from_json(&input).unwrap();
        match ext.value() {
            Some(ExtensionValue::Raw { type_suffix, .. }) => assert_eq!(type_suffix, "Integer64"),
            other => panic!("expected raw value, got {other:?}"),
        }
        assert_eq!(ext.to_json(), input);
        assert_eq!(
            ext.to_json_object().keys().collect::<Vec<_>>(),
            vec!["url", "valueInteger64", "_valueInteger64"]
        );
    }

    #[test]
    fn test_two_values_are_rejected() {
        let known_twice = json!({ "url": "u", "valueString": "a", "valueCode": "b" });
        assert!(matches!(
            Extension::from_json(&known_twice),
            Err(Error::InField { .. })
        ));

        let known_and_raw = json!({ "url": "u", "valueString": "a", "valueInteger64": "1" });
        assert!(matches!(
            Extension::from_json(&known_and_raw),
            Err(Error::ChoiceConflict { .. })
        ));
    }

    #[test]
    fn test_nested_extension_order() {
        let ext = Extension::nested(
            "http://example.org/complex",
            vec![Extension::new("part", ExtensionValue::Code("a".into()))],
        );
        let json = ext.to_json_object();
        assert_eq!(json.keys().collect::<Vec<_>>(), vec!["extension", "url"]);
        assert_eq!(json["extension"][0]["valueCode"], json!("a"));
    }

    #[test]
    fn test_decimal_value_keeps_every_digit() {
        let text = r#"{"url":"http://example.org/big","valueDecimal":12345678901234567890}"#;
        let ext: Extension = serde_json::from_str(text).unwrap();
        assert!(matches!(ext.value(), Some(ExtensionValue::Decimal(_))));
        assert_eq!(serde_json::to_string(&ext).unwrap(), text);

        let precise =
            r#"{"url":"http://example.org/pi","valueDecimal":3.14159265358979323846264338}"#;
        let ext: Extension = serde_json::from_str(precise).unwrap();
        assert_eq!(serde_json::to_string(&ext).unwrap(), precise);
    }

    #[test]
    fn test_complex_value() {
        let input = json!({
            "url": "http://example.org/dose",
            "valueQuantity": { "value": 5, "unit": "mg" }
        });
        let ext = Extension::from_json(&input).unwrap();
        assert!(matches!(ext.value(), Some(ExtensionValue::Quantity(_))));
        assert_eq!(ext.to_json(), input);
    }

    #[test]
    fn test_set_value_switches_member() {
        let mut ext = Extension::new("u", ExtensionValue::String("a".into()));
        ext.set_value(Some(ExtensionValue::Integer(4.into())));
        let json = ext.to_json();
        assert_eq!(json, json!({ "url": "u", "valueInteger": 4 }));
    }

    #[test]
    fn test_serde_uses_wire_order() {
        let ext = Extension::new("u", ExtensionValue::Code("c".into()));
        let text = serde_json::to_string(&ext).unwrap();
        assert_eq!(text, r#"{"url":"u","valueCode":"c"}"#);

        let back: Extension = serde_json::from_str(&text).unwrap();
        assert_eq!(back, ext);
    }
}
