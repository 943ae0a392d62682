//! The model trait shared by every element, backbone element and resource
//!
//! A concrete type contributes three things: its ordered property list, a
//! [`PropertyAccess`] impl that maps each listed key onto a typed slot, and its
//! base (the universal fields it inherits). Everything else, including JSON
//! encoding, decoding, immutable updates and builders, is provided here.

use super::builder::Builder;
use super::extension::Extension;
use super::props::{
    assign_props, log_ignored_properties, serialize_props_to, JsonObject, PropertyAccess,
    RESOURCE_TYPE_KEY,
};
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Universal fields inherited from `Element`, `BackboneElement` or `DomainResource`.
pub trait BaseFields:
    PropertyAccess + Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Wire keys owned by the base, in the order they are written.
    const PROPERTY_NAMES: &'static [&'static str];

    /// Write the universal fields. Runs before the concrete type's own fields.
    fn write_fields(&self, target: &mut JsonObject);

    fn read_fields(&mut self, data: &JsonObject) -> Result<()> {
        assign_props(self, data, Self::PROPERTY_NAMES)
    }

    fn id(&self) -> Option<&str>;
    fn id_mut(&mut self) -> &mut Option<String>;

    fn extensions(&self) -> &[Extension];
    fn extension_mut(&mut self) -> &mut Option<Vec<Extension>>;
}

/// Bases that also carry `modifierExtension`.
pub trait ModifierExtensionBase: BaseFields {
    fn modifier_extensions(&self) -> &[Extension];
    fn modifier_extension_mut(&mut self) -> &mut Option<Vec<Extension>>;
}

pub trait Model:
    PropertyAccess + Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// FHIR type name, used in logs and validation messages (`Goal`, `Goal.target`).
    const TYPE_NAME: &'static str;

    /// `resourceType` discriminant; `None` for everything that is not a resource.
    const RESOURCE_TYPE: Option<&'static str> = None;

    /// Ordered wire keys of the type's own fields, shadows included.
    const PROPERTY_NAMES: &'static [&'static str];

    type Base: BaseFields;

    fn base(&self) -> &Self::Base;
    fn base_mut(&mut self) -> &mut Self::Base;

    fn to_json_object(&self) -> JsonObject {
        let mut out = JsonObject::new();
        if let Some(resource_type) = Self::RESOURCE_TYPE {
            out.insert(
                RESOURCE_TYPE_KEY.to_string(),
                Value::String(resource_type.to_string()),
            );
        }
        self.base().write_fields(&mut out);
        serialize_props_to(self, &mut out, Self::PROPERTY_NAMES);
        out
    }

    fn to_json(&self) -> Value {
        Value::Object(self.to_json_object())
    }

    fn from_json(value: &Value) -> Result<Self> {
        let data = value
            .as_object()
            .ok_or_else(|| Error::ExpectedObject(Self::TYPE_NAME.to_string()))?;
        Self::from_json_object(data)
    }

    fn from_json_object(data: &JsonObject) -> Result<Self> {
        if let Some(expected) = Self::RESOURCE_TYPE {
            check_resource_type(expected, data)?;
        }
        let mut model = Self::default();
        model.base_mut().read_fields(data)?;
        assign_props(&mut model, data, Self::PROPERTY_NAMES)?;
        log_ignored_properties(
            Self::TYPE_NAME,
            data,
            &[<Self::Base as BaseFields>::PROPERTY_NAMES, Self::PROPERTY_NAMES],
        );
        Ok(model)
    }

    /// New instance from the shallow merge of `self.to_json()` and `changes`.
    ///
    /// A `null` in `changes` removes the key. Switching a choice group requires
    /// nulling the old member; otherwise the merge holds two members and fails
    /// with [`Error::ChoiceConflict`].
    fn with(&self, changes: JsonObject) -> Result<Self> {
        let mut merged = self.to_json_object();
        for (key, value) in changes {
            merged.insert(key, value);
        }
        Self::from_json_object(&merged)
    }

    /// New instance computed from a copy of the current one.
    fn apply_transform<F>(&self, transform: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        transform(self.clone())
    }

    fn builder() -> Builder<Self> {
        Builder::new()
    }
}

/// `resourceType` must match when present. Absent is accepted for typed decoding.
pub(crate) fn check_resource_type(expected: &str, data: &JsonObject) -> Result<()> {
    match data.get(RESOURCE_TYPE_KEY) {
        None => Ok(()),
        Some(Value::String(found)) if found == expected => Ok(()),
        Some(found) => Err(Error::ResourceTypeMismatch {
            expected: expected.to_string(),
            found: found
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| found.to_string()),
        }),
    }
}

/// Route `serde` through the ordered engine so that `serde_json::to_string`
/// emits keys in property-list order.
macro_rules! impl_json_serde {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                where
                    S: ::serde::Serializer,
                {
                    ::serde::Serialize::serialize(
                        &$crate::core::model::Model::to_json_object(self),
                        serializer,
                    )
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                where
                    D: ::serde::Deserializer<'de>,
                {
                    let data: $crate::core::props::JsonObject =
                        ::serde::Deserialize::deserialize(deserializer)?;
                    <$ty as $crate::core::model::Model>::from_json_object(&data)
                        .map_err(<D::Error as ::serde::de::Error>::custom)
                }
            }
        )+
    };
}

pub(crate) use impl_json_serde;
