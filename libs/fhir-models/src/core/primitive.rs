//! Primitive values and their `_field` shadows
//!
//! On the wire a primitive field `status` may be paired with `_status`, an
//! [`Element`] carrying an `id` and extensions about the value. The two keys are
//! independent: either can be present without the other. [`Primitive`] keeps
//! both halves in one slot so that typed code sees a single field.

use super::element::Element;
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Rust types that map onto a FHIR primitive JSON representation.
pub trait PrimitiveValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// JSON form of the value. `None` leaves the key out of the output.
    fn to_wire(&self) -> Option<Value>;
    fn from_wire(value: Value) -> Result<Self>;
}

impl PrimitiveValue for String {
    fn to_wire(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(unexpected("string", &other)),
        }
    }
}

impl PrimitiveValue for bool {
    fn to_wire(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn from_wire(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| unexpected("boolean", &value))
    }
}

impl PrimitiveValue for i64 {
    fn to_wire(&self) -> Option<Value> {
        Some(Value::from(*self))
    }

    fn from_wire(value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| unexpected("integer", &value))
    }
}

/// FHIR `decimal`. The literal is kept digit for digit, trailing zeros included,
/// so `1.50` and `9007199254740993` are written back exactly as read.
impl PrimitiveValue for Decimal {
    fn to_wire(&self) -> Option<Value> {
        Number::from_str(&self.to_string()).ok().map(Value::Number)
    }

    fn from_wire(value: Value) -> Result<Self> {
        let Value::Number(number) = &value else {
            return Err(unexpected("decimal", &value));
        };
        let literal = number.to_string();
        Decimal::from_str_exact(&literal)
            .or_else(|_| Decimal::from_scientific(&literal))
            .map_err(|e| {
                Error::InvalidFieldValue(format!("decimal {literal} is not representable: {e}"))
            })
    }
}

fn unexpected(expected: &str, found: &Value) -> Error {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Error::InvalidFieldValue(format!("expected {expected}, found {kind}"))
}

/// A primitive value together with its shadow element.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<T> {
    pub value: Option<T>,
    /// Content of the `_field` shadow key
    pub element: Option<Element>,
}

impl<T> Default for Primitive<T> {
    fn default() -> Self {
        Self {
            value: None,
            element: None,
        }
    }
}

impl<T> Primitive<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            element: None,
        }
    }

    /// A shadow-only primitive: metadata about a value that is itself absent.
    pub fn shadow(element: Element) -> Self {
        Self {
            value: None,
            element: Some(element),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.element.is_none()
    }
}

impl<T> From<T> for Primitive<T> {
    fn from(value: T) -> Self {
        Primitive::new(value)
    }
}

impl From<&str> for Primitive<String> {
    fn from(value: &str) -> Self {
        Primitive::new(value.to_string())
    }
}

// ============================================================================
// Single-valued slots
// ============================================================================

pub fn encode_value<T: PrimitiveValue>(slot: Option<&Primitive<T>>) -> Option<Value> {
    slot.and_then(|p| p.value.as_ref()).and_then(PrimitiveValue::to_wire)
}

pub fn encode_element<T>(slot: Option<&Primitive<T>>) -> Option<Value> {
    slot.and_then(|p| p.element.as_ref()).map(|e| Value::Object(e.to_json_object()))
}

/// Decode the value half, keeping any shadow already present.
pub fn decode_value<T: PrimitiveValue>(
    slot: &mut Option<Primitive<T>>,
    value: Value,
) -> Result<()> {
    let decoded = T::from_wire(value)?;
    slot.get_or_insert_with(Primitive::default).value = Some(decoded);
    Ok(())
}

/// Decode the shadow half, keeping any value already present.
pub fn decode_element<T>(slot: &mut Option<Primitive<T>>, value: Value) -> Result<()> {
    let element = Element::from_json(&value)?;
    slot.get_or_insert_with(Primitive::default).element = Some(element);
    Ok(())
}

// ============================================================================
// Repeated slots
// ============================================================================
//
// `profile: ["a", null]` and `_profile: [null, {..}]` are aligned by index.
// Either array is omitted when none of its entries is populated.

pub fn encode_list_values<T: PrimitiveValue>(slot: Option<&[Primitive<T>]>) -> Option<Value> {
    let items = slot?;
    if items.iter().all(|p| p.value.is_none()) {
        return None;
    }
    Some(Value::Array(
        items
            .iter()
            .map(|p| {
                p.value
                    .as_ref()
                    .and_then(PrimitiveValue::to_wire)
                    .unwrap_or(Value::Null)
            })
            .collect(),
    ))
}

pub fn encode_list_elements<T>(slot: Option<&[Primitive<T>]>) -> Option<Value> {
    let items = slot?;
    if items.iter().all(|p| p.element.is_none()) {
        return None;
    }
    Some(Value::Array(
        items
            .iter()
            .map(|p| {
                p.element
                    .as_ref()
                    .map_or(Value::Null, |e| Value::Object(e.to_json_object()))
            })
            .collect(),
    ))
}

pub fn decode_list_values<T: PrimitiveValue>(
    slot: &mut Option<Vec<Primitive<T>>>,
    value: Value,
) -> Result<()> {
    let items = expect_array(value)?;
    let list = aligned(slot, items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_null() {
            list[idx].value = Some(T::from_wire(item).map_err(|e| e.in_field(format!("[{idx}]")))?);
        }
    }
    Ok(())
}

pub fn decode_list_elements<T>(slot: &mut Option<Vec<Primitive<T>>>, value: Value) -> Result<()> {
    let items = expect_array(value)?;
    let list = aligned(slot, items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_null() {
            list[idx].element =
                Some(Element::from_json(&item).map_err(|e| e.in_field(format!("[{idx}]")))?);
        }
    }
    Ok(())
}

fn expect_array(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(unexpected("array", &other)),
    }
}

/// Grow the list so that index `len - 1` exists.
fn aligned<T>(slot: &mut Option<Vec<Primitive<T>>>, len: usize) -> &mut Vec<Primitive<T>> {
    let list = slot.get_or_insert_with(Vec::new);
    if list.len() < len {
        list.resize_with(len, Primitive::default);
    }
    list
}
