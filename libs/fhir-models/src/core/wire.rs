//! Slot-level encode/decode helpers used by every [`PropertyAccess`] impl
//!
//! [`PropertyAccess`]: super::props::PropertyAccess

use super::model::Model;
use crate::error::{Error, Result};
use serde_json::Value;

pub fn encode<M: Model>(slot: Option<&M>) -> Option<Value> {
    slot.map(Model::to_json)
}

pub fn encode_list<M: Model>(slot: Option<&[M]>) -> Option<Value> {
    slot.map(|items| Value::Array(items.iter().map(Model::to_json).collect()))
}

pub fn decode<M: Model>(value: Value) -> Result<M> {
    M::from_json(&value)
}

pub fn decode_list<M: Model>(value: Value) -> Result<Vec<M>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| M::from_json(item).map_err(|e| e.in_field(format!("[{idx}]"))))
            .collect(),
        _ => Err(Error::InvalidFieldValue(format!(
            "expected an array of {}",
            M::TYPE_NAME
        ))),
    }
}

/// Plain string slots without a shadow (`Element.id`, `Extension.url`, xhtml).
pub fn encode_string(slot: Option<&str>) -> Option<Value> {
    slot.map(|s| Value::String(s.to_string()))
}

pub fn decode_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(Error::InvalidFieldValue("expected string".to_string())),
    }
}
