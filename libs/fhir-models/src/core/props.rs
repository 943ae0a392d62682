//! Ordered property engine
//!
//! Every model exposes its wire keys through [`PropertyAccess`] and a constant
//! ordered list of names. Reading and writing JSON is driven entirely by that
//! list: [`assign_props`] copies present keys onto a model, and
//! [`serialize_props_to`] writes populated keys back out in list order.

use crate::error::Result;
use serde_json::{Map, Value};

/// A JSON object as it appears on the wire. Key order is insertion order.
pub type JsonObject = Map<String, Value>;

/// Discriminant key for top-level resources.
pub const RESOURCE_TYPE_KEY: &str = "resourceType";

/// Per-key access to a model's wire representation.
///
/// Names that the implementor does not know are not an error: reads return
/// `None` and writes are ignored.
pub trait PropertyAccess {
    /// Current wire value for `name`, or `None` when the slot is absent.
    fn read_property(&self, name: &str) -> Option<Value>;

    /// Decode `value` into the slot named `name`.
    fn write_property(&mut self, name: &str, value: Value) -> Result<()>;
}

/// Copy every key of `property_names` that is present in `data` onto `target`.
///
/// Absent keys, and keys holding `null`, leave the slot untouched. Keys in
/// `data` that are not listed are ignored.
pub fn assign_props<T>(target: &mut T, data: &JsonObject, property_names: &[&str]) -> Result<()>
where
    T: PropertyAccess + ?Sized,
{
    for name in property_names {
        match data.get(*name) {
            None | Some(Value::Null) => {}
            Some(value) => target
                .write_property(name, value.clone())
                .map_err(|e| e.in_field(*name))?,
        }
    }
    Ok(())
}

/// Write every populated slot of `source` into `target`, in `property_names` order.
pub fn serialize_props_to<T>(source: &T, target: &mut JsonObject, property_names: &[&str])
where
    T: PropertyAccess + ?Sized,
{
    for name in property_names {
        if let Some(value) = source.read_property(name) {
            target.insert((*name).to_string(), value);
        }
    }
}

/// Log keys of `data` that none of `known` lists claims.
pub(crate) fn log_ignored_properties(type_name: &str, data: &JsonObject, known: &[&[&str]]) {
    for key in data.keys() {
        if key == RESOURCE_TYPE_KEY {
            continue;
        }
        if !known.iter().any(|names| names.contains(&key.as_str())) {
            tracing::debug!(type_name, key = %key, "ignoring unknown property");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    /// Minimal model with the ordered list `['a', '_a', 'b']`.
    #[derive(Default)]
    struct Abc {
        a: Option<Value>,
        a_shadow: Option<Value>,
        b: Option<Value>,
    }

    const ABC_PROPERTIES: &[&str] = &["a", "_a", "b"];

    impl PropertyAccess for Abc {
        fn read_property(&self, name: &str) -> Option<Value> {
            match name {
                "a" => self.a.clone(),
                "_a" => self.a_shadow.clone(),
                "b" => self.b.clone(),
                _ => None,
            }
        }

        fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "a" => self.a = Some(value),
                "_a" => self.a_shadow = Some(value),
                "b" if value.is_string() => self.b = Some(value),
                "b" => return Err(Error::InvalidFieldValue("expected string".into())),
                _ => {}
            }
            Ok(())
        }
    }

    #[test]
    fn test_only_populated_keys_are_written() {
        let model = Abc {
            b: Some(json!("bee")),
            ..Default::default()
        };

        let mut out = JsonObject::new();
        serialize_props_to(&model, &mut out, ABC_PROPERTIES);

        assert_eq!(Value::Object(out.clone()), json!({ "b": "bee" }));
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_key_order_follows_list_not_assignment() {
        let mut model = Abc::default();
        model.b = Some(json!(1));
        model.a_shadow = Some(json!({ "id": "x" }));
        model.a = Some(json!(true));

        let mut out = JsonObject::new();
        serialize_props_to(&model, &mut out, ABC_PROPERTIES);

        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["a", "_a", "b"]);
    }

    #[test]
    fn test_assign_skips_absent_null_and_unknown() {
        let data = json!({ "a": 1, "_a": null, "zzz": "ignored", "b": "x" });
        let mut model = Abc::default();
        assign_props(&mut model, data.as_object().unwrap(), ABC_PROPERTIES).unwrap();

        assert_eq!(model.a, Some(json!(1)));
        assert!(model.a_shadow.is_none());
        assert_eq!(model.b, Some(json!("x")));
    }

    #[test]
    fn test_assign_reports_field_path() {
        let data = json!({ "b": 42 });
        let mut model = Abc::default();
        let err = assign_props(&mut model, data.as_object().unwrap(), ABC_PROPERTIES).unwrap_err();

        match err {
            Error::InField { field, .. } => assert_eq!(field, "b"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_appends_after_existing_keys() {
        let model = Abc {
            a: Some(json!("v")),
            ..Default::default()
        };
        let mut out = JsonObject::new();
        out.insert("id".into(), json!("first"));
        serialize_props_to(&model, &mut out, ABC_PROPERTIES);

        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["id", "a"]);
    }
}
