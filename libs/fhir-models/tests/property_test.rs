//! Property-based tests using QuickCheck

use ferrum_resources::core::PropertyAccess;
use ferrum_resources::datatypes::{Coding, Quantity};
use ferrum_resources::resources::{GoalTarget, GoalTargetDetail};
use ferrum_resources::{JsonObject, Model, Primitive};
use quickcheck::{QuickCheck, TestResult};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Writable Coding keys with a valid value for each.
fn coding_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("userSelected", json!(true)),
        ("_display", json!({ "id": "d" })),
        ("code", json!("c")),
        ("system", json!("http://example.org/cs")),
        ("_code", json!({ "id": "c" })),
        ("display", json!("Display")),
        ("version", json!("1.0")),
        ("_system", json!({ "id": "s" })),
    ]
}

/// Property: output keys follow the property list, whatever the assignment order
#[test]
fn prop_key_order_is_declaration_order() {
    fn prop(mask: u8, order: Vec<u8>) -> TestResult {
        let mut chosen: Vec<(usize, (&str, Value))> = coding_fields()
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| mask & (1 << idx) != 0)
            .collect();
        chosen.sort_by_key(|(idx, _)| order.get(*idx).copied().unwrap_or(0));

        let mut coding = Coding::default();
        for (_, (key, value)) in &chosen {
            coding.write_property(key, value.clone()).unwrap();
        }

        let actual: Vec<String> = coding.to_json_object().keys().cloned().collect();
        let expected: Vec<String> = Coding::PROPERTY_NAMES
            .iter()
            .filter(|name| chosen.iter().any(|(_, (key, _))| key == *name))
            .map(|name| name.to_string())
            .collect();

        TestResult::from_bool(actual == expected)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(u8, Vec<u8>) -> TestResult);
}

/// Property: decode(encode(x)) equals x and serializes to the same text
#[test]
fn prop_quantity_round_trip() {
    fn prop(mantissa: i64, scale: u32, unit: String, comparator: bool) -> TestResult {
        let value = Decimal::new(mantissa, scale % 29);
        let mut quantity = Quantity::new(value, unit);
        if comparator {
            quantity.comparator = Some(Primitive::from("<="));
        }

        let decoded = Quantity::from_json(&quantity.to_json()).unwrap();
        let text = serde_json::to_string(&quantity).unwrap();

        let reparsed: Quantity = serde_json::from_str(&text).unwrap();

        TestResult::from_bool(
            decoded == quantity
                && reparsed.value() == Some(value)
                && serde_json::to_string(&decoded).unwrap() == text,
        )
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(i64, u32, String, bool) -> TestResult);
}

/// Property: exactly one detail key is emitted after any sequence of selections
#[test]
fn prop_detail_exclusive() {
    fn prop(selections: Vec<u8>) -> TestResult {
        if selections.is_empty() {
            return TestResult::discard();
        }

        let mut target = GoalTarget::default();
        for pick in &selections {
            let detail = match pick % 7 {
                0 => GoalTargetDetail::Quantity(Quantity::new(1, "kg")),
                1 => GoalTargetDetail::Range(Default::default()),
                2 => GoalTargetDetail::CodeableConcept(Default::default()),
                3 => GoalTargetDetail::String("s".into()),
                4 => GoalTargetDetail::Boolean(true.into()),
                5 => GoalTargetDetail::Integer(i64::from(*pick).into()),
                _ => GoalTargetDetail::Ratio(Default::default()),
            };
            target.set_detail(Some(detail));
        }

        let json = target.to_json_object();
        let detail_keys = json.keys().filter(|key| key.starts_with("detail")).count();
        TestResult::from_bool(detail_keys == 1)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<u8>) -> TestResult);
}

/// Property: x.with(c) equals the shallow merge of x and c, and x is unchanged
#[test]
fn prop_with_is_shallow_merge() {
    fn prop(base_mask: u8, change_mask: u8, remove_mask: u8) -> TestResult {
        let fields = coding_fields();

        let mut source = JsonObject::new();
        for (idx, (key, value)) in fields.iter().enumerate() {
            if base_mask & (1 << idx) != 0 {
                source.insert(key.to_string(), value.clone());
            }
        }
        let coding = Coding::from_json_object(&source).unwrap();
        let before = coding.to_json();

        let mut changes = JsonObject::new();
        for (idx, (key, _)) in fields.iter().enumerate() {
            if remove_mask & (1 << idx) != 0 {
                changes.insert(key.to_string(), Value::Null);
            } else if change_mask & (1 << idx) != 0 {
                let replacement = match *key {
                    "userSelected" => json!(false),
                    k if k.starts_with('_') => json!({ "id": "changed" }),
                    _ => json!("changed"),
                };
                changes.insert(key.to_string(), replacement);
            }
        }

        let mut expected = coding.to_json_object();
        for (key, value) in &changes {
            if value.is_null() {
                expected.remove(key);
            } else {
                expected.insert(key.clone(), value.clone());
            }
        }

        let updated = coding.with(changes).unwrap();
        TestResult::from_bool(
            updated.to_json() == Value::Object(expected) && coding.to_json() == before,
        )
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(u8, u8, u8) -> TestResult);
}
