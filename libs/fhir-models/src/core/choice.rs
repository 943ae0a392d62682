//! Choice types (`value[x]` and friends)
//!
//! The wire format spreads one polymorphic value over a fixed set of sibling
//! keys (`valueQuantity`, `valueString`, `_valueString`, ...). In Rust a choice
//! group is an enum implementing [`ChoiceType`] and stored as `Option<C>`, so at
//! most one member can be populated. The helpers here translate between the
//! enum and the flat keys, and refuse input that populates two members.

use super::element::Element;
use super::model::Model;
use super::primitive::{self, Primitive, PrimitiveValue};
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

pub trait ChoiceType: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Key prefix shared by every member, e.g. `detail` for `detail[x]`.
    const BASE_NAME: &'static str;

    /// Type suffixes of the members, in declaration order.
    const TYPE_SUFFIXES: &'static [&'static str];

    fn type_suffix(&self) -> &str;

    /// A member of type `suffix` with nothing populated yet.
    fn empty_member(suffix: &str) -> Option<Self>;

    /// Wire value of the member (`shadow == false`) or of its `_` key.
    fn encode_member(&self, shadow: bool) -> Option<Value>;

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()>;

    fn wire_key(&self) -> String {
        format!("{}{}", Self::BASE_NAME, self.type_suffix())
    }

    /// Whether `key` (or its shadow form) names a member of this group.
    fn owns_key(key: &str) -> bool {
        parse_key::<Self>(key).is_some()
    }
}

/// Split `_valueString` into (`String`, shadow = true).
fn parse_key<C: ChoiceType>(key: &str) -> Option<(&'static str, bool)> {
    let (name, shadow) = match key.strip_prefix('_') {
        Some(rest) => (rest, true),
        None => (key, false),
    };
    let suffix = name.strip_prefix(C::BASE_NAME)?;
    C::TYPE_SUFFIXES
        .iter()
        .copied()
        .find(|candidate| *candidate == suffix)
        .map(|found| (found, shadow))
}

fn group_name<C: ChoiceType>() -> String {
    format!("{}[x]", C::BASE_NAME)
}

fn unknown_member<C: ChoiceType>(key: &str) -> Error {
    Error::UnknownChoiceMember {
        group: group_name::<C>(),
        key: key.to_string(),
    }
}

/// Wire value for `key` if it names the populated member.
pub fn read_choice<C: ChoiceType>(slot: Option<&C>, key: &str) -> Option<Value> {
    let (suffix, shadow) = parse_key::<C>(key)?;
    let member = slot?;
    if member.type_suffix() != suffix {
        return None;
    }
    member.encode_member(shadow)
}

/// Decode `value` into the member named by `key`.
///
/// Writing the value and the shadow of the same member merges them. Writing a
/// different member while one is populated is a [`Error::ChoiceConflict`].
pub fn write_choice<C: ChoiceType>(slot: &mut Option<C>, key: &str, value: Value) -> Result<()> {
    let (suffix, shadow) = parse_key::<C>(key).ok_or_else(|| unknown_member::<C>(key))?;
    match slot {
        Some(member) if member.type_suffix() == suffix => member.decode_member(shadow, value),
        Some(member) => Err(Error::ChoiceConflict {
            group: group_name::<C>(),
            existing: member.wire_key(),
            attempted: key.to_string(),
        }),
        None => {
            let mut member = C::empty_member(suffix).ok_or_else(|| unknown_member::<C>(key))?;
            member.decode_member(shadow, value)?;
            *slot = Some(member);
            Ok(())
        }
    }
}

/// Select `value` as the group's only member, dropping whatever was there.
///
/// `None` clears the whole group. Returns the previous member.
pub fn set_choice_type<C: ChoiceType>(slot: &mut Option<C>, value: Option<C>) -> Option<C> {
    match (slot.as_ref(), value.as_ref()) {
        (Some(previous), Some(next)) if previous.type_suffix() != next.type_suffix() => {
            tracing::debug!(
                group = C::BASE_NAME,
                from = %previous.wire_key(),
                to = %next.wire_key(),
                "replacing choice member"
            );
        }
        (Some(previous), None) => {
            tracing::debug!(
                group = C::BASE_NAME,
                from = %previous.wire_key(),
                "clearing choice group"
            );
        }
        _ => {}
    }
    std::mem::replace(slot, value)
}

/// Wire-key form of [`set_choice_type`].
///
/// Siblings of `key`'s member are cleared; the member's own value or shadow is
/// kept so that `valueString` and `_valueString` can be set one after another.
/// On error the slot is left as it was.
pub fn set_choice_member<C: ChoiceType>(
    slot: &mut Option<C>,
    key: &str,
    value: Value,
) -> Result<()> {
    let (suffix, _) = parse_key::<C>(key).ok_or_else(|| unknown_member::<C>(key))?;
    let mut next = match slot.as_ref() {
        Some(member) if member.type_suffix() == suffix => Some(member.clone()),
        _ => None,
    };
    write_choice(&mut next, key, value)?;
    set_choice_type(slot, next);
    Ok(())
}

// ============================================================================
// Member helpers for `ChoiceType` impls
// ============================================================================

pub fn encode_primitive<T: PrimitiveValue>(member: &Primitive<T>, shadow: bool) -> Option<Value> {
    if shadow {
        primitive::encode_element(Some(member))
    } else {
        primitive::encode_value(Some(member))
    }
}

pub fn decode_primitive<T: PrimitiveValue>(
    member: &mut Primitive<T>,
    shadow: bool,
    value: Value,
) -> Result<()> {
    if shadow {
        member.element = Some(Element::from_json(&value)?);
    } else {
        member.value = Some(T::from_wire(value)?);
    }
    Ok(())
}

pub fn encode_complex<M: Model>(member: &M, shadow: bool) -> Option<Value> {
    (!shadow).then(|| member.to_json())
}

pub fn decode_complex<M: Model>(member: &mut M, shadow: bool, value: Value) -> Result<()> {
    if shadow {
        return Err(Error::InvalidFieldValue(format!(
            "{} choice members have no shadow element",
            M::TYPE_NAME
        )));
    }
    *member = M::from_json(&value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Answer {
        String(Primitive<String>),
        Boolean(Primitive<bool>),
        Integer(Primitive<i64>),
    }

    impl ChoiceType for Answer {
        const BASE_NAME: &'static str = "answer";
        const TYPE_SUFFIXES: &'static [&'static str] = &["String", "Boolean", "Integer"];

        fn type_suffix(&self) -> &str {
            match self {
                Self::String(_) => "String",
                Self::Boolean(_) => "Boolean",
                Self::Integer(_) => "Integer",
            }
        }

        fn empty_member(suffix: &str) -> Option<Self> {
            match suffix {
                "String" => Some(Self::String(Primitive::default())),
                "Boolean" => Some(Self::Boolean(Primitive::default())),
                "Integer" => Some(Self::Integer(Primitive::default())),
                _ => None,
            }
        }

        fn encode_member(&self, shadow: bool) -> Option<Value> {
            match self {
                Self::String(p) => encode_primitive(p, shadow),
                Self::Boolean(p) => encode_primitive(p, shadow),
                Self::Integer(p) => encode_primitive(p, shadow),
            }
        }

        fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
            match self {
                Self::String(p) => decode_primitive(p, shadow, value),
                Self::Boolean(p) => decode_primitive(p, shadow, value),
                Self::Integer(p) => decode_primitive(p, shadow, value),
            }
        }
    }

    #[test]
    fn test_owns_key() {
        assert!(Answer::owns_key("answerString"));
        assert!(Answer::owns_key("_answerBoolean"));
        assert!(!Answer::owns_key("answer"));
        assert!(!Answer::owns_key("answerCoding"));
        assert!(!Answer::owns_key("question"));
    }

    #[test]
    fn test_read_only_matches_populated_member() {
        let slot = Some(Answer::Boolean(true.into()));
        assert_eq!(read_choice(slot.as_ref(), "answerBoolean"), Some(json!(true)));
        assert_eq!(read_choice(slot.as_ref(), "answerString"), None);
        assert_eq!(read_choice(slot.as_ref(), "_answerBoolean"), None);
    }

    #[test]
    fn test_value_and_shadow_merge() {
        let mut slot = None;
        write_choice::<Answer>(&mut slot, "_answerString", json!({ "id": "s" })).unwrap();
        write_choice::<Answer>(&mut slot, "answerString", json!("hello")).unwrap();

        assert_eq!(read_choice(slot.as_ref(), "answerString"), Some(json!("hello")));
        assert_eq!(read_choice(slot.as_ref(), "_answerString"), Some(json!({ "id": "s" })));
    }

    #[test]
    fn test_second_member_is_a_conflict() {
        let mut slot = Some(Answer::Integer(3.into()));
        let err = write_choice::<Answer>(&mut slot, "answerString", json!("x")).unwrap_err();
        match err {
            Error::ChoiceConflict {
                group,
                existing,
                attempted,
            } => {
                assert_eq!(group, "answer[x]");
                assert_eq!(existing, "answerInteger");
                assert_eq!(attempted, "answerString");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(slot, Some(Answer::Integer(3.into())));
    }

    #[test]
    fn test_set_choice_type_replaces_and_clears() {
        let mut slot = Some(Answer::String(
            Primitive::from("old").with_element(Element::with_id("e")),
        ));

        let previous = set_choice_type(&mut slot, Some(Answer::Boolean(false.into())));
        assert!(matches!(previous, Some(Answer::String(_))));
        assert_eq!(read_choice(slot.as_ref(), "answerString"), None);
        assert_eq!(read_choice(slot.as_ref(), "_answerString"), None);
        assert_eq!(read_choice(slot.as_ref(), "answerBoolean"), Some(json!(false)));

        set_choice_type::<Answer>(&mut slot, None);
        assert!(slot.is_none());
    }

    #[test]
    fn test_set_choice_member_clears_siblings_keeps_own_shadow() {
        let mut slot = Some(Answer::Integer(1.into()));
        set_choice_member(&mut slot, "_answerString", json!({ "id": "meta" })).unwrap();
        set_choice_member(&mut slot, "answerString", json!("now")).unwrap();

        assert_eq!(read_choice(slot.as_ref(), "answerInteger"), None);
        assert_eq!(read_choice(slot.as_ref(), "answerString"), Some(json!("now")));
        assert_eq!(read_choice(slot.as_ref(), "_answerString"), Some(json!({ "id": "meta" })));
    }

    #[test]
    fn test_set_choice_member_failure_leaves_slot() {
        let mut slot = Some(Answer::Integer(1.into()));
        assert!(set_choice_member(&mut slot, "answerBoolean", json!("nope")).is_err());
        assert!(set_choice_member(&mut slot, "answerCoding", json!({})).is_err());
        assert_eq!(slot, Some(Answer::Integer(1.into())));
    }
}
