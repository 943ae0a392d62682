//! Concrete resources and the `resourceType` dispatcher

mod basic;
mod goal;

pub use basic::Basic;
pub use goal::{Goal, GoalStart, GoalTarget, GoalTargetDetail, GoalTargetDue};

use crate::core::props::RESOURCE_TYPE_KEY;
use crate::core::{BaseFields, JsonObject, Model};
use crate::error::{Error, Result};
use serde_json::Value;

/// Any resource, decoded by its `resourceType`.
///
/// Types this crate does not model are kept as their JSON object and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyResource {
    Goal(Box<Goal>),
    Basic(Box<Basic>),
    Unknown(JsonObject),
}

impl AnyResource {
    pub fn from_json(value: &Value) -> Result<Self> {
        let data = value
            .as_object()
            .ok_or_else(|| Error::ExpectedObject("Resource".to_string()))?;
        Self::from_json_object(data)
    }

    pub fn from_json_object(data: &JsonObject) -> Result<Self> {
        let resource_type = data
            .get(RESOURCE_TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or(Error::MissingResourceType)?;

        match resource_type {
            "Goal" => Ok(Self::Goal(Box::new(Goal::from_json_object(data)?))),
            "Basic" => Ok(Self::Basic(Box::new(Basic::from_json_object(data)?))),
            other => {
                tracing::debug!(resource_type = other, "keeping unmodeled resource as JSON");
                Ok(Self::Unknown(data.clone()))
            }
        }
    }

    pub fn to_json_object(&self) -> JsonObject {
        match self {
            Self::Goal(goal) => goal.to_json_object(),
            Self::Basic(basic) => basic.to_json_object(),
            Self::Unknown(data) => data.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_json_object())
    }

    pub fn resource_type(&self) -> &str {
        match self {
            Self::Goal(_) => "Goal",
            Self::Basic(_) => "Basic",
            Self::Unknown(data) => data
                .get(RESOURCE_TYPE_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Goal(goal) => goal.base.id(),
            Self::Basic(basic) => basic.base.id(),
            Self::Unknown(data) => data.get("id").and_then(Value::as_str),
        }
    }

    pub fn as_goal(&self) -> Option<&Goal> {
        match self {
            Self::Goal(goal) => Some(goal.as_ref()),
            _ => None,
        }
    }

    pub fn as_basic(&self) -> Option<&Basic> {
        match self {
            Self::Basic(basic) => Some(basic.as_ref()),
            _ => None,
        }
    }
}

impl From<Goal> for AnyResource {
    fn from(goal: Goal) -> Self {
        Self::Goal(Box::new(goal))
    }
}

impl From<Basic> for AnyResource {
    fn from(basic: Basic) -> Self {
        Self::Basic(Box::new(basic))
    }
}

impl serde::Serialize for AnyResource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_json_object(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for AnyResource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = <JsonObject as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_json_object(&data).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_resource_type() {
        let goal = AnyResource::from_json(&json!({ "resourceType": "Goal", "id": "g" })).unwrap();
        assert!(goal.as_goal().is_some());
        assert_eq!(goal.id(), Some("g"));

        let patient = json!({ "resourceType": "Patient", "id": "p", "active": true });
        let unknown = AnyResource::from_json(&patient).unwrap();
        assert_eq!(unknown.resource_type(), "Patient");
        assert_eq!(unknown.to_json(), patient);
    }

    #[test]
    fn test_missing_resource_type() {
        assert!(matches!(
            AnyResource::from_json(&json!({ "id": "x" })),
            Err(Error::MissingResourceType)
        ));
        assert!(matches!(
            AnyResource::from_json(&json!([])),
            Err(Error::ExpectedObject(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let text = r#"{"resourceType":"Basic","id":"b","created":"2024-01-01"}"#;
        let resource: AnyResource = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&resource).unwrap(), text);
    }
}
