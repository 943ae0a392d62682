//! Rule-based [`Validator`] for structural checks
//!
//! [`BasicValidator`] does not resolve profiles or terminology. It walks the
//! serialized instance and applies the steps of a compiled [`ValidationPlan`]:
//! resource id syntax, extension structure and modifier extension handling.

mod config;
mod plan;

pub use config::{
    ConfigError, ExecConfig, ExtensionsConfig, IdsConfig, ModifierExtensionsConfig, Preset,
    ValidatorConfig, ValidatorConfigBuilder,
};
pub use plan::{ExtensionsPlan, ModifierExtensionsPlan, ResourceIdsPlan, Step, ValidationPlan};

use crate::core::validation::{IssueCode, ValidationIssue, ValidationOutcome, Validator};
use async_trait::async_trait;
use serde_json::{Map, Value};

pub struct BasicValidator {
    plan: ValidationPlan,
}

impl BasicValidator {
    pub fn new(plan: ValidationPlan) -> Self {
        Self { plan }
    }

    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.compile()?))
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    /// Synchronous form of [`Validator::validate`].
    pub fn validate_json(&self, type_name: &str, instance: &Value) -> ValidationOutcome {
        ValidationRun::new(&self.plan, type_name, instance).execute()
    }
}

#[async_trait]
impl Validator for BasicValidator {
    async fn validate(&self, type_name: &str, instance: &Value) -> ValidationOutcome {
        self.validate_json(type_name, instance)
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    root: String,
    instance: &'a Value,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(plan: &'a ValidationPlan, type_name: &str, instance: &'a Value) -> Self {
        let root = resource_type(instance).unwrap_or(type_name).to_string();
        Self {
            plan,
            root,
            instance,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        for step in &self.plan.steps {
            if self.plan.fail_fast && self.has_errors() {
                break;
            }

            if self.issues.len() >= self.plan.max_issues {
                break;
            }

            self.execute_step(step);
        }

        if self.issues.len() > self.plan.max_issues {
            self.issues.truncate(self.plan.max_issues);
        }
        if self.plan.fail_fast {
            if let Some(first_error) = self.issues.iter().position(ValidationIssue::is_error) {
                self.issues.truncate(first_error + 1);
            }
        }

        tracing::debug!(
            type_name = %self.root,
            issues = self.issues.len(),
            "validation run finished"
        );
        ValidationOutcome::from_issues(
            resource_type(self.instance).map(str::to_string),
            self.issues,
        )
    }

    fn execute_step(&mut self, step: &Step) {
        match step {
            Step::ResourceIds(plan) => self.validate_ids(plan),
            Step::Extensions(plan) => self.validate_extensions(plan),
            Step::ModifierExtensions(plan) => self.validate_modifier_extensions(plan),
        }
    }

    fn validate_ids(&mut self, plan: &ResourceIdsPlan) {
        let mut resources = Vec::new();
        collect_resources(self.instance, &self.root, &mut resources);

        for (path, resource) in resources {
            match resource.get("id") {
                None => {}
                Some(Value::String(id)) if plan.pattern.is_match(id) => {}
                Some(Value::String(id)) => self.issues.push(
                    ValidationIssue::error(
                        IssueCode::Value,
                        format!("Invalid resource id '{id}': expected 1-64 of [A-Za-z0-9-.]"),
                    )
                    .with_location(format!("{path}.id")),
                ),
                Some(_) => self.issues.push(
                    ValidationIssue::error(IssueCode::Structure, "Resource id must be a string")
                        .with_location(format!("{path}.id")),
                ),
            }
        }
    }

    fn validate_extensions(&mut self, plan: &ExtensionsPlan) {
        let mut sites = Vec::new();
        collect_extensions(self.instance, &self.root, &mut sites);

        for site in sites {
            if !matches!(site.extension.get("url"), Some(Value::String(_))) {
                self.issues.push(
                    ValidationIssue::error(IssueCode::Required, "Extension.url is required")
                        .with_location(site.path.clone()),
                );
            }

            let value_keys: Vec<&str> = site
                .extension
                .keys()
                .map(String::as_str)
                .filter(|key| is_value_key(key))
                .collect();
            if value_keys.len() > 1 {
                self.issues.push(
                    ValidationIssue::error(
                        IssueCode::Structure,
                        format!("Extension has more than one value: {}", value_keys.join(", ")),
                    )
                    .with_location(site.path.clone()),
                );
            }

            let has_children = site
                .extension
                .get("extension")
                .and_then(Value::as_array)
                .is_some_and(|children| !children.is_empty());
            if plan.enforce_ext_1 && has_children && !value_keys.is_empty() {
                self.issues.push(
                    ValidationIssue::error(
                        IssueCode::Invariant,
                        "ext-1: Must have either extensions or value[x], not both",
                    )
                    .with_location(site.path),
                );
            }
        }
    }

    fn validate_modifier_extensions(&mut self, plan: &ModifierExtensionsPlan) {
        let mut sites = Vec::new();
        collect_extensions(self.instance, &self.root, &mut sites);

        for site in sites.into_iter().filter(|site| site.modifier) {
            let Some(url) = site.extension.get("url").and_then(Value::as_str) else {
                continue;
            };
            if plan.understood.contains(url) {
                continue;
            }
            let message = format!(
                "Unknown modifier extension '{url}': the element cannot be processed safely"
            );
            let issue = if plan.allow_unknown {
                ValidationIssue::warning(IssueCode::Extension, message)
            } else {
                ValidationIssue::error(IssueCode::NotSupported, message)
            };
            self.issues.push(issue.with_location(site.path));
        }
    }

    fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }
}

fn resource_type(instance: &Value) -> Option<&str> {
    instance.get("resourceType").and_then(Value::as_str)
}

/// `valueString`, `valueQuantity`, ... but not `value` or `valueset`.
fn is_value_key(key: &str) -> bool {
    key.strip_prefix("value")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// The root resource and every contained resource, recursively.
fn collect_resources<'v>(
    value: &'v Value,
    path: &str,
    out: &mut Vec<(String, &'v Map<String, Value>)>,
) {
    let Some(resource) = value.as_object() else {
        return;
    };
    out.push((path.to_string(), resource));
    if let Some(contained) = resource.get("contained").and_then(Value::as_array) {
        for (idx, item) in contained.iter().enumerate() {
            collect_resources(item, &format!("{path}.contained[{idx}]"), out);
        }
    }
}

struct ExtensionSite<'v> {
    path: String,
    modifier: bool,
    extension: &'v Map<String, Value>,
}

fn collect_extensions<'v>(value: &'v Value, path: &str, out: &mut Vec<ExtensionSite<'v>>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                let modifier = key == "modifierExtension";
                if modifier || key == "extension" {
                    if let Some(items) = child.as_array() {
                        for (idx, item) in items.iter().enumerate() {
                            if let Some(extension) = item.as_object() {
                                out.push(ExtensionSite {
                                    path: format!("{child_path}[{idx}]"),
                                    modifier,
                                    extension,
                                });
                            }
                        }
                    }
                }
                collect_extensions(child, &child_path, out);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_extensions(item, &format!("{path}[{idx}]"), out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IssueSeverity;
    use serde_json::json;

    fn strict() -> BasicValidator {
        BasicValidator::from_config(&ValidatorConfig::preset(Preset::Strict)).unwrap()
    }

    #[test]
    fn test_valid_goal() {
        let goal = json!({
            "resourceType": "Goal",
            "id": "example",
            "extension": [{ "url": "http://example.org/e", "valueString": "x" }],
            "lifecycleStatus": "active"
        });
        let outcome = strict().validate_json("Goal", &goal);
        assert!(outcome.valid, "{:?}", outcome.issues);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_bad_ids_in_contained() {
        let basic = json!({
            "resourceType": "Basic",
            "id": "ok",
            "contained": [{ "resourceType": "Basic", "id": "not ok!" }]
        });
        let outcome = strict().validate_json("Basic", &basic);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(
            outcome.issues[0].location.as_deref(),
            Some("Basic.contained[0].id")
        );
    }

    #[test]
    fn test_extension_structure() {
        let basic = json!({
            "resourceType": "Basic",
            "_created": {
                "extension": [{ "valueString": "no url" }]
            },
            "extension": [{
                "url": "http://example.org/both",
                "valueCode": "a",
                "extension": [{ "url": "child", "valueBoolean": true }]
            }, {
                "url": "http://example.org/two",
                "valueCode": "a",
                "valueString": "b"
            }]
        });
        let outcome = strict().validate_json("Basic", &basic);
        let locations: Vec<_> = outcome
            .issues
            .iter()
            .filter_map(|i| i.location.as_deref())
            .collect();

        assert!(locations.contains(&"Basic._created.extension[0]"));
        assert!(locations.contains(&"Basic.extension[0]"));
        assert!(locations.contains(&"Basic.extension[1]"));
        assert_eq!(outcome.error_count(), 3);
    }

    #[test]
    fn test_ext_1_can_be_switched_off() {
        let basic = json!({
            "resourceType": "Basic",
            "extension": [{
                "url": "http://example.org/both",
                "valueCode": "a",
                "extension": [{ "url": "child", "valueBoolean": true }]
            }]
        });
        let outcome = strict().validate_json("Basic", &basic);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.issues[0].code, IssueCode::Invariant);

        let relaxed =
            BasicValidator::from_config(&ValidatorConfig::builder().enforce_ext_1(false).build())
                .unwrap();
        let outcome = relaxed.validate_json("Basic", &basic);
        assert!(outcome.valid);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_unknown_modifier_extension() {
        let goal = json!({
            "resourceType": "Goal",
            "target": [{
                "modifierExtension": [{ "url": "http://example.org/negated", "valueBoolean": true }]
            }]
        });

        let outcome = strict().validate_json("Goal", &goal);
        assert!(!outcome.valid);
        assert_eq!(outcome.issues[0].code, IssueCode::NotSupported);
        assert_eq!(
            outcome.issues[0].location.as_deref(),
            Some("Goal.target[0].modifierExtension[0]")
        );

        let lenient =
            BasicValidator::from_config(&ValidatorConfig::preset(Preset::Lenient)).unwrap();
        let outcome = lenient.validate_json("Goal", &goal);
        assert!(outcome.valid);
        assert_eq!(outcome.issues[0].severity, IssueSeverity::Warning);

        let understood = BasicValidator::from_config(
            &ValidatorConfig::builder()
                .understand_modifier("http://example.org/negated")
                .build(),
        )
        .unwrap();
        assert!(understood.validate_json("Goal", &goal).issues.is_empty());
    }

    #[test]
    fn test_fail_fast_and_max_issues() {
        let basic = json!({
            "resourceType": "Basic",
            "id": "bad id",
            "extension": [{ "valueCode": "a" }, { "valueCode": "b" }, { "valueCode": "c" }]
        });

        let fail_fast = BasicValidator::from_config(
            &ValidatorConfig::builder().fail_fast(true).build(),
        )
        .unwrap();
        assert_eq!(fail_fast.validate_json("Basic", &basic).issues.len(), 1);

        let capped = BasicValidator::from_config(
            &ValidatorConfig::builder().max_issues(2).build(),
        )
        .unwrap();
        assert_eq!(capped.validate_json("Basic", &basic).issues.len(), 2);
    }

    #[tokio::test]
    async fn test_validator_trait() {
        let validator: &dyn Validator = &strict();
        let outcome = validator
            .validate("Extension", &json!({ "valueString": "x" }))
            .await;
        assert!(outcome.valid);
        assert_eq!(outcome.resource_type, None);
    }
}
