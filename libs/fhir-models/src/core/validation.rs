//! Validation contract between models and an injected validator
//!
//! Models never embed a rule set. [`Validate::validate_or_throw`] serializes the
//! instance and hands it to a [`Validator`]; a type may override the hook to
//! check a local invariant first.

use super::model::Model;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// An external rule set, such as a profile engine or a remote validation service.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, type_name: &str, instance: &Value) -> ValidationOutcome;
}

/// Accepts every instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(&self, type_name: &str, instance: &Value) -> ValidationOutcome {
        ValidationOutcome::success(
            resource_type_of(instance).or_else(|| Some(type_name.to_string())),
        )
    }
}

#[async_trait]
pub trait Validate: Model {
    async fn validate_or_throw(&self, validator: &dyn Validator) -> Result<()> {
        let outcome = validator.validate(Self::TYPE_NAME, &self.to_json()).await;
        outcome.into_result(Self::TYPE_NAME)
    }
}

fn resource_type_of(instance: &Value) -> Option<String> {
    instance
        .get("resourceType")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Validation result for a single instance
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn success(resource_type: Option<String>) -> Self {
        Self {
            resource_type,
            valid: true,
            issues: Vec::new(),
        }
    }

    /// Outcome for `issues`; valid unless one of them is an error.
    pub fn from_issues(resource_type: Option<String>, issues: Vec<ValidationIssue>) -> Self {
        let valid = !issues.iter().any(ValidationIssue::is_error);
        Self {
            resource_type,
            valid,
            issues,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    /// One line per error, used in [`Error::Validation`] messages.
    pub fn summary(&self) -> String {
        let errors: Vec<String> = self
            .issues
            .iter()
            .filter(|i| i.is_error())
            .map(|i| match &i.location {
                Some(location) => format!("{} ({location})", i.diagnostics),
                None => i.diagnostics.clone(),
            })
            .collect();
        if errors.is_empty() {
            "no errors".to_string()
        } else {
            errors.join("; ")
        }
    }

    pub fn into_result(self, type_name: &str) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        tracing::warn!(
            type_name,
            errors = self.error_count(),
            warnings = self.warning_count(),
            "validation rejected instance"
        );
        Err(Error::Validation {
            type_name: type_name.to_string(),
            outcome: self,
        })
    }

    pub fn to_operation_outcome(&self) -> Value {
        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": self.issues.iter().map(ValidationIssue::to_json).collect::<Vec<_>>()
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
    pub expression: Option<Vec<String>>,
}

impl ValidationIssue {
    fn new(severity: IssueSeverity, code: IssueCode, diagnostics: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            diagnostics: diagnostics.into(),
            location: None,
            expression: None,
        }
    }

    pub fn error(code: IssueCode, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, code, diagnostics)
    }

    pub fn warning(code: IssueCode, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, code, diagnostics)
    }

    pub fn information(code: IssueCode, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Information, code, diagnostics)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_expression(mut self, expression: Vec<String>) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, IssueSeverity::Error | IssueSeverity::Fatal)
    }

    fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string().to_lowercase(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["location"] = serde_json::json!([loc]);
        }

        if let Some(ref expr) = self.expression {
            issue["expression"] = serde_json::json!(expr);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}

/// Subset of the FHIR `issue-type` value set used by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Invalid,
    Structure,
    Required,
    Value,
    Invariant,
    NotSupported,
    TooLong,
    Extension,
    BusinessRule,
    Processing,
    Informational,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
            Self::NotSupported => "not-supported",
            Self::TooLong => "too-long",
            Self::Extension => "extension",
            Self::BusinessRule => "business-rule",
            Self::Processing => "processing",
            Self::Informational => "informational",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_outcome_operations() {
        let outcome = ValidationOutcome::from_issues(
            Some("Goal".to_string()),
            vec![
                ValidationIssue::error(IssueCode::Required, "Missing required field"),
                ValidationIssue::warning(IssueCode::Value, "Deprecated code"),
            ],
        );

        assert!(!outcome.valid);
        assert!(outcome.has_errors());
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.warning_count(), 1);
        assert_eq!(outcome.summary(), "Missing required field");
    }

    #[test]
    fn test_warnings_alone_are_valid() {
        let outcome = ValidationOutcome::from_issues(
            None,
            vec![ValidationIssue::warning(IssueCode::Extension, "unknown extension")],
        );
        assert!(outcome.valid);
        assert!(outcome.clone().into_result("Basic").is_ok());
    }

    #[test]
    fn test_into_result_carries_outcome() {
        let outcome = ValidationOutcome::from_issues(
            Some("Goal".to_string()),
            vec![
                ValidationIssue::error(IssueCode::Invariant, "bad").with_location("Goal.target[0]"),
            ],
        );

        let err = outcome.into_result("Goal").unwrap_err();
        assert_eq!(err.to_string(), "Goal failed validation: bad (Goal.target[0])");
        match err {
            Error::Validation { outcome, .. } => assert_eq!(outcome.error_count(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_operation_outcome_shape() {
        let outcome = ValidationOutcome::from_issues(
            None,
            vec![ValidationIssue::error(IssueCode::Structure, "broken")
                .with_location("Basic.extension[0]")
                .with_expression(vec!["Basic.extension[0]".to_string()])],
        );

        assert_eq!(
            outcome.to_operation_outcome(),
            json!({
                "resourceType": "OperationOutcome",
                "issue": [{
                    "severity": "error",
                    "code": "structure",
                    "diagnostics": "broken",
                    "location": ["Basic.extension[0]"],
                    "expression": ["Basic.extension[0]"]
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_accept_all() {
        let outcome = AcceptAll
            .validate("Basic", &json!({ "resourceType": "Basic" }))
            .await;
        assert!(outcome.valid);
        assert_eq!(outcome.resource_type.as_deref(), Some("Basic"));
    }
}
