//! Goal resource and its `target` backbone element

use crate::core::choice::{
    self, decode_complex, decode_primitive, encode_complex, encode_primitive,
};
use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::validation::{IssueCode, ValidationIssue, ValidationOutcome};
use crate::core::{
    add_to_array, wire, BackboneElement, Builder, ChoiceType, DomainResource, Model,
    PropertyAccess, Validate, Validator,
};
use crate::datatypes::{Annotation, CodeableConcept, Identifier, Quantity, Range, Ratio, Reference};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub const GOAL_PROPERTIES: &[&str] = &[
    "identifier",
    "lifecycleStatus",
    "_lifecycleStatus",
    "achievementStatus",
    "category",
    "priority",
    "description",
    "subject",
    "startDate",
    "_startDate",
    "startCodeableConcept",
    "target",
    "statusDate",
    "_statusDate",
    "statusReason",
    "_statusReason",
    "expressedBy",
    "addresses",
    "note",
    "outcomeCode",
    "outcomeReference",
];

/// Describes the intended objective(s) for a patient, group or organization care
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Goal {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,
    /// External Ids for this goal
    pub identifier: Option<Vec<Identifier>>,
    /// proposed | planned | accepted | active | on-hold | completed | cancelled |
    /// entered-in-error | rejected
    pub lifecycle_status: Option<Primitive<String>>,
    /// in-progress | improving | worsening | no-change | achieved | sustaining | ...
    pub achievement_status: Option<CodeableConcept>,
    /// E.g. Treatment, dietary, behavioral, etc.
    pub category: Option<Vec<CodeableConcept>>,
    /// high-priority | medium-priority | low-priority
    pub priority: Option<CodeableConcept>,
    /// Code or text describing goal
    pub description: Option<CodeableConcept>,
    /// Who this goal is intended for
    pub subject: Option<Reference>,
    /// When goal pursuit begins
    pub start: Option<GoalStart>,
    /// Target outcome for the goal
    pub target: Option<Vec<GoalTarget>>,
    /// When goal status took effect
    pub status_date: Option<Primitive<String>>,
    /// Reason for current status
    pub status_reason: Option<Primitive<String>>,
    /// Who's responsible for creating Goal?
    pub expressed_by: Option<Reference>,
    /// Issues addressed by this goal
    pub addresses: Option<Vec<Reference>>,
    /// Comments about the goal
    pub note: Option<Vec<Annotation>>,
    /// What result was achieved regarding the goal?
    pub outcome_code: Option<Vec<CodeableConcept>>,
    /// Observation that resulted from goal
    pub outcome_reference: Option<Vec<Reference>>,
}

impl Goal {
    pub fn lifecycle_status(&self) -> Option<&str> {
        self.lifecycle_status
            .as_ref()
            .and_then(|p| p.value())
            .map(String::as_str)
    }

    pub fn targets(&self) -> &[GoalTarget] {
        self.target.as_deref().unwrap_or(&[])
    }

    pub fn set_start(&mut self, start: Option<GoalStart>) -> Option<GoalStart> {
        choice::set_choice_type(&mut self.start, start)
    }
}

impl PropertyAccess for Goal {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "identifier" => wire::encode_list(self.identifier.as_deref()),
            "lifecycleStatus" => primitive::encode_value(self.lifecycle_status.as_ref()),
            "_lifecycleStatus" => primitive::encode_element(self.lifecycle_status.as_ref()),
            "achievementStatus" => wire::encode(self.achievement_status.as_ref()),
            "category" => wire::encode_list(self.category.as_deref()),
            "priority" => wire::encode(self.priority.as_ref()),
            "description" => wire::encode(self.description.as_ref()),
            "subject" => wire::encode(self.subject.as_ref()),
            "target" => wire::encode_list(self.target.as_deref()),
            "statusDate" => primitive::encode_value(self.status_date.as_ref()),
            "_statusDate" => primitive::encode_element(self.status_date.as_ref()),
            "statusReason" => primitive::encode_value(self.status_reason.as_ref()),
            "_statusReason" => primitive::encode_element(self.status_reason.as_ref()),
            "expressedBy" => wire::encode(self.expressed_by.as_ref()),
            "addresses" => wire::encode_list(self.addresses.as_deref()),
            "note" => wire::encode_list(self.note.as_deref()),
            "outcomeCode" => wire::encode_list(self.outcome_code.as_deref()),
            "outcomeReference" => wire::encode_list(self.outcome_reference.as_deref()),
            key => choice::read_choice(self.start.as_ref(), key),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "identifier" => self.identifier = Some(wire::decode_list(value)?),
            "lifecycleStatus" => primitive::decode_value(&mut self.lifecycle_status, value)?,
            "_lifecycleStatus" => primitive::decode_element(&mut self.lifecycle_status, value)?,
            "achievementStatus" => self.achievement_status = Some(wire::decode(value)?),
            "category" => self.category = Some(wire::decode_list(value)?),
            "priority" => self.priority = Some(wire::decode(value)?),
            "description" => self.description = Some(wire::decode(value)?),
            "subject" => self.subject = Some(wire::decode(value)?),
            "target" => self.target = Some(wire::decode_list(value)?),
            "statusDate" => primitive::decode_value(&mut self.status_date, value)?,
            "_statusDate" => primitive::decode_element(&mut self.status_date, value)?,
            "statusReason" => primitive::decode_value(&mut self.status_reason, value)?,
            "_statusReason" => primitive::decode_element(&mut self.status_reason, value)?,
            "expressedBy" => self.expressed_by = Some(wire::decode(value)?),
            "addresses" => self.addresses = Some(wire::decode_list(value)?),
            "note" => self.note = Some(wire::decode_list(value)?),
            "outcomeCode" => self.outcome_code = Some(wire::decode_list(value)?),
            "outcomeReference" => self.outcome_reference = Some(wire::decode_list(value)?),
            key if GoalStart::owns_key(key) => choice::write_choice(&mut self.start, key, value)?,
            _ => {}
        }
        Ok(())
    }
}

impl Model for Goal {
    const TYPE_NAME: &'static str = "Goal";
    const RESOURCE_TYPE: Option<&'static str> = Some("Goal");
    const PROPERTY_NAMES: &'static [&'static str] = GOAL_PROPERTIES;
    type Base = DomainResource;

    fn base(&self) -> &DomainResource {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DomainResource {
        &mut self.base
    }
}

/// Checks each target's gol-1 before handing the goal to the validator.
#[async_trait]
impl Validate for Goal {
    async fn validate_or_throw(&self, validator: &dyn Validator) -> Result<()> {
        let issues: Vec<ValidationIssue> = self
            .targets()
            .iter()
            .enumerate()
            .filter_map(|(idx, target)| {
                target
                    .measure_issue()
                    .map(|issue| issue.with_location(format!("Goal.target[{idx}]")))
            })
            .collect();
        if !issues.is_empty() {
            return ValidationOutcome::from_issues(Some("Goal".to_string()), issues)
                .into_result(Self::TYPE_NAME);
        }
        validator
            .validate(Self::TYPE_NAME, &self.to_json())
            .await
            .into_result(Self::TYPE_NAME)
    }
}

/// Goal.start[x]
#[derive(Debug, Clone, PartialEq)]
pub enum GoalStart {
    Date(Primitive<String>),
    CodeableConcept(CodeableConcept),
}

impl ChoiceType for GoalStart {
    const BASE_NAME: &'static str = "start";
    const TYPE_SUFFIXES: &'static [&'static str] = &["Date", "CodeableConcept"];

    fn type_suffix(&self) -> &str {
        match self {
            Self::Date(_) => "Date",
            Self::CodeableConcept(_) => "CodeableConcept",
        }
    }

    fn empty_member(suffix: &str) -> Option<Self> {
        match suffix {
            "Date" => Some(Self::Date(Primitive::default())),
            "CodeableConcept" => Some(Self::CodeableConcept(CodeableConcept::default())),
            _ => None,
        }
    }

    fn encode_member(&self, shadow: bool) -> Option<Value> {
        match self {
            Self::Date(p) => encode_primitive(p, shadow),
            Self::CodeableConcept(v) => encode_complex(v, shadow),
        }
    }

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
        match self {
            Self::Date(p) => decode_primitive(p, shadow, value),
            Self::CodeableConcept(v) => decode_complex(v, shadow, value),
        }
    }
}

pub const GOAL_TARGET_PROPERTIES: &[&str] = &[
    "measure",
    "detailQuantity",
    "detailRange",
    "detailCodeableConcept",
    "detailString",
    "_detailString",
    "detailBoolean",
    "_detailBoolean",
    "detailInteger",
    "_detailInteger",
    "detailRatio",
    "dueDate",
    "_dueDate",
    "dueDuration",
];

const GOL_1: &str = "gol-1: Goal.target.measure is required if Goal.target.detail is populated";

/// Target outcome for the goal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalTarget {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,
    /// The parameter whose value is being tracked
    pub measure: Option<CodeableConcept>,
    /// The target value to be achieved
    pub detail: Option<GoalTargetDetail>,
    /// Reach goal on or before
    pub due: Option<GoalTargetDue>,
}

impl GoalTarget {
    pub fn set_detail(&mut self, detail: Option<GoalTargetDetail>) -> Option<GoalTargetDetail> {
        choice::set_choice_type(&mut self.detail, detail)
    }

    pub fn set_due(&mut self, due: Option<GoalTargetDue>) -> Option<GoalTargetDue> {
        choice::set_choice_type(&mut self.due, due)
    }

    fn measure_issue(&self) -> Option<ValidationIssue> {
        (self.detail.is_some() && self.measure.is_none())
            .then(|| ValidationIssue::error(IssueCode::Invariant, GOL_1))
    }
}

impl PropertyAccess for GoalTarget {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "measure" => wire::encode(self.measure.as_ref()),
            key if GoalTargetDetail::owns_key(key) => {
                choice::read_choice(self.detail.as_ref(), key)
            }
            key => choice::read_choice(self.due.as_ref(), key),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "measure" => self.measure = Some(wire::decode(value)?),
            key if GoalTargetDetail::owns_key(key) => {
                choice::write_choice(&mut self.detail, key, value)?
            }
            key if GoalTargetDue::owns_key(key) => choice::write_choice(&mut self.due, key, value)?,
            _ => {}
        }
        Ok(())
    }
}

impl Model for GoalTarget {
    const TYPE_NAME: &'static str = "Goal.target";
    const PROPERTY_NAMES: &'static [&'static str] = GOAL_TARGET_PROPERTIES;
    type Base = BackboneElement;

    fn base(&self) -> &BackboneElement {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BackboneElement {
        &mut self.base
    }
}

#[async_trait]
impl Validate for GoalTarget {
    async fn validate_or_throw(&self, validator: &dyn Validator) -> Result<()> {
        if let Some(issue) = self.measure_issue() {
            return ValidationOutcome::from_issues(None, vec![issue]).into_result(Self::TYPE_NAME);
        }
        validator
            .validate(Self::TYPE_NAME, &self.to_json())
            .await
            .into_result(Self::TYPE_NAME)
    }
}

/// Goal.target.detail[x]
#[derive(Debug, Clone, PartialEq)]
pub enum GoalTargetDetail {
    Quantity(Quantity),
    Range(Range),
    CodeableConcept(CodeableConcept),
    String(Primitive<String>),
    Boolean(Primitive<bool>),
    Integer(Primitive<i64>),
    Ratio(Ratio),
}

impl ChoiceType for GoalTargetDetail {
    const BASE_NAME: &'static str = "detail";
    const TYPE_SUFFIXES: &'static [&'static str] = &[
        "Quantity",
        "Range",
        "CodeableConcept",
        "String",
        "Boolean",
        "Integer",
        "Ratio",
    ];

    fn type_suffix(&self) -> &str {
        match self {
            Self::Quantity(_) => "Quantity",
            Self::Range(_) => "Range",
            Self::CodeableConcept(_) => "CodeableConcept",
            Self::String(_) => "String",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Ratio(_) => "Ratio",
        }
    }

    fn empty_member(suffix: &str) -> Option<Self> {
        let member = match suffix {
            "Quantity" => Self::Quantity(Quantity::default()),
            "Range" => Self::Range(Range::default()),
            "CodeableConcept" => Self::CodeableConcept(CodeableConcept::default()),
            "String" => Self::String(Primitive::default()),
            "Boolean" => Self::Boolean(Primitive::default()),
            "Integer" => Self::Integer(Primitive::default()),
            "Ratio" => Self::Ratio(Ratio::default()),
            _ => return None,
        };
        Some(member)
    }

    fn encode_member(&self, shadow: bool) -> Option<Value> {
        match self {
            Self::Quantity(v) => encode_complex(v, shadow),
            Self::Range(v) => encode_complex(v, shadow),
            Self::CodeableConcept(v) => encode_complex(v, shadow),
            Self::String(p) => encode_primitive(p, shadow),
            Self::Boolean(p) => encode_primitive(p, shadow),
            Self::Integer(p) => encode_primitive(p, shadow),
            Self::Ratio(v) => encode_complex(v, shadow),
        }
    }

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
        match self {
            Self::Quantity(v) => decode_complex(v, shadow, value),
            Self::Range(v) => decode_complex(v, shadow, value),
            Self::CodeableConcept(v) => decode_complex(v, shadow, value),
            Self::String(p) => decode_primitive(p, shadow, value),
            Self::Boolean(p) => decode_primitive(p, shadow, value),
            Self::Integer(p) => decode_primitive(p, shadow, value),
            Self::Ratio(v) => decode_complex(v, shadow, value),
        }
    }
}

/// Goal.target.due[x]
#[derive(Debug, Clone, PartialEq)]
pub enum GoalTargetDue {
    Date(Primitive<String>),
    Duration(Quantity),
}

impl ChoiceType for GoalTargetDue {
    const BASE_NAME: &'static str = "due";
    const TYPE_SUFFIXES: &'static [&'static str] = &["Date", "Duration"];

    fn type_suffix(&self) -> &str {
        match self {
            Self::Date(_) => "Date",
            Self::Duration(_) => "Duration",
        }
    }

    fn empty_member(suffix: &str) -> Option<Self> {
        match suffix {
            "Date" => Some(Self::Date(Primitive::default())),
            "Duration" => Some(Self::Duration(Quantity::default())),
            _ => None,
        }
    }

    fn encode_member(&self, shadow: bool) -> Option<Value> {
        match self {
            Self::Date(p) => encode_primitive(p, shadow),
            Self::Duration(v) => encode_complex(v, shadow),
        }
    }

    fn decode_member(&mut self, shadow: bool, value: Value) -> Result<()> {
        match self {
            Self::Date(p) => decode_primitive(p, shadow, value),
            Self::Duration(v) => decode_complex(v, shadow, value),
        }
    }
}

// ============================================================================
// Builder setters
// ============================================================================

impl Builder<Goal> {
    pub fn add_identifier(self, identifier: Identifier) -> Self {
        self.edit(|goal| add_to_array(&mut goal.identifier, identifier))
    }

    pub fn set_lifecycle_status(self, status: impl Into<Primitive<String>>) -> Self {
        let status = status.into();
        self.edit(|goal| goal.lifecycle_status = Some(status))
    }

    pub fn set_achievement_status(self, status: CodeableConcept) -> Self {
        self.edit(|goal| goal.achievement_status = Some(status))
    }

    pub fn add_category(self, category: CodeableConcept) -> Self {
        self.edit(|goal| add_to_array(&mut goal.category, category))
    }

    pub fn set_priority(self, priority: CodeableConcept) -> Self {
        self.edit(|goal| goal.priority = Some(priority))
    }

    pub fn set_description(self, description: CodeableConcept) -> Self {
        self.edit(|goal| goal.description = Some(description))
    }

    pub fn set_subject(self, subject: Reference) -> Self {
        self.edit(|goal| goal.subject = Some(subject))
    }

    pub fn set_start(self, start: Option<GoalStart>) -> Self {
        self.edit(|goal| {
            goal.set_start(start);
        })
    }

    pub fn add_target(self, target: GoalTarget) -> Self {
        self.edit(|goal| add_to_array(&mut goal.target, target))
    }

    pub fn set_status_date(self, date: impl Into<Primitive<String>>) -> Self {
        let date = date.into();
        self.edit(|goal| goal.status_date = Some(date))
    }

    pub fn set_status_reason(self, reason: impl Into<Primitive<String>>) -> Self {
        let reason = reason.into();
        self.edit(|goal| goal.status_reason = Some(reason))
    }

    pub fn set_expressed_by(self, expressed_by: Reference) -> Self {
        self.edit(|goal| goal.expressed_by = Some(expressed_by))
    }

    pub fn add_addresses(self, addresses: Reference) -> Self {
        self.edit(|goal| add_to_array(&mut goal.addresses, addresses))
    }

    pub fn add_note(self, note: Annotation) -> Self {
        self.edit(|goal| add_to_array(&mut goal.note, note))
    }

    pub fn add_outcome_code(self, code: CodeableConcept) -> Self {
        self.edit(|goal| add_to_array(&mut goal.outcome_code, code))
    }

    pub fn add_outcome_reference(self, reference: Reference) -> Self {
        self.edit(|goal| add_to_array(&mut goal.outcome_reference, reference))
    }
}

impl Builder<GoalTarget> {
    pub fn set_measure(self, measure: CodeableConcept) -> Self {
        self.edit(|target| target.measure = Some(measure))
    }

    pub fn set_detail(self, detail: Option<GoalTargetDetail>) -> Self {
        self.edit(|target| {
            target.set_detail(detail);
        })
    }

    pub fn set_due(self, due: Option<GoalTargetDue>) -> Self {
        self.edit(|target| {
            target.set_due(due);
        })
    }
}

impl_json_serde!(Goal, GoalTarget);
