//! Shared machinery behind every concrete FHIR type

pub mod builder;
pub mod choice;
pub mod element;
pub mod extension;
pub mod model;
pub mod primitive;
pub mod props;
pub mod resource;
pub mod validation;
pub mod wire;

pub use builder::{add_to_array, Builder};
pub use choice::{set_choice_member, set_choice_type, ChoiceType};
pub use element::{BackboneElement, Element};
pub use extension::{Extension, ExtensionValue};
pub use model::{BaseFields, Model, ModifierExtensionBase};
pub use primitive::{Primitive, PrimitiveValue};
pub use props::{assign_props, serialize_props_to, JsonObject, PropertyAccess};
pub use resource::{DomainResource, Resource};
pub use validation::{
    AcceptAll, IssueCode, IssueSeverity, Validate, ValidationIssue, ValidationOutcome, Validator,
};
