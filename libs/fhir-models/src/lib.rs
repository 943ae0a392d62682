//! Typed FHIR resources with lossless JSON
//!
//! This crate provides Rust structures for FHIR elements and resources whose
//! JSON form is reproducible key for key. Every type declares the ordered list
//! of its wire keys, and encoding always follows that list regardless of how
//! the value was built.
//!
//! # Module Organization
//!
//! - `core`: the property engine, primitives with `_field` shadows, choice
//!   types, the `Element` / `BackboneElement` / `DomainResource` bases,
//!   builders and the validation contract
//! - `datatypes`: general-purpose datatypes (`Coding`, `Quantity`, `Reference`, ...)
//! - `resources`: concrete resources (`Goal`, `Basic`) and `AnyResource`
//! - `validator`: a small rule-based validator with YAML configuration
//!
//! # Design Philosophy
//!
//! - **Ordered**: output key order comes from the type, not from insertion history
//! - **Lossless**: shadows, unknown extension value types and unmodeled
//!   resources survive a round trip
//! - **One member per choice**: `value[x]` groups are enums, and input that
//!   populates two members is rejected
//! - **Owned values**: `clone()` is deep, builders hand out snapshots
//!
//! # Example
//!
//! ```rust
//! use ferrum_resources::datatypes::{CodeableConcept, Coding, Quantity};
//! use ferrum_resources::resources::{Goal, GoalTarget, GoalTargetDetail};
//! use ferrum_resources::Model;
//! use serde_json::json;
//!
//! let target = GoalTarget::builder()
//!     .set_measure(CodeableConcept::from_coding(Coding::new("http://loinc.org", "29463-7")))
//!     .set_detail(Some(GoalTargetDetail::Quantity(Quantity::ucum(80, "kg"))))
//!     .build();
//!
//! let goal = Goal::builder()
//!     .add_target(target)
//!     .set_lifecycle_status("active")
//!     .set_id("weight")
//!     .build();
//!
//! let json = goal.to_json();
//! assert_eq!(json["resourceType"], json!("Goal"));
//! assert_eq!(json["target"][0]["detailQuantity"]["value"], json!(80));
//! assert_eq!(Goal::from_json(&json).unwrap(), goal);
//! ```

pub mod core;
pub mod datatypes;
pub mod error;
pub mod resources;
pub mod validator;

pub use crate::core::{
    AcceptAll, BackboneElement, Builder, DomainResource, Element, Extension, ExtensionValue,
    JsonObject, Model, Primitive, Resource, Validate, ValidationIssue, ValidationOutcome,
    Validator,
};
pub use error::{Error, Result};
pub use resources::AnyResource;
