//! General-purpose datatypes
//!
//! All of these derive from `Element`: they carry `id` and `extension` but no
//! modifier extensions.

mod annotation;
mod coding;
mod identifier;
mod meta;
mod quantity;

pub use annotation::{Annotation, AnnotationAuthor};
pub use coding::{CodeableConcept, Coding};
pub use identifier::{Identifier, Period, Reference};
pub use meta::{Meta, Narrative};
pub use quantity::{Quantity, Range, Ratio, UCUM_SYSTEM};

use crate::core::Validate;

impl Validate for Annotation {}
impl Validate for CodeableConcept {}
impl Validate for Coding {}
impl Validate for Identifier {}
impl Validate for Meta {}
impl Validate for Narrative {}
impl Validate for Period {}
impl Validate for Quantity {}
impl Validate for Range {}
impl Validate for Ratio {}
impl Validate for Reference {}
