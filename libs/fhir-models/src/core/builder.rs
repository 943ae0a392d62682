//! Fluent construction of models
//!
//! A [`Builder`] owns a draft of the model itself. Setters consume and return
//! the builder; [`Builder::build`] hands out a deep copy, so the draft can keep
//! evolving after a snapshot has been taken. Setters for the universal fields
//! live in impl blocks bounded on the model's base, so `add_modifier_extension`
//! only exists for backbone elements and domain resources, and `set_text` only
//! for domain resources.

use super::extension::Extension;
use super::model::{BaseFields, Model, ModifierExtensionBase};
use super::primitive::Primitive;
use super::resource::DomainResource;
use super::validation::{Validate, Validator};
use crate::datatypes::{Meta, Narrative};
use crate::error::Result;
use crate::resources::AnyResource;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Builder<M> {
    draft: M,
}

/// Append `item` to an optional repeated field, creating the list on first use.
pub fn add_to_array<T>(list: &mut Option<Vec<T>>, item: T) {
    list.get_or_insert_with(Vec::new).push(item);
}

impl<M: Model> Builder<M> {
    pub fn new() -> Self {
        Self {
            draft: M::default(),
        }
    }

    /// Continue from an existing instance.
    pub fn from_model(model: M) -> Self {
        Self { draft: model }
    }

    pub fn draft(&self) -> &M {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut M {
        &mut self.draft
    }

    /// Apply `update` to the draft. Used by the per-type setters.
    pub fn edit(mut self, update: impl FnOnce(&mut M)) -> Self {
        update(&mut self.draft);
        self
    }

    pub fn set_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        tracing::trace!(type_name = M::TYPE_NAME, id = %id, "builder set_id");
        self.edit(|draft| *draft.base_mut().id_mut() = Some(id))
    }

    pub fn add_extension(self, extension: Extension) -> Self {
        tracing::trace!(type_name = M::TYPE_NAME, url = ?extension.url(), "builder add_extension");
        self.edit(|draft| add_to_array(draft.base_mut().extension_mut(), extension))
    }

    /// Snapshot of the current draft.
    pub fn build(&self) -> M {
        self.draft.clone()
    }
}

impl<M: Model> Builder<M>
where
    M::Base: ModifierExtensionBase,
{
    pub fn add_modifier_extension(self, extension: Extension) -> Self {
        tracing::trace!(
            type_name = M::TYPE_NAME,
            url = ?extension.url(),
            "builder add_modifier_extension"
        );
        self.edit(|draft| add_to_array(draft.base_mut().modifier_extension_mut(), extension))
    }
}

impl<M: Model<Base = DomainResource>> Builder<M> {
    pub fn set_meta(self, meta: Meta) -> Self {
        self.edit(|draft| draft.base_mut().resource.meta = Some(meta))
    }

    pub fn set_implicit_rules(self, implicit_rules: impl Into<Primitive<String>>) -> Self {
        let implicit_rules = implicit_rules.into();
        self.edit(|draft| draft.base_mut().resource.implicit_rules = Some(implicit_rules))
    }

    pub fn set_language(self, language: impl Into<Primitive<String>>) -> Self {
        let language = language.into();
        self.edit(|draft| draft.base_mut().resource.language = Some(language))
    }

    pub fn set_text(self, text: Narrative) -> Self {
        self.edit(|draft| draft.base_mut().text = Some(text))
    }

    pub fn add_contained(self, resource: impl Into<AnyResource>) -> Self {
        let resource = resource.into();
        tracing::trace!(
            type_name = M::TYPE_NAME,
            contained = resource.resource_type(),
            "builder add_contained"
        );
        self.edit(|draft| add_to_array(&mut draft.base_mut().contained, resource))
    }
}

impl<M: Model + Validate> Builder<M> {
    /// Build, then run the instance's validation hook.
    pub async fn build_or_throw(&self, validator: &dyn Validator) -> Result<M> {
        let model = self.build();
        model.validate_or_throw(validator).await?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extension::ExtensionValue;
    use crate::resources::{Basic, GoalTarget};
    use serde_json::json;

    #[test]
    fn test_add_to_array_creates_then_appends() {
        let mut list: Option<Vec<i32>> = None;
        add_to_array(&mut list, 1);
        add_to_array(&mut list, 2);
        assert_eq!(list, Some(vec![1, 2]));
    }

    #[test]
    fn test_build_snapshots_are_independent() {
        let builder = Basic::builder().set_id("first");
        let first = builder.build();

        let builder = builder
            .set_id("second")
            .add_extension(Extension::new(
                "http://example.org/e",
                ExtensionValue::Code("c".into()),
            ));
        let second = builder.build();

        assert_eq!(first.to_json(), json!({ "resourceType": "Basic", "id": "first" }));
        assert_eq!(second.base.resource.id.as_deref(), Some("second"));
        assert_eq!(second.base.extensions().len(), 1);
    }

    #[test]
    fn test_backbone_builder_has_modifier_extensions() {
        let target = GoalTarget::builder()
            .set_id("t1")
            .add_modifier_extension(Extension::new(
                "http://example.org/mod",
                ExtensionValue::Boolean(false.into()),
            ))
            .build();

        let json = target.to_json_object();
        assert_eq!(json.keys().collect::<Vec<_>>(), vec!["id", "modifierExtension"]);
    }

    #[test]
    fn test_domain_resource_setters() {
        let inner = Basic::builder().set_id("inner").build();
        let basic = Basic::builder()
            .set_language("en")
            .set_text(Narrative::generated("<div xmlns=\"http://www.w3.org/1999/xhtml\">x</div>"))
            .set_implicit_rules("http://example.org/rules")
            .add_contained(inner)
            .set_id("outer")
            .build();

        let json = basic.to_json_object();
        assert_eq!(
            json.keys().collect::<Vec<_>>(),
            vec!["resourceType", "id", "implicitRules", "language", "text", "contained"]
        );
        assert_eq!(json["contained"][0]["id"], json!("inner"));
    }
}
