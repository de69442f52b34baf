//! The model catalog: the runtime description of tables, fields, and
//! presets that the compiler resolves query instructions against (spec §4,
//! "Model resolver").
//!
//! Unlike the teacher's const-generic, compile-time table schema, a catalog
//! here is supplied by the caller at runtime as plain data — the compiler's
//! job is to translate a dynamic query description, not to encode a fixed
//! application schema in the type system.

use serde_json::Value;
use std::collections::HashMap;

/// The storage representation of a field, used to decide how a JSON value
/// is encoded into a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Json,
    Link,
}

/// How a `link` field relates to its target model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    One,
    Many,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub slug: String,
    pub column: String,
    pub kind: FieldType,
    /// Set only for `kind == Link`: the slug of the model this field points to.
    pub target_model: Option<String>,
    pub reference_kind: Option<ReferenceKind>,
}

impl Field {
    pub fn scalar(slug: impl Into<String>, kind: FieldType) -> Self {
        let slug = slug.into();
        Field {
            column: slug.clone(),
            slug,
            kind,
            target_model: None,
            reference_kind: None,
        }
    }

    pub fn link(
        slug: impl Into<String>,
        target_model: impl Into<String>,
        reference_kind: ReferenceKind,
    ) -> Self {
        let slug = slug.into();
        Field {
            column: slug.clone(),
            slug,
            kind: FieldType::Link,
            target_model: Some(target_model.into()),
            reference_kind: Some(reference_kind),
        }
    }

    pub fn is_link(&self) -> bool {
        self.kind == FieldType::Link
    }
}

/// A named, reusable instruction fragment, expanded by the `for` instruction
/// (spec §6, "Preset expander").
#[derive(Debug, Clone)]
pub struct Preset {
    pub slug: String,
    pub instructions: Value,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub slug: String,
    pub plural_slug: String,
    pub table: String,
    pub fields: Vec<Field>,
    pub presets: Vec<Preset>,
}

impl Model {
    pub fn field(&self, slug: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.slug == slug)
    }

    pub fn preset(&self, slug: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.slug == slug)
    }
}

/// Whether a model address referred to the singular or plural form of a
/// model's slug (spec §4: determines whether a query targets one record or
/// a set of records).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multiple,
}

/// The full set of models a compilation runs against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: HashMap<String, Model>,
    /// Maps a plural slug back to its singular slug for cardinality lookups.
    plural_index: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: Model) {
        self.plural_index
            .insert(model.plural_slug.clone(), model.slug.clone());
        self.models.insert(model.slug.clone(), model);
    }

    /// Resolves a model address (either its singular or plural slug) to the
    /// model and the cardinality implied by which form was used.
    pub fn resolve(&self, address: &str) -> Option<(&Model, Cardinality)> {
        if let Some(model) = self.models.get(address) {
            return Some((model, Cardinality::Single));
        }
        if let Some(singular) = self.plural_index.get(address) {
            return self
                .models
                .get(singular)
                .map(|m| (m, Cardinality::Multiple));
        }
        None
    }

    pub fn get(&self, slug: &str) -> Option<&Model> {
        self.models.get(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Model {
            slug: "account".into(),
            plural_slug: "accounts".into(),
            table: "accounts".into(),
            fields: vec![Field::scalar("handle", FieldType::String)],
            presets: vec![],
        });
        catalog
    }

    #[test]
    fn resolves_singular_address_to_single_cardinality() {
        let catalog = sample_catalog();
        let (model, cardinality) = catalog.resolve("account").unwrap();
        assert_eq!(model.slug, "account");
        assert_eq!(cardinality, Cardinality::Single);
    }

    #[test]
    fn resolves_plural_address_to_multiple_cardinality() {
        let catalog = sample_catalog();
        let (model, cardinality) = catalog.resolve("accounts").unwrap();
        assert_eq!(model.slug, "account");
        assert_eq!(cardinality, Cardinality::Multiple);
    }

    #[test]
    fn unknown_address_resolves_to_none() {
        let catalog = sample_catalog();
        assert!(catalog.resolve("widgets").is_none());
    }
}
