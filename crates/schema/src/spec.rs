//! Entity specifications
//!
//! An [`EntitySpec`] is the ordered, validated list of field descriptors of
//! one entity type. [`EntityPages`] groups everything the page generators
//! need for a type: list title, creation fields, detail spec and the extra
//! menu items of the detail page.

use std::collections::HashSet;
use std::sync::Arc;

use corpografo_core::{ConsoleResult, EntityType, Validatable};
use serde::{Deserialize, Serialize};

use crate::field::{FieldDescriptor, FieldKind};
use crate::validation::{ValidationError, ValidationErrorCode, ValidationResult, ValidationWarning};

// ============================================================================
// EntitySpec
// ============================================================================

/// Ordered field descriptors of one entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySpec {
    entity_type: EntityType,
    fields: Vec<FieldDescriptor>,
}

impl EntitySpec {
    /// Build and validate a specification. Insertion order is rendering order.
    pub fn new(entity_type: EntityType, fields: Vec<FieldDescriptor>) -> ConsoleResult<Self> {
        check_fields(entity_type, &fields).to_result()?;
        Ok(Self {
            entity_type,
            fields,
        })
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Descriptors in rendering order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Descriptors whose values are sent on save
    pub fn bound_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_bound())
    }

    /// Relation tables, in order
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_bound())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Validatable for EntitySpec {
    fn validate(&self) -> ConsoleResult<()> {
        check_fields(self.entity_type, &self.fields).to_result()
    }

    fn validation_errors(&self) -> Vec<String> {
        check_fields(self.entity_type, &self.fields)
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect()
    }
}

/// Check a list of detail descriptors for `owner`
pub fn check_fields(owner: EntityType, fields: &[FieldDescriptor]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let entity = owner.as_str();

    if fields.is_empty() {
        result.add_error(ValidationError::new(
            ValidationErrorCode::EmptySpec,
            entity,
            "detail",
            "a detail specification needs at least one field",
        ));
        return result;
    }

    let mut names = HashSet::new();
    let mut relation_targets = HashSet::new();

    for field in fields {
        if let Err(err) = field.check(owner) {
            let code = match &field.kind {
                FieldKind::RelationTable { .. } => ValidationErrorCode::BindingMismatch,
                _ if field.name.trim().is_empty() => ValidationErrorCode::EmptyFieldName,
                _ => ValidationErrorCode::MissingOptions,
            };
            result.add_error(ValidationError::new(code, entity, &field.name, config_message(err)));
            continue;
        }

        if !names.insert(field.name.as_str()) {
            result.add_error(ValidationError::new(
                ValidationErrorCode::DuplicateFieldName,
                entity,
                &field.name,
                "field name is declared twice",
            ));
        }

        if let FieldKind::RelationTable { linked, .. } = &field.kind {
            if !relation_targets.insert(*linked) {
                result.add_error(ValidationError::new(
                    ValidationErrorCode::DuplicateRelationTable,
                    entity,
                    &field.name,
                    format!("another relation table already lists '{}'", linked),
                ));
            }
        }

        if field.required {
            result.add_warning(ValidationWarning::new(
                entity,
                &field.name,
                "'required' only affects creation forms",
            ));
        }
    }

    result
}

/// Check a list of creation form descriptors for `owner`
pub fn check_create_fields(owner: EntityType, fields: &[FieldDescriptor]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut names = HashSet::new();

    for field in fields {
        if !field.kind.is_scalar() {
            result.add_error(ValidationError::new(
                ValidationErrorCode::NonScalarCreateField,
                owner.as_str(),
                &field.name,
                format!(
                    "creation forms accept text fields only, found '{}'",
                    field.kind.keyword()
                ),
            ));
        }
        if !names.insert(field.name.as_str()) {
            result.add_error(ValidationError::new(
                ValidationErrorCode::DuplicateFieldName,
                owner.as_str(),
                &field.name,
                "field name is declared twice",
            ));
        }
    }

    result
}

fn config_message(err: corpografo_core::ConsoleError) -> String {
    match err {
        corpografo_core::ConsoleError::Config { message, .. } => message,
        other => other.to_string(),
    }
}

// ============================================================================
// Menu items
// ============================================================================

/// Extra action offered by a detail page's menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuTarget {
    /// Open the n-gram settings dialog for a corpus
    Ngram,
    /// Term frequencies of a document
    Dictionary,
    /// Phrase segmentation of a document
    Phrasing,
}

impl MenuTarget {
    /// Entity type whose detail page may offer this action
    pub fn owner_type(&self) -> EntityType {
        match self {
            MenuTarget::Ngram => EntityType::Corpus,
            MenuTarget::Dictionary | MenuTarget::Phrasing => EntityType::Document,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            MenuTarget::Ngram => "ngram",
            MenuTarget::Dictionary => "dictionary",
            MenuTarget::Phrasing => "phrasing",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "ngram" => Some(MenuTarget::Ngram),
            "dictionary" => Some(MenuTarget::Dictionary),
            "phrasing" => Some(MenuTarget::Phrasing),
            _ => None,
        }
    }
}

/// A labelled menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub target: MenuTarget,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, target: MenuTarget) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

// ============================================================================
// EntityPages
// ============================================================================

/// Everything the page generators need for one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPages {
    pub entity_type: EntityType,

    /// List page title (falls back to the plural label)
    pub title: Option<String>,

    /// Creation form fields (scalar only)
    pub create: Vec<FieldDescriptor>,

    /// Create through a file upload instead of a form
    pub upload: bool,

    /// Detail page specification
    pub detail: Arc<EntitySpec>,

    /// Extra detail page menu entries
    pub menu: Vec<MenuItem>,
}

impl EntityPages {
    pub fn list_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.entity_type.plural_label().to_string())
    }
}

impl Validatable for EntityPages {
    fn validate(&self) -> ConsoleResult<()> {
        let mut result = check_create_fields(self.entity_type, &self.create);
        result.merge(check_fields(self.entity_type, self.detail.fields()));
        for item in &self.menu {
            if item.target.owner_type() != self.entity_type {
                result.add_error(ValidationError::new(
                    ValidationErrorCode::MenuActionMismatch,
                    self.entity_type.as_str(),
                    "menu",
                    format!(
                        "'{}' is only available on {} pages",
                        item.target.keyword(),
                        item.target.owner_type()
                    ),
                ));
            }
        }
        result.to_result()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RelationBinding;
    use pretty_assertions::assert_eq;

    fn corpus_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::relation(
                "documents",
                EntityType::Document,
                RelationBinding::owned_by_collection(EntityType::Corpus, EntityType::Document),
            ),
        ]
    }

    #[test]
    fn test_spec_keeps_order() {
        let spec = EntitySpec::new(EntityType::Corpus, corpus_fields()).unwrap();
        let names: Vec<&str> = spec.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "documents"]);
        assert_eq!(spec.bound_fields().count(), 1);
        assert_eq!(spec.relation_fields().count(), 1);
        assert!(spec.is_valid());
    }

    #[test]
    fn test_empty_spec_rejected() {
        let err = EntitySpec::new(EntityType::Language, vec![]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = EntitySpec::new(
            EntityType::Author,
            vec![FieldDescriptor::text("name"), FieldDescriptor::multiline("name")],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid specification for 'author.name': field name is declared twice"
        );
    }

    #[test]
    fn test_duplicate_relation_tables_rejected() {
        let err = EntitySpec::new(
            EntityType::Language,
            vec![
                FieldDescriptor::read_only_relation("documents", EntityType::Document),
                FieldDescriptor::read_only_relation("texts", EntityType::Document),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("language.texts"));
    }

    #[test]
    fn test_binding_mismatch_rejected() {
        let err = EntitySpec::new(
            EntityType::Author,
            vec![FieldDescriptor::relation(
                "documents",
                EntityType::Document,
                RelationBinding::owned_by_collection(EntityType::Corpus, EntityType::Document),
            )],
        )
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_required_on_detail_is_a_warning() {
        let result = check_fields(EntityType::Corpus, &[FieldDescriptor::text("name").required()]);
        assert!(result.is_valid());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_create_fields_must_be_scalar() {
        let result = check_create_fields(
            EntityType::Author,
            &[
                FieldDescriptor::text("name"),
                FieldDescriptor::select("organization_id", EntityType::Organization),
            ],
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ValidationErrorCode::NonScalarCreateField);
    }

    #[test]
    fn test_menu_target_must_fit_owner() {
        let pages = EntityPages {
            entity_type: EntityType::Author,
            title: None,
            create: vec![FieldDescriptor::text("name")],
            upload: false,
            detail: Arc::new(EntitySpec::new(EntityType::Author, vec![FieldDescriptor::text("name")]).unwrap()),
            menu: vec![MenuItem::new("Dictionary", MenuTarget::Dictionary)],
        };
        assert!(!pages.is_valid());
        assert_eq!(pages.list_title(), "Authors");
    }
}
