//! Entity catalogs
//!
//! A catalog declares the pages of every entity type in TOML. The built-in
//! catalog is embedded at compile time; a user catalog can replace it.
//! Parsing converts the loosely typed TOML tables into descriptors and
//! reports every problem as a configuration error before any page is built.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use corpografo_core::{ConsoleError, ConsoleResult, EntityId, EntityType, Validatable};
use serde::Deserialize;

use crate::field::{FieldDescriptor, FieldKind, OptionsProvider, RelationBinding, RelationRole};
use crate::spec::{check_create_fields, check_fields, EntityPages, EntitySpec, MenuItem, MenuTarget};
use crate::validation::{ValidationError, ValidationErrorCode, ValidationResult};

/// The embedded default catalog
pub const BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

// ============================================================================
// Raw TOML shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    entity: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(rename = "type")]
    entity_type: String,
    title: Option<String>,
    #[serde(default)]
    upload: bool,
    #[serde(default)]
    create: Vec<RawField>,
    #[serde(default)]
    detail: Vec<RawField>,
    #[serde(default)]
    menu: Vec<RawMenuItem>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    kind: Option<String>,
    label: Option<String>,
    #[serde(default)]
    required: bool,
    options: Option<String>,
    choices: Option<Vec<RawChoice>>,
    linked: Option<String>,
    link: Option<RawLink>,
    #[serde(default)]
    read_only: bool,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    id: EntityId,
    label: String,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    collection: String,
    member: String,
    owner: String,
}

#[derive(Debug, Deserialize)]
struct RawMenuItem {
    label: String,
    action: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Validated pages of every declared entity type, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<EntityPages>,
}

impl Catalog {
    /// The embedded default catalog
    pub fn builtin() -> ConsoleResult<Self> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> ConsoleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConsoleError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` when given, the built-in catalog otherwise
    pub fn load_or_builtin(path: Option<&Path>) -> ConsoleResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Parse and validate, failing on the first error
    pub fn from_toml(content: &str) -> ConsoleResult<Self> {
        let (catalog, result) = Self::check_toml(content)?;
        result.to_result()?;
        Ok(catalog)
    }

    /// Parse and collect every problem. Entries with errors are left out of
    /// the returned catalog.
    pub fn check_toml(content: &str) -> ConsoleResult<(Self, ValidationResult)> {
        let raw: RawCatalog = toml::from_str(content)?;
        let mut result = ValidationResult::ok();
        let mut entries: Vec<EntityPages> = Vec::new();

        for raw_entity in raw.entity {
            let name = raw_entity.entity_type.clone();
            let entity_type = match EntityType::from_str(&name) {
                Ok(t) => t,
                Err(_) => {
                    result.add_error(ValidationError::new(
                        ValidationErrorCode::UnknownEntityType,
                        &name,
                        "type",
                        format!("unknown entity type '{}'", name),
                    ));
                    continue;
                }
            };
            if entries.iter().any(|e| e.entity_type == entity_type) {
                result.add_error(ValidationError::new(
                    ValidationErrorCode::DuplicateEntity,
                    &name,
                    "type",
                    "entity type is declared twice",
                ));
                continue;
            }

            let entity_result = convert_entity(entity_type, raw_entity);
            match entity_result {
                Ok(pages) => entries.push(pages),
                Err(errors) => result.merge(errors),
            }
        }

        for entry in &entries {
            result.merge(check_create_fields(entry.entity_type, &entry.create));
            result.merge(check_fields(entry.entity_type, entry.detail.fields()));
        }

        Ok((Self { entries }, result))
    }

    /// Pages of one entity type
    pub fn get(&self, entity_type: EntityType) -> Option<&EntityPages> {
        self.entries.iter().find(|e| e.entity_type == entity_type)
    }

    /// Pages of one entity type, or an error naming it
    pub fn require(&self, entity_type: EntityType) -> ConsoleResult<&EntityPages> {
        self.get(entity_type)
            .ok_or_else(|| ConsoleError::UnknownEntityType(entity_type.to_string()))
    }

    /// Declared entries in order
    pub fn entries(&self) -> &[EntityPages] {
        &self.entries
    }

    /// Declared entity types in order
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.entries.iter().map(|e| e.entity_type).collect()
    }
}

impl Validatable for Catalog {
    fn validate(&self) -> ConsoleResult<()> {
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Conversion
// ============================================================================

fn convert_entity(entity_type: EntityType, raw: RawEntity) -> Result<EntityPages, ValidationResult> {
    let mut result = ValidationResult::ok();
    let entity = entity_type.as_str();

    let create: Vec<FieldDescriptor> = raw
        .create
        .into_iter()
        .filter_map(|f| collect(&mut result, convert_field(entity_type, f)))
        .collect();

    let detail: Vec<FieldDescriptor> = raw
        .detail
        .into_iter()
        .filter_map(|f| collect(&mut result, convert_field(entity_type, f)))
        .collect();

    let mut menu = Vec::new();
    for item in raw.menu {
        match MenuTarget::from_keyword(&item.action) {
            Some(target) if target.owner_type() == entity_type => {
                menu.push(MenuItem::new(item.label, target));
            }
            Some(target) => result.add_error(ValidationError::new(
                ValidationErrorCode::MenuActionMismatch,
                entity,
                "menu",
                format!(
                    "'{}' is only available on {} pages",
                    item.action,
                    target.owner_type()
                ),
            )),
            None => result.add_error(ValidationError::new(
                ValidationErrorCode::UnknownMenuAction,
                entity,
                "menu",
                format!("unknown menu action '{}'", item.action),
            )),
        }
    }

    if !result.is_valid() {
        return Err(result);
    }

    let spec_result = check_fields(entity_type, &detail);
    if !spec_result.is_valid() {
        return Err(spec_result);
    }
    let detail = EntitySpec::new(entity_type, detail).map_err(|e| {
        let mut r = ValidationResult::ok();
        r.add_error(ValidationError::new(
            ValidationErrorCode::EmptySpec,
            entity,
            "detail",
            e.to_string(),
        ));
        r
    })?;

    Ok(EntityPages {
        entity_type,
        title: raw.title,
        create,
        upload: raw.upload,
        detail: Arc::new(detail),
        menu,
    })
}

fn collect(
    result: &mut ValidationResult,
    converted: Result<FieldDescriptor, ValidationError>,
) -> Option<FieldDescriptor> {
    match converted {
        Ok(field) => Some(field),
        Err(err) => {
            result.add_error(err);
            None
        }
    }
}

fn convert_field(owner: EntityType, raw: RawField) -> Result<FieldDescriptor, ValidationError> {
    let fail = |code: ValidationErrorCode, msg: String| {
        ValidationError::new(code, owner.as_str(), &raw.name, msg)
    };

    if raw.name.trim().is_empty() {
        return Err(fail(
            ValidationErrorCode::EmptyFieldName,
            "field name cannot be empty".to_string(),
        ));
    }

    let kind_name = raw
        .kind
        .as_deref()
        .ok_or_else(|| fail(ValidationErrorCode::MissingKind, "missing 'kind'".to_string()))?;

    let parse_type = |key: &str, value: &str| {
        EntityType::from_str(value).map_err(|_| {
            fail(
                ValidationErrorCode::UnknownEntityType,
                format!("'{}' names unknown entity type '{}'", key, value),
            )
        })
    };

    let has_relation_keys = raw.link.is_some() || raw.read_only;

    let kind = match kind_name {
        "text" | "multiline" => {
            if has_relation_keys || raw.options.is_some() || raw.choices.is_some() || raw.linked.is_some() {
                return Err(fail(
                    ValidationErrorCode::UnexpectedRelationKeys,
                    format!("'{}' fields take no options or relation keys", kind_name),
                ));
            }
            if kind_name == "text" {
                FieldKind::ScalarText
            } else {
                FieldKind::ScalarMultiline
            }
        }
        "select" => {
            if has_relation_keys {
                return Err(fail(
                    ValidationErrorCode::UnexpectedRelationKeys,
                    "'select' fields take no 'link' or 'read_only'".to_string(),
                ));
            }
            let options = match (&raw.options, &raw.choices) {
                (Some(source), None) => OptionsProvider::Collection(parse_type("options", source)?),
                (None, Some(choices)) => OptionsProvider::Fixed(
                    choices
                        .iter()
                        .map(|c| (c.id.clone(), c.label.clone()))
                        .collect(),
                ),
                (Some(_), Some(_)) => {
                    return Err(fail(
                        ValidationErrorCode::MissingOptions,
                        "declare either 'options' or 'choices', not both".to_string(),
                    ));
                }
                (None, None) => {
                    return Err(fail(
                        ValidationErrorCode::MissingOptions,
                        "'select' needs 'options' or 'choices'".to_string(),
                    ));
                }
            };
            let linked = match &raw.linked {
                Some(linked) => Some(parse_type("linked", linked)?),
                None => None,
            };
            FieldKind::ReferenceSelect { options, linked }
        }
        "table" => {
            let linked = match &raw.linked {
                Some(linked) => parse_type("linked", linked)?,
                None => {
                    return Err(fail(
                        ValidationErrorCode::MissingLinked,
                        "'table' needs 'linked'".to_string(),
                    ));
                }
            };
            let binding = match (&raw.link, raw.read_only) {
                (Some(link), false) => Some(convert_link(link).map_err(|msg| {
                    fail(ValidationErrorCode::BindingMismatch, msg)
                })?),
                (None, true) => None,
                (Some(_), true) => {
                    return Err(fail(
                        ValidationErrorCode::UnexpectedRelationKeys,
                        "a read-only table cannot declare 'link'".to_string(),
                    ));
                }
                (None, false) => {
                    return Err(fail(
                        ValidationErrorCode::MissingLinkTemplate,
                        "'table' needs 'link' unless 'read_only = true'".to_string(),
                    ));
                }
            };
            FieldKind::RelationTable { linked, binding }
        }
        other => {
            return Err(fail(
                ValidationErrorCode::UnknownKind,
                format!("unknown kind '{}'", other),
            ));
        }
    };

    let mut field = FieldDescriptor::new(raw.name.clone(), kind);
    field.label = raw.label.clone();
    field.required = raw.required;

    field.check(owner).map_err(|e| {
        let message = match e {
            ConsoleError::Config { message, .. } => message,
            other => other.to_string(),
        };
        fail(ValidationErrorCode::BindingMismatch, message)
    })?;

    Ok(field)
}

fn convert_link(link: &RawLink) -> Result<RelationBinding, String> {
    let collection = EntityType::from_str(&link.collection)
        .map_err(|_| format!("unknown link collection '{}'", link.collection))?;
    let member = EntityType::from_str(&link.member)
        .map_err(|_| format!("unknown link member '{}'", link.member))?;
    let owner_role = match link.owner.as_str() {
        "collection" => RelationRole::Collection,
        "member" => RelationRole::Member,
        other => {
            return Err(format!(
                "link owner must be 'collection' or 'member', found '{}'",
                other
            ));
        }
    };
    Ok(RelationBinding {
        collection,
        member,
        owner_role,
    })
}

// ============================================================================
// Tests
// ============================================================================
