//! Field descriptors for entity specifications
//!
//! This module contains the `FieldDescriptor` struct and related types that
//! describe how one attribute of an entity type is rendered and mutated:
//! scalar inputs, reference selectors, and relation tables with their
//! typed link bindings.

use corpografo_core::{ConsoleError, ConsoleResult, EntityId, EntityType};
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};

// ============================================================================
// FieldDescriptor
// ============================================================================

/// Describes one attribute of an entity type for rendering and editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Attribute name in the entity record (and in request bodies)
    pub name: String,

    /// Display label (falls back to the title-cased name)
    pub label: Option<String>,

    /// Whether the input should be flagged when empty
    pub required: bool,

    /// How the field renders and mutates
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a descriptor with the given name and kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            required: false,
            kind,
        }
    }

    /// Single-line text input
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ScalarText)
    }

    /// Multi-line text input
    pub fn multiline(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ScalarMultiline)
    }

    /// Selector whose options are the named collection, with a "view"
    /// affordance onto that same entity type
    pub fn select(name: impl Into<String>, source: EntityType) -> Self {
        Self::new(
            name,
            FieldKind::ReferenceSelect {
                options: OptionsProvider::Collection(source),
                linked: Some(source),
            },
        )
    }

    /// Relation table that can link and unlink rows through `binding`
    pub fn relation(name: impl Into<String>, linked: EntityType, binding: RelationBinding) -> Self {
        Self::new(
            name,
            FieldKind::RelationTable {
                linked,
                binding: Some(binding),
            },
        )
    }

    /// Relation table without link/unlink actions
    pub fn read_only_relation(name: impl Into<String>, linked: EntityType) -> Self {
        Self::new(
            name,
            FieldKind::RelationTable {
                linked,
                binding: None,
            },
        )
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Get the display label (falls back to formatted field name)
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.name.to_title_case())
    }

    /// Whether the field takes part in the save body
    pub fn is_bound(&self) -> bool {
        !matches!(self.kind, FieldKind::RelationTable { .. })
    }

    /// Check the descriptor as a field of `owner`'s specification
    pub fn check(&self, owner: EntityType) -> ConsoleResult<()> {
        let fail = |msg: String| ConsoleError::config(owner.as_str(), &self.name, msg);

        if self.name.trim().is_empty() {
            return Err(fail("field name cannot be empty".to_string()));
        }
        match &self.kind {
            FieldKind::ReferenceSelect {
                options: OptionsProvider::Fixed(choices),
                ..
            } if choices.is_empty() => {
                Err(fail("a fixed choice list cannot be empty".to_string()))
            }
            FieldKind::RelationTable {
                linked,
                binding: Some(binding),
            } => binding.check(owner, *linked).map_err(fail),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// FieldKind
// ============================================================================

/// Closed set of field kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line editable text
    ScalarText,

    /// Multi-line editable text
    ScalarMultiline,

    /// Single choice among remote options, stored as an id (or null)
    ReferenceSelect {
        /// Where the options come from; evaluated on every render
        options: OptionsProvider,
        /// Enables navigation to the chosen entity's detail page
        linked: Option<EntityType>,
    },

    /// Many-to-many relation rendered as a row list
    RelationTable {
        /// Type of the related entities
        linked: EntityType,
        /// Link/unlink endpoint; `None` renders a view-only table
        binding: Option<RelationBinding>,
    },
}

impl FieldKind {
    /// Scalar kinds are the only ones allowed on creation forms
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldKind::ScalarText | FieldKind::ScalarMultiline)
    }

    /// Name used in catalog files
    pub fn keyword(&self) -> &'static str {
        match self {
            FieldKind::ScalarText => "text",
            FieldKind::ScalarMultiline => "multiline",
            FieldKind::ReferenceSelect { .. } => "select",
            FieldKind::RelationTable { .. } => "table",
        }
    }

    /// Entity type this field navigates to, if any
    pub fn linked_type(&self) -> Option<EntityType> {
        match self {
            FieldKind::ReferenceSelect { linked, .. } => *linked,
            FieldKind::RelationTable { linked, .. } => Some(*linked),
            _ => None,
        }
    }
}

// ============================================================================
// OptionsProvider
// ============================================================================

/// Source of the options of a reference selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsProvider {
    /// Every entity of the collection, id mapped to name
    Collection(EntityType),
    /// A fixed list of (id, label) pairs
    Fixed(Vec<(EntityId, String)>),
}

/// Label of the option mapped to `null`
pub const UNDEFINED_OPTION_LABEL: &str = "Undefined";

// ============================================================================
// RelationBinding
// ============================================================================

/// Which side of a relation the owning entity plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationRole {
    /// The owner is the collection side (`corpus` in `corpus/{id}/document/{id}`)
    Collection,
    /// The owner is the member side (`document` in `corpus/{id}/document/{id}`)
    Member,
}

/// Typed description of a link endpoint
/// `{collection}/{collection_id}/{member}/{member_id}`.
///
/// The same endpoint creates (POST) and removes (DELETE) the relation,
/// whichever side of it the detail page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationBinding {
    pub collection: EntityType,
    pub member: EntityType,
    pub owner_role: RelationRole,
}

impl RelationBinding {
    /// Binding shown from the collection side
    pub fn owned_by_collection(collection: EntityType, member: EntityType) -> Self {
        Self {
            collection,
            member,
            owner_role: RelationRole::Collection,
        }
    }

    /// Binding shown from the member side
    pub fn owned_by_member(collection: EntityType, member: EntityType) -> Self {
        Self {
            collection,
            member,
            owner_role: RelationRole::Member,
        }
    }

    /// Entity type of the owning page
    pub fn owner_type(&self) -> EntityType {
        match self.owner_role {
            RelationRole::Collection => self.collection,
            RelationRole::Member => self.member,
        }
    }

    /// Entity type of the rows of the table
    pub fn related_type(&self) -> EntityType {
        match self.owner_role {
            RelationRole::Collection => self.member,
            RelationRole::Member => self.collection,
        }
    }

    /// Resolve the endpoint for one (owner, related) pair
    pub fn endpoint(&self, owner: &EntityId, related: &EntityId) -> RelationEndpoint {
        let (collection_id, member_id) = match self.owner_role {
            RelationRole::Collection => (owner.clone(), related.clone()),
            RelationRole::Member => (related.clone(), owner.clone()),
        };
        RelationEndpoint {
            collection: self.collection,
            collection_id,
            member: self.member,
            member_id,
        }
    }

    /// Check that the binding fits a table on `owner`'s page listing `linked`
    pub fn check(&self, owner: EntityType, linked: EntityType) -> Result<(), String> {
        if self.owner_type() != owner {
            return Err(format!(
                "link binding expects the owner to be '{}', found '{}'",
                self.owner_type(),
                owner
            ));
        }
        if self.related_type() != linked {
            return Err(format!(
                "link binding relates '{}', but the table lists '{}'",
                self.related_type(),
                linked
            ));
        }
        Ok(())
    }
}

/// A fully resolved relation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationEndpoint {
    pub collection: EntityType,
    pub collection_id: EntityId,
    pub member: EntityType,
    pub member_id: EntityId,
}

impl RelationEndpoint {
    /// Path relative to the API root
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.collection, self.collection_id, self.member, self.member_id
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
