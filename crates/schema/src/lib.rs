//! # Corpografo Schema
//!
//! The field specification model of the console. Each entity type is
//! described by an ordered list of field descriptors; page generators are
//! built from these descriptors and never from hand-written page code.
//!
//! ## Core Concepts
//!
//! - **FieldDescriptor**: one attribute of an entity and how it renders
//! - **RelationBinding**: typed link/unlink endpoint of a relation table
//! - **EntitySpec**: validated, ordered descriptors of one entity type
//! - **Catalog**: the pages of every entity type, loaded from TOML
//!

pub mod catalog;
pub mod field;
pub mod spec;
pub mod validation;

pub use catalog::{BUILTIN_CATALOG, Catalog};
pub use field::{
    FieldDescriptor, FieldKind, OptionsProvider, RelationBinding, RelationEndpoint, RelationRole,
    UNDEFINED_OPTION_LABEL,
};
pub use spec::{EntityPages, EntitySpec, MenuItem, MenuTarget, check_create_fields, check_fields};
pub use validation::{ValidationError, ValidationErrorCode, ValidationResult, ValidationWarning};

pub use corpografo_core::{ConsoleError, ConsoleResult, EntityId, EntityType};
