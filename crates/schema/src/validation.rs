//! Validation results for entity specifications and catalogs
//!
//! Specifications are checked once, when a catalog is loaded or a page
//! generator is built. Every problem found is collected so tools can list
//! them all; runtime code converts the result into the first error.

use corpografo_core::{ConsoleError, ConsoleResult};

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self::default()
    }

    /// Whether no errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to ConsoleResult (fails with the first error)
    pub fn to_result(self) -> ConsoleResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(first.into()),
        }
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error located at one field of one entity specification
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Entity type name as written in the catalog
    pub entity: String,

    /// Field name, or the catalog key for entity-level problems
    pub field: String,

    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        code: ValidationErrorCode,
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::config(err.entity, err.field, err.message)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}.{}] {}", self.entity, self.field, self.message)
    }
}

// ============================================================================
// ValidationErrorCode
// ============================================================================

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    // Entity errors
    UnknownEntityType,
    DuplicateEntity,
    EmptySpec,

    // Field errors
    EmptyFieldName,
    DuplicateFieldName,
    MissingKind,
    UnknownKind,
    MissingOptions,
    NonScalarCreateField,

    // Relation errors
    MissingLinked,
    MissingLinkTemplate,
    BindingMismatch,
    DuplicateRelationTable,
    UnexpectedRelationKeys,

    // Menu errors
    UnknownMenuAction,
    MenuActionMismatch,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A non-fatal issue in a specification
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub entity: String,
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}.{}] {}", self.entity, self.field, self.message)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result() {
        let result = ValidationResult::ok();
        assert!(result.is_valid());
        assert!(result.to_result().is_ok());
    }

    #[test]
    fn test_first_error_wins() {
        let mut result = ValidationResult::ok();
        result.add_error(ValidationError::new(
            ValidationErrorCode::MissingKind,
            "author",
            "name",
            "missing 'kind'",
        ));
        result.add_error(ValidationError::new(
            ValidationErrorCode::UnknownKind,
            "author",
            "url",
            "unknown kind 'link'",
        ));
        assert!(!result.is_valid());

        let err = result.to_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid specification for 'author.name': missing 'kind'"
        );
    }

    #[test]
    fn test_merge_keeps_warnings() {
        let mut a = ValidationResult::ok();
        let mut b = ValidationResult::ok();
        b.add_warning(ValidationWarning::new("corpus", "name", "required has no effect"));
        a.merge(b);
        assert!(a.is_valid());
        assert!(a.has_warnings());
        assert_eq!(a.warnings[0].to_string(), "[corpus.name] required has no effect");
    }
}
