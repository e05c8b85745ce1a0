//! Core traits for the Corpografo console
//!
//! This module defines the traits shared across crates: validation of
//! configuration objects, and the `Shell` port through which the client and
//! the page engine produce user-visible effects.

use crate::error::ConsoleResult;
use crate::route::Route;
use crate::types::Notification;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use corpografo_core::{Validatable, ConsoleResult, ConsoleError};
///
/// struct Settings {
///     min: u32,
///     max: u32,
/// }
///
/// impl Validatable for Settings {
///     fn validate(&self) -> ConsoleResult<()> {
///         if self.min > self.max {
///             return Err(ConsoleError::InvalidConfig("min > max".into()));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `ConsoleError` describing the problem.
    fn validate(&self) -> ConsoleResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Shell Trait
// ============================================================================

/// Effects port between the engine and whatever presents it.
///
/// The desktop UI implements it with global signals; tests implement it
/// with a recorder. Implementations must not block.
pub trait Shell: Send + Sync {
    /// Surface a notification to the user
    fn notify(&self, notification: Notification);

    /// Change the current page
    fn navigate(&self, route: Route);
}

// ============================================================================
// Tests
// ============================================================================
