//! # Corpografo Core
//!
//! Core types, traits, and error handling for the Corpografo console.
//!
//! This crate provides the foundational building blocks used throughout
//! the console, including:
//!
//! - **Types**: Entity types, entity ids, HTTP verbs, notifications
//! - **Routes**: The typed client-side route surface
//! - **Traits**: `Validatable` and the `Shell` effects port
//! - **Errors**: Unified error handling with `ConsoleError` and `ConsoleResult`
//!

pub mod error;
pub mod route;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ConsoleError, ConsoleResult, ResultExt};
pub use route::Route;
pub use traits::{Shell, Validatable};
pub use types::{EntityId, EntityType, HttpMethod, Notification, StatusLevel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
