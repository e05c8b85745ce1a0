//! Core type definitions for the Corpografo console
//!
//! This module contains the fundamental types used throughout the console:
//! entity types and ids, HTTP verbs, and user notifications.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConsoleError;

// ============================================================================
// Entity Types
// ============================================================================

/// A named remote resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Corpus,
    Document,
    Author,
    Organization,
    Language,
}

impl EntityType {
    /// Path segment used by both the remote API and the console routes
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Corpus => "corpus",
            EntityType::Document => "document",
            EntityType::Author => "author",
            EntityType::Organization => "organization",
            EntityType::Language => "language",
        }
    }

    /// Singular display name
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityType::Corpus => "Corpus",
            EntityType::Document => "Document",
            EntityType::Author => "Author",
            EntityType::Organization => "Organization",
            EntityType::Language => "Language",
        }
    }

    /// Plural display name, used as the default list title
    pub fn plural_label(&self) -> &'static str {
        match self {
            EntityType::Corpus => "Corpora",
            EntityType::Document => "Documents",
            EntityType::Author => "Authors",
            EntityType::Organization => "Organizations",
            EntityType::Language => "Languages",
        }
    }

    /// Get all entity types in menu order
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Corpus,
            EntityType::Document,
            EntityType::Author,
            EntityType::Organization,
            EntityType::Language,
        ]
    }
}

impl FromStr for EntityType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConsoleError::UnknownEntityType(s.to_string()))
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Entity Ids
// ============================================================================

/// Identifier of one remote entity.
///
/// The backend hands out integer ids, but any JSON string id is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// Convert to the JSON value sent in request bodies
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            EntityId::Int(i) => serde_json::Value::from(*i),
            EntityId::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }

    /// Read an id from a JSON value (numbers and strings only)
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(EntityId::Int),
            serde_json::Value::String(s) => Some(EntityId::Text(s.clone())),
            _ => None,
        }
    }
}

impl FromStr for EntityId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ConsoleError::InvalidRoute(s.to_string()));
        }
        Ok(s.parse::<i64>()
            .map(EntityId::Int)
            .unwrap_or_else(|_| EntityId::Text(s.to_string())))
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Int(i) => write!(f, "{}", i),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// HTTP Methods
// ============================================================================

/// HTTP verbs used against the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether this verb changes remote state
    pub fn is_write(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub level: StatusLevel,
}

impl Notification {
    pub fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    /// Positive confirmation of a completed operation
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Success)
    }

    /// Failure report
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Info)
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entity_type_round_trip() {
        for t in EntityType::all() {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), *t);
        }
        assert!("user".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_entity_type_labels() {
        assert_eq!(EntityType::Corpus.plural_label(), "Corpora");
        assert_eq!(EntityType::Organization.display_name(), "Organization");
        assert_eq!(EntityType::Language.to_string(), "language");
    }

    #[test]
    fn test_entity_type_serde() {
        let json = serde_json::to_string(&EntityType::Document).unwrap();
        assert_eq!(json, "\"document\"");
    }

    #[test]
    fn test_entity_id_deserializes_numbers_and_strings() {
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EntityId::Int(42));

        let id: EntityId = serde_json::from_str("\"a1\"").unwrap();
        assert_eq!(id, EntityId::Text("a1".to_string()));
    }

    #[test]
    fn test_entity_id_parse_and_display() {
        assert_eq!("7".parse::<EntityId>().unwrap(), EntityId::Int(7));
        assert_eq!("x7".parse::<EntityId>().unwrap(), EntityId::from("x7"));
        assert!("".parse::<EntityId>().is_err());
        assert_eq!(EntityId::Int(42).to_string(), "42");
    }

    #[test]
    fn test_entity_id_json() {
        assert_eq!(EntityId::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(
            EntityId::from_json(&serde_json::json!("k")),
            Some(EntityId::from("k"))
        );
        assert_eq!(EntityId::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_http_method() {
        assert!(!HttpMethod::Get.is_write());
        assert!(HttpMethod::Delete.is_write());
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }

    #[test]
    fn test_notification() {
        let n = Notification::error("Operation failed: boom");
        assert!(n.is_error());
        assert!(!Notification::success("ok").is_error());
    }
}
