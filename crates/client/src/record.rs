//! Entity records returned by the API
//!
//! Collections come back as arrays of objects carrying at least `id` and
//! `name`. A single record is an object with `id` and arbitrary attributes;
//! relation attributes are arrays of `{id, name}` objects.

use corpografo_core::{ConsoleError, ConsoleResult, EntityId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One element of a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
}

/// Names may be null or missing on legacy rows
fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(name_text(value.as_ref()))
}

fn name_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl EntitySummary {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A related entity shown as a relation table row
pub type RelatedSummary = EntitySummary;

/// A full entity record
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub attributes: Map<String, Value>,
}

impl EntityRecord {
    /// Build from a decoded JSON object carrying an `id`
    pub fn from_value(value: Value) -> ConsoleResult<Self> {
        let Value::Object(attributes) = value else {
            return Err(ConsoleError::decode("entity record is not a JSON object"));
        };
        let id = attributes
            .get("id")
            .and_then(EntityId::from_json)
            .ok_or_else(|| ConsoleError::decode("entity record has no usable 'id'"))?;
        Ok(Self { id, attributes })
    }

    /// Raw attribute value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Text form of a scalar attribute (null or missing gives "")
    pub fn text(&self, field: &str) -> String {
        match self.attributes.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Id stored in a reference attribute
    pub fn reference(&self, field: &str) -> Option<EntityId> {
        self.attributes.get(field).and_then(EntityId::from_json)
    }

    /// Rows of a relation attribute, in the order the backend returned them
    pub fn relation(&self, field: &str) -> Vec<RelatedSummary> {
        match self.attributes.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| {
                    let id = item.get("id").and_then(EntityId::from_json)?;
                    let name = name_text(item.get("name"));
                    Some(RelatedSummary { id, name })
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The record's `name` attribute
    pub fn display_name(&self) -> String {
        self.text("name")
    }
}

// ============================================================================
// Tests
// ============================================================================
