//! Create page generators
//!
//! [`CreatePage`] renders a form of scalar fields and posts every value to
//! the collection. [`UploadPage`] creates a document from a file: the file
//! name and its base64 content are posted, and text extraction happens on
//! the server.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use corpografo_client::{EntityClient, UNEXPECTED_BEHAVIOR, failure_notification};
use corpografo_core::{ConsoleError, ConsoleResult, EntityId, EntityType, Route};
use corpografo_schema::{FieldDescriptor, FieldKind, check_create_fields};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

/// Inline hint shown under an empty required input
pub const REQUIRED_HINT: &str = "Required";

// ============================================================================
// Outcome
// ============================================================================

/// Result of a creation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// 201 with an id; the detail page has been opened
    Created(EntityId),
    /// Anything else; the user has been notified and the form is untouched
    Rejected,
}

impl CreateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

// ============================================================================
// CreatePage
// ============================================================================

/// Creation form generator for one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePage {
    entity_type: EntityType,
    fields: Vec<FieldDescriptor>,
}

impl CreatePage {
    /// Only scalar fields are accepted; anything else is a configuration error
    pub fn new(entity_type: EntityType, fields: Vec<FieldDescriptor>) -> ConsoleResult<Self> {
        check_create_fields(entity_type, &fields).to_result()?;
        Ok(Self {
            entity_type,
            fields,
        })
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Page heading
    pub fn title(&self) -> String {
        format!("New {}", self.entity_type.as_str())
    }

    /// An empty form with one value per field
    pub fn form(&self) -> CreateForm {
        CreateForm {
            values: self
                .fields
                .iter()
                .map(|f| (f.name.clone(), String::new()))
                .collect(),
        }
    }

    /// Hint for one input, shown while a required field is empty.
    /// Hints never block submission.
    pub fn hint(&self, form: &CreateForm, field: &str) -> Option<&'static str> {
        let descriptor = self.fields.iter().find(|f| f.name == field)?;
        let empty = form.get(field).is_none_or(str::is_empty);
        (descriptor.required && empty).then_some(REQUIRED_HINT)
    }

    /// Whether a field renders as a multi-line input
    pub fn is_multiline(&self, field: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == field && f.kind == FieldKind::ScalarMultiline)
    }

    /// Post every value to the collection
    pub async fn submit(&self, client: &EntityClient, form: &CreateForm) -> ConsoleResult<CreateOutcome> {
        let path = self.entity_type.as_str();
        let response = client.post(path, form.to_body()).await?;
        Ok(finish_creation(client, self.entity_type, response.status, &response.body))
    }
}

/// Values of a creation form, in field order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateForm {
    values: IndexMap<String, String>,
}

impl CreateForm {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Set a value; unknown fields are ignored
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Empty every value
    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    /// (field, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON body carrying every value
    pub fn to_body(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

// ============================================================================
// UploadPage
// ============================================================================

/// Document creation from an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPage {
    entity_type: EntityType,
}

impl UploadPage {
    pub fn new(entity_type: EntityType) -> Self {
        Self { entity_type }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn title(&self) -> String {
        format!("New {}", self.entity_type.as_str())
    }

    /// Body of the upload request
    pub fn body(file_name: &str, content: &[u8]) -> Value {
        json!({
            "name": file_name,
            "input_file": BASE64.encode(content),
        })
    }

    /// Post one file
    pub async fn submit(
        &self,
        client: &EntityClient,
        file_name: &str,
        content: &[u8],
    ) -> ConsoleResult<CreateOutcome> {
        info!(file = file_name, bytes = content.len(), "Uploading document");
        let response = client
            .post(self.entity_type.as_str(), Self::body(file_name, content))
            .await?;
        Ok(finish_creation(client, self.entity_type, response.status, &response.body))
    }
}

fn finish_creation(
    client: &EntityClient,
    entity_type: EntityType,
    status: u16,
    body: &[u8],
) -> CreateOutcome {
    if status != 201 {
        if (200..300).contains(&status) {
            // 2xx answers are not notified by the client
            warn!(entity = %entity_type, status, "Creation answered without 201");
            client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
        }
        return CreateOutcome::Rejected;
    }

    let id = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("id").and_then(EntityId::from_json));

    match id {
        Some(id) => {
            info!(entity = %entity_type, id = %id, "Entity created");
            client.navigate(Route::Detail(entity_type, id.clone()));
            CreateOutcome::Created(id)
        }
        None => {
            let err = ConsoleError::decode("creation answer carries no id");
            warn!(entity = %entity_type, error = %err, "Created entity cannot be opened");
            client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
            CreateOutcome::Rejected
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
