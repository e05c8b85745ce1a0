//! Relation link dialog
//!
//! A modal, searchable single-select over the full collection of the
//! related entity type. The dialog only picks an id; the detail page issues
//! the link request and the refresh.

use async_trait::async_trait;
use corpografo_client::{EntityClient, EntitySummary};
use corpografo_core::{EntityId, EntityType};
use tracing::debug;

/// State of an open link dialog
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDialogState {
    pub target: EntityType,
    pub candidates: Vec<EntitySummary>,
    pub query: String,
    pub selected: Option<EntityId>,
}

impl LinkDialogState {
    pub fn new(target: EntityType, candidates: Vec<EntitySummary>) -> Self {
        Self {
            target,
            candidates,
            query: String::new(),
            selected: None,
        }
    }

    /// Dialog heading
    pub fn title(&self) -> String {
        format!("Link {}", self.target.as_str())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Candidates whose name contains the query (case-insensitive)
    pub fn visible(&self) -> Vec<&EntitySummary> {
        let needle = self.query.trim().to_lowercase();
        self.candidates
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Select a candidate; ids outside the collection are refused
    pub fn select(&mut self, id: &EntityId) -> bool {
        if self.candidates.iter().any(|c| &c.id == id) {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Confirmed choice, if a valid one is selected
    pub fn confirm(&self) -> Option<EntityId> {
        self.selected
            .as_ref()
            .filter(|id| self.candidates.iter().any(|c| &c.id == *id))
            .cloned()
    }
}

/// Whatever presents the dialog and waits for the user
#[async_trait(?Send)]
pub trait LinkPicker {
    /// `Some(id)` on confirm, `None` on cancel
    async fn pick(&self, state: LinkDialogState) -> Option<EntityId>;
}

/// Entry points of the dialog
pub struct LinkDialog;

impl LinkDialog {
    /// Fetch the candidates. `None` when they could not be loaded.
    pub async fn open(client: &EntityClient, target: EntityType) -> Option<LinkDialogState> {
        let candidates = client.fetch_collection(target).await.ok()?;
        Some(LinkDialogState::new(target, candidates))
    }

    /// Open the dialog and wait for the user's choice.
    ///
    /// A failed candidate fetch resolves to `None` (already notified). A
    /// picked id that is not one of the candidates is treated as cancel.
    pub async fn resolve(
        client: &EntityClient,
        target: EntityType,
        picker: &dyn LinkPicker,
    ) -> Option<EntityId> {
        let state = Self::open(client, target).await?;
        let candidates = state.candidates.clone();
        let picked = picker.pick(state).await?;
        if candidates.iter().any(|c| c.id == picked) {
            Some(picked)
        } else {
            debug!(entity = %target, id = %picked, "Ignoring pick outside the candidates");
            None
        }
    }
}

// ============================================================================
// Test pickers
// ============================================================================

/// Picker that always answers with a fixed choice
#[cfg(test)]
pub(crate) struct FixedPicker(pub Option<EntityId>);

#[cfg(test)]
#[async_trait(?Send)]
impl LinkPicker for FixedPicker {
    async fn pick(&self, _state: LinkDialogState) -> Option<EntityId> {
        self.0.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
