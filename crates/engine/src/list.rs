//! List page generator
//!
//! A list page fetches the full collection of one entity type and shows it
//! as a filterable, paginated single-column table. Clicking a row opens the
//! entity's detail page.

use corpografo_client::{EntityClient, EntitySummary};
use corpografo_core::{EntityId, EntityType, Route, Shell};
use tracing::debug;

use crate::table::TableState;

/// List page of one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    entity_type: EntityType,
    title: String,
}

impl ListPage {
    /// Title defaults to the plural label of the type
    pub fn new(entity_type: EntityType, title: Option<String>) -> Self {
        let title = title.unwrap_or_else(|| entity_type.plural_label().to_string());
        Self { entity_type, title }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fetch the collection. `None` when it could not be loaded (the client
    /// has already notified the user).
    pub async fn load(&self, client: &EntityClient) -> Option<ListView> {
        let rows = client.fetch_collection(self.entity_type).await.ok()?;
        debug!(entity = %self.entity_type, rows = rows.len(), "Loaded list");
        Some(ListView {
            entity_type: self.entity_type,
            title: self.title.clone(),
            table: TableState::new(rows),
        })
    }
}

/// A loaded list page
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub entity_type: EntityType,
    pub title: String,
    pub table: TableState<EntitySummary>,
}

impl ListView {
    /// Column headers
    pub fn columns(&self) -> &'static [&'static str] {
        &["Name"]
    }

    /// Route of one row's detail page
    pub fn row_route(&self, id: &EntityId) -> Route {
        Route::Detail(self.entity_type, id.clone())
    }

    /// Open a row's detail page
    pub fn open_row(&self, id: &EntityId, shell: &dyn Shell) {
        shell.navigate(self.row_route(id));
    }

    /// Route of the creation page for this type
    pub fn create_route(&self) -> Route {
        Route::Create(self.entity_type)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use corpografo_core::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_test::block_on;

    #[test]
    fn test_default_title() {
        assert_eq!(ListPage::new(EntityType::Corpus, None).title(), "Corpora");
        assert_eq!(
            ListPage::new(EntityType::Author, Some("People".into())).title(),
            "People"
        );
    }

    #[test]
    fn test_load_and_open_row() {
        let h = harness();
        h.transport.on(
            HttpMethod::Get,
            "document",
            200,
            json!([{"id": 42, "name": "Dom Casmurro"}, {"id": 43, "name": "Iracema"}]),
        );

        let page = ListPage::new(EntityType::Document, None);
        let view = block_on(page.load(&h.client)).unwrap();
        assert_eq!(view.table.rows().len(), 2);
        assert_eq!(view.columns(), &["Name"]);

        view.open_row(&EntityId::Int(42), h.shell.as_ref());
        assert_eq!(
            h.shell.routes(),
            vec![Route::Detail(EntityType::Document, EntityId::Int(42))]
        );
    }

    #[test]
    fn test_load_failure_gives_none() {
        let h = harness();
        h.transport.on(HttpMethod::Get, "corpus", 500, json!({"message": "boom"}));

        let page = ListPage::new(EntityType::Corpus, None);
        assert!(block_on(page.load(&h.client)).is_none());
        assert_eq!(h.shell.error_count(), 1);
    }
}
