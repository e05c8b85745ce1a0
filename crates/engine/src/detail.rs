//! Detail page generator and render session
//!
//! A [`DetailPage`] is built once per entity type from its specification.
//! Opening it for one id yields a [`RenderSession`]: the live state of that
//! page, holding the rendered view, the input bindings and the refresh
//! capability used after link/unlink.
//!
//! Phases: `Loading -> Rendered -> (Saving | Linking | Unlinking) ->
//! Rendered -> ... -> Unmounted`. A failed load leaves the previous view in
//! place; results arriving after [`RenderSession::unmount`] are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use corpografo_client::{EntityClient, EntityRecord, OPERATION_SUCCESSFUL};
use corpografo_core::{
    ConsoleError, ConsoleResult, EntityId, EntityType, Notification, Route, Validatable,
};
use corpografo_schema::{
    EntitySpec, FieldKind, MenuItem, MenuTarget, OptionsProvider, RelationBinding,
    UNDEFINED_OPTION_LABEL,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::link::{LinkDialog, LinkPicker};

// ============================================================================
// Bindings
// ============================================================================

/// Current value of one editable input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Reference(Option<EntityId>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Reference(Some(id)) => id.to_json(),
            FieldValue::Reference(None) => Value::Null,
        }
    }
}

/// Input values of a detail page, in field order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    values: IndexMap<String, FieldValue>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of a scalar input
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field)? {
            FieldValue::Text(s) => Some(s),
            FieldValue::Reference(_) => None,
        }
    }

    /// Selected id of a reference input
    pub fn reference(&self, field: &str) -> Option<&EntityId> {
        match self.values.get(field)? {
            FieldValue::Reference(id) => id.as_ref(),
            FieldValue::Text(_) => None,
        }
    }

    /// Replace a text value; refused for unknown or non-text fields
    pub fn set_text(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(field) {
            Some(FieldValue::Text(slot)) => {
                *slot = value.into();
                true
            }
            _ => false,
        }
    }

    /// Replace a reference value; refused for unknown or non-reference fields
    pub fn set_reference(&mut self, field: &str, value: Option<EntityId>) -> bool {
        match self.values.get_mut(field) {
            Some(FieldValue::Reference(slot)) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Save body: every bound value
    pub fn to_body(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

// ============================================================================
// View model
// ============================================================================

/// One option of a reference selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// `None` is the "Undefined" option
    pub id: Option<EntityId>,
    pub label: String,
}

/// One row of a relation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRow {
    pub id: EntityId,
    pub name: String,
    /// Detail page of the related entity
    pub route: Route,
}

/// A rendered relation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTableView {
    pub linked: EntityType,
    /// Rows in backend order
    pub rows: Vec<RelationRow>,
    /// Whether link/unlink actions are offered
    pub linkable: bool,
}

/// Rendered input of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Text,
    Multiline,
    Select {
        options: Vec<SelectOption>,
        linked: Option<EntityType>,
    },
    Relation(RelationTableView),
}

/// One field of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub widget: Widget,
}

impl RenderedField {
    /// "View" affordance of a selector: the chosen entity's detail page,
    /// only when the selector is linked and its value is not null
    pub fn view_route(&self, bindings: &Bindings) -> Option<Route> {
        match &self.widget {
            Widget::Select {
                linked: Some(linked),
                ..
            } => bindings
                .reference(&self.name)
                .map(|id| Route::Detail(*linked, id.clone())),
            _ => None,
        }
    }
}

/// Rendered detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub entity_type: EntityType,
    pub id: EntityId,
    pub title: String,
    /// Fields in specification order
    pub fields: Vec<RenderedField>,
}

impl DetailView {
    pub fn field(&self, name: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

// ============================================================================
// Menu
// ============================================================================

/// What a menu entry does for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Route),
    /// Open the n-gram settings dialog for a corpus
    NgramSetup(EntityId),
}

/// A resolved menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
}

// ============================================================================
// DetailPage
// ============================================================================

/// Detail page generator for one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    entity_type: EntityType,
    spec: Arc<EntitySpec>,
    menu: Vec<MenuItem>,
}

impl DetailPage {
    pub fn new(
        entity_type: EntityType,
        spec: Arc<EntitySpec>,
        menu: Vec<MenuItem>,
    ) -> ConsoleResult<Self> {
        if spec.entity_type() != entity_type {
            return Err(ConsoleError::config(
                entity_type.as_str(),
                "detail",
                format!("specification describes '{}'", spec.entity_type()),
            ));
        }
        spec.validate()?;
        if let Some(item) = menu.iter().find(|m| m.target.owner_type() != entity_type) {
            return Err(ConsoleError::config(
                entity_type.as_str(),
                "menu",
                format!("'{}' is not available on {} pages", item.label, entity_type),
            ));
        }
        Ok(Self {
            entity_type,
            spec,
            menu,
        })
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn spec(&self) -> &Arc<EntitySpec> {
        &self.spec
    }

    /// A session in `Loading` phase, nothing fetched yet
    pub fn session(&self, client: &EntityClient, id: EntityId) -> RenderSession {
        RenderSession {
            shared: Arc::new(SessionShared {
                entity_type: self.entity_type,
                id,
                spec: self.spec.clone(),
                client: client.clone(),
                state: Mutex::new(SessionData::default()),
            }),
        }
    }

    /// Open the page for one entity and render it
    pub async fn open(&self, client: &EntityClient, id: EntityId) -> RenderSession {
        let session = self.session(client, id);
        session.refresh().await;
        session
    }

    /// Extra menu entries for one entity
    pub fn menu_entries(&self, id: &EntityId) -> Vec<MenuEntry> {
        self.menu
            .iter()
            .map(|item| MenuEntry {
                label: item.label.clone(),
                action: match item.target {
                    MenuTarget::Ngram => MenuAction::NgramSetup(id.clone()),
                    MenuTarget::Dictionary => MenuAction::Navigate(Route::Dictionary(id.clone())),
                    MenuTarget::Phrasing => MenuAction::Navigate(Route::Phrasing(id.clone())),
                },
            })
            .collect()
    }
}

// ============================================================================
// RenderSession
// ============================================================================

/// Lifecycle of a render session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Rendered,
    Saving,
    Linking,
    Unlinking,
    Unmounted,
}

#[derive(Debug, Default)]
struct SessionData {
    phase: Phase,
    /// Interactions awaiting their response, oldest first
    in_flight: Vec<Phase>,
    /// A refresh is running
    loading: bool,
    view: Option<DetailView>,
    bindings: Bindings,
    /// Bumped when a refresh starts; older results are dropped
    generation: u64,
    /// Bumped on every observable change
    revision: u64,
}

#[derive(Debug)]
struct SessionShared {
    entity_type: EntityType,
    id: EntityId,
    spec: Arc<EntitySpec>,
    client: EntityClient,
    state: Mutex<SessionData>,
}

/// Point-in-time copy of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    /// Number of save, link and unlink requests still running
    pub in_flight: usize,
    pub view: Option<DetailView>,
    pub bindings: Bindings,
    pub revision: u64,
}

/// Live state of one open detail page.
///
/// Clones share the same state. The state lock is never held across an
/// await.
#[derive(Debug, Clone)]
pub struct RenderSession {
    shared: Arc<SessionShared>,
}

/// Handles are equal when they share one session
impl PartialEq for RenderSession {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl RenderSession {
    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn entity_type(&self) -> EntityType {
        self.shared.entity_type
    }

    pub fn id(&self) -> &EntityId {
        &self.shared.id
    }

    /// Path of the entity on the API
    pub fn path(&self) -> String {
        format!("{}/{}", self.shared.entity_type, self.shared.id)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Number of interactions awaiting their response
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.phase() != Phase::Unmounted
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn view(&self) -> Option<DetailView> {
        self.lock().view.clone()
    }

    pub fn bindings(&self) -> Bindings {
        self.lock().bindings.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let data = self.lock();
        SessionSnapshot {
            phase: data.phase,
            in_flight: data.in_flight.len(),
            view: data.view.clone(),
            bindings: data.bindings.clone(),
            revision: data.revision,
        }
    }

    /// "View" route of a selector field under the current bindings
    pub fn view_route(&self, field: &str) -> Option<Route> {
        let data = self.lock();
        data.view
            .as_ref()?
            .field(field)?
            .view_route(&data.bindings)
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// User edit of a text input
    pub fn set_text(&self, field: &str, value: impl Into<String>) -> bool {
        let mut data = self.lock();
        if data.phase == Phase::Unmounted {
            return false;
        }
        let changed = data.bindings.set_text(field, value);
        if changed {
            data.revision += 1;
        }
        changed
    }

    /// User choice in a selector
    pub fn set_reference(&self, field: &str, value: Option<EntityId>) -> bool {
        let mut data = self.lock();
        if data.phase == Phase::Unmounted {
            return false;
        }
        let changed = data.bindings.set_reference(field, value);
        if changed {
            data.revision += 1;
        }
        changed
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start an interaction. Others may already be running; each one
    /// issues its own request. Refused only once unmounted or before the
    /// first view was rendered.
    fn begin(&self, phase: Phase) -> bool {
        let mut data = self.lock();
        if data.phase == Phase::Unmounted || data.view.is_none() {
            debug!(from = ?data.phase, to = ?phase, "Interaction refused");
            return false;
        }
        data.in_flight.push(phase);
        if !data.loading {
            data.phase = phase;
        }
        data.revision += 1;
        true
    }

    /// End an interaction. `false` when the session was unmounted.
    fn finish(&self, phase: Phase) -> bool {
        let mut data = self.lock();
        if data.phase == Phase::Unmounted {
            return false;
        }
        if let Some(pos) = data.in_flight.iter().position(|p| *p == phase) {
            data.in_flight.remove(pos);
        }
        if !data.loading {
            Self::settle(&mut data);
        }
        data.revision += 1;
        true
    }

    /// Phase of the newest running interaction, `Rendered` when idle
    fn settle(data: &mut SessionData) {
        data.phase = data.in_flight.last().copied().unwrap_or(Phase::Rendered);
    }

    /// Discard the session; later results are ignored
    pub fn unmount(&self) {
        let mut data = self.lock();
        if data.phase != Phase::Unmounted {
            debug!(path = %self.path(), "Unmounting render session");
            data.phase = Phase::Unmounted;
            data.revision += 1;
        }
    }

    /// Re-fetch the record and rebuild view and bindings in place.
    ///
    /// Returns `true` when a new view was installed. On failure the
    /// previous view (if any) stays and the phase returns to `Rendered`.
    pub async fn refresh(&self) -> bool {
        let generation = {
            let mut data = self.lock();
            if data.phase == Phase::Unmounted {
                return false;
            }
            data.phase = Phase::Loading;
            data.loading = true;
            data.generation += 1;
            data.revision += 1;
            data.generation
        };

        let built = self.build().await;

        let mut data = self.lock();
        if data.phase == Phase::Unmounted || data.generation != generation {
            debug!(path = %self.path(), "Dropping stale render");
            return false;
        }
        data.loading = false;
        Self::settle(&mut data);
        data.revision += 1;
        match built {
            Some((view, bindings)) => {
                data.view = Some(view);
                data.bindings = bindings;
                true
            }
            None => false,
        }
    }

    async fn build(&self) -> Option<(DetailView, Bindings)> {
        let shared = &self.shared;
        let record: EntityRecord = shared
            .client
            .fetch_record(shared.entity_type, &shared.id)
            .await
            .ok()?;

        let mut fields = Vec::with_capacity(shared.spec.len());
        let mut bindings = Bindings::new();

        for descriptor in shared.spec.fields() {
            let name = descriptor.name.as_str();
            let widget = match &descriptor.kind {
                FieldKind::ScalarText => {
                    bindings.insert(name, FieldValue::Text(record.text(name)));
                    Widget::Text
                }
                FieldKind::ScalarMultiline => {
                    bindings.insert(name, FieldValue::Text(record.text(name)));
                    Widget::Multiline
                }
                FieldKind::ReferenceSelect { options, linked } => {
                    let options = self.evaluate_options(options).await;
                    bindings.insert(name, FieldValue::Reference(record.reference(name)));
                    Widget::Select {
                        options,
                        linked: *linked,
                    }
                }
                FieldKind::RelationTable { linked, binding } => {
                    let rows = record
                        .relation(name)
                        .into_iter()
                        .map(|row| RelationRow {
                            route: Route::Detail(*linked, row.id.clone()),
                            id: row.id,
                            name: row.name,
                        })
                        .collect();
                    Widget::Relation(RelationTableView {
                        linked: *linked,
                        rows,
                        linkable: binding.is_some(),
                    })
                }
            };
            fields.push(RenderedField {
                name: descriptor.name.clone(),
                label: descriptor.display_label(),
                widget,
            });
        }

        let view = DetailView {
            entity_type: shared.entity_type,
            id: shared.id.clone(),
            title: format!("{} detail", shared.entity_type.display_name()),
            fields,
        };
        Some((view, bindings))
    }

    /// Options of a selector, evaluated fresh on every render. A collection
    /// that cannot be fetched leaves only the "Undefined" choice.
    async fn evaluate_options(&self, provider: &OptionsProvider) -> Vec<SelectOption> {
        let mut options = vec![SelectOption {
            id: None,
            label: UNDEFINED_OPTION_LABEL.to_string(),
        }];
        match provider {
            OptionsProvider::Collection(source) => {
                let summaries = match self.shared.client.fetch_collection(*source).await {
                    Ok(summaries) => summaries,
                    Err(e) => {
                        warn!(source = %source, error = %e, "Selector options unavailable");
                        return options;
                    }
                };
                options.extend(summaries.into_iter().map(|s| SelectOption {
                    id: Some(s.id),
                    label: s.name,
                }));
            }
            OptionsProvider::Fixed(choices) => {
                options.extend(choices.iter().map(|(id, label)| SelectOption {
                    id: Some(id.clone()),
                    label: label.clone(),
                }));
            }
        }
        options
    }

    // ========================================================================
    // Interactions
    // ========================================================================

    /// Send every bound value with one PUT. No refetch follows a success.
    pub async fn save(&self) -> bool {
        if !self.begin(Phase::Saving) {
            return false;
        }
        let body = self.lock().bindings.to_body();
        let client = &self.shared.client;

        let ok = matches!(client.put(&self.path(), body).await, Ok(r) if r.is_success());
        let mounted = self.finish(Phase::Saving);

        if ok && mounted {
            info!(path = %self.path(), "Saved");
            client.notify(Notification::success(OPERATION_SUCCESSFUL));
        }
        ok
    }

    fn relation_binding(&self, field: &str) -> Option<(EntityType, RelationBinding)> {
        match &self.shared.spec.field(field)?.kind {
            FieldKind::RelationTable {
                linked,
                binding: Some(binding),
            } => Some((*linked, *binding)),
            _ => None,
        }
    }

    /// Remove the relation between this entity and `related`, then refresh
    pub async fn unlink(&self, field: &str, related: &EntityId) -> bool {
        let Some((_, binding)) = self.relation_binding(field) else {
            debug!(field, "Unlink requested on a field without a link binding");
            return false;
        };
        if !self.begin(Phase::Unlinking) {
            return false;
        }

        let endpoint = binding.endpoint(&self.shared.id, related);
        let result = self.shared.client.delete(&endpoint.path()).await;

        let ok = matches!(result, Ok(ref r) if r.is_success());
        if self.finish(Phase::Unlinking) && ok {
            info!(path = %endpoint.path(), "Unlinked");
            self.refresh().await;
        }
        ok
    }

    /// Pick an entity through the link dialog, relate it, then refresh.
    /// Cancelling issues no request.
    pub async fn link(&self, field: &str, picker: &dyn LinkPicker) -> bool {
        let Some((linked, binding)) = self.relation_binding(field) else {
            debug!(field, "Link requested on a field without a link binding");
            return false;
        };
        if !self.begin(Phase::Linking) {
            return false;
        }

        let client = &self.shared.client;
        let Some(chosen) = LinkDialog::resolve(client, linked, picker).await else {
            self.finish(Phase::Linking);
            return false;
        };
        if !self.is_mounted() {
            return false;
        }

        let endpoint = binding.endpoint(&self.shared.id, &chosen);
        let result = client.post(&endpoint.path(), Value::Object(Map::new())).await;

        let ok = matches!(result, Ok(ref r) if r.is_success());
        if self.finish(Phase::Linking) && ok {
            info!(path = %endpoint.path(), "Linked");
            self.refresh().await;
        }
        ok
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::FixedPicker;
    use crate::test_support::{Harness, harness};
    use corpografo_client::testing::{RecordingShell, ScriptedTransport};
    use corpografo_client::{ApiRequest, ApiResponse, SessionStore, Transport};
    use corpografo_core::HttpMethod;
    use corpografo_schema::{Catalog, FieldDescriptor};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::OnceLock;
    use tokio_test::block_on;

    fn document_page() -> DetailPage {
        let catalog = Catalog::builtin().unwrap();
        let pages = catalog.get(EntityType::Document).unwrap();
        DetailPage::new(EntityType::Document, pages.detail.clone(), pages.menu.clone()).unwrap()
    }

    fn script_document(h: &Harness, corpora: Value) {
        h.transport.on(
            HttpMethod::Get,
            "document/9",
            200,
            json!({
                "id": 9,
                "name": "Dom Casmurro",
                "language_id": 3,
                "source_id": null,
                "publisher_id": 4,
                "corpora": corpora,
                "authors": [{"id": 5, "name": "Machado de Assis"}],
                "content": "Uma noite destas...",
                "citation": "ASSIS, 1899",
            }),
        );
        h.transport.on(
            HttpMethod::Get,
            "language",
            200,
            json!([{"id": 3, "name": "Portuguese"}]),
        );
        h.transport.on(
            HttpMethod::Get,
            "organization",
            200,
            json!([{"id": 4, "name": "Garnier"}]),
        );
    }

    fn two_corpora() -> Value {
        json!([{"id": 2, "name": "Realism"}, {"id": 1, "name": "Brazilian novels"}])
    }

    fn open_document(h: &Harness) -> RenderSession {
        block_on(document_page().open(&h.client, EntityId::Int(9)))
    }

    fn rows(session: &RenderSession, field: &str) -> Vec<EntityId> {
        match &session.view().unwrap().field(field).unwrap().widget {
            Widget::Relation(table) => table.rows.iter().map(|r| r.id.clone()).collect(),
            other => panic!("not a relation table: {:?}", other),
        }
    }

    #[test]
    fn test_fields_render_in_spec_order() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);

        assert_eq!(session.phase(), Phase::Rendered);
        let view = session.view().unwrap();
        assert_eq!(
            view.field_names(),
            vec![
                "name",
                "language_id",
                "source_id",
                "publisher_id",
                "corpora",
                "authors",
                "content",
                "citation"
            ]
        );
        assert_eq!(view.title, "Document detail");
        assert_eq!(view.field("source_id").unwrap().label, "Source");
    }

    #[test]
    fn test_relation_rows_keep_backend_order() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);
        assert_eq!(rows(&session, "corpora"), vec![EntityId::Int(2), EntityId::Int(1)]);

        let view = session.view().unwrap();
        match &view.field("corpora").unwrap().widget {
            Widget::Relation(table) => {
                assert!(table.linkable);
                assert_eq!(table.rows[0].route.to_string(), "/corpus/2");
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn test_select_options_and_view_route() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);

        let view = session.view().unwrap();
        match &view.field("language_id").unwrap().widget {
            Widget::Select { options, linked } => {
                assert_eq!(*linked, Some(EntityType::Language));
                assert_eq!(
                    options,
                    &vec![
                        SelectOption {
                            id: None,
                            label: "Undefined".to_string()
                        },
                        SelectOption {
                            id: Some(EntityId::Int(3)),
                            label: "Portuguese".to_string()
                        },
                    ]
                );
            }
            other => panic!("unexpected widget {:?}", other),
        }

        assert_eq!(
            session.view_route("language_id"),
            Some(Route::Detail(EntityType::Language, EntityId::Int(3)))
        );
        assert_eq!(session.view_route("source_id"), None);
        assert_eq!(session.view_route("name"), None);

        assert!(session.set_reference("language_id", None));
        assert_eq!(session.view_route("language_id"), None);
    }

    #[test]
    fn test_options_are_fetched_on_every_render() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);
        block_on(session.refresh());
        // two organization selectors per render
        assert_eq!(h.transport.count(HttpMethod::Get, "organization"), 4);
        assert_eq!(h.transport.count(HttpMethod::Get, "language"), 2);
    }

    #[test]
    fn test_options_failure_keeps_the_view() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);

        h.transport.on(HttpMethod::Get, "language", 500, json!({"message": "boom"}));
        assert!(block_on(session.refresh()));

        let view = session.view().unwrap();
        match &view.field("language_id").unwrap().widget {
            Widget::Select { options, .. } => assert_eq!(
                options,
                &vec![SelectOption {
                    id: None,
                    label: "Undefined".to_string()
                }]
            ),
            other => panic!("unexpected widget {:?}", other),
        }
        assert_eq!(
            session.bindings().get("language_id"),
            Some(&FieldValue::Reference(Some(EntityId::Int(3))))
        );
        assert_eq!(rows(&session, "corpora"), vec![EntityId::Int(2), EntityId::Int(1)]);
        assert_eq!(h.shell.error_count(), 1);
    }

    #[test]
    fn test_save_sends_bindings_without_relations() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Put, "document/9", 200, json!({}));
        let session = open_document(&h);

        assert!(session.set_text("name", "Dom Casmurro (2nd ed.)"));
        assert!(!session.set_text("language_id", "x"));
        assert!(!session.set_reference("name", None));
        assert!(block_on(session.save()));

        let writes = h.transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].method, HttpMethod::Put);
        assert_eq!(
            writes[0].body,
            json!({
                "name": "Dom Casmurro (2nd ed.)",
                "language_id": 3,
                "source_id": null,
                "publisher_id": 4,
                "content": "Uma noite destas...",
                "citation": "ASSIS, 1899",
            })
        );
        assert_eq!(
            h.shell.notifications(),
            vec![Notification::success("Operation successful")]
        );
        // no refetch after save
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 1);
        assert_eq!(session.phase(), Phase::Rendered);
    }

    #[test]
    fn test_save_failure_keeps_bindings() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(
            HttpMethod::Put,
            "document/9",
            400,
            json!({"message": "name too long"}),
        );
        let session = open_document(&h);
        session.set_text("name", "x".repeat(300));
        let before = session.bindings();

        assert!(!block_on(session.save()));
        assert_eq!(session.bindings(), before);
        assert_eq!(
            h.shell.notifications(),
            vec![Notification::error("Operation failed: name too long")]
        );
        assert_eq!(session.phase(), Phase::Rendered);
    }

    #[test]
    fn test_save_then_refresh_round_trip() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Put, "document/9", 200, json!({}));
        let session = open_document(&h);

        session.set_text("citation", "ASSIS, Machado. Dom Casmurro. 1899.");
        session.set_reference("source_id", Some(EntityId::Int(4)));
        assert!(block_on(session.save()));
        let saved = session.bindings();

        // the server now answers with what was saved
        let mut record = json!({
            "id": 9,
            "corpora": two_corpora(),
            "authors": [{"id": 5, "name": "Machado de Assis"}],
        });
        for (k, v) in saved.to_body().as_object().unwrap() {
            record[k] = v.clone();
        }
        h.transport.on(HttpMethod::Get, "document/9", 200, record);
        block_on(session.refresh());
        block_on(session.refresh());

        assert_eq!(session.bindings(), saved);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);
        let first = session.snapshot();

        assert!(block_on(session.refresh()));
        let second = session.snapshot();
        assert_eq!(first.view, second.view);
        assert_eq!(first.bindings, second.bindings);
        assert!(second.revision > first.revision);
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 2);
        assert_eq!(rows(&session, "corpora"), vec![EntityId::Int(2), EntityId::Int(1)]);
        assert_eq!(rows(&session, "authors"), vec![EntityId::Int(5)]);
    }

    #[test]
    fn test_unlink_failure_keeps_row_and_notifies_once() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(
            HttpMethod::Delete,
            "corpus/1/document/9",
            403,
            json!({"message": "forbidden"}),
        );
        let session = open_document(&h);

        assert!(!block_on(session.unlink("corpora", &EntityId::Int(1))));
        assert_eq!(rows(&session, "corpora"), vec![EntityId::Int(2), EntityId::Int(1)]);
        assert_eq!(h.shell.error_count(), 1);
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 1);
        assert_eq!(session.phase(), Phase::Rendered);
    }

    #[test]
    fn test_unlink_success_refreshes() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Delete, "corpus/1/document/9", 200, json!({}));
        let session = open_document(&h);

        script_document(&h, json!([{"id": 2, "name": "Realism"}]));
        assert!(block_on(session.unlink("corpora", &EntityId::Int(1))));

        assert_eq!(rows(&session, "corpora"), vec![EntityId::Int(2)]);
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 2);
        assert!(h.shell.notifications().is_empty());
    }

    #[test]
    fn test_unlink_on_read_only_table_sends_nothing() {
        let h = harness();
        h.transport.on(
            HttpMethod::Get,
            "language/3",
            200,
            json!({"id": 3, "name": "Portuguese", "documents": [{"id": 9, "name": "Dom Casmurro"}]}),
        );
        let catalog = Catalog::builtin().unwrap();
        let pages = catalog.get(EntityType::Language).unwrap();
        let page = DetailPage::new(EntityType::Language, pages.detail.clone(), vec![]).unwrap();
        let session = block_on(page.open(&h.client, EntityId::Int(3)));

        assert!(!block_on(session.unlink("documents", &EntityId::Int(9))));
        assert!(!block_on(session.link("documents", &FixedPicker(Some(EntityId::Int(9))))));
        assert!(h.transport.writes().is_empty());
    }

    #[test]
    fn test_link_cancel_issues_no_writes() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(
            HttpMethod::Get,
            "corpus",
            200,
            json!([{"id": 1, "name": "Brazilian novels"}, {"id": 8, "name": "Poetry"}]),
        );
        let session = open_document(&h);

        assert!(!block_on(session.link("corpora", &FixedPicker(None))));
        assert!(h.transport.writes().is_empty());
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 1);
        assert_eq!(session.phase(), Phase::Rendered);
    }

    #[test]
    fn test_link_confirm_posts_and_refreshes() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(
            HttpMethod::Get,
            "corpus",
            200,
            json!([{"id": 1, "name": "Brazilian novels"}, {"id": 8, "name": "Poetry"}]),
        );
        h.transport.on(HttpMethod::Post, "corpus/8/document/9", 201, json!({}));
        let session = open_document(&h);

        script_document(
            &h,
            json!([{"id": 2, "name": "Realism"}, {"id": 1, "name": "Brazilian novels"}, {"id": 8, "name": "Poetry"}]),
        );
        assert!(block_on(session.link("corpora", &FixedPicker(Some(EntityId::Int(8))))));

        let writes = h.transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].path, "corpus/8/document/9");
        assert_eq!(
            rows(&session, "corpora"),
            vec![EntityId::Int(2), EntityId::Int(1), EntityId::Int(8)]
        );
    }

    #[test]
    fn test_link_failure_does_not_refresh() {
        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Get, "author", 200, json!([{"id": 6, "name": "Alencar"}]));
        h.transport.on(
            HttpMethod::Post,
            "author/6/document/9",
            409,
            json!({"msg": "already linked"}),
        );
        let session = open_document(&h);

        assert!(!block_on(session.link("authors", &FixedPicker(Some(EntityId::Int(6))))));
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 1);
        assert_eq!(
            h.shell.notifications(),
            vec![Notification::error("Operation failed: already linked")]
        );
    }

    #[test]
    fn test_first_load_failure_renders_nothing() {
        let h = harness();
        h.transport.on(HttpMethod::Get, "document/9", 404, json!({"message": "Not found"}));
        let session = open_document(&h);

        assert_eq!(session.phase(), Phase::Rendered);
        assert_eq!(session.view(), None);
        assert!(!block_on(session.save()));
        assert!(h.transport.writes().is_empty());
        assert_eq!(h.shell.error_count(), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_view() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);
        let before = session.view();

        h.transport.fail(HttpMethod::Get, "document/9", "connection reset");
        assert!(!block_on(session.refresh()));
        assert_eq!(session.view(), before);
        assert_eq!(session.phase(), Phase::Rendered);
    }

    #[test]
    fn test_unmounted_session_ignores_everything() {
        let h = harness();
        script_document(&h, two_corpora());
        let session = open_document(&h);
        session.unmount();

        assert!(!block_on(session.refresh()));
        assert!(!session.set_text("name", "x"));
        assert!(!block_on(session.save()));
        assert_eq!(session.phase(), Phase::Unmounted);
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 1);
    }

    /// Transport that unmounts the session while a request is in flight
    struct UnmountingTransport {
        inner: ScriptedTransport,
        session: OnceLock<RenderSession>,
    }

    #[async_trait::async_trait]
    impl Transport for UnmountingTransport {
        async fn send(&self, request: ApiRequest) -> ConsoleResult<ApiResponse> {
            if let Some(session) = self.session.get() {
                session.unmount();
            }
            self.inner.send(request).await
        }
    }

    #[test]
    fn test_results_after_unmount_are_dropped() {
        let transport = Arc::new(UnmountingTransport {
            inner: ScriptedTransport::new(),
            session: OnceLock::new(),
        });
        transport.inner.on(
            HttpMethod::Get,
            "corpus/1",
            200,
            json!({"id": 1, "name": "Realism", "documents": []}),
        );
        let shell = Arc::new(RecordingShell::new());
        let client = EntityClient::new(transport.clone(), SessionStore::in_memory(), shell.clone());

        let catalog = Catalog::builtin().unwrap();
        let pages = catalog.get(EntityType::Corpus).unwrap();
        let page = DetailPage::new(EntityType::Corpus, pages.detail.clone(), pages.menu.clone()).unwrap();
        let session = page.session(&client, EntityId::Int(1));
        let _ = transport.session.set(session.clone());

        assert!(!block_on(session.refresh()));
        assert_eq!(session.view(), None);
        assert_eq!(session.phase(), Phase::Unmounted);
        assert!(shell.notifications().is_empty());
    }

    /// Unlinks a corpus while the save request is still waiting for its answer
    struct UnlinkDuringSave {
        inner: Arc<ScriptedTransport>,
        session: OnceLock<RenderSession>,
        unlinked: Mutex<Option<(bool, usize)>>,
    }

    #[async_trait::async_trait]
    impl Transport for UnlinkDuringSave {
        async fn send(&self, request: ApiRequest) -> ConsoleResult<ApiResponse> {
            if request.method == HttpMethod::Put {
                if let Some(session) = self.session.get() {
                    let in_flight = session.in_flight();
                    let ok = session.unlink("corpora", &EntityId::Int(1)).await;
                    *self.unlinked.lock().unwrap() = Some((ok, in_flight));
                }
            }
            self.inner.send(request).await
        }
    }

    #[test]
    fn test_unlink_while_save_in_flight_issues_its_own_request() {
        let scripted = Arc::new(ScriptedTransport::new());
        let transport = Arc::new(UnlinkDuringSave {
            inner: scripted.clone(),
            session: OnceLock::new(),
            unlinked: Mutex::new(None),
        });
        let shell = Arc::new(RecordingShell::new());
        let h = Harness {
            client: EntityClient::new(transport.clone(), SessionStore::in_memory(), shell.clone()),
            transport: scripted,
            shell,
        };
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Delete, "corpus/1/document/9", 200, json!({}));
        h.transport.on(HttpMethod::Put, "document/9", 200, json!({}));

        let session = open_document(&h);
        let _ = transport.session.set(session.clone());
        assert!(session.set_text("content", "Capitu"));

        assert!(block_on(session.save()));
        assert_eq!(*transport.unlinked.lock().unwrap(), Some((true, 1)));
        assert_eq!(h.transport.count(HttpMethod::Delete, "corpus/1/document/9"), 1);
        assert_eq!(h.transport.count(HttpMethod::Put, "document/9"), 1);
        assert_eq!(h.transport.count(HttpMethod::Get, "document/9"), 2);
        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.phase(), Phase::Rendered);
        assert_eq!(h.shell.notifications(), vec![Notification::success(OPERATION_SUCCESSFUL)]);
    }

    #[test]
    fn test_unmount_during_link_dialog_sends_nothing() {
        struct UnmountingPicker(RenderSession);

        #[async_trait::async_trait(?Send)]
        impl LinkPicker for UnmountingPicker {
            async fn pick(&self, _state: crate::link::LinkDialogState) -> Option<EntityId> {
                self.0.unmount();
                Some(EntityId::Int(1))
            }
        }

        let h = harness();
        script_document(&h, two_corpora());
        h.transport.on(HttpMethod::Get, "corpus", 200, json!([{"id": 1, "name": "Brazilian novels"}]));
        let session = open_document(&h);

        assert!(!block_on(session.link("corpora", &UnmountingPicker(session.clone()))));
        assert!(h.transport.writes().is_empty());
    }

    #[test]
    fn test_page_construction_checks() {
        let spec = Arc::new(EntitySpec::new(EntityType::Author, vec![FieldDescriptor::text("name")]).unwrap());
        assert!(DetailPage::new(EntityType::Corpus, spec.clone(), vec![]).is_err());
        assert!(
            DetailPage::new(
                EntityType::Author,
                spec.clone(),
                vec![MenuItem::new("N-grams", MenuTarget::Ngram)]
            )
            .unwrap_err()
            .is_config()
        );
        assert!(DetailPage::new(EntityType::Author, spec, vec![]).is_ok());
    }

    #[test]
    fn test_menu_entries() {
        let page = document_page();
        assert_eq!(
            page.menu_entries(&EntityId::Int(9)),
            vec![
                MenuEntry {
                    label: "Dictionary".to_string(),
                    action: MenuAction::Navigate(Route::Dictionary(EntityId::Int(9))),
                },
                MenuEntry {
                    label: "Phrasing".to_string(),
                    action: MenuAction::Navigate(Route::Phrasing(EntityId::Int(9))),
                },
            ]
        );

        let catalog = Catalog::builtin().unwrap();
        let corpus = catalog.get(EntityType::Corpus).unwrap();
        let page = DetailPage::new(EntityType::Corpus, corpus.detail.clone(), corpus.menu.clone()).unwrap();
        assert_eq!(
            page.menu_entries(&EntityId::Int(1))[0].action,
            MenuAction::NgramSetup(EntityId::Int(1))
        );
    }
}
