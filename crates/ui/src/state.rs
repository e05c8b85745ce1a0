//! Application State Management for the Corpografo console
//!
//! Navigation, notifications and the active modal live in one global
//! Dioxus signal. The remote client and the page generators are shared
//! through the [`Console`] context.

use std::sync::{Arc, Mutex};

use corpografo_client::{EntityClient, SessionStore};
use corpografo_core::{EntityId, Notification, Route, Shell};
use corpografo_engine::{LinkDialogState, LinkPicker, PageRegistry, guard};
use dioxus::prelude::*;
use tokio::sync::oneshot;

/// Global application state
pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// Notifications kept on screen at once
pub const MAX_TOASTS: usize = 5;

// ============================================================================
// Console context
// ============================================================================

/// Services shared by every page
#[derive(Clone)]
pub struct Console {
    pub client: EntityClient,
    pub registry: Arc<PageRegistry>,
}

impl Console {
    pub fn new(client: EntityClient, registry: PageRegistry) -> Self {
        Self {
            client,
            registry: Arc::new(registry),
        }
    }
}

// ============================================================================
// Dialogs
// ============================================================================

/// Reply channel of an open link dialog
pub type LinkResponder = Arc<Mutex<Option<oneshot::Sender<Option<EntityId>>>>>;

/// An open link dialog waiting for the user
#[derive(Clone)]
pub struct LinkRequest {
    pub state: LinkDialogState,
    responder: LinkResponder,
}

impl LinkRequest {
    pub fn new(state: LinkDialogState) -> (Self, oneshot::Receiver<Option<EntityId>>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            state,
            responder: Arc::new(Mutex::new(Some(tx))),
        };
        (request, rx)
    }

    /// Send the user's answer; only the first answer counts
    pub fn respond(&self, choice: Option<EntityId>) {
        let sender = self
            .responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(sender) = sender {
            let _ = sender.send(choice);
        }
    }
}

impl PartialEq for LinkRequest {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.responder, &other.responder)
    }
}

impl std::fmt::Debug for LinkRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkRequest")
            .field("target", &self.state.target)
            .field("candidates", &self.state.candidates.len())
            .finish()
    }
}

/// Active modal dialog
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Relation link picker
    Link(LinkRequest),
    /// N-gram analysis settings for a corpus
    Ngram(EntityId),
}

// ============================================================================
// Toasts
// ============================================================================

/// A notification on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

// ============================================================================
// App State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Page on screen
    pub route: Route,
    pub toasts: Vec<Toast>,
    pub dialog: Option<Dialog>,
    pub drawer_open: bool,
    next_toast: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a page; open dialogs are cancelled and the drawer closes
    pub fn navigate(&mut self, route: Route) {
        self.close_dialog();
        self.drawer_open = false;
        self.route = route;
    }

    pub fn push_toast(&mut self, notification: Notification) -> u64 {
        self.next_toast += 1;
        self.toasts.push(Toast {
            id: self.next_toast,
            notification,
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
        self.next_toast
    }

    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.close_dialog();
        self.dialog = Some(dialog);
    }

    /// Close the active dialog; a pending link dialog answers "cancel"
    pub fn close_dialog(&mut self) {
        if let Some(Dialog::Link(request)) = self.dialog.take() {
            request.respond(None);
        }
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }
}

// ============================================================================
// Shell
// ============================================================================

/// Effects of the engine applied to the global state.
///
/// Every navigation passes the session guard.
#[derive(Debug, Clone)]
pub struct UiShell {
    session: SessionStore,
}

impl UiShell {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl Shell for UiShell {
    fn notify(&self, notification: Notification) {
        APP_STATE.write().push_toast(notification);
    }

    fn navigate(&self, route: Route) {
        let landing = guard(&route, &self.session);
        tracing::info!(route = %landing, "Navigate");
        APP_STATE.write().navigate(landing);
    }
}

/// Link picker presenting the modal and waiting for its answer
pub struct DialogPicker;

#[async_trait::async_trait(?Send)]
impl LinkPicker for DialogPicker {
    async fn pick(&self, state: LinkDialogState) -> Option<EntityId> {
        let (request, rx) = LinkRequest::new(state);
        APP_STATE.write().show_dialog(Dialog::Link(request));
        rx.await.ok().flatten()
    }
}

// ============================================================================
// Tests
// ============================================================================
