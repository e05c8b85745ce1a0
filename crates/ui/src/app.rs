//! Main Application Component for the Corpografo console
//!
//! The root component draws the header, the drawer, the page of the
//! current route, the notification stack and the active dialog.

use corpografo_core::Route;
use dioxus::prelude::*;

use crate::components::{Drawer, Header, LinkDialog, NgramDialog, Toasts};
use crate::pages::{
    AnalysisPage, EntityCreatePage, EntityDetailPage, EntityListPage, HomePage, LoginPage,
};
use crate::state::{APP_STATE, Dialog};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    use_effect(|| {
        tracing::info!("Corpografo console initialized");
    });

    rsx! {
        div {
            class: "app-container",

            Header {}
            Drawer {}

            MainContent {}

            Toasts {}
            DialogOverlay {}
        }
    }
}

// ============================================================================
// Main Content
// ============================================================================

/// Page of the current route.
///
/// Pages are keyed by route so that every navigation mounts a fresh page
/// and the previous one is dropped.
#[component]
fn MainContent() -> Element {
    let route = APP_STATE.read().route.clone();
    let key = route.to_string();

    rsx! {
        main {
            class: "main-content",
            key: "{key}",
            match route {
                Route::Home => rsx! { HomePage {} },
                Route::Login => rsx! { LoginPage {} },
                Route::List(entity_type) => rsx! { EntityListPage { entity_type: entity_type } },
                Route::Create(entity_type) => rsx! { EntityCreatePage { entity_type: entity_type } },
                Route::Detail(entity_type, id) => rsx! {
                    EntityDetailPage { entity_type: entity_type, id: id }
                },
                analysis @ (Route::Ngram { .. } | Route::Dictionary(_) | Route::Phrasing(_)) => rsx! {
                    AnalysisPage { route: analysis }
                },
            }
        }
    }
}

// ============================================================================
// Dialog Overlay
// ============================================================================

/// Modal layer; clicking the backdrop cancels the dialog
#[component]
fn DialogOverlay() -> Element {
    let dialog = APP_STATE.read().dialog.clone();

    let Some(dialog) = dialog else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "dialog-backdrop",
            onclick: move |_| APP_STATE.write().close_dialog(),

            div {
                class: "dialog-frame",
                onclick: move |e| e.stop_propagation(),
                match dialog {
                    Dialog::Link(request) => rsx! { LinkDialog { request: request } },
                    Dialog::Ngram(corpus) => rsx! { NgramDialog { corpus: corpus } },
                }
            }
        }
    }
}
