//! # Link Dialog Component
//!
//! Modal, searchable single-select over the candidates of a relation.
//! Confirming answers the waiting detail page with the chosen id;
//! cancelling (button or backdrop) answers with nothing.

use corpografo_core::EntityId;
use dioxus::prelude::*;

use crate::state::{APP_STATE, LinkRequest};

#[derive(Props, Clone, PartialEq)]
pub struct LinkDialogProps {
    pub request: LinkRequest,
}

#[component]
pub fn LinkDialog(props: LinkDialogProps) -> Element {
    let mut dialog = use_signal(|| props.request.state.clone());
    let state = dialog.read().clone();
    let title = state.title();
    let chosen = state.confirm();

    let confirm_request = props.request.clone();
    let cancel_request = props.request.clone();

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "{title}" }

            input {
                class: "input",
                r#type: "search",
                placeholder: "Search",
                value: "{state.query}",
                oninput: move |e| dialog.write().set_query(e.value()),
            }

            ul {
                class: "dialog-list",
                {state.visible().into_iter().map(|candidate| {
                    let id = candidate.id.clone();
                    let selected = state.selected.as_ref() == Some(&candidate.id);
                    rsx! {
                        li {
                            key: "{candidate.id}",
                            class: if selected { "dialog-option selected" } else { "dialog-option" },
                            onclick: move |_| {
                                dialog.write().select(&id);
                            },
                            "{candidate.name}"
                        }
                    }
                })}
            }

            div {
                class: "dialog-actions",
                button {
                    class: "btn",
                    onclick: move |_| {
                        cancel_request.respond(None);
                        APP_STATE.write().close_dialog();
                    },
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: chosen.is_none(),
                    onclick: move |_| {
                        let choice: Option<EntityId> = dialog.read().confirm();
                        if choice.is_some() {
                            confirm_request.respond(choice);
                            APP_STATE.write().close_dialog();
                        }
                    },
                    "OK"
                }
            }
        }
    }
}
