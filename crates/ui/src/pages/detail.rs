//! Entity detail page
//!
//! The page owns one [`RenderSession`]. Every await on the session is
//! followed by a copy of its revision into a signal, which is what makes
//! the component redraw. Leaving the page unmounts the session so late
//! answers are dropped.

use corpografo_core::{EntityId, EntityType, Route};
use corpografo_engine::{
    DetailPage, FieldValue, MenuAction, Phase, RelationTableView, RenderSession, RenderedField,
    Widget,
};
use dioxus::prelude::*;

use crate::components::{Button, DataTable, Select, SelectChoice, TableRow, TextArea, TextInput};
use crate::pages::{Loading, NotFound, Unavailable};
use crate::state::{APP_STATE, Console, Dialog, DialogPicker};

#[component]
pub fn EntityDetailPage(entity_type: EntityType, id: EntityId) -> Element {
    let console = use_context::<Console>();
    match console.registry.get(entity_type) {
        Some(set) => rsx! { DetailBody { page: set.detail.clone(), id: id } },
        None => rsx! { NotFound {} },
    }
}

#[component]
fn DetailBody(page: DetailPage, id: EntityId) -> Element {
    let console = use_context::<Console>();
    let mut revision = use_signal(|| 0u64);

    let session = use_hook(|| page.session(&console.client, id.clone()));

    let loader = session.clone();
    use_hook(move || {
        spawn(async move {
            loader.refresh().await;
            revision.set(loader.revision());
        })
    });

    let dropped = session.clone();
    use_drop(move || dropped.unmount());

    // subscribe to session changes
    let _ = revision();
    let snapshot = session.snapshot();

    let Some(view) = snapshot.view.clone() else {
        return if snapshot.phase == Phase::Loading {
            rsx! { Loading {} }
        } else {
            rsx! { Unavailable {} }
        };
    };

    let working = snapshot.in_flight > 0;
    let menu = page.menu_entries(&id);
    let save_session = session.clone();

    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                h2 { class: "card-title", "{view.title}" }
                div { class: "spacer" }
                if working {
                    span { class: "muted", "Working..." }
                }
                {menu.into_iter().map(|entry| {
                    let client = console.client.clone();
                    let action = entry.action;
                    let label = entry.label;
                    rsx! {
                        Button {
                            key: "{label}",
                            label: label.clone(),
                            onclick: move |_| match action.clone() {
                                MenuAction::Navigate(route) => client.navigate(route),
                                MenuAction::NgramSetup(corpus) => {
                                    APP_STATE.write().show_dialog(Dialog::Ngram(corpus));
                                }
                            },
                        }
                    }
                })}
            }

            {view.fields.iter().cloned().map(|field| {
                let value = snapshot.bindings.get(&field.name).cloned();
                let view_route = field.view_route(&snapshot.bindings);
                let key = field.name.clone();
                rsx! {
                    FieldView {
                        key: "{key}",
                        field: field,
                        value: value,
                        view_route: view_route,
                        session: session.clone(),
                        on_changed: move |rev: u64| revision.set(rev),
                    }
                }
            })}

            div {
                class: "card-actions",
                Button {
                    label: "Save".to_string(),
                    primary: true,
                    onclick: move |_| {
                        let session = save_session.clone();
                        spawn(async move {
                            session.save().await;
                            revision.set(session.revision());
                        });
                    },
                }
            }
        }
    }
}

/// One field of the detail page
#[component]
fn FieldView(
    field: RenderedField,
    value: Option<FieldValue>,
    view_route: Option<Route>,
    session: RenderSession,
    on_changed: EventHandler<u64>,
) -> Element {
    let console = use_context::<Console>();
    let name = field.name.clone();
    let label = field.label.clone();
    let multiline = matches!(field.widget, Widget::Multiline);

    match field.widget {
        Widget::Text | Widget::Multiline => {
            let text = match &value {
                Some(FieldValue::Text(text)) => text.clone(),
                _ => String::new(),
            };
            let edit = move |v: String| {
                if session.set_text(&name, v) {
                    on_changed.call(session.revision());
                }
            };
            if multiline {
                rsx! { TextArea { label: label, value: text, on_change: edit } }
            } else {
                rsx! { TextInput { label: label, value: text, on_change: edit } }
            }
        }

        Widget::Select { options, .. } => {
            let selected = match &value {
                Some(FieldValue::Reference(Some(id))) => id.to_string(),
                _ => String::new(),
            };
            let choices: Vec<SelectChoice> = options
                .iter()
                .map(|o| {
                    let value = o.id.as_ref().map(ToString::to_string).unwrap_or_default();
                    SelectChoice::new(value, o.label.clone())
                })
                .collect();
            let client = console.client.clone();

            rsx! {
                div {
                    class: "select-row",
                    Select {
                        label: label,
                        value: selected,
                        options: choices,
                        on_change: move |v: String| {
                            let chosen = options
                                .iter()
                                .find(|o| o.id.as_ref().map(ToString::to_string).unwrap_or_default() == v)
                                .and_then(|o| o.id.clone());
                            if session.set_reference(&name, chosen) {
                                on_changed.call(session.revision());
                            }
                        },
                    }
                    if let Some(route) = view_route {
                        Button {
                            label: "View".to_string(),
                            onclick: move |_| client.navigate(route.clone()),
                        }
                    }
                }
            }
        }

        Widget::Relation(table) => rsx! {
            RelationView {
                name: name,
                label: label,
                table: table,
                session: session,
                on_changed: on_changed,
            }
        },
    }
}

/// Relation table with link and unlink actions
#[component]
fn RelationView(
    name: String,
    label: String,
    table: RelationTableView,
    session: RenderSession,
    on_changed: EventHandler<u64>,
) -> Element {
    let console = use_context::<Console>();
    let rows: Vec<TableRow> = table
        .rows
        .iter()
        .map(|row| TableRow {
            key: row.id.to_string(),
            cells: vec![row.name.clone()],
            route: Some(row.route.clone()),
        })
        .collect();
    let related: Vec<EntityId> = table.rows.iter().map(|row| row.id.clone()).collect();

    let link_session = session.clone();
    let link_field = name.clone();
    let client = console.client.clone();

    rsx! {
        div {
            class: "relation",
            div {
                class: "relation-header",
                h3 { class: "relation-title", "{label}" }
                div { class: "spacer" }
                if table.linkable {
                    Button {
                        label: "Link".to_string(),
                        onclick: move |_| {
                            let session = link_session.clone();
                            let field = link_field.clone();
                            spawn(async move {
                                session.link(&field, &DialogPicker).await;
                                on_changed.call(session.revision());
                            });
                        },
                    }
                }
            }
            DataTable {
                columns: vec!["Name".to_string()],
                rows: rows,
                action: table.linkable.then(|| "Unlink".to_string()),
                on_open: move |route| client.navigate(route),
                on_action: move |key: String| {
                    let Some(id) = related.iter().find(|id| id.to_string() == key).cloned() else {
                        return;
                    };
                    let session = session.clone();
                    let field = name.clone();
                    spawn(async move {
                        session.unlink(&field, &id).await;
                        on_changed.call(session.revision());
                    });
                },
            }
        }
    }
}
