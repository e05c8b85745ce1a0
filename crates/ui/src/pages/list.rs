//! Entity list page

use corpografo_core::EntityType;
use corpografo_engine::{ListPage, ListView};
use dioxus::prelude::*;

use crate::components::{Button, DataTable, FilterBox, Pager, TableRow};
use crate::pages::{Loading, NotFound, Unavailable};
use crate::state::Console;

#[component]
pub fn EntityListPage(entity_type: EntityType) -> Element {
    let console = use_context::<Console>();
    match console.registry.get(entity_type) {
        Some(set) => rsx! { ListBody { page: set.list.clone() } },
        None => rsx! { NotFound {} },
    }
}

#[component]
fn ListBody(page: ListPage) -> Element {
    let console = use_context::<Console>();
    let mut view = use_signal(|| None::<ListView>);
    let mut loaded = use_signal(|| false);

    let client = console.client.clone();
    use_hook(move || {
        spawn(async move {
            view.set(page.load(&client).await);
            loaded.set(true);
        })
    });

    if !loaded() {
        return rsx! { Loading {} };
    }
    let Some(current) = view() else {
        return rsx! { Unavailable {} };
    };

    let rows: Vec<TableRow> = current
        .table
        .page_rows()
        .into_iter()
        .map(|row| TableRow {
            key: row.id.to_string(),
            cells: vec![row.name.clone()],
            route: Some(current.row_route(&row.id)),
        })
        .collect();
    let columns: Vec<String> = current.columns().iter().map(|c| c.to_string()).collect();
    let create_route = current.create_route();
    let open_client = console.client.clone();
    let create_client = console.client.clone();

    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                h2 { class: "card-title", "{current.title}" }
                div { class: "spacer" }
                FilterBox {
                    value: current.table.filter().to_string(),
                    on_change: move |q: String| {
                        if let Some(v) = &mut *view.write() {
                            v.table.set_filter(q);
                        }
                    },
                }
                Button {
                    label: "New".to_string(),
                    onclick: move |_| create_client.navigate(create_route.clone()),
                }
            }
            DataTable {
                columns: columns,
                rows: rows,
                on_open: move |route| open_client.navigate(route),
            }
            Pager {
                label: current.table.range_label(),
                page: current.table.page(),
                page_count: current.table.page_count(),
                on_prev: move |_| {
                    if let Some(v) = &mut *view.write() {
                        v.table.prev_page();
                    }
                },
                on_next: move |_| {
                    if let Some(v) = &mut *view.write() {
                        v.table.next_page();
                    }
                },
            }
        }
    }
}
