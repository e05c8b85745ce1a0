//! Analysis pages: n-grams, dictionary and phrasing tables

use corpografo_core::Route;
use corpografo_engine::{AnalysisKind, AnalysisView};
use dioxus::prelude::*;

use crate::components::{Button, DataTable, FilterBox, Pager, TableRow};
use crate::pages::{Loading, NotFound, Unavailable};
use crate::state::Console;

#[component]
pub fn AnalysisPage(route: Route) -> Element {
    match AnalysisKind::from_route(&route) {
        Some(kind) => rsx! { AnalysisBody { kind: kind } },
        None => rsx! { NotFound {} },
    }
}

#[component]
fn AnalysisBody(kind: AnalysisKind) -> Element {
    let console = use_context::<Console>();
    let mut view = use_signal(|| None::<AnalysisView>);
    let mut loaded = use_signal(|| false);

    let client = console.client.clone();
    use_hook(move || {
        spawn(async move {
            view.set(kind.load(&client).await);
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
        .enumerate()
        .map(|(i, row)| TableRow {
            key: format!("{}-{}", current.table.page(), i),
            cells: row.cells(),
            route: None,
        })
        .collect();
    let columns: Vec<String> = current.columns.iter().map(|c| c.to_string()).collect();
    let back = current.back.clone();
    let back_client = console.client.clone();

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
                    label: current.back_label.clone(),
                    onclick: move |_| back_client.navigate(back.clone()),
                }
            }
            DataTable { columns: columns, rows: rows }
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
