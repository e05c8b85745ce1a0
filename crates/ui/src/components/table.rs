//! # Table Components
//!
//! The filter box, the data table and the pager shared by list, detail
//! and analysis pages. Filtering and pagination state belongs to the
//! engine's `TableState`; these components only draw it.

use corpografo_core::Route;
use dioxus::prelude::*;

/// One row as drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<String>,
    /// Page opened when the row is clicked
    pub route: Option<Route>,
}

/// Properties for DataTable component
#[derive(Props, Clone, PartialEq)]
pub struct DataTableProps {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,

    /// Label of an extra per-row action (e.g. "Unlink")
    #[props(default)]
    pub action: Option<String>,

    #[props(default)]
    pub on_open: EventHandler<Route>,

    /// Called with the row key when the action is clicked
    #[props(default)]
    pub on_action: EventHandler<String>,
}

#[component]
pub fn DataTable(props: DataTableProps) -> Element {
    let action = props.action.clone();
    let on_open = props.on_open;
    let on_action = props.on_action;

    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    for column in props.columns.iter() {
                        th { key: "{column}", "{column}" }
                    }
                    if action.is_some() {
                        th {}
                    }
                }
            }
            tbody {
                if props.rows.is_empty() {
                    tr {
                        td {
                            class: "empty-row",
                            colspan: "{props.columns.len() + 1}",
                            "No rows"
                        }
                    }
                }
                {props.rows.iter().map(|row| {
                    let route = row.route.clone();
                    let clickable = route.is_some();
                    let key = row.key.clone();
                    rsx! {
                        tr {
                            key: "{row.key}",
                            class: if clickable { "row-link" } else { "" },
                            onclick: move |_| {
                                if let Some(route) = route.clone() {
                                    on_open.call(route);
                                }
                            },
                            for (i, cell) in row.cells.iter().enumerate() {
                                td { key: "{i}", "{cell}" }
                            }
                            if let Some(label) = &action {
                                td {
                                    class: "row-action",
                                    button {
                                        class: "btn btn-small",
                                        onclick: move |e| {
                                            e.stop_propagation();
                                            on_action.call(key.clone());
                                        },
                                        "{label}"
                                    }
                                }
                            }
                        }
                    }
                })}
            }
        }
    }
}

/// Filter input above a table
#[component]
pub fn FilterBox(value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        input {
            class: "input filter-box",
            r#type: "search",
            placeholder: "Filter",
            value: "{value}",
            oninput: move |e| on_change.call(e.value()),
        }
    }
}

/// Previous / next page controls
#[component]
pub fn Pager(
    label: String,
    page: usize,
    page_count: usize,
    on_prev: EventHandler<()>,
    on_next: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "pager",
            span { class: "pager-label", "{label}" }
            button {
                class: "btn btn-small",
                disabled: page <= 1,
                onclick: move |_| on_prev.call(()),
                "‹"
            }
            button {
                class: "btn btn-small",
                disabled: page >= page_count,
                onclick: move |_| on_next.call(()),
                "›"
            }
        }
    }
}
