//! Page chrome: header bar and navigation drawer

use corpografo_engine::{DrawerItem, greeting, logout};
use dioxus::prelude::*;

use crate::state::{APP_STATE, Console};

/// Top bar with the drawer toggle and the user greeting
#[component]
pub fn Header() -> Element {
    let console = use_context::<Console>();
    // re-render on navigation, the greeting follows the session
    let _route = APP_STATE.read().route.clone();
    let hello = greeting(console.client.session());

    rsx! {
        header {
            class: "header",
            button {
                class: "btn btn-flat",
                title: "Menu",
                onclick: move |_| APP_STATE.write().toggle_drawer(),
                "☰"
            }
            span { class: "header-greeting", "{hello}" }
        }
    }
}

/// Left drawer built from the page registry
#[component]
pub fn Drawer() -> Element {
    let console = use_context::<Console>();
    let open = APP_STATE.read().drawer_open;
    if !open {
        return rsx! {};
    }

    let items = console.registry.drawer();

    rsx! {
        div {
            class: "drawer-backdrop",
            onclick: move |_| APP_STATE.write().toggle_drawer(),
        }
        nav {
            class: "drawer",
            for (i, item) in items.into_iter().enumerate() {
                DrawerEntry { key: "{i}", item: item }
            }
        }
    }
}

#[component]
fn DrawerEntry(item: DrawerItem) -> Element {
    let console = use_context::<Console>();
    let mut expanded = use_signal(|| false);

    match item {
        DrawerItem::Link { label, route } => {
            let client = console.client.clone();
            rsx! {
                button {
                    class: "drawer-item",
                    onclick: move |_| client.navigate(route.clone()),
                    "{label}"
                }
            }
        }
        DrawerItem::Group { label, items } => rsx! {
            div {
                class: "drawer-group",
                button {
                    class: "drawer-item",
                    onclick: move |_| expanded.toggle(),
                    "{label}"
                }
                if expanded() {
                    div {
                        class: "drawer-submenu",
                        for (i, sub) in items.into_iter().enumerate() {
                            DrawerEntry { key: "{i}", item: sub }
                        }
                    }
                }
            }
        },
        DrawerItem::Separator => rsx! {
            hr { class: "drawer-separator" }
        },
        DrawerItem::Logout => {
            let client = console.client.clone();
            rsx! {
                button {
                    class: "drawer-item",
                    onclick: move |_| {
                        let client = client.clone();
                        spawn(async move {
                            logout(&client).await;
                        });
                    },
                    "Logout"
                }
            }
        }
    }
}
