//! Home page: totals of corpora and documents

use corpografo_engine::HomeTotals;
use dioxus::prelude::*;

use crate::state::Console;

#[component]
pub fn HomePage() -> Element {
    let console = use_context::<Console>();
    let totals = use_resource(move || {
        let client = console.client.clone();
        async move { HomeTotals::load(&client).await }
    });

    rsx! {
        div {
            class: "card card-center",
            h2 { class: "card-title", "Totals" }
            match &*totals.read() {
                Some(Some(totals)) => rsx! {
                    for line in totals.lines() {
                        p { key: "{line}", "{line}" }
                    }
                },
                Some(None) => rsx! {
                    p { class: "muted", "Totals unavailable" }
                },
                None => rsx! {
                    p { class: "muted", "Loading…" }
                },
            }
        }
    }
}
