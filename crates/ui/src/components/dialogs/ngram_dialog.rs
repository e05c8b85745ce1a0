//! # N-gram Settings Dialog
//!
//! Length range and case sensitivity of an n-gram analysis. OK opens the
//! analysis page; cancel does nothing.

use corpografo_core::EntityId;
use corpografo_engine::{NGRAM_MAX_LEN, NGRAM_MIN_LEN, NgramSettings};
use dioxus::prelude::*;

use crate::state::{APP_STATE, Console};

#[component]
pub fn NgramDialog(corpus: EntityId) -> Element {
    let console = use_context::<Console>();
    let mut settings = use_signal(NgramSettings::default);
    let current = settings();

    let lengths: Vec<u32> = (NGRAM_MIN_LEN..=NGRAM_MAX_LEN).collect();
    let min_lengths = lengths.clone();

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "N-grams analysis" }

            div {
                class: "dialog-row",
                label { class: "input-label", "Minimum length" }
                select {
                    class: "input select",
                    onchange: move |e| {
                        if let Ok(min) = e.value().parse::<u32>() {
                            let max = settings().max_len;
                            settings.write().set_range(min, max);
                        }
                    },
                    for len in min_lengths {
                        option { key: "{len}", value: "{len}", selected: len == current.min_len, "{len}" }
                    }
                }
                label { class: "input-label", "Maximum length" }
                select {
                    class: "input select",
                    onchange: move |e| {
                        if let Ok(max) = e.value().parse::<u32>() {
                            let min = settings().min_len;
                            settings.write().set_range(min, max);
                        }
                    },
                    for len in lengths {
                        option { key: "{len}", value: "{len}", selected: len == current.max_len, "{len}" }
                    }
                }
            }

            label {
                class: "dialog-row",
                input {
                    r#type: "checkbox",
                    checked: current.case_sensitive,
                    onchange: move |e| settings.write().case_sensitive = e.checked(),
                }
                span { "Case sensitive" }
            }

            div {
                class: "dialog-actions",
                button {
                    class: "btn",
                    onclick: move |_| APP_STATE.write().close_dialog(),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| {
                        APP_STATE.write().close_dialog();
                        console.client.navigate(settings().route(corpus.clone()));
                    },
                    "OK"
                }
            }
        }
    }
}
