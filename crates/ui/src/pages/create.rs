//! Entity creation page: a scalar form, or a file upload for documents

use corpografo_core::EntityType;
use corpografo_engine::{CreatePage, CreateSurface, UploadPage};
use dioxus::prelude::*;

use crate::components::{Button, TextArea, TextInput};
use crate::file_ops::{self, format_size};
use crate::pages::NotFound;
use crate::state::Console;

#[component]
pub fn EntityCreatePage(entity_type: EntityType) -> Element {
    let console = use_context::<Console>();
    match console.registry.get(entity_type).map(|set| set.create.clone()) {
        Some(CreateSurface::Form(page)) => rsx! { CreateFormBody { page: page } },
        Some(CreateSurface::Upload(page)) => rsx! { UploadBody { page: page } },
        None => rsx! { NotFound {} },
    }
}

#[component]
fn CreateFormBody(page: CreatePage) -> Element {
    let console = use_context::<Console>();
    let mut form = use_signal(|| page.form());
    let mut busy = use_signal(|| false);

    let values = form();
    let title = page.title();
    let submit_page = page.clone();
    let client = console.client.clone();

    rsx! {
        div {
            class: "card card-center card-narrow",
            h2 { class: "card-title", "{title}" }

            {page.fields().iter().map(|field| {
                let name = field.name.clone();
                let label = field.display_label();
                let value = values.get(&name).unwrap_or_default().to_string();
                let hint = page.hint(&values, &name).map(str::to_string);
                if page.is_multiline(&name) {
                    rsx! {
                        TextArea {
                            key: "{name}",
                            label: label,
                            value: value,
                            hint: hint,
                            on_change: move |v: String| {
                                form.write().set(&name, v);
                            },
                        }
                    }
                } else {
                    rsx! {
                        TextInput {
                            key: "{name}",
                            label: label,
                            value: value,
                            hint: hint,
                            on_change: move |v: String| {
                                form.write().set(&name, v);
                            },
                        }
                    }
                }
            })}

            Button {
                label: "Create".to_string(),
                primary: true,
                disabled: busy(),
                onclick: move |_| {
                    let page = submit_page.clone();
                    let client = client.clone();
                    spawn(async move {
                        busy.set(true);
                        // failures are notified by the client; the form stays as typed
                        let _ = page.submit(&client, &form()).await;
                        busy.set(false);
                    });
                },
            }
        }
    }
}

#[component]
fn UploadBody(page: UploadPage) -> Element {
    let console = use_context::<Console>();
    let mut busy = use_signal(|| false);
    let mut last_file = use_signal(|| None::<String>);
    let client = console.client.clone();
    let title = page.title();

    rsx! {
        div {
            class: "card card-center card-narrow",
            h2 { class: "card-title", "{title}" }

            Button {
                label: "Choose file".to_string(),
                primary: true,
                disabled: busy(),
                onclick: move |_| {
                    let client = client.clone();
                    spawn(async move {
                        let Some(file) = file_ops::pick_document().await else {
                            return;
                        };
                        busy.set(true);
                        last_file.set(Some(format!("{} ({})", file.name, format_size(file.bytes.len()))));
                        let _ = page.submit(&client, &file.name, &file.bytes).await;
                        busy.set(false);
                    });
                },
            }

            if let Some(file) = last_file() {
                p { class: "muted", "{file}" }
            }
        }
    }
}
