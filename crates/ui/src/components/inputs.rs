//! # Input Components
//!
//! Form inputs shared by the create, detail and login pages:
//! - **TextInput**: single-line text
//! - **TextArea**: multi-line text
//! - **Select**: dropdown over labelled values
//!
//! Inputs are controlled: the parent owns the value and receives every
//! change through `on_change`.

use dioxus::prelude::*;

// ============================================================================
// Text Input Component
// ============================================================================

/// Properties for TextInput component
#[derive(Props, Clone, PartialEq)]
pub struct TextInputProps {
    pub value: String,

    #[props(default)]
    pub label: Option<String>,

    /// Inline hint under the input (e.g. "Required")
    #[props(default)]
    pub hint: Option<String>,

    /// Input type (text, email, password, ...)
    #[props(default = "text".to_string())]
    pub input_type: String,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,

    /// Enter key handler
    #[props(default)]
    pub on_enter: EventHandler<()>,
}

/// Single-line text input component
#[component]
pub fn TextInput(props: TextInputProps) -> Element {
    let has_hint = props.hint.is_some();

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label { class: "input-label", "{label}" }
            }

            input {
                class: if has_hint { "input input-hinted" } else { "input" },
                r#type: "{props.input_type}",
                value: "{props.value}",
                disabled: props.disabled,
                oninput: move |e| props.on_change.call(e.value()),
                onkeydown: move |e| {
                    if e.key() == Key::Enter {
                        props.on_enter.call(());
                    }
                },
            }

            if let Some(hint) = &props.hint {
                p { class: "input-hint", "{hint}" }
            }
        }
    }
}

// ============================================================================
// Text Area Component
// ============================================================================

/// Properties for TextArea component
#[derive(Props, Clone, PartialEq)]
pub struct TextAreaProps {
    pub value: String,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub hint: Option<String>,

    /// Number of visible rows
    #[props(default = 6)]
    pub rows: usize,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,
}

/// Multi-line text input component
#[component]
pub fn TextArea(props: TextAreaProps) -> Element {
    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label { class: "input-label", "{label}" }
            }

            textarea {
                class: "input textarea",
                rows: "{props.rows}",
                disabled: props.disabled,
                value: "{props.value}",
                oninput: move |e| props.on_change.call(e.value()),
            }

            if let Some(hint) = &props.hint {
                p { class: "input-hint", "{hint}" }
            }
        }
    }
}

// ============================================================================
// Select Component
// ============================================================================

/// A single option for the Select component
#[derive(Clone, PartialEq, Debug)]
pub struct SelectChoice {
    pub value: String,
    pub label: String,
}

impl SelectChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Properties for Select component
#[derive(Props, Clone, PartialEq)]
pub struct SelectProps {
    /// Selected value
    pub value: String,

    pub options: Vec<SelectChoice>,

    #[props(default)]
    pub label: Option<String>,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,
}

/// Dropdown select component
#[component]
pub fn Select(props: SelectProps) -> Element {
    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label { class: "input-label", "{label}" }
            }

            select {
                class: "input select",
                disabled: props.disabled,
                onchange: move |e| props.on_change.call(e.value()),

                for option in props.options.iter() {
                    option {
                        key: "{option.value}",
                        value: "{option.value}",
                        selected: option.value == props.value,
                        "{option.label}"
                    }
                }
            }
        }
    }
}

/// Primary or secondary action button
#[component]
pub fn Button(
    label: String,
    #[props(default = false)] primary: bool,
    #[props(default = false)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    let variant = if primary { "btn btn-primary" } else { "btn" };

    rsx! {
        button {
            class: "{variant}",
            r#type: "button",
            disabled: disabled,
            onclick: move |e| {
                if !disabled {
                    onclick.call(e);
                }
            },
            "{label}"
        }
    }
}
