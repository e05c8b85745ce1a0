//! Login and registration page

use corpografo_engine::{LoginForm, REQUIRED_HINT, RegisterForm, login, register};
use dioxus::prelude::*;

use crate::components::{Button, TextInput};
use crate::state::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Login,
    Register,
}

fn required(value: &str) -> Option<String> {
    value.is_empty().then(|| REQUIRED_HINT.to_string())
}

#[component]
pub fn LoginPage() -> Element {
    let console = use_context::<Console>();
    let mut tab = use_signal(|| Tab::Login);
    let mut login_form = use_signal(LoginForm::default);
    let mut register_form = use_signal(RegisterForm::default);
    let mut busy = use_signal(|| false);

    let login_client = console.client.clone();
    let submit_login = move |_| {
        let client = login_client.clone();
        spawn(async move {
            busy.set(true);
            let form = login_form();
            login(&client, &form).await;
            busy.set(false);
        });
    };

    let register_client = console.client.clone();
    let submit_register = move |_| {
        let client = register_client.clone();
        spawn(async move {
            busy.set(true);
            let mut form = register_form();
            if register(&client, &mut form).await {
                register_form.set(form);
            }
            busy.set(false);
        });
    };

    let current = tab();
    let login_values = login_form();
    let register_values = register_form();

    rsx! {
        div {
            class: "card card-center card-narrow",

            div {
                class: "tabs",
                button {
                    class: if current == Tab::Login { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(Tab::Login),
                    "Login"
                }
                button {
                    class: if current == Tab::Register { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(Tab::Register),
                    "Register"
                }
            }

            match current {
                Tab::Login => rsx! {
                    TextInput {
                        label: "E-mail".to_string(),
                        value: login_values.email.clone(),
                        on_change: move |v| login_form.write().email = v,
                    }
                    TextInput {
                        label: "Password".to_string(),
                        input_type: "password".to_string(),
                        value: login_values.password.clone(),
                        on_change: move |v| login_form.write().password = v,
                    }
                    Button {
                        label: "Log in".to_string(),
                        primary: true,
                        disabled: busy(),
                        onclick: submit_login,
                    }
                },
                Tab::Register => rsx! {
                    TextInput {
                        label: "Name".to_string(),
                        value: register_values.name.clone(),
                        hint: required(&register_values.name),
                        on_change: move |v| register_form.write().name = v,
                    }
                    TextInput {
                        label: "E-mail".to_string(),
                        value: register_values.email.clone(),
                        hint: required(&register_values.email),
                        on_change: move |v| register_form.write().email = v,
                    }
                    Button {
                        label: "Register".to_string(),
                        primary: true,
                        disabled: busy(),
                        onclick: submit_register,
                    }
                },
            }
        }
    }
}
