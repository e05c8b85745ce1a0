//! Notification toasts

use std::time::Duration;

use corpografo_core::StatusLevel;
use dioxus::prelude::*;

use crate::state::{APP_STATE, Toast};

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

/// Stack of the current notifications
#[component]
pub fn Toasts() -> Element {
    let toasts = APP_STATE.read().toasts.clone();

    rsx! {
        div {
            class: "toasts",
            for toast in toasts {
                ToastItem { key: "{toast.id}", toast: toast.clone() }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast) -> Element {
    let id = toast.id;

    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(TOAST_LIFETIME).await;
            APP_STATE.write().dismiss_toast(id);
        })
    });

    let level_class = match toast.notification.level {
        StatusLevel::Success => "toast toast-positive",
        StatusLevel::Error => "toast toast-negative",
        _ => "toast",
    };

    rsx! {
        div {
            class: "{level_class}",
            onclick: move |_| APP_STATE.write().dismiss_toast(id),
            "{toast.notification.text}"
        }
    }
}
