//! # Pages
//!
//! One component per route. Each page looks its generator up in the
//! [`PageRegistry`](corpografo_engine::PageRegistry) and draws what the
//! engine produces.

pub mod analysis;
pub mod create;
pub mod detail;
pub mod home;
pub mod list;
pub mod login;

pub use analysis::AnalysisPage;
pub use create::EntityCreatePage;
pub use detail::EntityDetailPage;
pub use home::HomePage;
pub use list::EntityListPage;
pub use login::LoginPage;

use dioxus::prelude::*;

#[component]
pub fn Loading() -> Element {
    rsx! {
        div { class: "card card-center", p { class: "muted", "Loading…" } }
    }
}

/// Shown when the route names an entity type the console does not serve
#[component]
pub fn NotFound() -> Element {
    rsx! {
        div { class: "card card-center", p { class: "muted", "Page not found" } }
    }
}

/// Shown when the data behind a page could not be fetched
#[component]
pub fn Unavailable() -> Element {
    rsx! {
        div { class: "card card-center", p { class: "muted", "Could not be loaded" } }
    }
}
