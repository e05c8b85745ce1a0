//! # Corpografo Engine
//!
//! Generic page generators driven by the field specification model.
//!
//! - **list**: filterable, paginated collection tables
//! - **create**: creation forms and document upload
//! - **detail**: detail pages and their render sessions (save, link,
//!   unlink, refresh)
//! - **link**: the relation link dialog
//! - **analysis**: read-only n-gram, dictionary and phrasing tables
//! - **auth**: login, registration, logout and the route guard
//! - **pages**: the registry built from a catalog at startup
//!
//! Everything here is UI-agnostic: effects go through the client's
//! [`Shell`](corpografo_core::Shell) and the link dialog is presented by a
//! [`LinkPicker`].

pub mod analysis;
pub mod auth;
pub mod create;
pub mod detail;
pub mod link;
pub mod list;
pub mod pages;
pub mod table;

#[cfg(test)]
mod test_support;

pub use analysis::{AnalysisKind, AnalysisRow, AnalysisView, NgramSettings, NGRAM_MAX_LEN, NGRAM_MIN_LEN};
pub use auth::{HomeTotals, LoginForm, RegisterForm, greeting, guard, login, logout, register};
pub use create::{CreateForm, CreateOutcome, CreatePage, REQUIRED_HINT, UploadPage};
pub use detail::{
    Bindings, DetailPage, DetailView, FieldValue, MenuAction, MenuEntry, Phase, RelationRow,
    RelationTableView, RenderSession, RenderedField, SelectOption, SessionSnapshot, Widget,
};
pub use link::{LinkDialog, LinkDialogState, LinkPicker};
pub use list::{ListPage, ListView};
pub use pages::{CreateSurface, DrawerItem, EntityPageSet, PageRegistry};
pub use table::{Filterable, PAGE_SIZE, TableState};
