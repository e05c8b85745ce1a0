//! # Corpografo UI
//!
//! Dioxus Desktop console for the Corpografo corpus linguistics service.
//!
//! The console is generic: pages are generated from the entity catalog and
//! every remote call goes through the engine's render sessions.
//!
//! ## Features
//!
//! - List, create and detail pages for every catalog entity
//! - Relation tables with link and unlink dialogs
//! - N-gram, dictionary and phrasing analysis tables
//! - Login, registration and session persistence
//!

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod file_ops;
pub mod pages;
pub mod state;

use std::sync::Arc;

use corpografo_client::{ConsoleConfig, EntityClient, ReqwestTransport, SessionStore};
use corpografo_core::{ConsoleResult, Route};
use corpografo_engine::{PageRegistry, guard};
use corpografo_schema::Catalog;

// ============================================================================
// Re-exports
// ============================================================================

pub use app::App;
pub use file_ops::{PickedFile, pick_document};
pub use state::{APP_STATE, AppState, Console, Dialog, DialogPicker, LinkRequest, UiShell};

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Corpografo";

/// Application display title
pub const TITLE: &str = "Corpografo (dev)";

/// CSS styles for the application
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Services of a console instance, built from configuration and catalog
pub fn build_console(config: ConsoleConfig, catalog: &Catalog) -> ConsoleResult<(Console, SessionStore)> {
    let registry = PageRegistry::from_catalog(catalog)?;
    let session = SessionStore::open(config.session_file.as_deref());
    let shell = Arc::new(UiShell::new(session.clone()));
    let transport = Arc::new(ReqwestTransport::new(config)?);
    let client = EntityClient::new(transport, session.clone(), shell);
    Ok((Console::new(client, registry), session))
}

/// Launch the Corpografo desktop application.
///
/// Fails before any window opens when the catalog does not produce valid
/// pages or the HTTP client cannot be built.
pub fn launch(config: ConsoleConfig, catalog: Catalog) -> ConsoleResult<()> {
    tracing::info!("Starting {} v{}", NAME, VERSION);
    tracing::info!(api = %config.api_url, "Remote API");

    let (console, session) = build_console(config, &catalog)?;
    APP_STATE.write().route = guard(&Route::Home, &session);

    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1200.0, 800.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .with_context(console)
        .launch(App);
    Ok(())
}

/// Get the embedded CSS styles
pub fn get_styles() -> &'static str {
    STYLES
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use corpografo_core::EntityType;

    #[test]
    fn test_title() {
        assert_eq!(TITLE, "Corpografo (dev)");
        assert!(TITLE.contains(NAME));
    }

    #[test]
    fn test_styles_loaded() {
        assert!(!STYLES.is_empty());
        assert!(STYLES.contains(".data-table"));
        assert!(STYLES.contains(".dialog-backdrop"));
    }

    #[test]
    fn test_build_console_from_builtin_catalog() {
        let config = ConsoleConfig {
            session_file: None,
            ..ConsoleConfig::default()
        };
        let (console, session) = build_console(config, &Catalog::builtin().unwrap()).unwrap();
        assert!(!session.is_logged_in());
        assert!(console.registry.get(EntityType::Corpus).is_some());
        assert!(console.registry.serves(&Route::List(EntityType::Document)));
    }
}
