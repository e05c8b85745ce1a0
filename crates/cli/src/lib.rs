//! # Corpografo CLI
//!
//! Command-line tools for the Corpografo console.
//!
//! ## Commands
//!
//! - `check` - Validate an entity catalog and summarise its pages
//! - `routes` - Print the route surface of a catalog
//!

use std::path::Path;

use anyhow::Context;
use corpografo_core::Route;
use corpografo_schema::{BUILTIN_CATALOG, Catalog, EntityPages, ValidationResult};
use tracing::{debug, info};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Catalog report
// ============================================================================

/// Summary line of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummaryLine {
    pub entity_type: String,
    pub title: String,
    pub create_fields: usize,
    pub detail_fields: usize,
    pub upload: bool,
    pub menu: Vec<String>,
}

impl EntitySummaryLine {
    fn from_pages(pages: &EntityPages) -> Self {
        Self {
            entity_type: pages.entity_type.to_string(),
            title: pages.list_title(),
            create_fields: pages.create.len(),
            detail_fields: pages.detail.fields().len(),
            upload: pages.upload,
            menu: pages.menu.iter().map(|m| m.label.clone()).collect(),
        }
    }

    /// One-line description, without colors
    pub fn describe(&self) -> String {
        let create = if self.upload {
            "upload".to_string()
        } else {
            format!("{} create field(s)", self.create_fields)
        };
        let mut line = format!(
            "{} ({}): {}, {} detail field(s)",
            self.entity_type, self.title, create, self.detail_fields
        );
        if !self.menu.is_empty() {
            line.push_str(&format!(", menu: {}", self.menu.join(", ")));
        }
        line
    }
}

/// Outcome of `check`
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Where the catalog came from
    pub source: String,
    pub entities: Vec<EntitySummaryLine>,
    pub result: ValidationResult,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }
}

/// Validate catalog text; `Err` only when the text is not a catalog at all
pub fn check_content(source: impl Into<String>, content: &str) -> anyhow::Result<CheckReport> {
    let source = source.into();
    let (catalog, result) =
        Catalog::check_toml(content).with_context(|| format!("Failed to parse {}", source))?;
    info!(
        source = %source,
        entities = catalog.entries().len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Catalog checked"
    );
    Ok(CheckReport {
        source,
        entities: catalog.entries().iter().map(EntitySummaryLine::from_pages).collect(),
        result,
    })
}

/// Validate a catalog file, or the built-in catalog when no path is given
pub fn check_catalog(path: Option<&Path>) -> anyhow::Result<CheckReport> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Reading catalog");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            check_content(path.display().to_string(), &content)
        }
        None => check_content("built-in catalog", BUILTIN_CATALOG),
    }
}

/// Route surface served for a catalog
pub fn route_surface(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let catalog = Catalog::load_or_builtin(path)?;
    let surface = Route::surface(&catalog.entity_types());
    debug!(routes = surface.len(), "Route surface built");
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let report = check_catalog(None).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.source, "built-in catalog");
        assert!(report.entities.iter().any(|e| e.entity_type == "corpus"));
        assert!(report.entities.iter().any(|e| e.entity_type == "document" && e.upload));
    }

    #[test]
    fn test_unknown_entity_type_is_reported() {
        let content = r#"
[[entity]]
type = "spaceship"
"#;
        let report = check_content("inline", content).unwrap();
        assert!(!report.is_valid());
        assert!(report.entities.is_empty());
        assert!(report.result.errors[0].message.contains("spaceship"));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(check_content("inline", "[[entity").is_err());
    }

    #[test]
    fn test_describe() {
        let line = EntitySummaryLine {
            entity_type: "corpus".to_string(),
            title: "Corpora".to_string(),
            create_fields: 2,
            detail_fields: 4,
            upload: false,
            menu: vec!["N-grams".to_string()],
        };
        assert_eq!(
            line.describe(),
            "corpus (Corpora): 2 create field(s), 4 detail field(s), menu: N-grams"
        );
    }

    #[test]
    fn test_route_surface() {
        let routes = route_surface(None).unwrap();
        assert_eq!(routes[0], "/");
        assert!(routes.contains(&"/login".to_string()));
        assert!(routes.contains(&"/phrasing/{document_id}".to_string()));
    }
}
