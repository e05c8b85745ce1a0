//! Page registry
//!
//! Every page generator is built once at startup from the catalog. A
//! configuration error in any entity stops the console before anything is
//! shown.

use corpografo_core::{ConsoleResult, EntityType, Route};
use corpografo_schema::{Catalog, EntityPages};
use indexmap::IndexMap;
use tracing::info;

use crate::create::{CreatePage, UploadPage};
use crate::detail::DetailPage;
use crate::list::ListPage;

/// How new entities of a type are created
#[derive(Debug, Clone, PartialEq)]
pub enum CreateSurface {
    Form(CreatePage),
    Upload(UploadPage),
}

impl CreateSurface {
    pub fn title(&self) -> String {
        match self {
            CreateSurface::Form(page) => page.title(),
            CreateSurface::Upload(page) => page.title(),
        }
    }
}

/// The three generated pages of one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPageSet {
    pub list: ListPage,
    pub create: CreateSurface,
    pub detail: DetailPage,
}

impl EntityPageSet {
    pub fn build(pages: &EntityPages) -> ConsoleResult<Self> {
        let entity_type = pages.entity_type;
        let create = if pages.upload {
            CreateSurface::Upload(UploadPage::new(entity_type))
        } else {
            CreateSurface::Form(CreatePage::new(entity_type, pages.create.clone())?)
        };
        Ok(Self {
            list: ListPage::new(entity_type, pages.title.clone()),
            create,
            detail: DetailPage::new(entity_type, pages.detail.clone(), pages.menu.clone())?,
        })
    }
}

/// Entry of the navigation drawer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerItem {
    Link { label: String, route: Route },
    /// Submenu of one entity type
    Group { label: String, items: Vec<DrawerItem> },
    Separator,
    Logout,
}

/// Page generators of every configured entity type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRegistry {
    pages: IndexMap<EntityType, EntityPageSet>,
}

impl PageRegistry {
    pub fn from_catalog(catalog: &Catalog) -> ConsoleResult<Self> {
        let mut pages = IndexMap::new();
        for entry in catalog.entries() {
            pages.insert(entry.entity_type, EntityPageSet::build(entry)?);
        }
        info!(types = pages.len(), "Page generators ready");
        Ok(Self { pages })
    }

    pub fn get(&self, entity_type: EntityType) -> Option<&EntityPageSet> {
        self.pages.get(&entity_type)
    }

    pub fn entity_types(&self) -> Vec<EntityType> {
        self.pages.keys().copied().collect()
    }

    /// Whether the registry can render a route
    pub fn serves(&self, route: &Route) -> bool {
        match route {
            Route::List(t) | Route::Create(t) | Route::Detail(t, _) => self.pages.contains_key(t),
            _ => true,
        }
    }

    /// Drawer contents: home, new/list per type, logout
    pub fn drawer(&self) -> Vec<DrawerItem> {
        let mut items = vec![
            DrawerItem::Link {
                label: "Home".to_string(),
                route: Route::Home,
            },
            DrawerItem::Separator,
        ];
        items.extend(self.pages.keys().map(|t| DrawerItem::Group {
            label: t.display_name().to_string(),
            items: vec![
                DrawerItem::Link {
                    label: "New".to_string(),
                    route: Route::Create(*t),
                },
                DrawerItem::Link {
                    label: "List".to_string(),
                    route: Route::List(*t),
                },
            ],
        }));
        items.push(DrawerItem::Separator);
        items.push(DrawerItem::Logout);
        items
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use corpografo_core::EntityId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_registry() {
        let registry = PageRegistry::from_catalog(&Catalog::builtin().unwrap()).unwrap();
        assert_eq!(registry.entity_types().len(), 5);

        let document = registry.get(EntityType::Document).unwrap();
        assert!(matches!(document.create, CreateSurface::Upload(_)));
        assert_eq!(document.create.title(), "New document");
        assert_eq!(document.list.title(), "Documents");

        let author = registry.get(EntityType::Author).unwrap();
        assert!(matches!(author.create, CreateSurface::Form(_)));
    }

    #[test]
    fn test_serves() {
        let catalog = Catalog::from_toml(
            r#"
            [[entity]]
            type = "language"
            create = [{ name = "name", kind = "text" }]
            detail = [{ name = "name", kind = "text" }]
            "#,
        )
        .unwrap();
        let registry = PageRegistry::from_catalog(&catalog).unwrap();
        assert!(registry.serves(&Route::List(EntityType::Language)));
        assert!(!registry.serves(&Route::Detail(EntityType::Corpus, EntityId::Int(1))));
        assert!(registry.serves(&Route::Home));
    }

    #[test]
    fn test_drawer() {
        let registry = PageRegistry::from_catalog(&Catalog::builtin().unwrap()).unwrap();
        let drawer = registry.drawer();
        assert_eq!(
            drawer.first(),
            Some(&DrawerItem::Link {
                label: "Home".to_string(),
                route: Route::Home
            })
        );
        assert_eq!(drawer.last(), Some(&DrawerItem::Logout));
        assert_eq!(
            drawer[2],
            DrawerItem::Group {
                label: "Corpus".to_string(),
                items: vec![
                    DrawerItem::Link {
                        label: "New".to_string(),
                        route: Route::Create(EntityType::Corpus)
                    },
                    DrawerItem::Link {
                        label: "List".to_string(),
                        route: Route::List(EntityType::Corpus)
                    },
                ],
            }
        );
    }
}
