//! Client-side route surface
//!
//! Every page of the console is addressed by a [`Route`]. Routes display as
//! their path (`/corpus/7`, `/new_document`, ...) and parse back from it.

use std::str::FromStr;

use crate::error::ConsoleError;
use crate::types::{EntityId, EntityType};

/// A page of the console
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// Totals dashboard
    #[default]
    Home,
    /// Login / registration
    Login,
    /// Filterable list of one entity type
    List(EntityType),
    /// Creation form for one entity type
    Create(EntityType),
    /// Detail page of one entity
    Detail(EntityType, EntityId),
    /// N-gram frequency table for a corpus
    Ngram {
        corpus: EntityId,
        min_len: u32,
        max_len: u32,
        case_sensitive: bool,
    },
    /// Term frequency table for a document
    Dictionary(EntityId),
    /// Phrase segmentation of a document
    Phrasing(EntityId),
}

impl Route {
    /// Whether the page needs a logged-in session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Entity type the page is about, if any
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            Route::List(t) | Route::Create(t) | Route::Detail(t, _) => Some(*t),
            Route::Ngram { .. } => Some(EntityType::Corpus),
            Route::Dictionary(_) | Route::Phrasing(_) => Some(EntityType::Document),
            Route::Home | Route::Login => None,
        }
    }

    /// Short title for window and header display
    pub fn display_name(&self) -> String {
        match self {
            Route::Home => "Home".to_string(),
            Route::Login => "Login".to_string(),
            Route::List(t) => t.plural_label().to_string(),
            Route::Create(t) => format!("New {}", t.as_str()),
            Route::Detail(t, id) => format!("{} {}", t.display_name(), id),
            Route::Ngram { .. } => "N-grams".to_string(),
            Route::Dictionary(_) => "Dictionary".to_string(),
            Route::Phrasing(_) => "Phrasing".to_string(),
        }
    }

    /// The full route surface for the given entity types, analysis routes
    /// shown with placeholder segments.
    pub fn surface(types: &[EntityType]) -> Vec<String> {
        let mut paths = vec!["/".to_string(), "/login".to_string()];
        for t in types {
            paths.push(Route::List(*t).to_string());
            paths.push(Route::Create(*t).to_string());
            paths.push(format!("/{}/{{id}}", t.as_str()));
        }
        paths.push("/ngram/{corpus_id}/{min_len}/{max_len}/{case_sensitive}".to_string());
        paths.push("/dictionary/{document_id}".to_string());
        paths.push("/phrasing/{document_id}".to_string());
        paths
    }
}

/// `True`/`False`, the spelling the analysis endpoints expect
pub fn bool_segment(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn parse_bool_segment(s: &str) -> Option<bool> {
    match s {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::List(t) => write!(f, "/{}", t),
            Route::Create(t) => write!(f, "/new_{}", t),
            Route::Detail(t, id) => write!(f, "/{}/{}", t, id),
            Route::Ngram {
                corpus,
                min_len,
                max_len,
                case_sensitive,
            } => write!(
                f,
                "/ngram/{}/{}/{}/{}",
                corpus,
                min_len,
                max_len,
                bool_segment(*case_sensitive)
            ),
            Route::Dictionary(id) => write!(f, "/dictionary/{}", id),
            Route::Phrasing(id) => write!(f, "/phrasing/{}", id),
        }
    }
}

impl FromStr for Route {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConsoleError::InvalidRoute(s.to_string());
        let segments: Vec<&str> = s.trim_matches('/').split('/').collect();

        let route = match segments.as_slice() {
            [""] => Route::Home,
            ["login"] => Route::Login,
            ["ngram", corpus, min, max, case] => Route::Ngram {
                corpus: corpus.parse()?,
                min_len: min.parse().map_err(|_| invalid())?,
                max_len: max.parse().map_err(|_| invalid())?,
                case_sensitive: parse_bool_segment(case).ok_or_else(invalid)?,
            },
            ["dictionary", id] => Route::Dictionary(id.parse()?),
            ["phrasing", id] => Route::Phrasing(id.parse()?),
            [name] => match name.strip_prefix("new_") {
                Some(t) => Route::Create(t.parse().map_err(|_| invalid())?),
                None => Route::List(name.parse().map_err(|_| invalid())?),
            },
            [name, id] => Route::Detail(name.parse().map_err(|_| invalid())?, id.parse()?),
            _ => return Err(invalid()),
        };

        Ok(route)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::List(EntityType::Corpus).to_string(), "/corpus");
        assert_eq!(
            Route::Create(EntityType::Document).to_string(),
            "/new_document"
        );
        assert_eq!(
            Route::Detail(EntityType::Document, EntityId::Int(42)).to_string(),
            "/document/42"
        );
        assert_eq!(
            Route::Ngram {
                corpus: EntityId::Int(7),
                min_len: 5,
                max_len: 10,
                case_sensitive: false,
            }
            .to_string(),
            "/ngram/7/5/10/False"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Home);
        assert_eq!("/login".parse::<Route>().unwrap(), Route::Login);
        assert_eq!(
            "/new_author".parse::<Route>().unwrap(),
            Route::Create(EntityType::Author)
        );
        assert_eq!(
            "/language/3".parse::<Route>().unwrap(),
            Route::Detail(EntityType::Language, EntityId::Int(3))
        );
        assert_eq!(
            "/ngram/1/2/3/True".parse::<Route>().unwrap(),
            Route::Ngram {
                corpus: EntityId::Int(1),
                min_len: 2,
                max_len: 3,
                case_sensitive: true,
            }
        );
        assert_eq!(
            "/phrasing/9".parse::<Route>().unwrap(),
            Route::Phrasing(EntityId::Int(9))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert!("/user".parse::<Route>().is_err());
        assert!("/new_user".parse::<Route>().is_err());
        assert!("/corpus/1/extra".parse::<Route>().is_err());
        assert!("/ngram/1/a/3/True".parse::<Route>().is_err());
        assert!("/ngram/1/2/3/maybe".parse::<Route>().is_err());
    }

    #[test]
    fn test_requires_session() {
        assert!(!Route::Login.requires_session());
        assert!(Route::Home.requires_session());
        assert!(Route::List(EntityType::Corpus).requires_session());
    }

    #[test]
    fn test_surface() {
        let surface = Route::surface(&[EntityType::Corpus]);
        assert!(surface.contains(&"/corpus".to_string()));
        assert!(surface.contains(&"/new_corpus".to_string()));
        assert!(surface.contains(&"/corpus/{id}".to_string()));
    }
}
