//! Read-only analysis views
//!
//! The server computes n-gram frequencies of a corpus, term frequencies of
//! a document and the phrase segmentation of a document. The console only
//! shows the results as filterable tables.

use std::collections::HashMap;

use corpografo_client::EntityClient;
use corpografo_core::{
    ConsoleError, ConsoleResult, EntityId, EntityType, Route, Validatable,
};
use serde::Deserialize;
use tracing::debug;

use crate::table::{Filterable, TableState};

/// Shortest selectable n-gram length
pub const NGRAM_MIN_LEN: u32 = 1;
/// Longest selectable n-gram length
pub const NGRAM_MAX_LEN: u32 = 15;

// ============================================================================
// N-gram settings
// ============================================================================

/// State of the n-gram settings dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramSettings {
    pub min_len: u32,
    pub max_len: u32,
    pub case_sensitive: bool,
}

impl Default for NgramSettings {
    fn default() -> Self {
        Self {
            min_len: 5,
            max_len: 10,
            case_sensitive: false,
        }
    }
}

impl NgramSettings {
    /// Set the range, clamped to the selectable lengths and kept ordered
    pub fn set_range(&mut self, min_len: u32, max_len: u32) {
        let min_len = min_len.clamp(NGRAM_MIN_LEN, NGRAM_MAX_LEN);
        let max_len = max_len.clamp(NGRAM_MIN_LEN, NGRAM_MAX_LEN);
        self.min_len = min_len.min(max_len);
        self.max_len = min_len.max(max_len);
    }

    /// Analysis page for a corpus under these settings
    pub fn route(&self, corpus: EntityId) -> Route {
        Route::Ngram {
            corpus,
            min_len: self.min_len,
            max_len: self.max_len,
            case_sensitive: self.case_sensitive,
        }
    }
}

impl Validatable for NgramSettings {
    fn validate(&self) -> ConsoleResult<()> {
        let range = NGRAM_MIN_LEN..=NGRAM_MAX_LEN;
        if !range.contains(&self.min_len) || !range.contains(&self.max_len) {
            return Err(ConsoleError::InvalidRoute(format!(
                "n-gram lengths must be within {}..={}",
                NGRAM_MIN_LEN, NGRAM_MAX_LEN
            )));
        }
        if self.min_len > self.max_len {
            return Err(ConsoleError::InvalidRoute(format!(
                "n-gram range {}..={} is empty",
                self.min_len, self.max_len
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One row of an analysis table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRow {
    Frequency { term: String, frequency: u64 },
    Phrase { position: usize, length: usize, phrase: String },
}

impl AnalysisRow {
    /// Cell texts in column order
    pub fn cells(&self) -> Vec<String> {
        match self {
            AnalysisRow::Frequency { term, frequency } => vec![term.clone(), frequency.to_string()],
            AnalysisRow::Phrase {
                position,
                length,
                phrase,
            } => vec![position.to_string(), length.to_string(), phrase.clone()],
        }
    }
}

impl Filterable for AnalysisRow {
    fn matches(&self, needle: &str) -> bool {
        match self {
            AnalysisRow::Frequency { term, .. } => term.to_lowercase().contains(needle),
            AnalysisRow::Phrase { phrase, .. } => phrase.to_lowercase().contains(needle),
        }
    }
}

/// Frequency rows, most frequent first; ties ordered by term, descending
pub fn frequency_rows(counts: HashMap<String, u64>) -> Vec<AnalysisRow> {
    let mut pairs: Vec<(String, u64)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| (b.1, &b.0).cmp(&(a.1, &a.0)));
    pairs
        .into_iter()
        .map(|(term, frequency)| AnalysisRow::Frequency { term, frequency })
        .collect()
}

/// Phrase rows numbered from 1, length counted in characters
pub fn phrase_rows(phrases: Vec<String>) -> Vec<AnalysisRow> {
    phrases
        .into_iter()
        .enumerate()
        .map(|(i, phrase)| AnalysisRow::Phrase {
            position: i + 1,
            length: phrase.chars().count(),
            phrase,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct FrequencyAnswer(String, HashMap<String, u64>);

#[derive(Debug, Deserialize)]
struct PhrasingAnswer(String, Vec<String>);

// ============================================================================
// Views
// ============================================================================

/// Which analysis a page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisKind {
    Ngram(NgramSettings, EntityId),
    Dictionary(EntityId),
    Phrasing(EntityId),
}

impl AnalysisKind {
    /// `None` for routes that are not analysis pages
    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::Ngram {
                corpus,
                min_len,
                max_len,
                case_sensitive,
            } => Some(AnalysisKind::Ngram(
                NgramSettings {
                    min_len: *min_len,
                    max_len: *max_len,
                    case_sensitive: *case_sensitive,
                },
                corpus.clone(),
            )),
            Route::Dictionary(id) => Some(AnalysisKind::Dictionary(id.clone())),
            Route::Phrasing(id) => Some(AnalysisKind::Phrasing(id.clone())),
            _ => None,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            AnalysisKind::Ngram(settings, corpus) => settings.route(corpus.clone()),
            AnalysisKind::Dictionary(id) => Route::Dictionary(id.clone()),
            AnalysisKind::Phrasing(id) => Route::Phrasing(id.clone()),
        }
    }

    /// API path, the same as the page path
    pub fn path(&self) -> String {
        self.route().to_string().trim_start_matches('/').to_string()
    }

    /// The entity the analysis is about
    pub fn subject(&self) -> (EntityType, &EntityId) {
        match self {
            AnalysisKind::Ngram(_, id) => (EntityType::Corpus, id),
            AnalysisKind::Dictionary(id) | AnalysisKind::Phrasing(id) => (EntityType::Document, id),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            AnalysisKind::Ngram(..) => &["N-gram", "Frequency"],
            AnalysisKind::Dictionary(_) => &["Term", "Frequency"],
            AnalysisKind::Phrasing(_) => &["Position", "Length", "Phrase"],
        }
    }

    fn title(&self, name: &str) -> String {
        match self {
            AnalysisKind::Ngram(..) => format!("N-grams: {}", name),
            AnalysisKind::Dictionary(_) => format!("Dictionary: {}", name),
            AnalysisKind::Phrasing(_) => format!("Phrasing: {}", name),
        }
    }

    /// Fetch and shape the analysis. `None` when it could not be loaded.
    pub async fn load(&self, client: &EntityClient) -> Option<AnalysisView> {
        if let AnalysisKind::Ngram(settings, _) = self {
            if let Err(err) = settings.validate() {
                debug!(error = %err, "Refusing n-gram request");
                return None;
            }
        }

        let path = self.path();
        let (name, rows) = match self {
            AnalysisKind::Ngram(..) | AnalysisKind::Dictionary(_) => {
                let FrequencyAnswer(name, counts) = client.fetch(&path).await.ok()?;
                (name, frequency_rows(counts))
            }
            AnalysisKind::Phrasing(_) => {
                let PhrasingAnswer(name, phrases) = client.fetch(&path).await.ok()?;
                (name, phrase_rows(phrases))
            }
        };
        debug!(path = %path, rows = rows.len(), "Loaded analysis");

        let (subject_type, subject_id) = self.subject();
        Some(AnalysisView {
            title: self.title(&name),
            back: Route::Detail(subject_type, subject_id.clone()),
            back_label: format!("Detail {}", subject_type.as_str()),
            columns: self.columns(),
            table: TableState::new(rows),
        })
    }
}

/// A loaded analysis page
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub title: String,
    /// Detail page of the analysed entity
    pub back: Route,
    pub back_label: String,
    pub columns: &'static [&'static str],
    pub table: TableState<AnalysisRow>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use corpografo_core::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_test::block_on;

    #[test]
    fn test_settings_defaults_and_route() {
        let settings = NgramSettings::default();
        assert!(settings.is_valid());
        assert_eq!(settings.route(EntityId::Int(7)).to_string(), "/ngram/7/5/10/False");
    }

    #[test]
    fn test_settings_range_is_clamped() {
        let mut settings = NgramSettings::default();
        settings.set_range(20, 0);
        assert_eq!((settings.min_len, settings.max_len), (1, 15));
        settings.set_range(9, 3);
        assert_eq!((settings.min_len, settings.max_len), (3, 9));

        let invalid = NgramSettings {
            min_len: 0,
            max_len: 4,
            case_sensitive: true,
        };
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_frequency_sort() {
        let counts = HashMap::from([
            ("b".to_string(), 2),
            ("a".to_string(), 2),
            ("z".to_string(), 1),
            ("c".to_string(), 5),
        ]);
        let terms: Vec<String> = frequency_rows(counts)
            .into_iter()
            .map(|r| r.cells()[0].clone())
            .collect();
        assert_eq!(terms, vec!["c", "b", "a", "z"]);
    }

    #[test]
    fn test_phrase_rows_count_characters() {
        let rows = phrase_rows(vec!["Olá.".to_string(), "Tudo bem?".to_string()]);
        assert_eq!(
            rows,
            vec![
                AnalysisRow::Phrase {
                    position: 1,
                    length: 4,
                    phrase: "Olá.".to_string()
                },
                AnalysisRow::Phrase {
                    position: 2,
                    length: 9,
                    phrase: "Tudo bem?".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_load_ngram_view() {
        let h = harness();
        h.transport.on(
            HttpMethod::Get,
            "ngram/7/2/3/True",
            200,
            json!(["Realism", {"de um": 4, "de uma": 9}]),
        );
        let route: Route = "/ngram/7/2/3/True".parse().unwrap();
        let kind = AnalysisKind::from_route(&route).unwrap();

        let view = block_on(kind.load(&h.client)).unwrap();
        assert_eq!(view.title, "N-grams: Realism");
        assert_eq!(view.columns, &["N-gram", "Frequency"]);
        assert_eq!(view.back, Route::Detail(EntityType::Corpus, EntityId::Int(7)));
        assert_eq!(view.back_label, "Detail corpus");
        assert_eq!(view.table.rows()[0].cells(), vec!["de uma", "9"]);
    }

    #[test]
    fn test_load_phrasing_and_filter() {
        let h = harness();
        h.transport.on(
            HttpMethod::Get,
            "phrasing/9",
            200,
            json!(["Dom Casmurro", ["Uma noite destas.", "Vindo da cidade."]]),
        );
        let kind = AnalysisKind::Phrasing(EntityId::Int(9));
        let mut view = block_on(kind.load(&h.client)).unwrap();
        assert_eq!(view.title, "Phrasing: Dom Casmurro");
        assert_eq!(view.back_label, "Detail document");

        view.table.set_filter("CIDADE");
        assert_eq!(view.table.total(), 1);
    }

    #[test]
    fn test_load_failure_gives_none() {
        let h = harness();
        h.transport.on(HttpMethod::Get, "dictionary/9", 404, json!({"message": "Not found"}));
        assert!(block_on(AnalysisKind::Dictionary(EntityId::Int(9)).load(&h.client)).is_none());
        assert_eq!(h.shell.error_count(), 1);
        assert!(AnalysisKind::from_route(&Route::Home).is_none());
    }
}
