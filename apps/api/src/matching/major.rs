use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::scoring::display_percent;
use crate::store::{CareerStore, MajorFilter, StoreError};

/// A major search result. No normalization here: the list shows the stored
/// match score, capped at 100 after rounding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorMatch {
    pub onetsoc_code: String,
    pub title: String,
    pub description: String,
    pub match_score: u32,
}

/// Search parameters beyond the major itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MajorQuery {
    pub min_score: Option<f64>,
    pub max_results: Option<usize>,
}

#[derive(Clone)]
pub struct MajorMatcher {
    store: Arc<dyn CareerStore>,
}

impl MajorMatcher {
    pub fn new(store: Arc<dyn CareerStore>) -> Self {
        Self { store }
    }

    /// `major` must already be validated against the catalog.
    pub async fn search(&self, major: &str, query: MajorQuery) -> Result<Vec<MajorMatch>, StoreError> {
        let mut rows = self
            .store
            .major_mappings_for_major(
                major,
                MajorFilter {
                    min_score: query.min_score,
                    // 0 means unlimited, as with RESULT_LIMIT
                    limit: query.max_results.filter(|&n| n > 0),
                },
            )
            .await?;

        // Backends already order by score; keep the contract even if one doesn't.
        rows.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        let results: Vec<MajorMatch> = rows
            .into_iter()
            .map(|row| MajorMatch {
                title: row.title_or_default().to_string(),
                description: row.description_or_default().to_string(),
                match_score: display_percent(row.match_score),
                onetsoc_code: row.onetsoc_code,
            })
            .collect();

        info!("Major search '{major}': {} results", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Snapshot};
    use serde_json::json;

    fn matcher() -> MajorMatcher {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "occupations": [
                {"onetsoc_code": "11-1021.00", "title": "General and Operations Managers", "description": "Plan, direct, or coordinate operations."},
                {"onetsoc_code": "13-1071.00", "title": "Human Resources Specialists"}
            ],
            "major_mappings": [
                {"onetsoc_code": "13-1071.00", "major_name": "Business", "match_score": 61.4},
                {"onetsoc_code": "11-1021.00", "major_name": "Business", "match_score": 104.0},
                {"onetsoc_code": "99-9999.00", "major_name": "Business", "match_score": 12.5},
                {"onetsoc_code": "11-1021.00", "major_name": "Arts", "match_score": 30.0}
            ]
        }))
        .unwrap();
        MajorMatcher::new(Arc::new(MemoryStore::new(snapshot)))
    }

    #[tokio::test]
    async fn test_results_ordered_and_capped() {
        let results = matcher().search("Business", MajorQuery::default()).await.unwrap();
        let scores: Vec<u32> = results.iter().map(|r| r.match_score).collect();
        assert_eq!(scores, [100, 61, 13]);
        assert_eq!(results[0].description, "Plan, direct, or coordinate operations.");
    }

    #[tokio::test]
    async fn test_unjoined_occupation_uses_placeholders() {
        let results = matcher().search("Business", MajorQuery::default()).await.unwrap();
        assert_eq!(results[2].title, "Unknown Title");
        assert_eq!(results[2].description, "No description available");
    }

    #[tokio::test]
    async fn test_min_score_and_max_results() {
        let results = matcher()
            .search(
                "Business",
                MajorQuery {
                    min_score: Some(50.0),
                    max_results: Some(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].onetsoc_code, "11-1021.00");
    }

    #[tokio::test]
    async fn test_zero_max_results_is_unlimited() {
        let results = matcher()
            .search(
                "Business",
                MajorQuery {
                    min_score: None,
                    max_results: Some(0),
                },
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_major_without_mappings_is_empty() {
        let results = matcher().search("Sustainability", MajorQuery::default()).await.unwrap();
        assert!(results.is_empty());
    }
}
