use std::sync::Arc;

use tracing::info;

use crate::catalog::CompetencySelection;
use crate::scoring::{rank_by_competencies, RankedOccupation};
use crate::store::{CareerStore, StoreError};

/// Finds occupations whose precomputed top-3 competencies overlap a selection.
#[derive(Clone)]
pub struct CompetencyMatcher {
    store: Arc<dyn CareerStore>,
}

impl CompetencyMatcher {
    pub fn new(store: Arc<dyn CareerStore>) -> Self {
        Self { store }
    }

    /// `Ok(vec![])` means nothing overlaps the selection; a store failure is an `Err`.
    pub async fn search(
        &self,
        selection: &CompetencySelection,
        limit: Option<usize>,
    ) -> Result<Vec<RankedOccupation>, StoreError> {
        let candidates = self
            .store
            .nace_mappings_matching(selection.names(), limit)
            .await?;
        let candidate_count = candidates.len();

        let ranked = rank_by_competencies(selection, candidates);
        info!(
            "Competency search [{}]: {} candidates, {} ranked",
            selection.label(),
            candidate_count,
            ranked.len()
        );
        Ok(ranked)
    }
}
