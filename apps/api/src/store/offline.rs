use async_trait::async_trait;

use super::{CareerStore, MajorFilter, StoreError, Table};
use crate::models::{
    Commodity, CommodityKind, CompetencyScore, ElementRating, JobZone, MajorMapping, NaceMapping,
    Occupation, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};

/// Stand-in when no backend is configured. Every fetch fails with
/// `StoreError::NotConfigured` so the shells can show demo-mode messaging.
pub struct OfflineStore;

#[async_trait]
impl CareerStore for OfflineStore {
    fn backend(&self) -> &'static str {
        "offline"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn count(&self, _table: Table) -> Result<u64, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn occupation(&self, _code: &str) -> Result<Option<Occupation>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn nace_mappings_matching(
        &self,
        _competencies: &[String],
        _limit: Option<usize>,
    ) -> Result<Vec<NaceMapping>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn nace_mapping(&self, _code: &str) -> Result<Option<NaceMapping>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn competency_scores(&self, _code: &str) -> Result<Vec<CompetencyScore>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn major_mappings_for_major(
        &self,
        _major: &str,
        _filter: MajorFilter,
    ) -> Result<Vec<MajorMapping>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn major_mappings_for_job(&self, _code: &str) -> Result<Vec<MajorMapping>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn job_zone(&self, _code: &str) -> Result<Option<JobZone>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn ratings(
        &self,
        _code: &str,
        _kind: RatingKind,
        _limit: usize,
    ) -> Result<Vec<ElementRating>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn commodities(
        &self,
        _code: &str,
        _kind: CommodityKind,
        _limit: usize,
    ) -> Result<Vec<Commodity>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn task_statements(
        &self,
        _code: &str,
        _limit: usize,
    ) -> Result<Vec<TaskStatement>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn related_occupations(
        &self,
        _code: &str,
        _limit: usize,
    ) -> Result<Vec<RelatedOccupation>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn titles(
        &self,
        _code: &str,
        _kind: TitleKind,
        _limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Err(StoreError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{probe, BackendStatus};

    #[tokio::test]
    async fn test_offline_store_probes_as_offline() {
        assert_eq!(probe(&OfflineStore).await, BackendStatus::Offline);
    }

    #[tokio::test]
    async fn test_offline_store_never_returns_empty_results() {
        let err = OfflineStore
            .major_mappings_for_major("Business", MajorFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));
    }
}
