use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::{CareerStore, StoreError, Table};

/// How many occupations carry a given kind of mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingStats {
    pub total_mappings: u64,
    pub total_jobs: u64,
    pub coverage_percentage: u32,
}

impl MappingStats {
    pub fn new(total_mappings: u64, total_jobs: u64) -> Self {
        let coverage_percentage = if total_jobs > 0 {
            (total_mappings as f64 / total_jobs as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            total_mappings,
            total_jobs,
            coverage_percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub competency: MappingStats,
    pub major: MappingStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub backend: &'static str,
    pub database: &'static str,
    pub competency_mappings: bool,
    pub major_mappings: bool,
    pub timestamp: DateTime<Utc>,
}

pub async fn collect_stats(store: &Arc<dyn CareerStore>) -> Result<StatsReport, StoreError> {
    let (jobs, nace, majors) = tokio::try_join!(
        store.count(Table::OccupationData),
        store.count(Table::JobNaceMappings),
        store.count(Table::JobMajorMappings),
    )?;
    Ok(StatsReport {
        competency: MappingStats::new(nace, jobs),
        major: MappingStats::new(majors, jobs),
    })
}

/// Never fails: an unreachable backend is reported as disconnected.
pub async fn health(store: &Arc<dyn CareerStore>) -> HealthReport {
    let connected = store.ping().await.is_ok();
    let has_rows = |count: Result<u64, StoreError>| matches!(count, Ok(n) if n > 0);

    let (competency_mappings, major_mappings) = if connected {
        let (nace, majors) = tokio::join!(
            store.count(Table::JobNaceMappings),
            store.count(Table::JobMajorMappings),
        );
        (has_rows(nace), has_rows(majors))
    } else {
        (false, false)
    };

    HealthReport {
        status: "ok",
        backend: store.backend(),
        database: if connected { "connected" } else { "disconnected" },
        competency_mappings,
        major_mappings,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, OfflineStore, Snapshot};
    use serde_json::json;

    #[test]
    fn test_coverage_rounds() {
        assert_eq!(MappingStats::new(2, 3).coverage_percentage, 67);
        assert_eq!(MappingStats::new(0, 0).coverage_percentage, 0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let value = serde_json::to_value(MappingStats::new(1, 4)).unwrap();
        assert_eq!(
            value,
            json!({"totalMappings": 1, "totalJobs": 4, "coveragePercentage": 25})
        );
    }

    #[tokio::test]
    async fn test_health_offline_reports_disconnected() {
        let store: Arc<dyn CareerStore> = Arc::new(OfflineStore);
        let report = health(&store).await;
        assert_eq!(report.database, "disconnected");
        assert!(!report.competency_mappings);
    }

    #[tokio::test]
    async fn test_collect_stats_from_snapshot() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "occupations": [
                {"onetsoc_code": "a", "title": "A"},
                {"onetsoc_code": "b", "title": "B"}
            ],
            "major_mappings": [{"onetsoc_code": "a", "major_name": "Arts", "match_score": 1.0}]
        }))
        .unwrap();
        let store: Arc<dyn CareerStore> = Arc::new(MemoryStore::new(snapshot));
        let stats = collect_stats(&store).await.unwrap();
        assert_eq!(stats.major.coverage_percentage, 50);
        assert_eq!(stats.competency.total_mappings, 0);

        let report = health(&store).await;
        assert_eq!(report.database, "connected");
        assert!(report.major_mappings);
        assert!(!report.competency_mappings);
    }
}
