//! In-memory store over a JSON snapshot of the mapping tables. Serves demos,
//! offline runs and tests with the same ordering rules as the database backends.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CareerStore, MajorFilter, StoreError, Table};
use crate::models::{
    Commodity, CommodityKind, CompetencyScore, ElementRating, JobZone, MajorMapping, NaceMapping,
    NaceMappingRow, Occupation, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};

/// A rating row tagged with its occupation and kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRating {
    pub onetsoc_code: String,
    pub kind: RatingKind,
    #[serde(flatten)]
    pub rating: ElementRating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCommodity {
    pub onetsoc_code: String,
    pub kind: CommodityKind,
    #[serde(flatten)]
    pub commodity: Commodity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTask {
    pub onetsoc_code: String,
    #[serde(flatten)]
    pub task: TaskStatement,
}

/// Related rows carry no title; it is joined from `occupations` on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRelated {
    pub onetsoc_code: String,
    #[serde(flatten)]
    pub related: RelatedOccupation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTitle {
    pub onetsoc_code: String,
    pub kind: TitleKind,
    pub title: String,
}

/// On-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub occupations: Vec<Occupation>,
    #[serde(default)]
    pub nace_mappings: Vec<NaceMappingRow>,
    #[serde(default)]
    pub competency_scores: Vec<CompetencyScore>,
    #[serde(default)]
    pub major_mappings: Vec<MajorMapping>,
    #[serde(default)]
    pub job_zones: HashMap<String, JobZone>,
    #[serde(default)]
    pub ratings: Vec<SnapshotRating>,
    #[serde(default)]
    pub commodities: Vec<SnapshotCommodity>,
    #[serde(default)]
    pub task_statements: Vec<SnapshotTask>,
    #[serde(default)]
    pub related_occupations: Vec<SnapshotRelated>,
    #[serde(default)]
    pub titles: Vec<SnapshotTitle>,
}

pub struct MemoryStore {
    occupations: HashMap<String, Occupation>,
    nace_mappings: Vec<NaceMapping>,
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        let occupations: HashMap<String, Occupation> = snapshot
            .occupations
            .iter()
            .map(|o| (o.onetsoc_code.clone(), o.clone()))
            .collect();

        let nace_mappings = snapshot
            .nace_mappings
            .iter()
            .cloned()
            .map(NaceMapping::from)
            .map(|m| {
                let occupation = occupations.get(&m.onetsoc_code);
                m.with_occupation(occupation)
            })
            .collect();

        Self {
            occupations,
            nace_mappings,
            snapshot,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Snapshot {} is not valid JSON", path.display()))?;
        tracing::info!(
            "Loaded snapshot {} ({} occupations, {} competency mappings, {} major mappings)",
            path.display(),
            snapshot.occupations.len(),
            snapshot.nace_mappings.len(),
            snapshot.major_mappings.len()
        );
        Ok(Self::new(snapshot))
    }

    fn join_occupation(&self, mut row: MajorMapping) -> MajorMapping {
        if let Some(o) = self.occupations.get(&row.onetsoc_code) {
            row.title = Some(o.title.clone());
            row.description = o.description.clone();
        }
        row
    }
}

fn by_score_desc<T>(rows: &mut [T], score: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

fn take(rows: Vec<MajorMapping>, limit: Option<usize>) -> Vec<MajorMapping> {
    match limit {
        Some(n) => rows.into_iter().take(n).collect(),
        None => rows,
    }
}

#[async_trait]
impl CareerStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "snapshot"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let n = match table {
            Table::OccupationData => self.snapshot.occupations.len(),
            Table::JobNaceMappings => self.snapshot.nace_mappings.len(),
            Table::JobMajorMappings => self.snapshot.major_mappings.len(),
        };
        Ok(n as u64)
    }

    async fn occupation(&self, code: &str) -> Result<Option<Occupation>, StoreError> {
        Ok(self.occupations.get(code).cloned())
    }

    async fn nace_mappings_matching(
        &self,
        competencies: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<NaceMapping>, StoreError> {
        let mut rows: Vec<NaceMapping> = self
            .nace_mappings
            .iter()
            .filter(|m| m.slots.iter().any(|s| competencies.contains(&s.competency)))
            .cloned()
            .collect();
        by_score_desc(&mut rows, |m| m.slots[0].score);
        if let Some(n) = limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    async fn nace_mapping(&self, code: &str) -> Result<Option<NaceMapping>, StoreError> {
        Ok(self
            .nace_mappings
            .iter()
            .find(|m| m.onetsoc_code == code)
            .cloned())
    }

    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScore>, StoreError> {
        let mut rows: Vec<CompetencyScore> = self
            .snapshot
            .competency_scores
            .iter()
            .filter(|s| s.onetsoc_code == code)
            .cloned()
            .collect();
        by_score_desc(&mut rows, |s| s.score);
        Ok(rows)
    }

    async fn major_mappings_for_major(
        &self,
        major: &str,
        filter: MajorFilter,
    ) -> Result<Vec<MajorMapping>, StoreError> {
        let min_score = filter.min_score.unwrap_or(f64::NEG_INFINITY);
        let mut rows: Vec<MajorMapping> = self
            .snapshot
            .major_mappings
            .iter()
            .filter(|m| m.major_name == major && m.match_score >= min_score)
            .cloned()
            .map(|m| self.join_occupation(m))
            .collect();
        by_score_desc(&mut rows, |m| m.match_score);
        Ok(take(rows, filter.limit))
    }

    async fn major_mappings_for_job(&self, code: &str) -> Result<Vec<MajorMapping>, StoreError> {
        let mut rows: Vec<MajorMapping> = self
            .snapshot
            .major_mappings
            .iter()
            .filter(|m| m.onetsoc_code == code)
            .cloned()
            .collect();
        by_score_desc(&mut rows, |m| m.match_score);
        Ok(rows)
    }

    async fn job_zone(&self, code: &str) -> Result<Option<JobZone>, StoreError> {
        Ok(self.snapshot.job_zones.get(code).cloned())
    }

    async fn ratings(
        &self,
        code: &str,
        kind: RatingKind,
        limit: usize,
    ) -> Result<Vec<ElementRating>, StoreError> {
        let mut rows: Vec<ElementRating> = self
            .snapshot
            .ratings
            .iter()
            .filter(|r| r.onetsoc_code == code && r.kind == kind)
            .map(|r| r.rating.clone())
            .collect();
        by_score_desc(&mut rows, |r| r.data_value.unwrap_or(0.0));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn commodities(
        &self,
        code: &str,
        kind: CommodityKind,
        limit: usize,
    ) -> Result<Vec<Commodity>, StoreError> {
        Ok(self
            .snapshot
            .commodities
            .iter()
            .filter(|c| c.onetsoc_code == code && c.kind == kind)
            .map(|c| c.commodity.clone())
            .take(limit)
            .collect())
    }

    async fn task_statements(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<TaskStatement>, StoreError> {
        let mut rows: Vec<TaskStatement> = self
            .snapshot
            .task_statements
            .iter()
            .filter(|t| t.onetsoc_code == code)
            .map(|t| t.task.clone())
            .collect();
        by_score_desc(&mut rows, |t| t.incumbents_responding.unwrap_or(f64::NEG_INFINITY));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn related_occupations(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<RelatedOccupation>, StoreError> {
        let mut rows: Vec<RelatedOccupation> = self
            .snapshot
            .related_occupations
            .iter()
            .filter(|r| r.onetsoc_code == code)
            .map(|r| {
                let mut row = r.related.clone();
                if let Some(o) = self.occupations.get(&row.related_onetsoc_code) {
                    row.title = Some(o.title.clone());
                }
                row
            })
            .collect();
        rows.sort_by_key(|r| r.related_index.unwrap_or(i64::MAX));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn titles(
        &self,
        code: &str,
        kind: TitleKind,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .snapshot
            .titles
            .iter()
            .filter(|t| t.onetsoc_code == code && t.kind == kind)
            .map(|t| t.title.clone())
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "occupations": [
                {"onetsoc_code": "A", "title": "Analyst", "description": "Analyzes"},
                {"onetsoc_code": "B", "title": "Builder"}
            ],
            "nace_mappings": [
                {"onetsoc_code": "A", "competency_1": "Technology", "competency_1_score": 60.0,
                 "competency_2": "Teamwork", "competency_2_score": 50.0,
                 "competency_3": "Leadership", "competency_3_score": 40.0},
                {"onetsoc_code": "B", "competency_1": "Professionalism", "competency_1_score": 90.0,
                 "competency_2": "Teamwork", "competency_2_score": 80.0,
                 "competency_3": "Communication", "competency_3_score": 70.0}
            ],
            "major_mappings": [
                {"onetsoc_code": "A", "major_name": "Business", "match_score": 40.0},
                {"onetsoc_code": "B", "major_name": "Business", "match_score": 75.0},
                {"onetsoc_code": "B", "major_name": "Arts", "match_score": 20.0}
            ],
            "ratings": [
                {"onetsoc_code": "A", "kind": "skills", "element_name": "Writing", "data_value": 3.1},
                {"onetsoc_code": "A", "kind": "skills", "element_name": "Speaking", "data_value": 4.2},
                {"onetsoc_code": "A", "kind": "knowledge", "element_name": "Economics", "data_value": 5.0}
            ],
            "task_statements": [
                {"onetsoc_code": "A", "task": "Write reports", "incumbents_responding": 40.0},
                {"onetsoc_code": "A", "task": "Unsurveyed task"},
                {"onetsoc_code": "A", "task": "Analyze data", "task_type": "Core", "incumbents_responding": 85.0}
            ],
            "related_occupations": [
                {"onetsoc_code": "A", "related_onetsoc_code": "Z", "related_index": 7},
                {"onetsoc_code": "A", "related_onetsoc_code": "B", "relatedness_tier": "Primary-Short", "related_index": 2}
            ],
            "commodities": [
                {"onetsoc_code": "A", "kind": "technology_skills", "example": "Excel", "commodity_title": "Spreadsheet software"},
                {"onetsoc_code": "A", "kind": "tools_used", "example": "Laptop"},
                {"onetsoc_code": "A", "kind": "technology_skills", "example": "SQL"}
            ],
            "titles": [
                {"onetsoc_code": "A", "kind": "alternate", "title": "Data Analyst"},
                {"onetsoc_code": "A", "kind": "sample", "title": "Business Analyst"},
                {"onetsoc_code": "A", "kind": "alternate", "title": "Research Analyst"}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_matching_joins_titles_and_orders_by_first_slot() {
        let store = MemoryStore::new(snapshot());
        let rows = store
            .nace_mappings_matching(&["Teamwork".to_string()], None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].onetsoc_code, "B");
        assert_eq!(rows[0].title.as_deref(), Some("Builder"));
        assert_eq!(rows[1].description.as_deref(), Some("Analyzes"));
    }

    #[tokio::test]
    async fn test_major_filter_applies_min_score_and_limit() {
        let store = MemoryStore::new(snapshot());
        let rows = store
            .major_mappings_for_major(
                "Business",
                MajorFilter {
                    min_score: Some(50.0),
                    limit: Some(10),
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].onetsoc_code, "B");
        assert_eq!(rows[0].title.as_deref(), Some("Builder"));
    }

    #[tokio::test]
    async fn test_ratings_filtered_by_kind_and_sorted() {
        let store = MemoryStore::new(snapshot());
        let skills = store.ratings("A", RatingKind::Skills, 15).await.unwrap();
        let names: Vec<&str> = skills.iter().map(|r| r.element_name.as_str()).collect();
        assert_eq!(names, ["Speaking", "Writing"]);
    }

    #[tokio::test]
    async fn test_tasks_ordered_by_incumbents_with_unsurveyed_last() {
        let store = MemoryStore::new(snapshot());
        let tasks = store.task_statements("A", 20).await.unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(names, ["Analyze data", "Write reports", "Unsurveyed task"]);
        assert_eq!(store.task_statements("A", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_related_ordered_by_index_and_titled_when_known() {
        let store = MemoryStore::new(snapshot());
        let related = store.related_occupations("A", 10).await.unwrap();
        assert_eq!(related[0].related_onetsoc_code, "B");
        assert_eq!(related[0].title.as_deref(), Some("Builder"));
        assert_eq!(related[1].related_onetsoc_code, "Z");
        assert_eq!(related[1].title, None);
    }

    #[tokio::test]
    async fn test_commodities_and_titles_split_by_kind() {
        let store = MemoryStore::new(snapshot());
        let tech = store
            .commodities("A", CommodityKind::TechnologySkills, 20)
            .await
            .unwrap();
        let examples: Vec<&str> = tech.iter().map(|c| c.example.as_str()).collect();
        assert_eq!(examples, ["Excel", "SQL"]);
        assert_eq!(tech[0].commodity_title.as_deref(), Some("Spreadsheet software"));

        let alternates = store.titles("A", TitleKind::Alternate, 1).await.unwrap();
        assert_eq!(alternates, ["Data Analyst"]);
        let samples = store.titles("A", TitleKind::Sample, 10).await.unwrap();
        assert_eq!(samples, ["Business Analyst"]);
    }

    #[tokio::test]
    async fn test_counts() {
        let store = MemoryStore::new(snapshot());
        assert_eq!(store.count(Table::OccupationData).await.unwrap(), 2);
        assert_eq!(store.count(Table::JobMajorMappings).await.unwrap(), 3);
    }

    #[test]
    fn test_load_reads_snapshot_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&snapshot()).unwrap()).unwrap();
        let store = MemoryStore::load(file.path()).unwrap();
        assert_eq!(store.occupations.len(), 2);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = MemoryStore::load(file.path()).err().unwrap();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
