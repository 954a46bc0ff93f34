//! Enriched job detail: occupation text, job zone, descriptor ratings, O*NET
//! reference sections, and the two normalized sibling groups (top-3
//! competencies, related majors).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{
    CommodityKind, CompetencyScore, CompetencyStrength, JobDetail, MajorMapping, MajorStrength,
    NaceMapping, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};
use crate::scoring::{normalize, Band, NormalizeError};
use crate::store::{CareerStore, StoreError};

#[derive(Clone)]
pub struct JobDetails {
    store: Arc<dyn CareerStore>,
}

impl JobDetails {
    pub fn new(store: Arc<dyn CareerStore>) -> Self {
        Self { store }
    }

    /// `Ok(None)` when the code is not in the occupation catalog.
    pub async fn lookup(&self, code: &str) -> Result<Option<JobDetail>, StoreError> {
        let Some(occupation) = self.store.occupation(code).await? else {
            debug!("Occupation {code} not found");
            return Ok(None);
        };

        let store = self.store.as_ref();
        let rating = |kind: RatingKind| store.ratings(code, kind, kind.detail_limit());

        // Independent reads; all must land before normalization runs.
        let (
            nace,
            scores,
            majors,
            job_zone,
            skills,
            knowledge,
            abilities,
            work_activities,
            work_styles,
            work_values,
        ) = tokio::try_join!(
            store.nace_mapping(code),
            store.competency_scores(code),
            store.major_mappings_for_job(code),
            store.job_zone(code),
            rating(RatingKind::Skills),
            rating(RatingKind::Knowledge),
            rating(RatingKind::Abilities),
            rating(RatingKind::WorkActivities),
            rating(RatingKind::WorkStyles),
            rating(RatingKind::WorkValues),
        )?;

        let commodities =
            |kind: CommodityKind| store.commodities(code, kind, CommodityKind::DETAIL_LIMIT);
        let titles = |kind: TitleKind| store.titles(code, kind, TitleKind::DETAIL_LIMIT);
        let (
            work_context,
            education_training,
            technology_skills,
            tools_used,
            task_statements,
            related_occupations,
            alternate_titles,
            sample_titles,
        ) = tokio::try_join!(
            rating(RatingKind::WorkContext),
            rating(RatingKind::EducationTraining),
            commodities(CommodityKind::TechnologySkills),
            commodities(CommodityKind::ToolsUsed),
            store.task_statements(code, TaskStatement::DETAIL_LIMIT),
            store.related_occupations(code, RelatedOccupation::DETAIL_LIMIT),
            titles(TitleKind::Alternate),
            titles(TitleKind::Sample),
        )?;

        let top_competencies = match nace {
            Some(mapping) => top_competencies(&mapping, &scores).unwrap_or_else(|e| {
                warn!("Could not normalize competencies for {code}: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let major_mappings = major_strengths(&majors).unwrap_or_else(|e| {
            warn!("Could not normalize majors for {code}: {e}");
            Vec::new()
        });

        Ok(Some(JobDetail {
            onetsoc_code: occupation.onetsoc_code,
            title: occupation.title,
            description: occupation.description,
            job_zone,
            top_competencies,
            major_mappings,
            skills,
            knowledge,
            abilities,
            work_activities,
            work_styles,
            work_values,
            work_context,
            education_training,
            technology_skills,
            tools_used,
            task_statements,
            related_occupations,
            alternate_titles,
            sample_titles,
            all_competency_scores: scores,
        }))
    }
}

/// Resolves each slot's raw score from the full score list (the cached slot
/// score may be stale) and normalizes the three into the competency band.
pub fn top_competencies(
    mapping: &NaceMapping,
    all_scores: &[CompetencyScore],
) -> Result<Vec<CompetencyStrength>, NormalizeError> {
    let by_name: HashMap<&str, f64> = all_scores
        .iter()
        .map(|s| (s.competency_name.as_str(), s.score))
        .collect();

    let raw: Vec<f64> = mapping
        .slots
        .iter()
        .map(|slot| {
            by_name
                .get(slot.competency.as_str())
                .copied()
                .unwrap_or(slot.score)
        })
        .collect();

    let display = normalize(&raw, Band::COMPETENCY)?;
    Ok(mapping
        .slots
        .iter()
        .zip(display)
        .map(|(slot, match_strength)| CompetencyStrength {
            competency_name: slot.competency.clone(),
            match_strength,
        })
        .collect())
}

/// Normalizes every major mapped to one occupation into the major band.
pub fn major_strengths(rows: &[MajorMapping]) -> Result<Vec<MajorStrength>, NormalizeError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<f64> = rows.iter().map(|m| m.match_score).collect();
    let display = normalize(&raw, Band::MAJOR)?;
    Ok(rows
        .iter()
        .zip(display)
        .map(|(m, match_score)| MajorStrength {
            major_name: m.major_name.clone(),
            match_score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompetencySlot;
    use crate::store::{MemoryStore, OfflineStore, Snapshot};
    use serde_json::json;

    fn slot(name: &str, score: f64) -> CompetencySlot {
        CompetencySlot {
            competency: name.to_string(),
            score,
        }
    }

    fn score(name: &str, score: f64) -> CompetencyScore {
        CompetencyScore {
            onetsoc_code: "x".to_string(),
            competency_name: name.to_string(),
            score,
        }
    }

    fn mapping() -> NaceMapping {
        NaceMapping {
            onetsoc_code: "x".to_string(),
            slots: [slot("Technology", 9.0), slot("Teamwork", 8.0), slot("Leadership", 1.0)],
            title: None,
            description: None,
        }
    }

    #[test]
    fn test_full_score_list_overrides_cached_slot_scores() {
        let scores = vec![
            score("Technology", 100.0),
            score("Teamwork", 55.0),
            score("Leadership", 10.0),
        ];
        let out = top_competencies(&mapping(), &scores).unwrap();
        let strengths: Vec<u32> = out.iter().map(|c| c.match_strength).collect();
        assert_eq!(strengths, [100, 55, 10]);
        assert_eq!(out[1].competency_name, "Teamwork");
    }

    #[test]
    fn test_cached_slot_score_used_when_name_missing() {
        // Leadership falls back to its cached 1.0
        let scores = vec![score("Technology", 9.0), score("Teamwork", 5.0)];
        let out = top_competencies(&mapping(), &scores).unwrap();
        assert_eq!(out[0].match_strength, 100);
        assert_eq!(out[2].match_strength, 10);
        // (5-1)/(9-1)*90+10 = 55
        assert_eq!(out[1].match_strength, 55);
    }

    #[test]
    fn test_equal_triple_is_all_hundred() {
        let scores = vec![
            score("Technology", 4.0),
            score("Teamwork", 4.0),
            score("Leadership", 4.0),
        ];
        let out = top_competencies(&mapping(), &scores).unwrap();
        assert!(out.iter().all(|c| c.match_strength == 100));
    }

    #[test]
    fn test_major_strengths_use_floor_five() {
        let rows: Vec<MajorMapping> = [("Business", 80.0), ("Arts", 20.0), ("Technology", 50.0)]
            .into_iter()
            .map(|(name, s)| MajorMapping {
                onetsoc_code: "x".to_string(),
                major_name: name.to_string(),
                match_score: s,
                title: None,
                description: None,
            })
            .collect();
        let out = major_strengths(&rows).unwrap();
        let scores: Vec<u32> = out.iter().map(|m| m.match_score).collect();
        // 0.5*95+5 = 52.5 -> 53
        assert_eq!(scores, [100, 5, 53]);
    }

    #[test]
    fn test_no_majors_is_empty() {
        assert!(major_strengths(&[]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_assembles_detail() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "occupations": [
                {"onetsoc_code": "15-1252.00", "title": "Software Developers"},
                {"onetsoc_code": "15-1253.00", "title": "Software Quality Assurance Analysts and Testers"}
            ],
            "nace_mappings": [{"onetsoc_code": "15-1252.00",
                "competency_1": "Technology", "competency_1_score": 90.0,
                "competency_2": "Critical Thinking", "competency_2_score": 70.0,
                "competency_3": "Teamwork", "competency_3_score": 50.0}],
            "competency_scores": [
                {"onetsoc_code": "15-1252.00", "competency_name": "Technology", "score": 90.0},
                {"onetsoc_code": "15-1252.00", "competency_name": "Critical Thinking", "score": 70.0},
                {"onetsoc_code": "15-1252.00", "competency_name": "Teamwork", "score": 50.0},
                {"onetsoc_code": "15-1252.00", "competency_name": "Leadership", "score": 20.0}
            ],
            "major_mappings": [
                {"onetsoc_code": "15-1252.00", "major_name": "Technology", "match_score": 95.0}
            ],
            "job_zones": {"15-1252.00": {"name": "Job Zone Four: Considerable Preparation Needed"}},
            "ratings": [
                {"onetsoc_code": "15-1252.00", "kind": "skills", "element_name": "Programming", "data_value": 4.5},
                {"onetsoc_code": "15-1252.00", "kind": "work_context", "element_name": "Spend Time Sitting", "data_value": 4.8},
                {"onetsoc_code": "15-1252.00", "kind": "education_training", "element_name": "Required Level of Education", "data_value": 6.0}
            ],
            "commodities": [
                {"onetsoc_code": "15-1252.00", "kind": "technology_skills", "example": "Git", "commodity_title": "Configuration management software"},
                {"onetsoc_code": "15-1252.00", "kind": "tools_used", "example": "Desktop computers"}
            ],
            "task_statements": [
                {"onetsoc_code": "15-1252.00", "task": "Modify existing software to correct errors.", "task_type": "Core", "incumbents_responding": 31.0},
                {"onetsoc_code": "15-1252.00", "task": "Analyze user needs and software requirements.", "task_type": "Core", "incumbents_responding": 60.0}
            ],
            "related_occupations": [
                {"onetsoc_code": "15-1252.00", "related_onetsoc_code": "15-1253.00", "relatedness_tier": "Primary-Short", "related_index": 1}
            ],
            "titles": [
                {"onetsoc_code": "15-1252.00", "kind": "alternate", "title": "Application Developer"},
                {"onetsoc_code": "15-1252.00", "kind": "sample", "title": "Software Engineer"}
            ]
        }))
        .unwrap();

        let detail = JobDetails::new(Arc::new(MemoryStore::new(snapshot)))
            .lookup("15-1252.00")
            .await
            .unwrap()
            .unwrap();

        let strengths: Vec<u32> = detail.top_competencies.iter().map(|c| c.match_strength).collect();
        assert_eq!(strengths, [100, 55, 10]);
        assert_eq!(detail.major_mappings[0].match_score, 100);
        assert_eq!(detail.all_competency_scores.len(), 4);
        assert_eq!(detail.skills[0].element_name, "Programming");
        assert!(detail.knowledge.is_empty());
        assert!(detail.job_zone.is_some());

        assert_eq!(detail.work_context[0].element_name, "Spend Time Sitting");
        assert_eq!(detail.education_training[0].element_name, "Required Level of Education");
        assert_eq!(detail.technology_skills[0].example, "Git");
        assert_eq!(detail.tools_used[0].example, "Desktop computers");
        assert_eq!(
            detail.task_statements[0].task,
            "Analyze user needs and software requirements."
        );
        assert_eq!(
            detail.related_occupations[0].title.as_deref(),
            Some("Software Quality Assurance Analysts and Testers")
        );
        assert_eq!(detail.alternate_titles, ["Application Developer"]);
        assert_eq!(detail.sample_titles, ["Software Engineer"]);
    }

    #[tokio::test]
    async fn test_lookup_unknown_code_is_none() {
        let details = JobDetails::new(Arc::new(MemoryStore::new(Snapshot::default())));
        assert!(details.lookup("00-0000.00").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_offline_is_error() {
        let details = JobDetails::new(Arc::new(OfflineStore));
        assert!(details.lookup("15-1252.00").await.is_err());
    }
}
