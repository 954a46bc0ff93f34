use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::occupation::{Occupation, NO_DESCRIPTION, UNKNOWN_TITLE};
use super::sanitize_score;

/// One of an occupation's top-3 competencies with its cached raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencySlot {
    pub competency: String,
    pub score: f64,
}

/// An occupation's precomputed top-3 competencies, slot order = rank.
#[derive(Debug, Clone, PartialEq)]
pub struct NaceMapping {
    pub onetsoc_code: String,
    pub slots: [CompetencySlot; 3],
    pub title: Option<String>,
    pub description: Option<String>,
}

impl NaceMapping {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }

    pub fn with_occupation(mut self, occupation: Option<&Occupation>) -> Self {
        if let Some(o) = occupation {
            self.title = Some(o.title.clone());
            self.description = o.description.clone();
        }
        self
    }
}

/// Flat `job_nace_mappings` row as the stores and snapshots carry it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NaceMappingRow {
    pub onetsoc_code: String,
    pub competency_1: String,
    #[serde(default)]
    pub competency_1_score: Option<f64>,
    pub competency_2: String,
    #[serde(default)]
    pub competency_2_score: Option<f64>,
    pub competency_3: String,
    #[serde(default)]
    pub competency_3_score: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<NaceMappingRow> for NaceMapping {
    fn from(row: NaceMappingRow) -> Self {
        NaceMapping {
            onetsoc_code: row.onetsoc_code,
            slots: [
                CompetencySlot {
                    competency: row.competency_1,
                    score: sanitize_score(row.competency_1_score),
                },
                CompetencySlot {
                    competency: row.competency_2,
                    score: sanitize_score(row.competency_2_score),
                },
                CompetencySlot {
                    competency: row.competency_3,
                    score: sanitize_score(row.competency_3_score),
                },
            ],
            title: row.title,
            description: row.description,
        }
    }
}

/// One entry of an occupation's full ranked competency list (`job_competency_scores`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompetencyScore {
    pub onetsoc_code: String,
    pub competency_name: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: f64,
}

/// One `job_major_mappings` row, optionally joined with its occupation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MajorMapping {
    pub onetsoc_code: String,
    pub major_name: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub match_score: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MajorMapping {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }
}

/// Accepts a number, a numeric string (Postgres `numeric` over REST) or null.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    let value = match raw {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(sanitize_score(value))
}
