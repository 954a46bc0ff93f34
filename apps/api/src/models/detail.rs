use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::mapping::CompetencyScore;

/// O*NET descriptor tables that share the `(element, data_value)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingKind {
    Skills,
    Knowledge,
    Abilities,
    WorkActivities,
    WorkStyles,
    WorkValues,
    WorkContext,
    EducationTraining,
}

impl RatingKind {
    pub fn table(self) -> &'static str {
        match self {
            RatingKind::Skills => "skills",
            RatingKind::Knowledge => "knowledge",
            RatingKind::Abilities => "abilities",
            RatingKind::WorkActivities => "work_activities",
            RatingKind::WorkStyles => "work_styles",
            RatingKind::WorkValues => "work_values",
            RatingKind::WorkContext => "work_context",
            RatingKind::EducationTraining => "education_training_experience",
        }
    }

    /// How many rows the job detail view shows for this kind.
    pub fn detail_limit(self) -> usize {
        match self {
            RatingKind::WorkStyles | RatingKind::WorkValues | RatingKind::WorkContext => 10,
            _ => 15,
        }
    }
}

/// A descriptor rating joined with `content_model_reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ElementRating {
    pub element_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_value: Option<f64>,
}

/// UNSPSC-coded examples attached to an occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommodityKind {
    TechnologySkills,
    ToolsUsed,
}

impl CommodityKind {
    pub fn table(self) -> &'static str {
        match self {
            CommodityKind::TechnologySkills => "technology_skills",
            CommodityKind::ToolsUsed => "tools_used",
        }
    }

    pub const DETAIL_LIMIT: usize = 20;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Commodity {
    pub example: String,
    #[serde(default)]
    pub commodity_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaskStatement {
    pub task: String,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub incumbents_responding: Option<f64>,
}

impl TaskStatement {
    pub const DETAIL_LIMIT: usize = 20;
}

/// A neighbouring occupation, lower `related_index` is closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RelatedOccupation {
    pub related_onetsoc_code: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub relatedness_tier: Option<String>,
    #[serde(default)]
    pub related_index: Option<i64>,
}

impl RelatedOccupation {
    pub const DETAIL_LIMIT: usize = 10;
}

/// Other names an occupation goes by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    Alternate,
    Sample,
}

impl TitleKind {
    pub fn table(self) -> &'static str {
        match self {
            TitleKind::Alternate => "alternate_titles",
            TitleKind::Sample => "sample_of_reported_titles",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            TitleKind::Alternate => "alternate_title",
            TitleKind::Sample => "reported_job_title",
        }
    }

    pub const DETAIL_LIMIT: usize = 10;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobZone {
    pub name: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub job_training: Option<String>,
    #[serde(default)]
    pub examples: Option<String>,
    #[serde(default)]
    pub svp_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyStrength {
    pub competency_name: String,
    pub match_strength: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorStrength {
    pub major_name: String,
    pub match_score: u32,
}

/// Everything the job detail page shows, with display percentages already normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    pub onetsoc_code: String,
    pub title: String,
    pub description: Option<String>,
    pub job_zone: Option<JobZone>,
    pub top_competencies: Vec<CompetencyStrength>,
    pub major_mappings: Vec<MajorStrength>,
    pub skills: Vec<ElementRating>,
    pub knowledge: Vec<ElementRating>,
    pub abilities: Vec<ElementRating>,
    pub work_activities: Vec<ElementRating>,
    pub work_styles: Vec<ElementRating>,
    pub work_values: Vec<ElementRating>,
    pub work_context: Vec<ElementRating>,
    pub education_training: Vec<ElementRating>,
    pub technology_skills: Vec<Commodity>,
    pub tools_used: Vec<Commodity>,
    pub task_statements: Vec<TaskStatement>,
    pub related_occupations: Vec<RelatedOccupation>,
    pub alternate_titles: Vec<String>,
    pub sample_titles: Vec<String>,
    pub all_competency_scores: Vec<CompetencyScore>,
}
