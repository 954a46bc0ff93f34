use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_DESCRIPTION: &str = "No description available";

/// One row of `occupation_data`, keyed by O*NET-SOC code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Occupation {
    pub onetsoc_code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

