//! Ranks occupations against a user's three chosen competencies.
//!
//! Each occupation carries its own top-3 competencies. A selected competency that
//! appears in slot 1, 2 or 3 contributes its raw slot score with weight 3, 2 or 1;
//! relevance is the weighted average over matched slots only.

use serde::Serialize;

use crate::catalog::CompetencySelection;
use crate::models::NaceMapping;

use super::display_percent;

/// Weight for slot `i` (0-based): 3 for the first slot, 1 for the third.
const SLOT_WEIGHTS: [f64; 3] = [3.0, 2.0, 1.0];

/// One search result as the shells render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOccupation {
    pub onetsoc_code: String,
    pub title: String,
    pub description: String,
    pub match_score: u32,
    #[serde(skip)]
    pub relevance: f64,
}

/// Weighted-average relevance of one occupation, or `None` when it shares no
/// competency with the selection.
pub fn relevance(selection: &CompetencySelection, mapping: &NaceMapping) -> Option<f64> {
    let mut numerator = 0.0_f64;
    let mut denominator = 0.0_f64;

    for name in selection.names() {
        if let Some(slot) = mapping.slots.iter().position(|s| &s.competency == name) {
            let weight = SLOT_WEIGHTS[slot];
            numerator += weight * mapping.slots[slot].score;
            denominator += weight;
        }
    }

    (denominator > 0.0).then(|| numerator / denominator)
}

/// Scores every candidate, drops those with no overlap and sorts by relevance
/// descending. Equal relevance keeps the fetch order.
pub fn rank_by_competencies(
    selection: &CompetencySelection,
    candidates: Vec<NaceMapping>,
) -> Vec<RankedOccupation> {
    let mut ranked: Vec<RankedOccupation> = candidates
        .into_iter()
        .filter_map(|mapping| {
            let relevance = relevance(selection, &mapping)?;
            Some(RankedOccupation {
                title: mapping.title_or_default().to_string(),
                description: mapping.description_or_default().to_string(),
                match_score: display_percent(relevance),
                relevance,
                onetsoc_code: mapping.onetsoc_code,
            })
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    ranked
}
