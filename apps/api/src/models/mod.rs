pub mod detail;
pub mod mapping;
pub mod occupation;

pub use detail::{
    Commodity, CommodityKind, CompetencyStrength, ElementRating, JobDetail, JobZone, MajorStrength,
    RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};
pub use mapping::{CompetencyScore, CompetencySlot, MajorMapping, NaceMapping, NaceMappingRow};
pub use occupation::Occupation;

/// Stored scores are provider-defined; nulls and garbage read as 0.
pub(crate) fn sanitize_score(raw: Option<f64>) -> f64 {
    raw.filter(|s| s.is_finite()).unwrap_or(0.0)
}
