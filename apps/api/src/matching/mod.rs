//! The domain services both shells call. Each wraps an `Arc<dyn CareerStore>`;
//! scoring itself lives in `crate::scoring`.

pub mod competency;
pub mod detail;
pub mod major;
pub mod stats;

pub use competency::CompetencyMatcher;
pub use detail::JobDetails;
pub use major::{MajorMatch, MajorMatcher, MajorQuery};
pub use stats::{collect_stats, health, HealthReport, MappingStats, StatsReport};
