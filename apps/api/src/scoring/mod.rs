//! Pure scoring over rows that were already fetched and ranked by the store.
//! Nothing in here performs I/O.

pub mod normalize;
pub mod ranker;

pub use normalize::{normalize, Band, NormalizeError};
pub use ranker::{rank_by_competencies, RankedOccupation};

/// Rounds a percentage for display: half away from zero, clamped into 0..=100.
pub fn display_percent(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.min(100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_percent_caps_at_100() {
        assert_eq!(display_percent(130.2), 100);
        assert_eq!(display_percent(99.5), 100);
    }

    #[test]
    fn test_display_percent_rounds_half_away_from_zero() {
        assert_eq!(display_percent(72.5), 73);
        assert_eq!(display_percent(72.49), 72);
    }

    #[test]
    fn test_display_percent_never_negative() {
        assert_eq!(display_percent(-4.0), 0);
        assert_eq!(display_percent(f64::NAN), 0);
    }
}
