//! Min–max rescaling of sibling scores into display percentages.
//!
//! A sibling group is every raw score that belongs to the same occupation and the
//! same semantic group: the three top competency scores, or all of the
//! occupation's major scores. The weakest sibling lands on the band floor rather
//! than 0% so a selected-but-weak match is still visible.
//!
//! Rounding is half away from zero (`f64::round`). Scaled values are never
//! negative, so this matches round-half-up at every `.5` boundary.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("cannot normalize an empty score group")]
    EmptyInput,

    #[error("raw score at index {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("band floor {floor} exceeds ceiling {ceiling}")]
    InvalidBand { floor: u32, ceiling: u32 },
}

/// Display range for one kind of sibling group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub floor: u32,
    pub ceiling: u32,
}

impl Band {
    /// An occupation's top-3 competency strengths.
    pub const COMPETENCY: Band = Band::with_floor(10);
    /// An occupation's related majors.
    pub const MAJOR: Band = Band::with_floor(5);

    pub const fn with_floor(floor: u32) -> Self {
        Band {
            floor,
            ceiling: 100,
        }
    }
}

/// Rescales `raw` into `[band.floor, band.ceiling]`, index-aligned with the input.
///
/// When every score is equal (including a single score) all siblings are equally
/// strong and each one displays as the ceiling.
pub fn normalize(raw: &[f64], band: Band) -> Result<Vec<u32>, NormalizeError> {
    if band.floor > band.ceiling {
        return Err(NormalizeError::InvalidBand {
            floor: band.floor,
            ceiling: band.ceiling,
        });
    }
    if raw.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }
    if let Some(index) = raw.iter().position(|s| !s.is_finite()) {
        return Err(NormalizeError::NonFinite { index });
    }

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return Ok(vec![band.ceiling; raw.len()]);
    }

    let floor = f64::from(band.floor);
    let span = f64::from(band.ceiling - band.floor);

    Ok(raw
        .iter()
        .map(|&s| {
            let display = ((s - min) / (max - min) * span + floor).round();
            // Only the ceiling can be overshot by float error; the floor holds by construction.
            display.min(f64::from(band.ceiling)) as u32
        })
        .collect())
}
