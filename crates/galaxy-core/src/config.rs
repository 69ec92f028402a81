use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ATTEMPTS, MIN_DISTANCE, R_MIN, R_SPAN, SPIN_FACTOR};
use crate::error::{ConfigError, Result};
use crate::spiral::SpiralParams;

/// Placement tunables. Every field falls back to its default when absent,
/// so a partial `[placement]` table is enough.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub min_distance: f64,
    pub max_attempts: u32,
    pub radius_min: f64,
    pub radius_span: f64,
    pub spin_factor: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            max_attempts: MAX_ATTEMPTS,
            radius_min: R_MIN,
            radius_span: R_SPAN,
            spin_factor: SPIN_FACTOR,
        }
    }
}

impl PlacementConfig {
    /// Reject values that would make placement meaningless.
    ///
    /// Distances and radii must be finite and non-negative, the spin factor
    /// finite, and at least one checked attempt must be allowed.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("min_distance", self.min_distance),
            ("radius_min", self.radius_min),
            ("radius_span", self.radius_span),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !self.spin_factor.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "spin_factor",
                value: self.spin_factor,
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    pub fn spiral(&self) -> SpiralParams {
        SpiralParams {
            radius_min: self.radius_min,
            radius_span: self.radius_span,
            spin_factor: self.spin_factor,
        }
    }
}
