//! Bounded collision-avoidance search.
//!
//! Candidates are drawn from one entity's stream until one clears every
//! obstacle by at least `min_distance`. When the attempt budget runs out the
//! next candidate is taken anyway and flagged as degraded: a slightly crowded
//! sky beats a missing star.

use crate::config::PlacementConfig;
use crate::position::Position;
use crate::seed::DrawSource;
use crate::spiral::SpiralParams;

/// Outcome of placing one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Position,
    /// Accepted without satisfying the distance constraint.
    pub degraded: bool,
    /// Candidates generated, fallback included: `1..=max_attempts + 1`.
    pub attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placer {
    min_distance: f64,
    max_attempts: u32,
    spiral: SpiralParams,
}

impl Default for Placer {
    fn default() -> Self {
        Self::new(&PlacementConfig::default())
    }
}

impl Placer {
    /// Build a placer from `config`. Validation is the caller's job;
    /// see [`PlacementConfig::validate`].
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            max_attempts: config.max_attempts,
            spiral: config.spiral(),
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn spiral(&self) -> &SpiralParams {
        &self.spiral
    }

    /// True if `candidate` is at least `min_distance` from every obstacle.
    pub fn clears(&self, candidate: Position, obstacles: &[Position]) -> bool {
        let min_sq = self.min_distance * self.min_distance;
        obstacles
            .iter()
            .all(|o| candidate.distance_squared(*o) >= min_sq)
    }

    /// Search for a clear position, continuing `draws` across attempts.
    ///
    /// Advances `draws` by `DRAWS_PER_CANDIDATE * attempts` values.
    pub fn place(&self, draws: &mut impl DrawSource, obstacles: &[Position]) -> Placement {
        for attempt in 0..self.max_attempts {
            let candidate = self.spiral.candidate(draws);
            if self.clears(candidate, obstacles) {
                return Placement {
                    position: candidate,
                    degraded: false,
                    attempts: attempt + 1,
                };
            }
        }

        Placement {
            position: self.spiral.candidate(draws),
            degraded: true,
            attempts: self.max_attempts + 1,
        }
    }
}
