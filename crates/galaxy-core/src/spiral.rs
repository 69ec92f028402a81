//! Spiral candidate generation.
//!
//! A candidate sits on a twisted arm of the galaxy disk: its radius is drawn
//! from an annulus, the arm twists by `radius * spin_factor`, and a small
//! jitter keeps stars off the ideal curve.

use std::f64::consts::TAU;

use crate::constants::{JITTER_XZ, JITTER_Y, R_MIN, R_SPAN, SPIN_FACTOR};
use crate::position::Position;
use crate::seed::DrawSource;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralParams {
    pub radius_min: f64,
    pub radius_span: f64,
    pub spin_factor: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            radius_min: R_MIN,
            radius_span: R_SPAN,
            spin_factor: SPIN_FACTOR,
        }
    }
}

impl SpiralParams {
    /// Generate one candidate, consuming exactly
    /// [`DRAWS_PER_CANDIDATE`](crate::constants::DRAWS_PER_CANDIDATE) draws
    /// in the order radius, branch angle, x jitter, y jitter, z jitter.
    pub fn candidate(&self, draws: &mut impl DrawSource) -> Position {
        let radius = self.radius_min + draws.draw() * self.radius_span;
        let spin_angle = radius * self.spin_factor;
        let branch_angle = draws.draw() * TAU;

        let jitter_x = (draws.draw() - 0.5) * JITTER_XZ;
        let jitter_y = (draws.draw() - 0.5) * JITTER_Y;
        let jitter_z = (draws.draw() - 0.5) * JITTER_XZ;

        let angle = branch_angle + spin_angle;
        Position {
            x: angle.cos() * radius + jitter_x,
            y: jitter_y,
            z: angle.sin() * radius + jitter_z,
        }
    }

    /// Outer bound on a candidate's planar radius, jitter included.
    pub fn max_planar_radius(&self) -> f64 {
        let jitter = JITTER_XZ / 2.0;
        self.radius_min + self.radius_span + (2.0 * jitter * jitter).sqrt()
    }
}
