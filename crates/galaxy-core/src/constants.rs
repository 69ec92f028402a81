/// Minimum separation between two non-degraded stars (scene units).
pub const MIN_DISTANCE: f64 = 2.5;

/// Candidates tried against the obstacle set before falling back.
pub const MAX_ATTEMPTS: u32 = 50;

/// Inner radius of the main-entity annulus.
pub const R_MIN: f64 = 8.0;

/// Radial width of the main-entity annulus: radii fall in [R_MIN, R_MIN + R_SPAN).
pub const R_SPAN: f64 = 12.0;

/// Spiral twist in radians per unit of radius.
pub const SPIN_FACTOR: f64 = 0.2;

/// Full width of the horizontal (x and z) jitter band.
pub const JITTER_XZ: f64 = 0.8;

/// Full width of the vertical jitter band. Stars sit in a thin disk.
pub const JITTER_Y: f64 = 0.6;

/// Draws consumed by one spiral candidate: radius, branch angle, three jitter axes.
pub const DRAWS_PER_CANDIDATE: u64 = 5;

/// Multiplier of the id hash fold.
pub const HASH_MULTIPLIER: i32 = 31;

/// LCG multiplier.
pub const LCG_MULTIPLIER: i64 = 9301;

/// LCG increment.
pub const LCG_INCREMENT: i64 = 49297;

/// LCG modulus. Draws are `state / LCG_MODULUS`.
pub const LCG_MODULUS: i64 = 233_280;
