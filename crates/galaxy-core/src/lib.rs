//! Diary galaxy placement engine.
//!
//! Assigns every diary record a stable star position inside a spiral disk.
//! Positions are a pure function of the record id and the stars already in
//! the sky: each id seeds its own LCG stream, candidates are drawn along a
//! twisted spiral arm, and a bounded search keeps stars at least
//! `min_distance` apart. The store reconciles incrementally, so existing
//! stars never move when others come and go.
//!
//! Zero I/O. Rendering, record storage and transport live elsewhere.

pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod placer;
pub mod position;
pub mod seed;
pub mod spiral;
pub mod store;
pub mod wire;

pub use config::PlacementConfig;
pub use constants::{
    DRAWS_PER_CANDIDATE, MAX_ATTEMPTS, MIN_DISTANCE, R_MIN, R_SPAN, SPIN_FACTOR,
};
pub use error::{ConfigError, Result};
pub use layout::{Layout, LayoutDiff, PlacementRecord, Violation};
pub use placer::{Placement, Placer};
pub use position::Position;
pub use seed::{DrawSource, SeededSequence, hash_id};
pub use spiral::SpiralParams;
pub use store::{PositionStore, ReconcileOutcome};
pub use wire::{WIRE_VERSION, WireLayout, WireStar, export_json};
