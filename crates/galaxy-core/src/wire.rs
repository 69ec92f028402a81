//! JSON export of a layout for renderers.
//!
//! The wire format uses camelCase field names and stores positions as
//! `[x, y, z]` arrays.

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

pub const WIRE_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireLayout {
    pub version: String,
    pub generation: u64,
    #[serde(rename = "minDistance")]
    pub min_distance: f64,
    pub stars: Vec<WireStar>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireStar {
    pub id: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub degraded: bool,
    #[serde(default)]
    pub attempts: u32,
}

impl WireLayout {
    pub fn from_layout(layout: &Layout, min_distance: f64) -> Self {
        Self {
            version: WIRE_VERSION.to_string(),
            generation: layout.generation(),
            min_distance,
            stars: layout
                .iter()
                .map(|r| WireStar {
                    id: r.id.clone(),
                    position: r.position.to_array(),
                    degraded: r.degraded,
                    attempts: r.attempts,
                })
                .collect(),
        }
    }
}

/// Serialize `layout` to pretty-printed JSON.
pub fn export_json(layout: &Layout, min_distance: f64) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&WireLayout::from_layout(layout, min_distance))
}
