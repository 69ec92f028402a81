use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// One placed star. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: String,
    pub position: Position,
    pub degraded: bool,
    pub attempts: u32,
}

/// What one reconcile call changed relative to the layout before it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutDiff {
    /// Newly placed ids, in live order.
    pub added: Vec<String>,
    /// Dropped ids, in the previous layout's order.
    pub removed: Vec<String>,
    /// Ids carried over untouched.
    pub retained: usize,
}

impl LayoutDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A pair of non-degraded stars closer than the minimum distance.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub a: String,
    pub b: String,
    pub distance: f64,
}

/// Immutable, fully reconciled snapshot of the galaxy.
///
/// Records iterate in the order of the live set that produced them.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    generation: u64,
    records: Vec<PlacementRecord>,
    index: HashMap<String, usize>,
}

impl Layout {
    pub(crate) fn new(generation: u64, records: Vec<PlacementRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            generation,
            records,
            index,
        }
    }

    /// Bumped by every reconcile that publishes a new layout. The empty
    /// initial layout is generation 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PlacementRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.get(id).map(|r| r.position)
    }

    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementRecord> {
        self.records.iter()
    }

    /// Ids in live order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn degraded_count(&self) -> usize {
        self.records.iter().filter(|r| r.degraded).count()
    }

    /// Positions of non-degraded stars. These are the obstacles for the next
    /// placement.
    pub fn obstacles(&self) -> Vec<Position> {
        self.records
            .iter()
            .filter(|r| !r.degraded)
            .map(|r| r.position)
            .collect()
    }

    /// All pairs of non-degraded stars closer than `min_distance`. Empty for
    /// any layout produced by a store using the same distance.
    pub fn violations(&self, min_distance: f64) -> Vec<Violation> {
        let placed: Vec<&PlacementRecord> = self.records.iter().filter(|r| !r.degraded).collect();
        let mut out = Vec::new();
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance < min_distance {
                    out.push(Violation {
                        a: a.id.clone(),
                        b: b.id.clone(),
                        distance,
                    });
                }
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a PlacementRecord;
    type IntoIter = std::slice::Iter<'a, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
