//! Incremental position store.
//!
//! The store keeps one published [`Layout`] behind an `Arc`. `reconcile`
//! builds the next layout on the side and swaps it in whole, so a reader
//! holding a snapshot never observes a half-reconciled sky. Stars that stay
//! in the live set are copied over untouched; only newcomers are placed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::PlacementConfig;
use crate::error::Result;
use crate::layout::{Layout, LayoutDiff, PlacementRecord};
use crate::placer::Placer;
use crate::seed::SeededSequence;

/// What one `reconcile` call produced: the layout now published and the
/// changes this call made to reach it.
#[derive(Clone, Debug)]
pub struct ReconcileOutcome {
    pub layout: Arc<Layout>,
    pub diff: LayoutDiff,
}

#[derive(Debug)]
pub struct PositionStore {
    config: PlacementConfig,
    placer: Placer,
    current: Arc<Layout>,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore {
    /// Empty store with default tunables.
    pub fn new() -> Self {
        let config = PlacementConfig::default();
        Self {
            placer: Placer::new(&config),
            config,
            current: Arc::new(Layout::default()),
        }
    }

    /// Empty store with custom tunables. Fails if `config` does not validate.
    pub fn with_config(config: PlacementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            placer: Placer::new(&config),
            config,
            current: Arc::new(Layout::default()),
        })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// The currently published layout.
    pub fn snapshot(&self) -> Arc<Layout> {
        Arc::clone(&self.current)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Bring the store in line with `live_ids`. Returns the published layout
    /// together with the diff of this call.
    ///
    /// - ids absent from `live_ids` are dropped first, freeing their volume
    /// - retained ids keep their exact record
    /// - new ids are placed one at a time in `live_ids` order, each seeing the
    ///   ones placed before it as obstacles
    /// - duplicates collapse to their first occurrence
    ///
    /// If nothing was added or removed and the order is unchanged, the current
    /// snapshot is returned as is, the generation does not advance and the
    /// diff is empty.
    pub fn reconcile<S: AsRef<str>>(&mut self, live_ids: &[S]) -> ReconcileOutcome {
        let previous = Arc::clone(&self.current);

        let mut seen: HashSet<&str> = HashSet::with_capacity(live_ids.len());
        let mut slots: Vec<(&str, Option<PlacementRecord>)> = Vec::with_capacity(live_ids.len());
        for id in live_ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                continue;
            }
            slots.push((id, previous.get(id).cloned()));
        }

        let removed: Vec<String> = previous
            .ids()
            .filter(|id| !seen.contains(*id))
            .map(str::to_string)
            .collect();
        let pending = slots.iter().filter(|(_, r)| r.is_none()).count();

        if pending == 0
            && removed.is_empty()
            && previous.ids().eq(slots.iter().map(|(id, _)| *id))
        {
            let diff = LayoutDiff {
                retained: previous.len(),
                ..LayoutDiff::default()
            };
            return ReconcileOutcome {
                layout: previous,
                diff,
            };
        }

        // Obstacles start as the surviving non-degraded stars and grow as
        // newcomers land.
        let mut obstacles: Vec<_> = slots
            .iter()
            .filter_map(|(_, r)| r.as_ref())
            .filter(|r| !r.degraded)
            .map(|r| r.position)
            .collect();

        let mut added = Vec::with_capacity(pending);
        let mut records = Vec::with_capacity(slots.len());
        for (id, existing) in slots {
            let record = match existing {
                Some(record) => record,
                None => {
                    let mut seq = SeededSequence::from_id(id);
                    let placement = self.placer.place(&mut seq, &obstacles);
                    if placement.degraded {
                        tracing::warn!(
                            id,
                            attempts = placement.attempts,
                            "no clear position within attempt budget, placing degraded"
                        );
                    } else {
                        obstacles.push(placement.position);
                    }
                    added.push(id.to_string());
                    PlacementRecord {
                        id: id.to_string(),
                        position: placement.position,
                        degraded: placement.degraded,
                        attempts: placement.attempts,
                    }
                }
            };
            records.push(record);
        }

        let diff = LayoutDiff {
            retained: records.len() - added.len(),
            added,
            removed,
        };
        let generation = previous.generation() + 1;
        tracing::debug!(
            generation,
            added = diff.added.len(),
            removed = diff.removed.len(),
            retained = diff.retained,
            "reconciled layout"
        );

        self.current = Arc::new(Layout::new(generation, records));
        ReconcileOutcome {
            layout: self.snapshot(),
            diff,
        }
    }

    /// Drop every star. Publishes an empty layout unless already empty.
    pub fn clear(&mut self) -> ReconcileOutcome {
        self.reconcile::<&str>(&[])
    }
}
