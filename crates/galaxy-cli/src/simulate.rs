//! Seeded churn simulation.
//!
//! Models a diary whose records come and go: each step deletes every live
//! record with probability `churn` and writes up to `arrivals` new ones,
//! newest first. After every reconcile the layout is checked for moved
//! survivors and for pairs closer than the minimum distance.

use std::collections::HashMap;

use galaxy_core::{Position, PositionStore};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::{Builder, Uuid};

#[derive(Clone, Copy, Debug)]
pub struct SimulationParams {
    pub steps: usize,
    pub initial: usize,
    pub churn: f64,
    pub arrivals: usize,
    pub seed: u64,
}

#[derive(Debug, Default, Serialize)]
pub struct SimulationReport {
    pub steps: usize,
    pub live: usize,
    pub peak: usize,
    pub added: usize,
    pub removed: usize,
    pub degraded: usize,
    /// Survivors whose position changed between consecutive steps.
    pub moved: usize,
    /// Non-degraded pairs closer than the minimum distance, summed over steps.
    pub violations: usize,
}

impl SimulationReport {
    pub fn is_stable(&self) -> bool {
        self.moved == 0 && self.violations == 0
    }
}

fn new_id(rng: &mut SmallRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    let id: Uuid = Builder::from_random_bytes(bytes).into_uuid();
    id.to_string()
}

pub fn run(store: &mut PositionStore, params: &SimulationParams) -> SimulationReport {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let churn = params.churn.clamp(0.0, 1.0);
    let min_distance = store.config().min_distance;

    let mut live: Vec<String> = (0..params.initial).map(|_| new_id(&mut rng)).collect();
    let mut report = SimulationReport::default();
    let mut previous: HashMap<String, Position> = HashMap::new();

    for step in 0..=params.steps {
        if step > 0 {
            live.retain(|_| !rng.random_bool(churn));
            let arriving = rng.random_range(0..=params.arrivals);
            for _ in 0..arriving {
                live.insert(0, new_id(&mut rng));
            }
        }

        let out = store.reconcile(&live);
        report.added += out.diff.added.len();
        report.removed += out.diff.removed.len();
        let layout = out.layout;
        report.peak = report.peak.max(layout.len());

        for (id, pos) in &previous {
            if let Some(now) = layout.position(id)
                && now != *pos
            {
                tracing::error!(id = %id, "survivor moved between steps");
                report.moved += 1;
            }
        }
        report.violations += layout.violations(min_distance).len();

        previous = layout.iter().map(|r| (r.id.clone(), r.position)).collect();
        report.live = layout.len();
        report.degraded = layout.degraded_count();
    }

    report.steps = params.steps;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u64) -> SimulationParams {
        SimulationParams {
            steps: 30,
            initial: 15,
            churn: 0.2,
            arrivals: 4,
            seed,
        }
    }

    #[test]
    fn test_simulation_is_stable() {
        let mut store = PositionStore::new();
        let report = run(&mut store, &params(7));
        assert!(report.is_stable(), "{report:?}");
        assert!(report.added >= 15);
        assert_eq!(report.live, store.len());
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run(&mut PositionStore::new(), &params(11));
        let b = run(&mut PositionStore::new(), &params(11));
        assert_eq!(a.added, b.added);
        assert_eq!(a.removed, b.removed);
        assert_eq!(a.live, b.live);
        assert_eq!(a.degraded, b.degraded);
    }

    #[test]
    fn test_zero_churn_only_grows() {
        let p = SimulationParams {
            churn: 0.0,
            ..params(3)
        };
        let report = run(&mut PositionStore::new(), &p);
        assert_eq!(report.removed, 0);
        assert_eq!(report.live, report.added);
    }

    #[test]
    fn test_quiet_steps_add_nothing() {
        // No churn and no arrivals: every step after the first is a no-op.
        let p = SimulationParams {
            churn: 0.0,
            arrivals: 0,
            ..params(5)
        };
        let report = run(&mut PositionStore::new(), &p);
        assert_eq!(report.added, 15);
        assert_eq!(report.removed, 0);
        assert_eq!(report.live, 15);
    }

    #[test]
    fn test_generated_ids_are_v4() {
        let mut rng = SmallRng::seed_from_u64(1);
        let id = new_id(&mut rng);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
