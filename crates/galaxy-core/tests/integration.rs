//! Integration tests exercising the full placement pipeline:
//! id → seeded stream → spiral candidates → placer → reconciled layout.

use std::collections::HashMap;

use galaxy_core::{
    DRAWS_PER_CANDIDATE, Layout, MAX_ATTEMPTS, MIN_DISTANCE, PlacementConfig, Placer, Position,
    PositionStore, SeededSequence, SpiralParams, export_json,
};
use proptest::prelude::*;

fn entry_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("entry-{i}")).collect()
}

fn positions(layout: &Layout) -> HashMap<String, Position> {
    layout
        .iter()
        .map(|r| (r.id.clone(), r.position))
        .collect()
}

/// reconcile(["a"]) → reconcile(["a","b"]) → reconcile(["b"])
#[test]
fn add_then_remove_keeps_survivors_in_place() {
    let mut store = PositionStore::new();

    let one = store.reconcile(&["a"]).layout;
    assert_eq!(one.len(), 1);
    let p_a = one.position("a").unwrap();

    let two = store.reconcile(&["a", "b"]).layout;
    assert_eq!(two.position("a"), Some(p_a));
    let p_b = two.position("b").unwrap();
    assert!(
        p_a.distance(p_b) >= MIN_DISTANCE,
        "a and b too close: {}",
        p_a.distance(p_b)
    );

    let three = store.reconcile(&["b"]);
    assert!(!three.layout.contains("a"));
    assert_eq!(three.layout.position("b"), Some(p_b));
    assert_eq!(three.diff.removed, vec!["a"]);
    assert!(three.diff.added.is_empty());
}

#[test]
fn repeated_live_set_reports_nothing_new() {
    let mut store = PositionStore::new();
    let ids = entry_ids(12);
    let first = store.reconcile(&ids);
    assert_eq!(first.diff.added.len(), 12);

    for _ in 0..3 {
        let again = store.reconcile(&ids);
        assert!(again.diff.is_empty(), "unexpected diff {:?}", again.diff);
        assert_eq!(again.diff.retained, 12);
        assert_eq!(again.layout.generation(), 1);
    }
}

#[test]
fn seed_x_repeats_its_first_four_draws() {
    let first: Vec<f64> = SeededSequence::from_id("x").take(4).collect();
    let second: Vec<f64> = SeededSequence::from_id("x").take(4).collect();
    assert_eq!(first, second);
    assert_eq!(first[0], 232_297.0 / 233_280.0);
}

#[test]
fn fresh_store_rederives_the_same_sky() {
    let ids = entry_ids(25);
    let a = PositionStore::new().reconcile(&ids).layout;
    let b = PositionStore::new().reconcile(&ids).layout;
    for (ra, rb) in a.iter().zip(b.iter()) {
        assert_eq!(ra, rb);
        assert_eq!(ra.position.x.to_bits(), rb.position.x.to_bits());
        assert_eq!(ra.position.y.to_bits(), rb.position.y.to_bits());
        assert_eq!(ra.position.z.to_bits(), rb.position.z.to_bits());
    }
}

#[test]
fn incremental_growth_matches_single_batch() {
    // Appending one id at a time gives every newcomer the same obstacles as a
    // single batch call would.
    let ids = entry_ids(30);
    let batch = PositionStore::new().reconcile(&ids).layout;

    let mut store = PositionStore::new();
    for n in 1..=ids.len() {
        store.reconcile(&ids[..n]);
    }
    let grown = store.snapshot();

    assert_eq!(positions(&batch), positions(&grown));
    assert_eq!(grown.generation(), 30);
}

#[test]
fn placement_order_within_one_call_matters() {
    let forward = PositionStore::new().reconcile(&entry_ids(40)).layout;
    let mut reversed_ids = entry_ids(40);
    reversed_ids.reverse();
    let backward = PositionStore::new().reconcile(&reversed_ids).layout;

    // The first id placed in each call has an empty sky.
    let first_fwd = SpiralParams::default().candidate(&mut SeededSequence::from_id("entry-0"));
    let first_back = SpiralParams::default().candidate(&mut SeededSequence::from_id("entry-39"));
    assert_eq!(forward.position("entry-0"), Some(first_fwd));
    assert_eq!(backward.position("entry-39"), Some(first_back));
    assert!(forward.violations(MIN_DISTANCE).is_empty());
    assert!(backward.violations(MIN_DISTANCE).is_empty());
}

#[test]
fn moderate_sky_has_no_degraded_stars() {
    let layout = PositionStore::new().reconcile(&entry_ids(60)).layout;
    assert_eq!(layout.len(), 60);
    assert_eq!(layout.degraded_count(), 0);
    assert!(layout.violations(MIN_DISTANCE).is_empty());
}

#[test]
fn crowded_sky_degrades_but_keeps_invariant() {
    let layout = PositionStore::new().reconcile(&entry_ids(200)).layout;
    assert_eq!(layout.len(), 200);
    assert!(
        layout.degraded_count() > 0,
        "200 stars should overflow the annulus"
    );
    assert!(layout.violations(MIN_DISTANCE).is_empty());
    for r in &*layout {
        assert!(r.attempts >= 1 && r.attempts <= MAX_ATTEMPTS + 1);
        if r.degraded {
            assert_eq!(r.attempts, MAX_ATTEMPTS + 1);
        }
    }
}

#[test]
fn removed_volume_is_reusable() {
    let tight = PlacementConfig {
        min_distance: 1000.0,
        max_attempts: 3,
        ..Default::default()
    };
    let mut store = PositionStore::with_config(tight).unwrap();

    let first = store.reconcile(&["a", "b"]).layout;
    assert!(first.get("b").unwrap().degraded);

    // With "a" gone, "c" lands on an empty sky and is not degraded.
    let second = store.reconcile(&["c"]).layout;
    assert!(!second.get("c").unwrap().degraded);
    assert_eq!(second.get("c").unwrap().attempts, 1);
}

#[test]
fn placer_draw_accounting() {
    let placer = Placer::default();
    let blocker = Position::ORIGIN;
    let mut seq = SeededSequence::from_id("accounting");
    let placement = placer.place(&mut seq, &[blocker]);
    assert_eq!(
        seq.draws(),
        DRAWS_PER_CANDIDATE * u64::from(placement.attempts)
    );
}

#[test]
fn export_lists_stars_in_live_order() {
    let mut store = PositionStore::new();
    let layout = store.reconcile(&["z", "y", "x"]).layout;
    let json = export_json(&layout, store.config().min_distance).unwrap();
    let z = json.find("\"z\"").unwrap();
    let y = json.find("\"y\"").unwrap();
    let x = json.find("\"x\"").unwrap();
    assert!(z < y && y < x);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn live_sets() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(0usize..40, 0..30), 1..8).prop_map(|steps| {
        steps
            .into_iter()
            .map(|step| step.into_iter().map(|i| format!("rec-{i}")).collect())
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_placement_is_deterministic(id in ".{0,24}") {
        let a = PositionStore::new().reconcile(&[id.as_str()]).layout;
        let b = PositionStore::new().reconcile(&[id.as_str()]).layout;
        let pa = a.position(&id).unwrap();
        let pb = b.position(&id).unwrap();
        prop_assert_eq!(pa.x.to_bits(), pb.x.to_bits());
        prop_assert_eq!(pa.y.to_bits(), pb.y.to_bits());
        prop_assert_eq!(pa.z.to_bits(), pb.z.to_bits());
    }

    #[test]
    fn prop_draws_stay_in_unit_interval(id in ".{0,32}") {
        for d in SeededSequence::from_id(&id).take(64) {
            prop_assert!((0.0..1.0).contains(&d));
        }
    }

    #[test]
    fn prop_reconcile_invariants(steps in live_sets()) {
        let mut store = PositionStore::new();
        let mut previous: HashMap<String, Position> = HashMap::new();

        for live in &steps {
            let out = store.reconcile(live);
            let layout = &out.layout;

            // The diff accounts for exactly this call's changes.
            prop_assert_eq!(out.diff.added.len() + out.diff.retained, layout.len());
            for id in &out.diff.added {
                prop_assert!(!previous.contains_key(id));
            }
            for id in &out.diff.removed {
                prop_assert!(previous.contains_key(id));
                prop_assert!(!layout.contains(id));
            }

            // Every live id is placed and nothing else is.
            for id in live {
                prop_assert!(layout.contains(id));
            }
            for id in layout.ids() {
                prop_assert!(live.iter().any(|l| l == id));
            }

            // Survivors never move.
            for (id, pos) in &previous {
                if let Some(now) = layout.position(id) {
                    prop_assert_eq!(*pos, now);
                }
            }

            // Non-degraded stars keep their distance.
            prop_assert!(layout.violations(MIN_DISTANCE).is_empty());

            // Attempt bound.
            for r in layout.iter() {
                prop_assert!(r.attempts <= MAX_ATTEMPTS + 1);
            }

            previous = positions(layout);
        }
    }
}
