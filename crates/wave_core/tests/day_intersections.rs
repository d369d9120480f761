use std::sync::Arc;

use wave_core::engine::IntersectionEngine;
use wave_core::phase::PhaseModel;
use wave_core::settings::{EngineSettings, DEFAULT_AMPLITUDE};
use wave_core::time::{DayKey, ONE_DAY_MS};
use wave_core::validate::Intersection;
use wave_core::wave::{Group, Wave, WaveSnapshot};

fn engine() -> IntersectionEngine {
    IntersectionEngine::new(EngineSettings::default()).expect("default settings")
}

fn enabled_snapshot(epoch: f64, waves: Vec<Wave>) -> WaveSnapshot {
    let group = waves
        .iter()
        .fold(Group::new("main", true), |group, wave| group.with_member(wave.id.clone()));
    WaveSnapshot::new(epoch, waves, vec![group])
}

fn biorhythm_waves() -> Vec<Wave> {
    vec![
        Wave::new("physical", 23.0).with_color("#e53935"),
        Wave::new("emotional", 28.0).with_color("#1e88e5"),
        Wave::new("intellectual", 33.0).with_color("#43a047"),
        Wave::new("intuitive", 38.0).with_color("#8e24aa"),
    ]
}

fn find_wave<'a>(snapshot: &'a WaveSnapshot, id: &str) -> &'a Wave {
    snapshot
        .waves
        .iter()
        .find(|wave| wave.id == id)
        .expect("intersection refers to a known wave")
}

fn assert_equal_values(snapshot: &WaveSnapshot, hits: &[Intersection]) {
    let model = PhaseModel::new(snapshot.epoch, DEFAULT_AMPLITUDE);
    for hit in hits {
        let a = model.value_at(find_wave(snapshot, &hit.wave_a), hit.time);
        let b = model.value_at(find_wave(snapshot, &hit.wave_b), hit.time);
        assert!(
            (a - b).abs() < 1e-6,
            "{} vs {} at {}: {a} != {b}",
            hit.wave_a,
            hit.wave_b,
            hit.time
        );
        assert!((hit.value - a).abs() < 1e-6);
    }
}

#[test]
fn boundary_scenario_24_and_28_day_waves() {
    let engine = engine();
    let snapshot = enabled_snapshot(
        0.0,
        vec![Wave::new("a", 24.0), Wave::new("b", 28.0)],
    );

    // Day 10 falls between the supplementary crossings at 6.46 and 19.38
    // days, and the next equal-angle crossing is on day 168.
    let first = engine.compute_intersections_for_day(DayKey(10), &snapshot);
    assert_eq!(first.len(), 0);
    let generated = engine.stats().candidate_generations;
    assert_eq!(generated, 1);

    let second = engine.compute_intersections_for_day(DayKey(10), &snapshot);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(engine.stats().candidate_generations, generated);
    assert_eq!(engine.stats().cache_hits, 1);

    // The first supplementary crossing sits at 1 / (2 · (1/24 + 1/28)) days.
    let crossing_day: f64 = 1.0 / (2.0 * (1.0 / 24.0 + 1.0 / 28.0));
    let hits = engine.compute_intersections_for_day(DayKey(crossing_day.floor() as i64), &snapshot);
    assert_eq!(hits.len(), 1);
    assert!((hits[0].time - crossing_day * ONE_DAY_MS).abs() < 1.0);
    assert_equal_values(&snapshot, &hits);
}

#[test]
fn every_result_is_an_equal_value_instant_in_order() {
    let engine = engine();
    let epoch = DayKey::from_ymd(1990, 5, 17).expect("valid date").0 as f64 * ONE_DAY_MS;
    let snapshot = enabled_snapshot(epoch, biorhythm_waves());
    let start = DayKey::from_ymd(2024, 3, 1).expect("valid date");

    let mut total = 0;
    for offset in 0..30 {
        let day = DayKey(start.0 + offset);
        let hits = engine.compute_intersections_for_day(day, &snapshot);
        let window = engine.day_window(day);
        assert_equal_values(&snapshot, &hits);
        for pair in hits.windows(2) {
            assert!(pair[0].time <= pair[1].time, "results out of order");
        }
        assert!(hits.iter().all(|hit| window.contains(hit.time)));
        total += hits.len();
    }
    // Six pairs, each crossing about twice a month.
    assert!(total >= 6, "expected regular crossings, got {total}");
}

#[test]
fn no_duplicates_within_a_second_for_the_same_pair() {
    let engine = engine();
    let snapshot = enabled_snapshot(
        0.0,
        vec![Wave::new("fast", 0.05), Wave::new("faster", 0.07), Wave::new("slow", 23.0)],
    );
    let hits = engine.compute_intersections_for_day(DayKey(3), &snapshot);
    assert!(!hits.is_empty());
    for (i, x) in hits.iter().enumerate() {
        for y in &hits[i + 1..] {
            if x.wave_a == y.wave_a && x.wave_b == y.wave_b {
                assert!((x.time - y.time).abs() >= 1000.0, "duplicate crossing");
            }
        }
    }
    assert_equal_values(&snapshot, &hits);
}

#[test]
fn fresh_computation_is_deterministic() {
    let snapshot = enabled_snapshot(0.0, biorhythm_waves());
    let day = DayKey(19_800);

    let first = engine();
    let a = first.compute_intersections_for_day(day, &snapshot);
    let cached = first.compute_intersections_for_day(day, &snapshot);
    first.invalidate_cache();
    let recomputed = first.compute_intersections_for_day(day, &snapshot);
    let other = engine().compute_intersections_for_day(day, &snapshot);

    assert!(Arc::ptr_eq(&a, &cached));
    assert!(!Arc::ptr_eq(&a, &recomputed));
    for list in [&recomputed, &other] {
        assert_eq!(list.len(), a.len());
        for (x, y) in a.iter().zip(list.iter()) {
            assert_eq!(x.time.to_bits(), y.time.to_bits());
            assert_eq!(x, y);
        }
    }
}

#[test]
fn swapping_a_pair_finds_the_same_instants() {
    let engine = engine();
    let a = Wave::new("a", 23.0);
    let b = Wave::new("b", 33.0);
    for day in [3, 40, 251, 1_000] {
        let forward = engine
            .pair_intersections(&a, &b, DayKey(day), 0.0)
            .expect("valid waves");
        let backward = engine
            .pair_intersections(&b, &a, DayKey(day), 0.0)
            .expect("valid waves");
        assert_eq!(forward.len(), backward.len(), "day {day}");
        for (x, y) in forward.iter().zip(backward.iter()) {
            assert!((x.time - y.time).abs() < 1e-3);
            assert!((x.value - y.value).abs() < 1e-6);
            assert_eq!((x.wave_a.as_str(), x.wave_b.as_str()), ("a", "b"));
            assert_eq!((y.wave_a.as_str(), y.wave_b.as_str()), ("b", "a"));
        }
    }
}

#[test]
fn coincident_waves_produce_hourly_samples() {
    let engine = engine();
    let snapshot = enabled_snapshot(
        0.0,
        vec![Wave::new("twin-1", 28.0), Wave::new("twin-2", 28.0)],
    );
    let hits = engine.compute_intersections_for_day(DayKey(5), &snapshot);
    assert_eq!(hits.len(), 24);
    let window = engine.day_window(DayKey(5));
    for (hour, hit) in hits.iter().enumerate() {
        let expected = window.start + hour as f64 * ONE_DAY_MS / 24.0;
        assert!((hit.time - expected).abs() < 1e-3);
        assert!(hit.exact);
    }
}

#[test]
fn nearly_coincident_waves_sample_every_day() {
    let engine = engine();
    let snapshot = enabled_snapshot(
        0.0,
        vec![
            Wave::new("twin-1", 28.0),
            Wave::new("twin-2", 28.0).with_origin(0.1),
        ],
    );
    for day in [0, 1, 2, 6, 7, 20, 21] {
        let hits = engine.compute_intersections_for_day(DayKey(day), &snapshot);
        assert_eq!(hits.len(), 24, "day {day}");
        assert!(hits.iter().all(|hit| hit.exact), "day {day}");
        assert_equal_values(&snapshot, &hits);
    }
}

#[test]
fn equal_periods_with_shifted_origin_cross_once_a_day() {
    let engine = engine();
    let snapshot = enabled_snapshot(
        0.0,
        vec![
            Wave::new("base", 2.0),
            Wave::new("shifted", 2.0).with_origin(0.4 * ONE_DAY_MS),
        ],
    );
    let mut total = 0;
    for day in 0..4 {
        let hits = engine.compute_intersections_for_day(DayKey(day), &snapshot);
        assert_equal_values(&snapshot, &hits);
        total += hits.len();
    }
    // The sum of the two angles advances by 2π a day: one supplementary
    // crossing per day, at 0.7 days past midnight.
    assert_eq!(total, 4);
}

#[test]
fn eighth_day_evicts_the_first() {
    let engine = engine();
    let snapshot = enabled_snapshot(0.0, biorhythm_waves());
    for day in 0..8 {
        engine.compute_intersections_for_day(DayKey(day), &snapshot);
    }
    let resident = engine.cached_days();
    assert_eq!(resident.len(), 7);
    assert!(!resident.contains(&DayKey(0)));

    let before = engine.stats().computations;
    engine.compute_intersections_for_day(DayKey(0), &snapshot);
    assert_eq!(engine.stats().computations, before + 1);
    assert!(!engine.cached_days().contains(&DayKey(1)));
}

#[test]
fn hidden_and_disabled_waves_are_not_paired() {
    let engine = engine();
    let waves = vec![
        Wave::new("physical", 23.0).with_group("body"),
        Wave::new("emotional", 28.0).with_group("mind"),
        Wave::new("intellectual", 33.0).with_group("mind").hidden(),
    ];
    let groups = vec![Group::new("body", true), Group::new("mind", true)];
    let snapshot = WaveSnapshot::new(0.0, waves, groups);
    for day in 0..60 {
        for hit in engine
            .compute_intersections_for_day(DayKey(day), &snapshot)
            .iter()
        {
            assert_ne!(hit.wave_a, "intellectual");
            assert_ne!(hit.wave_b, "intellectual");
        }
    }
}
